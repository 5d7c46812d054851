//! Authenticated Client
//!
//! Attaches the bearer token to every call and recovers from `401` responses
//! with a single-flight token refresh followed by one replay.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::core::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, LoginNavigator, RefreshLease,
    RefreshTicket, SessionState,
};
use crate::error::{
    create_error_from_response, extract_error_message, AuthError, DealershipError,
    NetworkError, ProtocolError,
};
use crate::telemetry::{log_request, log_response, redact_token, ClientMetrics, NoOpMetrics};
use crate::token::TokenStore;
use crate::types::{ClientConfig, Envelope, RefreshResponse};

/// Path of the token refresh endpoint.
pub const REFRESH_TOKEN_PATH: &str = "/refresh_token";

/// A logical call and whether it has already been replayed after a refresh.
#[derive(Clone, Debug)]
pub struct AuthenticatedRequest {
    pub request: HttpRequest,
    pub retried: bool,
}

impl AuthenticatedRequest {
    pub fn new(request: HttpRequest) -> Self {
        Self {
            request,
            retried: false,
        }
    }
}

/// HTTP client that owns the session: tokens, refresh state and sign-out.
pub struct AuthenticatedClient<T: HttpTransport> {
    config: ClientConfig,
    transport: Arc<T>,
    tokens: Arc<TokenStore>,
    session: SessionState,
    navigator: Arc<dyn LoginNavigator>,
    metrics: Arc<dyn ClientMetrics>,
}

impl<T: HttpTransport> AuthenticatedClient<T> {
    /// Create a client over `transport`.
    pub fn new(
        config: ClientConfig,
        transport: Arc<T>,
        tokens: Arc<TokenStore>,
        navigator: Arc<dyn LoginNavigator>,
    ) -> Self {
        Self {
            config,
            transport,
            tokens,
            session: SessionState::new(),
            navigator,
            metrics: Arc::new(NoOpMetrics),
        }
    }

    /// Report through `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<dyn ClientMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Full URL for a backend path.
    pub fn url(&self, path: &str) -> String {
        self.config.endpoint_url(path)
    }

    /// Send a request with the current access token.
    ///
    /// A `401` on a call that was not replayed yet triggers the refresh
    /// protocol. Every other response, including a `401` on a replay, is
    /// returned unchanged.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, DealershipError> {
        let call = AuthenticatedRequest::new(request);
        let response = self.dispatch(&call, self.tokens.access_token()).await?;

        if response.status == 401 && !call.retried {
            return self.recover_unauthorized(call, response).await;
        }
        Ok(response)
    }

    /// Send a request without bearer token or `401` handling.
    pub async fn send_public(&self, request: HttpRequest) -> Result<HttpResponse, DealershipError> {
        self.timed_send(request).await
    }

    /// Send through the interceptor and decode the envelope payload.
    pub async fn fetch<P: DeserializeOwned>(
        &self,
        request: HttpRequest,
    ) -> Result<P, DealershipError> {
        let response = self.execute(request).await?;
        decode_envelope(&response)
    }

    async fn dispatch(
        &self,
        call: &AuthenticatedRequest,
        access_token: Option<String>,
    ) -> Result<HttpResponse, DealershipError> {
        let mut request = call.request.clone();
        if let Some(token) = access_token {
            request = request.with_header("authorization", format!("Bearer {}", token));
        } else {
            debug!(url = %request.url, "No access token available for request");
        }
        self.timed_send(request).await
    }

    async fn timed_send(&self, request: HttpRequest) -> Result<HttpResponse, DealershipError> {
        let method = request.method.as_str();
        let url = request.url.clone();
        log_request(method, &url, request.header("authorization").is_some());

        let started = Instant::now();
        let result = self.transport.send(request).await;
        let elapsed = started.elapsed();

        let status = result.as_ref().ok().map(|r| r.status);
        self.metrics.record_request(method, status, elapsed);
        if let Some(status) = status {
            log_response(method, &url, status, elapsed.as_millis() as u64);
        }
        result
    }

    async fn recover_unauthorized(
        &self,
        mut call: AuthenticatedRequest,
        response: HttpResponse,
    ) -> Result<HttpResponse, DealershipError> {
        let lease = match self.session.acquire() {
            RefreshTicket::Waiter(pending) => {
                self.metrics.record_queued_request();
                let token = pending.wait().await?;
                call.retried = true;
                return self.dispatch(&call, Some(token)).await;
            }
            RefreshTicket::Leader(lease) => lease,
        };

        call.retried = true;

        let Some(refresh_token) = self.tokens.refresh_token() else {
            let error = create_error_from_response(response.status, &response.body);
            self.end_session(lease, error.clone()).await;
            return Err(error);
        };

        match self.request_access_token(&refresh_token).await {
            Ok(access_token) => {
                self.metrics.record_token_refresh(true);
                info!(access_token = %redact_token(&access_token), "Access token refreshed");

                // Logged by the store; the new token stays usable in memory.
                let _ = self.tokens.set_tokens(&access_token, &refresh_token).await;

                lease.resolve(access_token.clone());
                self.dispatch(&call, Some(access_token)).await
            }
            Err(error) => {
                self.metrics.record_token_refresh(false);
                self.end_session(lease, error.clone()).await;
                Err(error)
            }
        }
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Every failure, including timeout, is an [`AuthError::RefreshFailed`].
    async fn request_access_token(&self, refresh_token: &str) -> Result<String, DealershipError> {
        let timeout = self.config.refresh_timeout;
        let request = HttpRequest::json(
            HttpMethod::Post,
            self.url(REFRESH_TOKEN_PATH),
            &serde_json::json!({ "refreshToken": refresh_token }),
        )?
        .with_timeout(timeout);

        let response = match tokio::time::timeout(timeout, self.timed_send(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(error)) => return Err(refresh_failed(None, error.to_string())),
            Err(_) => {
                return Err(refresh_failed(
                    None,
                    NetworkError::Timeout { timeout }.to_string(),
                ))
            }
        };

        if !response.is_success() {
            let error = create_error_from_response(response.status, &response.body);
            return Err(refresh_failed(
                Some(response.status),
                extract_error_message(&error, "Token refresh rejected"),
            ));
        }

        let envelope: Envelope<RefreshResponse> = serde_json::from_str(&response.body)
            .map_err(|e| refresh_failed(Some(response.status), e.to_string()))?;

        if envelope.payload.access_token.is_empty() {
            return Err(refresh_failed(
                Some(response.status),
                "Refresh response did not contain an access token".to_string(),
            ));
        }
        Ok(envelope.payload.access_token)
    }

    /// Terminal sign-out: forget tokens, fail the queue, clear storage, redirect.
    async fn end_session(&self, lease: RefreshLease<'_>, error: DealershipError) {
        warn!(error = %error, "Ending session");

        self.tokens.forget();
        lease.reject(error);

        // Logged by the store.
        let _ = self.tokens.clear_tokens().await;

        self.metrics.record_session_end();
        self.navigator.redirect_to_login(&self.config.login_path);
    }
}

fn refresh_failed(status: Option<u16>, message: String) -> DealershipError {
    AuthError::RefreshFailed { status, message }.into()
}

/// Decode the payload of a successful envelope response.
///
/// Non-2xx responses become [`DealershipError::Api`].
pub fn decode_envelope<P: DeserializeOwned>(response: &HttpResponse) -> Result<P, DealershipError> {
    if !response.is_success() {
        return Err(create_error_from_response(response.status, &response.body));
    }

    let envelope: Envelope<P> =
        serde_json::from_str(&response.body).map_err(|e| ProtocolError::InvalidJson {
            message: e.to_string(),
        })?;
    Ok(envelope.payload)
}
