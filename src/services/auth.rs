//! Authentication Service
//!
//! Login, registration, logout and explicit token refresh. These endpoints
//! are called without the bearer token and outside the `401` refresh path.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::{
    decode_envelope, AuthenticatedClient, HttpMethod, HttpRequest, HttpTransport,
    REFRESH_TOKEN_PATH,
};
use crate::error::{DealershipError, ProtocolError};
use crate::telemetry::redact_token;
use crate::types::{AuthResponse, Credentials, RefreshResponse, User};

/// Path of the login endpoint.
pub const AUTHENTICATE_PATH: &str = "/authenticate";
/// Path of the registration endpoint.
pub const REGISTER_PATH: &str = "/register";

/// Authentication operations.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Sign in and store the returned token pair.
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, DealershipError>;

    /// Create a user account. Does not sign in.
    async fn register(&self, credentials: &Credentials) -> Result<User, DealershipError>;

    /// Forget the token pair, in memory and in storage.
    async fn logout(&self) -> Result<(), DealershipError>;

    /// Exchange `refresh_token` for a new access token. The stored pair is
    /// left untouched.
    async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshResponse, DealershipError>;

    /// Whether an access token is held.
    fn is_authenticated(&self) -> bool;
}

/// Authentication service over the shared client.
pub struct AuthServiceImpl<T: HttpTransport> {
    client: Arc<AuthenticatedClient<T>>,
}

impl<T: HttpTransport> AuthServiceImpl<T> {
    pub fn new(client: Arc<AuthenticatedClient<T>>) -> Self {
        Self { client }
    }

    async fn post<P: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<P, DealershipError> {
        let request = HttpRequest::json(HttpMethod::Post, self.client.url(path), body)?;
        let response = self.client.send_public(request).await?;
        decode_envelope(&response)
    }
}

#[async_trait]
impl<T: HttpTransport> AuthService for AuthServiceImpl<T> {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, DealershipError> {
        debug!(username = %credentials.username, "Sending login request");

        let payload: Option<AuthResponse> =
            self.post(AUTHENTICATE_PATH, &credentials.to_body()).await?;
        let tokens = match payload {
            Some(tokens) if tokens.is_complete() => tokens,
            _ => {
                return Err(ProtocolError::InvalidResponse {
                    message: "Invalid authentication response from server".to_string(),
                }
                .into())
            }
        };

        // Logged by the store; the pair stays usable in memory.
        let _ = self
            .client
            .tokens()
            .set_tokens(&tokens.access_token, &tokens.refresh_token)
            .await;

        info!(
            username = %credentials.username,
            access_token = %redact_token(&tokens.access_token),
            "Login complete"
        );
        Ok(tokens)
    }

    async fn register(&self, credentials: &Credentials) -> Result<User, DealershipError> {
        let user: User = self.post(REGISTER_PATH, &credentials.to_body()).await?;
        info!(username = %user.username, "User registered");
        Ok(user)
    }

    async fn logout(&self) -> Result<(), DealershipError> {
        self.client.tokens().clear_tokens().await?;
        info!("Logged out");
        Ok(())
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshResponse, DealershipError> {
        self.post(
            REFRESH_TOKEN_PATH,
            &serde_json::json!({ "refreshToken": refresh_token }),
        )
        .await
    }

    fn is_authenticated(&self) -> bool {
        self.client.tokens().is_authenticated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MockHttpTransport, RecordingNavigator};
    use crate::token::TokenStore;
    use crate::types::ClientConfig;
    use serde_json::json;

    fn service() -> (AuthServiceImpl<MockHttpTransport>, Arc<MockHttpTransport>, Arc<TokenStore>) {
        let config = ClientConfig::builder()
            .base_url("http://dealer.test")
            .build()
            .unwrap();
        let transport = Arc::new(MockHttpTransport::new());
        let tokens = Arc::new(TokenStore::in_memory());
        let client = AuthenticatedClient::new(
            config,
            transport.clone(),
            tokens.clone(),
            Arc::new(RecordingNavigator::new()),
        );
        (AuthServiceImpl::new(Arc::new(client)), transport, tokens)
    }

    #[tokio::test]
    async fn test_login_stores_tokens() {
        let (auth, transport, tokens) = service();
        transport.queue_payload(json!({"accessToken": "A1", "refreshToken": "R1"}));

        let response = auth.login(&Credentials::new("u", "p")).await.unwrap();
        assert_eq!(response.access_token, "A1");
        assert_eq!(tokens.access_token().as_deref(), Some("A1"));
        assert_eq!(tokens.refresh_token().as_deref(), Some("R1"));
        assert!(auth.is_authenticated());

        let request = transport.get_last_request().unwrap();
        assert_eq!(request.url, "http://dealer.test/authenticate");
        assert!(request.header("authorization").is_none());
        let body: serde_json::Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"username": "u", "password": "p"}));
    }

    #[tokio::test]
    async fn test_login_rejects_incomplete_payload() {
        let (auth, transport, tokens) = service();
        transport.queue_payload(json!({"accessToken": "A1"}));

        let err = auth.login(&Credentials::new("u", "p")).await.unwrap_err();
        assert!(err.to_string().contains("Invalid authentication response from server"));
        assert!(tokens.access_token().is_none());
    }

    #[tokio::test]
    async fn test_login_rejects_null_payload() {
        let (auth, transport, _) = service();
        transport.queue_payload(serde_json::Value::Null);

        assert!(matches!(
            auth.login(&Credentials::new("u", "p")).await,
            Err(DealershipError::Protocol(ProtocolError::InvalidResponse { .. }))
        ));
    }

    #[tokio::test]
    async fn test_login_failure_is_api_error() {
        let (auth, transport, _) = service();
        transport.queue_json_response(
            401,
            &json!({"status": 401, "exception": {"message": "Bad credentials"}}),
        );

        let err = auth.login(&Credentials::new("u", "wrong")).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_register_and_logout() {
        let (auth, transport, tokens) = service();
        transport.queue_payload(json!({"id": 4, "username": "new"}));

        let user = auth.register(&Credentials::new("new", "secret")).await.unwrap();
        assert_eq!(user.id, "4");
        assert_eq!(transport.get_last_request().unwrap().url, "http://dealer.test/register");

        tokens.set_tokens("A", "R").await.unwrap();
        auth.logout().await.unwrap();
        assert!(!auth.is_authenticated());
        assert!(tokens.refresh_token().is_none());
    }

    #[tokio::test]
    async fn test_explicit_refresh_leaves_store_untouched() {
        let (auth, transport, tokens) = service();
        tokens.set_tokens("A1", "R1").await.unwrap();
        transport.queue_payload(json!({"accessToken": "A2"}));

        let refreshed = auth.refresh_token("R1").await.unwrap();
        assert_eq!(refreshed.access_token, "A2");
        assert_eq!(tokens.access_token().as_deref(), Some("A1"));
    }
}
