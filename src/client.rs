//! Dealership Client
//!
//! High-level client that wires the authenticated HTTP client, the token
//! store and every backend service together.

use std::sync::Arc;

use crate::core::{
    AuthenticatedClient, HttpTransport, LoggingNavigator, LoginNavigator, ReqwestHttpTransport,
};
use crate::error::DealershipError;
use crate::services::{
    Accounts, Addresses, AuthServiceImpl, Cars, CurrencyRatesServiceImpl, Customers, Gallerists,
    Inventory, ResourceService, Sales,
};
use crate::telemetry::ClientMetrics;
use crate::token::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, TokenStore};
use crate::types::{BackendVersion, ClientConfig};

/// Client for the dealership administration backend.
pub struct DealershipClient<T: HttpTransport = ReqwestHttpTransport> {
    inner: Arc<AuthenticatedClient<T>>,
}

impl<T: HttpTransport> Clone for DealershipClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl DealershipClient<ReqwestHttpTransport> {
    /// Create a client with the reqwest transport.
    ///
    /// Tokens persist to `config.token_file` when set and live in memory
    /// otherwise. A session end is reported through the log.
    pub async fn new(config: ClientConfig) -> Result<Self, DealershipError> {
        let transport =
            ReqwestHttpTransport::with_options(config.timeout, config.max_response_size)?;

        let storage: Arc<dyn KeyValueStore> = match &config.token_file {
            Some(path) => Arc::new(FileKeyValueStore::new(path.clone())),
            None => Arc::new(InMemoryKeyValueStore::new()),
        };
        let tokens = TokenStore::load(storage).await;

        Ok(Self::with_components(
            config,
            transport,
            tokens,
            Arc::new(LoggingNavigator),
        ))
    }
}

impl<T: HttpTransport> DealershipClient<T> {
    /// Create a client with custom implementations.
    pub fn with_components(
        config: ClientConfig,
        transport: T,
        tokens: TokenStore,
        navigator: Arc<dyn LoginNavigator>,
    ) -> Self {
        Self::from_shared(config, Arc::new(transport), Arc::new(tokens), navigator, None)
    }

    /// Create a client over shared components, reporting to `metrics` when
    /// given.
    pub fn from_shared(
        config: ClientConfig,
        transport: Arc<T>,
        tokens: Arc<TokenStore>,
        navigator: Arc<dyn LoginNavigator>,
        metrics: Option<Arc<dyn ClientMetrics>>,
    ) -> Self {
        let mut client = AuthenticatedClient::new(config, transport, tokens, navigator);
        if let Some(metrics) = metrics {
            client = client.with_metrics(metrics);
        }
        Self {
            inner: Arc::new(client),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        self.inner.config()
    }

    pub fn backend_version(&self) -> BackendVersion {
        self.inner.config().backend_version
    }

    /// Cached token pair.
    pub fn tokens(&self) -> &Arc<TokenStore> {
        self.inner.tokens()
    }

    /// Authenticated HTTP client shared by every service.
    pub fn http(&self) -> &Arc<AuthenticatedClient<T>> {
        &self.inner
    }

    // ========== Services ==========

    pub fn auth(&self) -> AuthServiceImpl<T> {
        AuthServiceImpl::new(self.inner.clone())
    }

    pub fn cars(&self) -> ResourceService<T, Cars> {
        ResourceService::new(self.inner.clone())
    }

    pub fn customers(&self) -> ResourceService<T, Customers> {
        ResourceService::new(self.inner.clone())
    }

    pub fn gallerists(&self) -> ResourceService<T, Gallerists> {
        ResourceService::new(self.inner.clone())
    }

    pub fn accounts(&self) -> ResourceService<T, Accounts> {
        ResourceService::new(self.inner.clone())
    }

    pub fn addresses(&self) -> ResourceService<T, Addresses> {
        ResourceService::new(self.inner.clone())
    }

    /// Gallerist inventory assignments.
    pub fn inventory(&self) -> ResourceService<T, Inventory> {
        ResourceService::new(self.inner.clone())
    }

    /// Completed sales.
    pub fn sales(&self) -> ResourceService<T, Sales> {
        ResourceService::new(self.inner.clone())
    }

    pub fn currency_rates(&self) -> CurrencyRatesServiceImpl<T> {
        CurrencyRatesServiceImpl::new(self.inner.clone())
    }
}

/// Create a client with the reqwest transport.
pub async fn dealership_client(config: ClientConfig) -> Result<DealershipClient, DealershipError> {
    DealershipClient::new(config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::client_config;
    use crate::core::{MockHttpTransport, RecordingNavigator};
    use crate::services::{AuthService, ResourceApi};
    use crate::types::{Credentials, ResourceKind};
    use serde_json::json;

    fn create_test_config() -> ClientConfig {
        client_config()
            .base_url("http://dealer.test")
            .backend_version(BackendVersion::V1)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = DealershipClient::new(create_test_config()).await.unwrap();
        assert_eq!(client.backend_version(), BackendVersion::V1);
        assert!(!client.tokens().is_authenticated());
    }

    #[tokio::test]
    async fn test_client_restores_tokens_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let config = client_config()
            .base_url("http://dealer.test")
            .token_file(&path)
            .build()
            .unwrap();

        let first = DealershipClient::new(config.clone()).await.unwrap();
        first.tokens().set_tokens("A1", "R1").await.unwrap();

        let second = DealershipClient::new(config).await.unwrap();
        assert_eq!(second.tokens().access_token().as_deref(), Some("A1"));
        assert_eq!(second.tokens().refresh_token().as_deref(), Some("R1"));
    }

    #[tokio::test]
    async fn test_services_share_the_session() {
        let mock = Arc::new(MockHttpTransport::new());
        let client = DealershipClient::from_shared(
            create_test_config(),
            mock.clone(),
            Arc::new(TokenStore::in_memory()),
            Arc::new(RecordingNavigator::new()),
            None,
        );
        mock.queue_payload(json!({"accessToken": "A1", "refreshToken": "R1"}));
        mock.queue_payload(json!([]));

        client.auth().login(&Credentials::new("u", "p")).await.unwrap();
        assert!(client.cars().get_all().await.unwrap().is_empty());

        let request = mock.get_last_request().unwrap();
        assert_eq!(request.header("authorization"), Some("Bearer A1"));
    }

    #[test]
    fn test_with_components() {
        let client = DealershipClient::with_components(
            create_test_config(),
            MockHttpTransport::new(),
            TokenStore::in_memory(),
            Arc::new(RecordingNavigator::new()),
        );
        assert_eq!(client.config().login_path, "/login");
        assert_eq!(client.http().session().queued(), 0);
    }

    #[tokio::test]
    async fn test_v1_sales_have_no_delete() {
        let mock = Arc::new(MockHttpTransport::new());
        let client = DealershipClient::from_shared(
            create_test_config(),
            mock.clone(),
            Arc::new(TokenStore::in_memory()),
            Arc::new(RecordingNavigator::new()),
            None,
        );

        let err = client.sales().delete("1").await.unwrap_err();
        assert!(matches!(
            err,
            DealershipError::NotImplemented {
                resource: ResourceKind::Sale,
                ..
            }
        ));
        assert_eq!(mock.request_count(), 0);
    }
}
