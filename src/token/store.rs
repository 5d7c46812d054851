//! Token Store
//!
//! Process-wide token pair: an in-memory cache read synchronously, written
//! through to a [`KeyValueStore`]. The persistent store is only consulted at
//! startup.

use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::error::StorageError;
use crate::telemetry::redact_token;
use crate::token::{InMemoryKeyValueStore, KeyValueStore};

/// Storage key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

#[derive(Default)]
struct CachedTokens {
    access: Option<SecretString>,
    refresh: Option<SecretString>,
}

/// Cached token pair over a persistent key-value store.
pub struct TokenStore {
    cache: RwLock<CachedTokens>,
    storage: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    /// Restore the token pair from `storage`.
    ///
    /// A storage failure is logged and the session starts signed out.
    pub async fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let access = read_token(storage.as_ref(), ACCESS_TOKEN_KEY).await;
        let refresh = read_token(storage.as_ref(), REFRESH_TOKEN_KEY).await;

        debug!(
            access_token = %access.as_ref().map(|t| redact_token(t.expose_secret())).unwrap_or_default(),
            has_refresh_token = refresh.is_some(),
            "Token store initialized"
        );

        Self {
            cache: RwLock::new(CachedTokens { access, refresh }),
            storage,
        }
    }

    /// Empty store backed by process memory only.
    pub fn in_memory() -> Self {
        Self {
            cache: RwLock::new(CachedTokens::default()),
            storage: Arc::new(InMemoryKeyValueStore::new()),
        }
    }

    /// Current access token.
    pub fn access_token(&self) -> Option<String> {
        self.cache
            .read()
            .access
            .as_ref()
            .map(|t| t.expose_secret().clone())
    }

    /// Current refresh token.
    pub fn refresh_token(&self) -> Option<String> {
        self.cache
            .read()
            .refresh
            .as_ref()
            .map(|t| t.expose_secret().clone())
    }

    /// Whether an access token is held.
    pub fn is_authenticated(&self) -> bool {
        self.cache.read().access.is_some()
    }

    /// Replace the token pair.
    ///
    /// The in-memory pair is updated first and stays updated even when the
    /// write-through fails; the failure is logged and returned.
    pub async fn set_tokens(&self, access: &str, refresh: &str) -> Result<(), StorageError> {
        {
            let mut cache = self.cache.write();
            cache.access = non_empty(access);
            cache.refresh = non_empty(refresh);
        }

        let result = async {
            self.storage.set(ACCESS_TOKEN_KEY, access).await?;
            self.storage.set(REFRESH_TOKEN_KEY, refresh).await
        }
        .await;

        match &result {
            Ok(()) => debug!(access_token = %redact_token(access), "Tokens stored"),
            Err(e) => error!(error = %e, "Failed to persist tokens"),
        }
        result
    }

    /// Remove both tokens from memory and from the persistent store.
    pub async fn clear_tokens(&self) -> Result<(), StorageError> {
        self.forget();

        let access = self.storage.remove(ACCESS_TOKEN_KEY).await;
        let refresh = self.storage.remove(REFRESH_TOKEN_KEY).await;
        let result = access.and(refresh);

        match &result {
            Ok(()) => info!("Tokens cleared"),
            Err(e) => error!(error = %e, "Failed to remove persisted tokens"),
        }
        result
    }

    /// Drop the in-memory pair without touching the persistent store.
    pub(crate) fn forget(&self) {
        let mut cache = self.cache.write();
        cache.access = None;
        cache.refresh = None;
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cache = self.cache.read();
        f.debug_struct("TokenStore")
            .field("has_access_token", &cache.access.is_some())
            .field("has_refresh_token", &cache.refresh.is_some())
            .finish()
    }
}

fn non_empty(value: &str) -> Option<SecretString> {
    if value.is_empty() {
        None
    } else {
        Some(SecretString::new(value.to_string()))
    }
}

async fn read_token(storage: &dyn KeyValueStore, key: &str) -> Option<SecretString> {
    match storage.get(key).await {
        Ok(value) => value.as_deref().and_then(non_empty),
        Err(e) => {
            error!(key, error = %e, "Failed to restore token");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{FileKeyValueStore, MockKeyValueStore, StorageOp};

    #[tokio::test]
    async fn test_set_then_read() {
        let store = TokenStore::in_memory();
        assert!(!store.is_authenticated());

        store.set_tokens("A1", "R1").await.unwrap();
        assert_eq!(store.access_token().as_deref(), Some("A1"));
        assert_eq!(store.refresh_token().as_deref(), Some("R1"));
        assert!(store.is_authenticated());
    }

    #[tokio::test]
    async fn test_clear_then_read() {
        let storage = Arc::new(MockKeyValueStore::new());
        let store = TokenStore::load(storage.clone()).await;

        store.set_tokens("A1", "R1").await.unwrap();
        store.clear_tokens().await.unwrap();

        assert_eq!(store.access_token(), None);
        assert_eq!(store.refresh_token(), None);
        assert_eq!(storage.peek(ACCESS_TOKEN_KEY), None);
        assert_eq!(storage.peek(REFRESH_TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn test_load_restores_persisted_pair() {
        let storage = Arc::new(
            MockKeyValueStore::new()
                .with_entry(ACCESS_TOKEN_KEY, "A1")
                .with_entry(REFRESH_TOKEN_KEY, "R1"),
        );
        let store = TokenStore::load(storage).await;

        assert_eq!(store.access_token().as_deref(), Some("A1"));
        assert_eq!(store.refresh_token().as_deref(), Some("R1"));
    }

    #[tokio::test]
    async fn test_load_with_failing_storage_starts_signed_out() {
        let storage = Arc::new(MockKeyValueStore::new().with_entry(ACCESS_TOKEN_KEY, "A1"));
        storage.set_should_fail(true);

        let store = TokenStore::load(storage).await;
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_persist_failure_is_reported_but_memory_updated() {
        let storage = Arc::new(MockKeyValueStore::new());
        storage.set_should_fail(true);
        let store = TokenStore::load(storage.clone()).await;

        let result = store.set_tokens("A2", "R1").await;
        assert!(result.is_err());
        assert_eq!(store.access_token().as_deref(), Some("A2"));
        assert!(storage
            .get_history()
            .contains(&StorageOp::Set(ACCESS_TOKEN_KEY.to_string(), "A2".to_string())));
    }

    #[tokio::test]
    async fn test_file_backed_pair_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let first = TokenStore::load(Arc::new(FileKeyValueStore::new(&path))).await;
        first.set_tokens("A1", "R1").await.unwrap();

        let second = TokenStore::load(Arc::new(FileKeyValueStore::new(&path))).await;
        assert_eq!(second.access_token().as_deref(), Some("A1"));
        assert_eq!(second.refresh_token().as_deref(), Some("R1"));
    }

    #[test]
    fn test_debug_hides_tokens() {
        let store = TokenStore::in_memory();
        let debug = format!("{:?}", store);
        assert!(debug.contains("has_access_token"));
    }
}
