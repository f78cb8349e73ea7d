use async_trait::async_trait;
use tam_core::authentication::types::TokenPair;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug)]
pub enum TokenStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Token store unavailable: {0}")]
    Unavailable(String),
}

/// Where the session's token pair lives between requests.
///
/// `set` replaces the whole pair so access and refresh tokens never drift
/// apart.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self) -> Result<Option<TokenPair>, TokenStoreError>;

    async fn set(&self, tokens: TokenPair) -> Result<(), TokenStoreError>;

    async fn clear(&self) -> Result<(), TokenStoreError>;
}

/// Process-local store, for tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self { tokens: RwLock::new(Some(tokens)) }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Result<Option<TokenPair>, TokenStoreError> {
        Ok(self.tokens.read().await.clone())
    }

    async fn set(&self, tokens: TokenPair) -> Result<(), TokenStoreError> {
        *self.tokens.write().await = Some(tokens);
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        *self.tokens.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_lifecycle() {
        let store = MemoryTokenStore::new();
        assert!(store.get().await.unwrap().is_none());

        store.set(TokenPair::new("access-1", "refresh-1")).await.unwrap();
        store.set(TokenPair::new("access-2", "refresh-2")).await.unwrap();
        assert_eq!(store.get().await.unwrap(), Some(TokenPair::new("access-2", "refresh-2")));

        store.clear().await.unwrap();
        assert!(store.get().await.unwrap().is_none());
    }
}
