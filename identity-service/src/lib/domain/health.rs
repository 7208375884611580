use async_trait::async_trait;

use crate::domain::errors::PersistenceError;

/// Connectivity check for the backing store.
#[async_trait]
pub trait DatabaseHealth: Send + Sync + 'static {
    async fn ping(&self) -> Result<(), PersistenceError>;
}
