use crate::domain::models::{Client, NewClient};
use async_trait::async_trait;

pub type StoreResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// The client store seam. Implementations: sqlite (default backend),
/// a Supabase-style REST backend, and an in-memory mock for tests.
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Fetch every client with its monthly series ordered by month ascending.
    async fn list_clients(&self) -> StoreResult<Vec<Client>>;

    /// Persist a new client and its monthly series; the store assigns the id.
    async fn insert_client(&self, client: &NewClient) -> StoreResult<Client>;
}
