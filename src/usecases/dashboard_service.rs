use crate::domain::models::{AggregateMetrics, Client, ClientMetrics, NewClient};
use crate::domain::repository::{ClientStore, StoreResult};
use crate::local_store::LegacyStore;
use crate::usecases::metrics::{aggregate, compute_metrics};
use crate::usecases::search::filter_clients;
use crate::usecases::series::{project_series, NamedSeries, SeriesVisibility};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct ClientCache {
    clients: Vec<Client>,
    refreshed_at: Option<DateTime<Utc>>,
}

/// Owns the in-memory client cache and computes every dashboard view
/// from it on demand. The cache is only ever replaced wholesale by
/// `refresh`; a failed fetch leaves the previous contents in place.
pub struct DashboardService {
    store: Arc<dyn ClientStore>,
    cache: RwLock<ClientCache>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn ClientStore>) -> Self {
        Self {
            store,
            cache: RwLock::new(ClientCache::default()),
        }
    }

    /// Replace the whole cache with a fresh fetch from the store.
    pub async fn refresh(&self) -> StoreResult<usize> {
        let clients = self.store.list_clients().await?;
        let count = clients.len();
        let mut cache = self.cache.write().await;
        *cache = ClientCache {
            clients,
            refreshed_at: Some(Utc::now()),
        };
        Ok(count)
    }

    pub async fn clients(&self, search: Option<&str>) -> Vec<Client> {
        let cache = self.cache.read().await;
        match search {
            Some(term) => filter_clients(&cache.clients, term)
                .into_iter()
                .cloned()
                .collect(),
            None => cache.clients.clone(),
        }
    }

    pub async fn overview(&self) -> (AggregateMetrics, Option<DateTime<Utc>>) {
        let cache = self.cache.read().await;
        (aggregate(&cache.clients), cache.refreshed_at)
    }

    pub async fn client_metrics(&self, id: i64) -> Option<ClientMetrics> {
        let cache = self.cache.read().await;
        cache
            .clients
            .iter()
            .find(|client| client.id == id)
            .map(compute_metrics)
    }

    pub async fn client_series(
        &self,
        id: i64,
        visibility: &SeriesVisibility,
    ) -> Option<Vec<NamedSeries>> {
        let cache = self.cache.read().await;
        cache
            .clients
            .iter()
            .find(|client| client.id == id)
            .map(|client| project_series(&client.monthly_data, visibility))
    }

    /// Insert through the store and append the assigned record to the cache.
    pub async fn add_client(&self, client: NewClient) -> StoreResult<Client> {
        let created = self.store.insert_client(&client).await?;
        let mut cache = self.cache.write().await;
        cache.clients.push(created.clone());
        Ok(created)
    }

    /// One-shot migration of the legacy local cache into the store.
    ///
    /// The first failed insert aborts the rest; records already inserted
    /// stay, so a retry duplicates them. The legacy cache is cleared only
    /// once every record made it across.
    pub async fn migrate_legacy(&self, legacy: &dyn LegacyStore) -> StoreResult<usize> {
        let Some(clients) = legacy.read_clients()? else {
            return Ok(0);
        };
        let total = clients.len();
        tracing::info!(clients = total, "Found legacy clients to migrate");
        for client in &clients {
            self.store.insert_client(client).await?;
        }
        legacy.clear()?;
        Ok(total)
    }
}
