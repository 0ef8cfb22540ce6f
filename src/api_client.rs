use crate::domain::models::{Client, InvestmentTrack, MonthlyRecord, NewClient};
use crate::domain::repository::{ClientStore, StoreResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Row shapes of the remote store's `clients` and `monthly_data` tables.
// The remote schema is snake_case; the dashboard JSON is camelCase.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ClientRow {
    id: i64,
    name: String,
    profession: String,
    custom_profession: Option<String>,
    investment_track: String,
    monthly_expenses: f64,
    investment_percentage: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MonthlyRow {
    client_id: i64,
    month: i64,
    expenses: Option<f64>,
    investment: Option<f64>,
    portfolio_value: Option<f64>,
    profit: Option<f64>,
}

#[derive(Debug, Serialize)]
struct NewClientRow<'a> {
    name: &'a str,
    profession: &'a str,
    custom_profession: Option<&'a str>,
    investment_track: &'static str,
    monthly_expenses: f64,
    investment_percentage: &'a str,
}

/// Client store backed by a Supabase-style REST API: one request per
/// table, stitched together by client id.
pub struct RestClientStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestClientStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, table: &str, query: &str) -> StoreResult<Vec<T>> {
        let url = format!("{}/rest/v1/{}?{}", self.base_url, table, query);
        let rows = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(rows)
    }

    async fn post_rows<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> StoreResult<Vec<T>> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        let rows = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(rows)
    }
}

fn into_client(row: ClientRow, monthly_data: Vec<MonthlyRecord>) -> StoreResult<Client> {
    let track = InvestmentTrack::parse(&row.investment_track)
        .ok_or_else(|| format!("unknown investment track '{}'", row.investment_track))?;
    Ok(Client {
        id: row.id,
        name: row.name,
        profession: row.profession,
        custom_profession: row.custom_profession,
        investment_track: track,
        monthly_expenses: row.monthly_expenses,
        investment_percentage: row.investment_percentage,
        monthly_data,
    })
}

#[async_trait]
impl ClientStore for RestClientStore {
    async fn list_clients(&self) -> StoreResult<Vec<Client>> {
        let client_rows: Vec<ClientRow> = self.fetch_rows("clients", "select=*&order=id.asc").await?;
        let monthly_rows: Vec<MonthlyRow> = self
            .fetch_rows("monthly_data", "select=*&order=client_id.asc,month.asc")
            .await?;

        let mut by_client: HashMap<i64, Vec<MonthlyRecord>> = HashMap::new();
        for row in monthly_rows {
            by_client.entry(row.client_id).or_default().push(MonthlyRecord {
                month: row.month,
                expenses: row.expenses,
                investment: row.investment,
                portfolio_value: row.portfolio_value,
                profit: row.profit,
            });
        }

        client_rows
            .into_iter()
            .map(|row| {
                let monthly = by_client.remove(&row.id).unwrap_or_default();
                into_client(row, monthly)
            })
            .collect()
    }

    async fn insert_client(&self, client: &NewClient) -> StoreResult<Client> {
        let row = NewClientRow {
            name: &client.name,
            profession: &client.profession,
            custom_profession: client.custom_profession.as_deref(),
            investment_track: client.investment_track.as_str(),
            monthly_expenses: client.monthly_expenses,
            investment_percentage: &client.investment_percentage,
        };
        let created: Vec<ClientRow> = self.post_rows("clients", &row).await?;
        let created = created
            .into_iter()
            .next()
            .ok_or("client insert returned no row")?;

        if !client.monthly_data.is_empty() {
            let monthly: Vec<MonthlyRow> = client
                .monthly_data
                .iter()
                .map(|record| MonthlyRow {
                    client_id: created.id,
                    month: record.month,
                    expenses: record.expenses,
                    investment: record.investment,
                    portfolio_value: record.portfolio_value,
                    profit: record.profit,
                })
                .collect();
            let _inserted: Vec<MonthlyRow> = self.post_rows("monthly_data", &monthly).await?;
        }

        into_client(created, client.monthly_data.clone())
    }
}

/// In-memory store for tests and handler mocks.
pub struct MockClientStore {
    clients: tokio::sync::Mutex<Vec<Client>>,
}

impl MockClientStore {
    pub fn new(clients: Vec<Client>) -> Self {
        Self {
            clients: tokio::sync::Mutex::new(clients),
        }
    }
}

#[async_trait]
impl ClientStore for MockClientStore {
    async fn list_clients(&self) -> StoreResult<Vec<Client>> {
        Ok(self.clients.lock().await.clone())
    }

    async fn insert_client(&self, client: &NewClient) -> StoreResult<Client> {
        let mut clients = self.clients.lock().await;
        let id = clients.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let created = Client {
            id,
            name: client.name.clone(),
            profession: client.profession.clone(),
            custom_profession: client.custom_profession.clone(),
            investment_track: client.investment_track,
            monthly_expenses: client.monthly_expenses,
            investment_percentage: client.investment_percentage.clone(),
            monthly_data: client.monthly_data.clone(),
        };
        clients.push(created.clone());
        Ok(created)
    }
}
