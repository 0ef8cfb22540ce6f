use crate::domain::models::{Client, InvestmentTrack, MonthlyRecord, NewClient};
use crate::domain::repository::{ClientStore, StoreResult};
use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};
use std::collections::HashMap;

pub struct SqliteClientStore {
    pub pool: SqlitePool,
}

impl SqliteClientStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ClientRow {
    id: i64,
    name: String,
    profession: String,
    custom_profession: Option<String>,
    investment_track: String,
    monthly_expenses: f64,
    investment_percentage: String,
}

#[derive(Debug, FromRow)]
struct MonthlyRow {
    client_id: i64,
    month: i64,
    expenses: Option<f64>,
    investment: Option<f64>,
    portfolio_value: Option<f64>,
    profit: Option<f64>,
}

#[async_trait]
impl ClientStore for SqliteClientStore {
    async fn list_clients(&self) -> StoreResult<Vec<Client>> {
        let client_rows = sqlx::query_as::<_, ClientRow>(
            "SELECT id, name, profession, custom_profession, investment_track, monthly_expenses, investment_percentage FROM clients ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let monthly_rows = sqlx::query_as::<_, MonthlyRow>(
            "SELECT client_id, month, expenses, investment, portfolio_value, profit FROM monthly_data ORDER BY client_id ASC, month ASC",
        )
        .fetch_all(&self.pool)
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
                    monthly_data: by_client.remove(&row.id).unwrap_or_default(),
                })
            })
            .collect()
    }

    async fn insert_client(&self, client: &NewClient) -> StoreResult<Client> {
        let result = sqlx::query(
            "INSERT INTO clients (name, profession, custom_profession, investment_track, monthly_expenses, investment_percentage) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&client.name)
        .bind(&client.profession)
        .bind(&client.custom_profession)
        .bind(client.investment_track.as_str())
        .bind(client.monthly_expenses)
        .bind(&client.investment_percentage)
        .execute(&self.pool)
        .await?;
        let id = result.last_insert_rowid();

        for record in &client.monthly_data {
            sqlx::query(
                "INSERT INTO monthly_data (client_id, month, expenses, investment, portfolio_value, profit) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(id)
            .bind(record.month)
            .bind(record.expenses)
            .bind(record.investment)
            .bind(record.portfolio_value)
            .bind(record.profit)
            .execute(&self.pool)
            .await?;
        }

        Ok(Client {
            id,
            name: client.name.clone(),
            profession: client.profession.clone(),
            custom_profession: client.custom_profession.clone(),
            investment_track: client.investment_track,
            monthly_expenses: client.monthly_expenses,
            investment_percentage: client.investment_percentage.clone(),
            monthly_data: client.monthly_data.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> SqliteClientStore {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        SqliteClientStore::new(pool)
    }

    fn sample_client(name: &str) -> NewClient {
        NewClient {
            name: name.to_string(),
            profession: "engineer".to_string(),
            custom_profession: None,
            investment_track: InvestmentTrack::Spy500,
            monthly_expenses: 12000.0,
            investment_percentage: "10".to_string(),
            monthly_data: vec![
                MonthlyRecord {
                    month: 1,
                    expenses: Some(12000.0),
                    investment: Some(1200.0),
                    portfolio_value: Some(1250.0),
                    profit: Some(50.0),
                },
                MonthlyRecord {
                    month: 2,
                    expenses: Some(12000.0),
                    investment: Some(1200.0),
                    portfolio_value: Some(2520.0),
                    profit: Some(120.0),
                },
            ],
        }
    }

    #[tokio::test]
    async fn insert_assigns_ids_and_roundtrips() {
        let store = memory_store().await;
        let first = store.insert_client(&sample_client("Dana")).await.unwrap();
        let second = store.insert_client(&sample_client("Omer")).await.unwrap();
        assert!(second.id > first.id);

        let clients = store.list_clients().await.unwrap();
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].name, "Dana");
        assert_eq!(clients[0].monthly_data.len(), 2);
        assert_eq!(clients[0].monthly_data[1].portfolio_value, Some(2520.0));
        assert_eq!(clients[0].investment_track, InvestmentTrack::Spy500);
    }

    #[tokio::test]
    async fn monthly_data_comes_back_ordered_by_month() {
        let store = memory_store().await;
        let mut client = sample_client("Dana");
        client.monthly_data.reverse();
        store.insert_client(&client).await.unwrap();

        let clients = store.list_clients().await.unwrap();
        let months: Vec<_> = clients[0].monthly_data.iter().map(|r| r.month).collect();
        assert_eq!(months, vec![1, 2]);
    }

    #[tokio::test]
    async fn client_without_monthly_data_lists_with_empty_series() {
        let store = memory_store().await;
        let mut client = sample_client("Noa");
        client.monthly_data.clear();
        store.insert_client(&client).await.unwrap();

        let clients = store.list_clients().await.unwrap();
        assert_eq!(clients.len(), 1);
        assert!(clients[0].monthly_data.is_empty());
    }

    #[tokio::test]
    async fn duplicate_month_for_same_client_is_rejected() {
        let store = memory_store().await;
        let mut client = sample_client("Dana");
        client.monthly_data[1].month = 1;
        assert!(store.insert_client(&client).await.is_err());
    }

    #[tokio::test]
    async fn nullable_numeric_columns_roundtrip_as_none() {
        let store = memory_store().await;
        let mut client = sample_client("Dana");
        client.monthly_data.truncate(1);
        client.monthly_data[0].investment = None;
        client.monthly_data[0].profit = None;
        store.insert_client(&client).await.unwrap();

        let clients = store.list_clients().await.unwrap();
        let record = &clients[0].monthly_data[0];
        assert_eq!(record.investment, None);
        assert_eq!(record.profit, None);
        assert_eq!(record.portfolio_value, Some(1250.0));
    }
}
