use anyhow::Result;
use dotenv::dotenv;
use sqlx::SqlitePool;
use std::env;

// One-shot import of a legacy dashboard cache file (a JSON array of
// clients) straight into the sqlite store.

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyMonthly {
    month: i64,
    #[serde(default)]
    expenses: Option<f64>,
    #[serde(default)]
    investment: Option<f64>,
    #[serde(default)]
    portfolio_value: Option<f64>,
    #[serde(default)]
    profit: Option<f64>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyClient {
    name: String,
    profession: String,
    #[serde(default)]
    custom_profession: Option<String>,
    investment_track: String,
    #[serde(default)]
    monthly_expenses: f64,
    #[serde(default)]
    investment_percentage: String,
    #[serde(default)]
    monthly_data: Vec<LegacyMonthly>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let db_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/clients.db".to_string());
    let pool = SqlitePool::connect(&db_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "investment-clients.json".to_string());
    println!("Importing '{}' into {}", path, db_url);

    let raw = std::fs::read_to_string(&path)?;
    let clients: Vec<LegacyClient> = serde_json::from_str(&raw)?;

    let mut count: usize = 0;
    let mut months: usize = 0;
    for client in &clients {
        let result = sqlx::query("INSERT INTO clients (name, profession, custom_profession, investment_track, monthly_expenses, investment_percentage) VALUES (?1, ?2, ?3, ?4, ?5, ?6)")
            .bind(&client.name)
            .bind(&client.profession)
            .bind(&client.custom_profession)
            .bind(&client.investment_track)
            .bind(client.monthly_expenses)
            .bind(&client.investment_percentage)
            .execute(&pool)
            .await?;
        let id = result.last_insert_rowid();
        for record in &client.monthly_data {
            sqlx::query("INSERT INTO monthly_data (client_id, month, expenses, investment, portfolio_value, profit) VALUES (?1, ?2, ?3, ?4, ?5, ?6)")
                .bind(id)
                .bind(record.month)
                .bind(record.expenses)
                .bind(record.investment)
                .bind(record.portfolio_value)
                .bind(record.profit)
                .execute(&pool)
                .await?;
            months += 1;
        }
        count += 1;
    }
    println!("Inserted {} clients ({} monthly rows)", count, months);
    Ok(())
}
