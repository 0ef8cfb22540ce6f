use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use dotenv::dotenv;
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

mod api_client;
mod domain;
mod infra;
mod local_store;
mod usecases;

use crate::api_client::RestClientStore;
use crate::domain::models::{Client, ClientMetrics, NewClient};
use crate::domain::repository::ClientStore;
use crate::infra::sqlite::repo::SqliteClientStore;
use crate::local_store::JsonFileStore;
use crate::usecases::dashboard_service::DashboardService;
use crate::usecases::series::SeriesVisibility;

#[derive(Clone)]
struct AppState {
    service: Arc<DashboardService>,
}

#[derive(Deserialize)]
struct ClientsQuery {
    search: Option<String>,
}

#[derive(Deserialize)]
struct SeriesQuery {
    portfolio_value: Option<bool>,
    investment: Option<bool>,
    profit: Option<bool>,
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn not_found(what: &str) -> ApiError {
    (StatusCode::NOT_FOUND, Json(json!({ "error": what })))
}

async fn api_clients(
    State(state): State<AppState>,
    Query(q): Query<ClientsQuery>,
) -> Json<serde_json::Value> {
    let clients = state.service.clients(q.search.as_deref()).await;
    Json(json!({ "total": clients.len(), "clients": clients }))
}

#[tracing::instrument(skip(state, client))]
async fn api_create_client(
    State(state): State<AppState>,
    Json(client): Json<NewClient>,
) -> Result<(StatusCode, Json<Client>), ApiError> {
    match state.service.add_client(client).await {
        Ok(created) => {
            info!(id = created.id, name = %created.name, "Created client");
            Ok((StatusCode::CREATED, Json(created)))
        }
        Err(e) => {
            error!(error = %e, "Failed inserting client");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": format!("Failed inserting client: {e}") })),
            ))
        }
    }
}

async fn api_metrics(State(state): State<AppState>) -> Json<serde_json::Value> {
    let (metrics, refreshed_at) = state.service.overview().await;
    Json(json!({
        "metrics": metrics,
        "refreshedAt": refreshed_at.map(|t| t.to_rfc3339()),
    }))
}

async fn api_client_metrics(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ClientMetrics>, ApiError> {
    state
        .service
        .client_metrics(id)
        .await
        .map(Json)
        .ok_or_else(|| not_found("unknown client"))
}

async fn api_client_series(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(q): Query<SeriesQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let visibility = SeriesVisibility {
        portfolio_value: q.portfolio_value.unwrap_or(true),
        investment: q.investment.unwrap_or(true),
        profit: q.profit.unwrap_or(true),
    };
    state
        .service
        .client_series(id, &visibility)
        .await
        .map(|series| Json(json!({ "series": series })))
        .ok_or_else(|| not_found("unknown client"))
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/clients", get(api_clients).post(api_create_client))
        .route("/api/clients/{id}/metrics", get(api_client_metrics))
        .route("/api/clients/{id}/series", get(api_client_series))
        .route("/api/metrics", get(api_metrics))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn build_store() -> Result<Arc<dyn ClientStore>, Box<dyn Error>> {
    if let Ok(url) = std::env::var("CLIENT_STORE_URL") {
        let api_key = std::env::var("CLIENT_STORE_API_KEY").unwrap_or_default();
        info!(url = %url, "Using remote client store");
        return Ok(Arc::new(RestClientStore::new(url, api_key)));
    }
    let db_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/clients.db".to_string());
    let pool = SqlitePool::connect(&db_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!(db = %db_url, "Using sqlite client store");
    Ok(Arc::new(SqliteClientStore::new(pool)))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let store = build_store().await?;
    let service = Arc::new(DashboardService::new(store));

    let legacy_path = std::env::var("LEGACY_CACHE_PATH")
        .unwrap_or_else(|_| "investment-clients.json".to_string());
    match service.migrate_legacy(&JsonFileStore::new(&legacy_path)).await {
        Ok(migrated) => {
            if migrated > 0 {
                info!(migrated, path = %legacy_path, "Migrated legacy client cache");
            }
            match service.refresh().await {
                Ok(clients) => info!(clients, "Loaded clients"),
                Err(e) => error!(error = %e, "Initial client fetch failed, cache stays empty"),
            }
        }
        // a partial migration stays in the store; retrying duplicates it,
        // so surface the failure once and skip the initial fetch
        Err(e) => {
            error!(error = %e, path = %legacy_path, "Legacy cache migration failed, skipping initial fetch")
        }
    }

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);
    serve(app(AppState { service }), port).await;
    Ok(())
}

async fn serve(app: Router, port: u16) {
    // Try to bind to the requested port; if it's in use, try a few subsequent ports.
    let max_attempts = 10;
    for offset in 0..max_attempts {
        let try_port = port + offset;
        let addr = SocketAddr::from(([127, 0, 0, 1], try_port));
        match tokio::net::TcpListener::bind(&addr).await {
            Ok(listener) => {
                println!("Listening on {}", addr);
                if let Err(e) = axum::serve(listener, app).await {
                    error!(error = %e, "Server failed while serving");
                }
                return;
            }
            Err(e) => {
                warn!(port = try_port, error = %e, "Port unavailable, trying next");
            }
        }
    }
    error!("Failed to bind to any port in range {}..{}", port, port + max_attempts - 1);
}
