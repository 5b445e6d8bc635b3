use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::dashboard::{run_query, DashboardInput};
use crate::error::AppError;
use crate::provider::MarketDataProvider;
use crate::render::render_page;

pub struct AppState<P> {
    pub provider: Arc<P>,
    pub settings: Arc<DashboardConfig>,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            settings: Arc::clone(&self.settings),
        }
    }
}

/// Raw widget values as submitted. A missing field falls back to its
/// default; a present but empty `ticker` stays empty.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub ticker: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

fn parse_date(field: &str, raw: Option<&str>, fallback: NaiveDate) -> Result<NaiveDate, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(fallback),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
            AppError::InvalidInput(format!("{} must be a date like 2024-01-31, got '{}'", field, s))
        }),
    }
}

impl DashboardQuery {
    pub fn resolve(&self, today: NaiveDate, settings: &DashboardConfig) -> Result<DashboardInput, AppError> {
        let defaults = DashboardInput::defaults(today, settings);
        Ok(DashboardInput {
            ticker: self.ticker.clone().unwrap_or(defaults.ticker),
            start: parse_date("start", self.start.as_deref(), defaults.start)?,
            end: parse_date("end", self.end.as_deref(), defaults.end)?,
        })
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn bad_request(e: AppError) -> Response {
    tracing::info!(error = %e, "Rejected dashboard query");
    (StatusCode::BAD_REQUEST, e.to_string()).into_response()
}

pub fn router<P>(state: AppState<P>) -> Router
where
    P: MarketDataProvider + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(dashboard_page::<P>))
        .route("/api/dashboard", get(dashboard_json::<P>))
        .route("/health", get(health))
        .with_state(state)
}

async fn dashboard_page<P>(State(state): State<AppState<P>>, Query(query): Query<DashboardQuery>) -> Response
where
    P: MarketDataProvider + Send + Sync + 'static,
{
    let input = match query.resolve(today(), &state.settings) {
        Ok(input) => input,
        Err(e) => return bad_request(e),
    };
    let view = run_query(state.provider.as_ref(), &input, &state.settings).await;
    Html(render_page(&input, &view)).into_response()
}

async fn dashboard_json<P>(State(state): State<AppState<P>>, Query(query): Query<DashboardQuery>) -> Response
where
    P: MarketDataProvider + Send + Sync + 'static,
{
    let input = match query.resolve(today(), &state.settings) {
        Ok(input) => input,
        Err(e) => return bad_request(e),
    };
    let view = run_query(state.provider.as_ref(), &input, &state.settings).await;
    Json(view).into_response()
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

/// Bind and serve until Ctrl+C.
pub async fn serve<P>(bind_addr: &str, state: AppState<P>) -> Result<()>
where
    P: MarketDataProvider + Send + Sync + 'static,
{
    let addr: SocketAddr = bind_addr
        .parse()
        .with_context(|| format!("invalid bind address '{}'", bind_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, "Dashboard listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl+C received");
            }
        })
        .await
        .context("server terminated with error")?;

    tracing::info!("Shutdown complete");
    Ok(())
}
