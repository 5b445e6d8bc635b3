pub mod report;
pub mod view;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::config::DashboardConfig;
use crate::provider::MarketDataProvider;

pub use report::build_report;
pub use view::DashboardView;

pub const AWAITING_TICKER_MESSAGE: &str = "Please enter a stock ticker to begin.";
pub const NO_DATA_WARNING: &str = "No data found for the provided ticker and date range.";

/// Widget values for one run of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardInput {
    pub ticker: String,
    pub start: NaiveDate,
    /// Exclusive.
    pub end: NaiveDate,
}

impl DashboardInput {
    /// Default widget state: the configured ticker over the trailing lookback ending today.
    pub fn defaults(today: NaiveDate, settings: &DashboardConfig) -> Self {
        let lookback = Days::new(settings.default_lookback_days.max(0) as u64);
        Self {
            ticker: settings.default_ticker.clone(),
            start: today.checked_sub_days(lookback).unwrap_or(today),
            end: today,
        }
    }

    /// Trimmed, upper-cased ticker, or `None` when nothing was entered.
    pub fn normalized_ticker(&self) -> Option<String> {
        let t = self.ticker.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_ascii_uppercase())
        }
    }
}

fn no_data(ticker: String, detail: Option<String>) -> DashboardView {
    DashboardView::NoData {
        ticker,
        warning: NO_DATA_WARNING.to_string(),
        detail,
    }
}

/// Run the full pipeline for one input: guard on the ticker, fetch, guard on
/// emptiness, compute and lay out. Provider failures end in the same
/// warning state as an empty result.
pub async fn run_query<P: MarketDataProvider>(
    provider: &P,
    input: &DashboardInput,
    settings: &DashboardConfig,
) -> DashboardView {
    let Some(ticker) = input.normalized_ticker() else {
        tracing::debug!("No ticker entered, skipping fetch");
        return DashboardView::AwaitingTicker {
            message: AWAITING_TICKER_MESSAGE.to_string(),
        };
    };

    let span = tracing::info_span!(
        "dashboard_query",
        query_id = %uuid::Uuid::new_v4(),
        ticker = %ticker,
        start = %input.start,
        end = %input.end,
    );

    async move {
        if input.start >= input.end {
            tracing::warn!("Empty date range, no trading days to fetch");
            return no_data(ticker, None);
        }

        let series = match provider.fetch_daily(&ticker, input.start, input.end).await {
            Ok(series) => series,
            Err(e) => {
                let detail = format!("{:#}", e);
                tracing::warn!(error = %detail, "Market data fetch failed");
                return no_data(ticker, Some(detail));
            }
        };

        if series.is_empty() {
            tracing::warn!("Provider returned no rows");
            return no_data(ticker, None);
        }

        let report = build_report(&ticker, input.start, input.end, &series, settings);
        tracing::info!(rows = series.len(), "Dashboard rendered");
        DashboardView::Rendered(Box::new(report))
    }
    .instrument(span)
    .await
}
