pub mod types;
pub mod yahoo;

use std::future::Future;

use anyhow::Result;
use chrono::NaiveDate;

use crate::model::PriceSeries;

pub use yahoo::YahooChartClient;

/// Source of daily OHLCV history.
///
/// `start` is inclusive and `end` exclusive. An unknown ticker or a range
/// without trading days is an empty series, not an error.
pub trait MarketDataProvider {
    fn fetch_daily(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<PriceSeries>> + Send;
}
