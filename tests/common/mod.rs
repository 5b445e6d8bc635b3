#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use chrono::{Days, NaiveDate};
use ticker_dash::model::{PriceBar, PriceSeries};
use ticker_dash::provider::MarketDataProvider;

/// Daily bars starting 2024-01-01 whose closes follow `closes`.
pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
    let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    PriceSeries::from_bars(
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: first + Days::new(i as u64),
                open: close * 0.995,
                high: close * 1.01,
                low: close * 0.99,
                close,
                volume: 1_000_000,
            })
            .collect(),
    )
}

pub fn wavy_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 150.0 + (i as f64 * 0.3).sin() * 6.0 + i as f64 * 0.05)
        .collect()
}

/// Provider that answers from memory and records every request.
#[derive(Clone)]
pub struct StaticProvider {
    series: Option<PriceSeries>,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<(String, NaiveDate, NaiveDate)>>>,
}

impl StaticProvider {
    pub fn returning(series: PriceSeries) -> Self {
        Self {
            series: Some(series),
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every fetch fails as if the network were down.
    pub fn failing() -> Self {
        Self {
            series: None,
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(String, NaiveDate, NaiveDate)> {
        self.requests.lock().unwrap().clone()
    }
}

impl MarketDataProvider for StaticProvider {
    async fn fetch_daily(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((ticker.to_string(), start, end));
        match &self.series {
            Some(series) => Ok(series.clone()),
            None => Err(anyhow!("connection refused")),
        }
    }
}
