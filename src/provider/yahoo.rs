use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Days, NaiveDate, NaiveTime};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::StatusCode;
use url::Url;

use crate::config::ProviderConfig;
use crate::error::AppError;
use crate::model::{PriceBar, PriceSeries};

use super::types::{ChartResponse, ChartResult};
use super::MarketDataProvider;

/// Daily history from the Yahoo Finance v8 chart endpoint.
pub struct YahooChartClient {
    http: reqwest::Client,
    base_url: Url,
}

impl YahooChartClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);
        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let http = builder
            .build()
            .context("failed to build market data HTTP client")?;
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("invalid provider base_url '{}'", config.base_url))?;
        Ok(Self { http, base_url })
    }

    /// `{base}/v8/finance/chart/{ticker}` with the ticker as an escaped path segment.
    pub fn chart_url(&self, ticker: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("base_url '{}' cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", ticker]);
        Ok(url)
    }

    fn compact_error_body(body: &str) -> String {
        let normalized = body.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.chars().count() > 180 {
            let cut: String = normalized.chars().take(180).collect();
            format!("{}...", cut)
        } else {
            normalized
        }
    }
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// `period1`/`period2` for a local-date range. Padded by a day on each side
/// so exchanges east or west of UTC keep their boundary sessions; the parsed
/// series is clipped back to `start..end` by exchange-local date.
fn request_window(start: NaiveDate, end: NaiveDate) -> (i64, i64) {
    let lo = start.checked_sub_days(Days::new(1)).unwrap_or(start);
    let hi = end.checked_add_days(Days::new(1)).unwrap_or(end);
    (unix_midnight(lo), unix_midnight(hi))
}

/// Parse a chart payload. A "Not Found" error or a result without
/// timestamps is an empty series; rows with any missing price are dropped.
/// When adjusted closes are present, open/high/low/close are scaled by
/// `adjclose / close` so splits and dividends do not show up as returns.
pub fn parse_chart(body: &str) -> Result<PriceSeries, AppError> {
    let resp: ChartResponse = serde_json::from_str(body)?;
    if let Some(err) = resp.chart.error {
        if err.is_not_found() {
            return Ok(PriceSeries::empty());
        }
        return Err(AppError::Provider {
            status: StatusCode::OK.as_u16(),
            msg: format!("{}: {}", err.code, err.description),
        });
    }
    let Some(result) = resp.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceSeries::empty());
    };
    Ok(series_from_result(result))
}

fn series_from_result(result: ChartResult) -> PriceSeries {
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return PriceSeries::empty();
    };
    let adjusted = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|c| c.adjclose)
        .unwrap_or_default();
    let offset = result.meta.gmtoffset;
    let cell = |col: &[Option<f64>], i: usize| col.get(i).copied().flatten();

    let bars = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let date = DateTime::from_timestamp(ts + offset, 0)?.date_naive();
            let open = cell(&quote.open, i)?;
            let high = cell(&quote.high, i)?;
            let low = cell(&quote.low, i)?;
            let close = cell(&quote.close, i)?;
            let volume = cell(&quote.volume, i).unwrap_or(0.0).max(0.0) as u64;
            let factor = cell(&adjusted, i)
                .filter(|adj| adj.is_finite() && close != 0.0)
                .map_or(1.0, |adj| adj / close);
            Some(PriceBar {
                date,
                open: open * factor,
                high: high * factor,
                low: low * factor,
                close: close * factor,
                volume,
            })
        })
        .collect();
    PriceSeries::from_bars(bars)
}

impl MarketDataProvider for YahooChartClient {
    async fn fetch_daily(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        let url = self.chart_url(ticker)?;
        let (period1, period2) = request_window(start, end);
        let (period1, period2) = (period1.to_string(), period2.to_string());

        tracing::debug!(ticker, %start, %end, "Requesting daily chart");

        let resp = self
            .http
            .get(url)
            .query(&[
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
                ("interval", "1d"),
                ("events", "history"),
            ])
            .send()
            .await
            .context("chart request HTTP failed")?;

        let status = resp.status();
        let body = resp.text().await.context("chart response body read failed")?;

        if status == StatusCode::NOT_FOUND {
            // Unknown symbols come back as 404 with a "Not Found" chart error.
            return match parse_chart(&body) {
                Ok(series) => Ok(series.within(start, end)),
                Err(_) => Ok(PriceSeries::empty()),
            };
        }
        if !status.is_success() {
            return Err(AppError::Provider {
                status: status.as_u16(),
                msg: Self::compact_error_body(&body),
            }
            .into());
        }

        let series = parse_chart(&body)
            .context("chart response parse failed")?
            .within(start, end);
        tracing::info!(ticker, rows = series.len(), "Fetched daily history");
        Ok(series)
    }
}
