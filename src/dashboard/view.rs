use chrono::NaiveDate;
use serde::Serialize;

use crate::indicator::returns::ReturnSummary;
use crate::model::PriceBar;

/// What the UI layer should show for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DashboardView {
    /// No ticker entered; nothing was fetched.
    AwaitingTicker { message: String },
    /// The provider returned no rows (or failed, see `detail`).
    NoData {
        ticker: String,
        warning: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    Rendered(Box<DashboardReport>),
}

impl DashboardView {
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::AwaitingTicker { .. } => "awaiting_ticker",
            Self::NoData { .. } => "no_data",
            Self::Rendered(_) => "rendered",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub ticker: String,
    pub heading: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub observations: usize,
    pub price_chart: CandleChart,
    pub summary: SummaryTable,
    pub rsi_chart: OscillatorChart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceColor {
    Blue,
    Red,
    Green,
}

impl TraceColor {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Blue => (31, 119, 180),
            Self::Red => (214, 39, 40),
            Self::Green => (44, 160, 44),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineTrace {
    pub name: String,
    pub color: TraceColor,
    pub points: Vec<SeriesPoint>,
}

impl LineTrace {
    /// Consecutive defined points, split wherever a value is missing.
    pub fn segments(&self) -> Vec<Vec<(NaiveDate, f64)>> {
        let mut out = Vec::new();
        let mut current = Vec::new();
        for p in &self.points {
            match p.value {
                Some(v) => current.push((p.date, v)),
                None if !current.is_empty() => out.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub candles: Vec<PriceBar>,
    pub overlays: Vec<LineTrace>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub label: String,
    pub value: f64,
    pub color: TraceColor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OscillatorChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub line: LineTrace,
    pub reference_lines: Vec<ReferenceLine>,
    pub y_range: (f64, f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub metric: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    pub title: String,
    pub columns: [String; 2],
    pub rows: Vec<SummaryRow>,
    pub stats: ReturnSummary,
}
