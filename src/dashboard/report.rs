use chrono::NaiveDate;

use crate::config::DashboardConfig;
use crate::indicator::returns::{format_pct, summarize_returns};
use crate::indicator::rsi::rsi;
use crate::indicator::sma::sma_series;
use crate::model::PriceSeries;

use super::view::{
    CandleChart, DashboardReport, LineTrace, OscillatorChart, ReferenceLine, SeriesPoint,
    SummaryRow, SummaryTable, TraceColor,
};

fn trace(name: String, color: TraceColor, dates: &[NaiveDate], values: &[Option<f64>]) -> LineTrace {
    LineTrace {
        name,
        color,
        points: dates
            .iter()
            .zip(values)
            .map(|(&date, &value)| SeriesPoint { date, value })
            .collect(),
    }
}

/// Compute every derived series for a non-empty price history and lay out
/// the charts and the summary table.
pub fn build_report(
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
    series: &PriceSeries,
    settings: &DashboardConfig,
) -> DashboardReport {
    let closes = series.closes();
    let dates = series.dates();

    let sma_fast = sma_series(&closes, settings.sma_fast);
    let sma_slow = sma_series(&closes, settings.sma_slow);
    let rsi_values = rsi(&closes, settings.rsi_window);
    let stats = summarize_returns(&closes, settings.summary_lookback);

    let from = series.tail_start(settings.candle_window);
    let overlays = vec![
        trace(
            format!("SMA {}", settings.sma_fast),
            TraceColor::Blue,
            &dates[from..],
            &sma_fast[from..],
        ),
        trace(
            format!("SMA {}", settings.sma_slow),
            TraceColor::Red,
            &dates[from..],
            &sma_slow[from..],
        ),
    ];

    let price_chart = CandleChart {
        title: "Candlestick Chart with SMA".to_string(),
        x_label: "Date".to_string(),
        y_label: "Price".to_string(),
        candles: series.tail(settings.candle_window).to_vec(),
        overlays,
    };

    let summary = SummaryTable {
        title: format!("Performance Metrics for Last {} Days", settings.summary_lookback),
        columns: ["Metric".to_string(), "Value".to_string()],
        rows: vec![
            SummaryRow {
                metric: "Average Return".to_string(),
                value: format_pct(stats.mean_pct),
            },
            SummaryRow {
                metric: "Standard Deviation of Return".to_string(),
                value: format_pct(stats.std_pct),
            },
        ],
        stats,
    };

    let rsi_chart = OscillatorChart {
        title: "RSI Chart".to_string(),
        x_label: "Date".to_string(),
        y_label: "RSI".to_string(),
        line: trace("RSI".to_string(), TraceColor::Green, &dates, &rsi_values),
        reference_lines: vec![
            ReferenceLine {
                label: "Overbought".to_string(),
                value: settings.rsi_overbought,
                color: TraceColor::Red,
            },
            ReferenceLine {
                label: "Oversold".to_string(),
                value: settings.rsi_oversold,
                color: TraceColor::Blue,
            },
        ],
        y_range: (0.0, 100.0),
    };

    DashboardReport {
        ticker: ticker.to_string(),
        heading: format!("Stock Analysis for {}", ticker),
        start,
        end,
        observations: series.len(),
        price_chart,
        summary,
        rsi_chart,
    }
}
