use anyhow::{bail, Context, Result};
use chrono::{Days, NaiveDate};
use plotters::coord::types::{RangedCoordf64, RangedDate};
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::dashboard::view::{CandleChart, LineTrace, OscillatorChart, TraceColor};

pub const DEFAULT_SIZE: (u32, u32) = (960, 480);

const CAPTION_FONT: (&str, u32) = ("sans-serif", 22);
const X_LABELS: usize = 8;

fn rgb(color: TraceColor) -> RGBColor {
    let (r, g, b) = color.rgb();
    RGBColor(r, g, b)
}

/// One day of padding on both sides so edge candles are not clipped.
fn padded_dates(first: NaiveDate, last: NaiveDate) -> std::ops::Range<NaiveDate> {
    let lo = first.checked_sub_days(Days::new(1)).unwrap_or(first);
    let hi = last.checked_add_days(Days::new(1)).unwrap_or(last);
    lo..hi
}

fn price_bounds(chart: &CandleChart) -> (f64, f64) {
    let overlay_values = chart
        .overlays
        .iter()
        .flat_map(|t| t.points.iter().filter_map(|p| p.value));
    let lows = chart.candles.iter().map(|c| c.low).chain(overlay_values.clone());
    let highs = chart.candles.iter().map(|c| c.high).chain(overlay_values);

    let lo = lows.fold(f64::INFINITY, f64::min);
    let hi = highs.fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;
    let pad = if span > 0.0 { span * 0.05 } else { 1.0 };
    (lo - pad, hi + pad)
}

fn draw_trace<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedDate<NaiveDate>, RangedCoordf64>>,
    trace: &LineTrace,
) -> Result<bool> {
    let color = rgb(trace.color);
    let mut labelled = false;
    for segment in trace.segments() {
        let series = chart
            .draw_series(LineSeries::new(segment, color.stroke_width(2)))
            .map_err(|e| anyhow::anyhow!("failed to draw {}: {:?}", trace.name, e))?;
        if !labelled {
            series
                .label(trace.name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
            labelled = true;
        }
    }
    Ok(labelled)
}

/// Candlesticks with moving-average overlays as an SVG document.
pub fn candle_chart_svg(chart: &CandleChart, size: (u32, u32)) -> Result<String> {
    let (Some(first), Some(last)) = (chart.candles.first(), chart.candles.last()) else {
        bail!("candle chart has no bars");
    };
    let (y_lo, y_hi) = price_bounds(chart);
    let candle_width = ((size.0 as f64 * 0.7) / chart.candles.len() as f64).clamp(1.0, 15.0) as u32;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow::anyhow!("{:?}", e))?;

        let mut ctx = ChartBuilder::on(&root)
            .caption(chart.title.as_str(), CAPTION_FONT)
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(padded_dates(first.date, last.date), y_lo..y_hi)
            .map_err(|e| anyhow::anyhow!("failed to build price chart: {:?}", e))?;

        ctx.configure_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_labels(X_LABELS)
            .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m-%d").to_string())
            .y_label_formatter(&|v: &f64| format!("{:.2}", v))
            .draw()
            .map_err(|e| anyhow::anyhow!("failed to draw price mesh: {:?}", e))?;

        ctx.draw_series(chart.candles.iter().map(|bar| {
            CandleStick::new(
                bar.date,
                bar.open,
                bar.high,
                bar.low,
                bar.close,
                GREEN.filled(),
                RED.filled(),
                candle_width,
            )
        }))
        .map_err(|e| anyhow::anyhow!("failed to draw candles: {:?}", e))?;

        let mut any_overlay = false;
        for trace in &chart.overlays {
            any_overlay |= draw_trace(&mut ctx, trace)?;
        }

        if any_overlay {
            ctx.configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .position(SeriesLabelPosition::UpperLeft)
                .draw()
                .map_err(|e| anyhow::anyhow!("failed to draw legend: {:?}", e))?;
        }

        root.present().context("failed to finish price chart")?;
    }
    Ok(svg)
}

/// Oscillator line over the full range with dashed reference levels and a
/// fixed vertical range.
pub fn oscillator_chart_svg(chart: &OscillatorChart, size: (u32, u32)) -> Result<String> {
    let (Some(first), Some(last)) = (chart.line.points.first(), chart.line.points.last()) else {
        bail!("oscillator chart has no points");
    };
    let x_range = padded_dates(first.date, last.date);
    let (y_lo, y_hi) = chart.y_range;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow::anyhow!("{:?}", e))?;

        let mut ctx = ChartBuilder::on(&root)
            .caption(chart.title.as_str(), CAPTION_FONT)
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range.clone(), y_lo..y_hi)
            .map_err(|e| anyhow::anyhow!("failed to build oscillator chart: {:?}", e))?;

        ctx.configure_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_labels(X_LABELS)
            .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m-%d").to_string())
            .draw()
            .map_err(|e| anyhow::anyhow!("failed to draw oscillator mesh: {:?}", e))?;

        draw_trace(&mut ctx, &chart.line)?;

        for level in &chart.reference_lines {
            let color = rgb(level.color);
            ctx.draw_series(DashedLineSeries::new(
                vec![(x_range.start, level.value), (x_range.end, level.value)],
                8,
                6,
                color.stroke_width(1),
            ))
            .map_err(|e| anyhow::anyhow!("failed to draw {} line: {:?}", level.label, e))?
            .label(format!("{} ({})", level.label, level.value))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(1)));
        }

        ctx.configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .position(SeriesLabelPosition::LowerLeft)
            .draw()
            .map_err(|e| anyhow::anyhow!("failed to draw legend: {:?}", e))?;

        root.present().context("failed to finish oscillator chart")?;
    }
    Ok(svg)
}
