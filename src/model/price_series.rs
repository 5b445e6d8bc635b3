use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::price_bar::PriceBar;

/// Daily bars ordered by strictly increasing date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series from bars in any order. When two bars share a date the
    /// later one in `bars` wins.
    pub fn from_bars(bars: Vec<PriceBar>) -> Self {
        let mut by_date: BTreeMap<NaiveDate, PriceBar> = BTreeMap::new();
        for bar in bars {
            by_date.insert(bar.date, bar);
        }
        Self {
            bars: by_date.into_values().collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// The most recent `n` bars (all of them when the series is shorter).
    pub fn tail(&self, n: usize) -> &[PriceBar] {
        let start = self.bars.len().saturating_sub(n);
        &self.bars[start..]
    }

    /// Index of the first bar returned by [`tail`](Self::tail).
    pub fn tail_start(&self, n: usize) -> usize {
        self.bars.len().saturating_sub(n)
    }

    /// Bars dated within `start..end`.
    pub fn within(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            bars: self
                .bars
                .iter()
                .filter(|b| b.date >= start && b.date < end)
                .cloned()
                .collect(),
        }
    }
}
