use serde::Serialize;

/// Mean and sample standard deviation of simple daily returns, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReturnSummary {
    pub mean_pct: Option<f64>,
    pub std_pct: Option<f64>,
    /// Number of returns the statistics were computed from.
    pub observations: usize,
}

/// Period-over-period fractional change, aligned with `closes`.
pub fn pct_returns(closes: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return out;
    }
    out.push(None);
    out.extend(closes.windows(2).map(|w| {
        let r = (w[1] - w[0]) / w[0];
        r.is_finite().then_some(r)
    }));
    out
}

/// Summarise the returns of the trailing `lookback` closes. The first close
/// of that window has no prior point inside it and contributes no return.
pub fn summarize_returns(closes: &[f64], lookback: usize) -> ReturnSummary {
    let start = closes.len().saturating_sub(lookback);
    let returns: Vec<f64> = pct_returns(&closes[start..])
        .into_iter()
        .flatten()
        .collect();

    let n = returns.len();
    let mean = (n > 0).then(|| returns.iter().sum::<f64>() / n as f64);
    let std = match mean {
        Some(m) if n > 1 => {
            let var = returns.iter().map(|r| (r - m).powi(2)).sum::<f64>() / (n - 1) as f64;
            Some(var.sqrt())
        }
        _ => None,
    };

    ReturnSummary {
        mean_pct: mean.map(|m| m * 100.0),
        std_pct: std.map(|s| s * 100.0),
        observations: n,
    }
}

/// Two-decimal percentage, or `n/a` when the statistic is undefined.
pub fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v),
        None => "n/a".to_string(),
    }
}
