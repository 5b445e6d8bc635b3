//! Relative Strength Index over a plain rolling mean of gains and losses.
//!
//! This is not Wilder's smoothed RSI: both averages are simple means over the
//! trailing `window` deltas, so a loss leaves the average entirely once it
//! falls out of the window.

use super::sma::Sma;

/// Streaming RSI fed one close at a time.
#[derive(Debug, Clone)]
pub struct Rsi {
    window: usize,
    prev_close: Option<f64>,
    avg_gain: Sma,
    avg_loss: Sma,
}

impl Rsi {
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "RSI window must be > 0");
        Self {
            window,
            prev_close: None,
            avg_gain: Sma::new(window),
            avg_loss: Sma::new(window),
        }
    }

    /// Push the next close. Returns `None` until `window` deltas are available
    /// and whenever both averages are zero (flat prices, 0/0).
    pub fn push(&mut self, close: f64) -> Option<f64> {
        let prev = self.prev_close.replace(close)?;
        let delta = close - prev;
        let gain = self.avg_gain.push(delta.max(0.0));
        let loss = self.avg_loss.push((-delta).max(0.0));
        // Rolling sums of non-negative values can land a hair below zero.
        oscillator(gain?.max(0.0), loss?.max(0.0))
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

/// `100 - 100 / (1 + gain/loss)`. A zero loss with positive gain gives an
/// infinite ratio and therefore exactly 100; 0/0 is undefined.
pub fn oscillator(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rs = avg_gain / avg_loss;
    let value = 100.0 - 100.0 / (1.0 + rs);
    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}

/// RSI over a whole close series, aligned with the input. The first `window`
/// entries are always `None`.
pub fn rsi(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; closes.len()];
    }
    let mut rsi = Rsi::new(window);
    closes.iter().map(|&c| rsi.push(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_ratio_is_exactly_100() {
        assert_eq!(oscillator(1.5, 0.0), Some(100.0));
    }

    #[test]
    fn zero_over_zero_is_undefined() {
        assert_eq!(oscillator(0.0, 0.0), None);
    }

    #[test]
    fn all_losses_is_zero() {
        assert_eq!(oscillator(0.0, 2.0), Some(0.0));
    }

    #[test]
    fn first_window_points_are_undefined() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let out = rsi(&closes, 14);
        assert_eq!(out.len(), closes.len());
        assert!(out[..14].iter().all(Option::is_none));
        assert!(out[14..].iter().all(|v| *v == Some(100.0)));
    }

    #[test]
    fn equal_gains_and_losses_is_fifty() {
        let out = rsi(&[10.0, 11.0, 10.0, 11.0, 10.0], 2);
        assert_eq!(out[2], Some(50.0));
        assert_eq!(out[4], Some(50.0));
    }
}
