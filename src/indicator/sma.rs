/// Simple Moving Average using a ring buffer for O(1) push.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    buffer: Vec<f64>,
    head: usize,
    count: usize,
    sum: f64,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "SMA period must be > 0");
        Self {
            period,
            buffer: vec![0.0; period],
            head: 0,
            count: 0,
            sum: 0.0,
        }
    }

    /// Push a new value, return the current SMA if the window is full.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        if self.count >= self.period {
            self.sum -= self.buffer[self.head];
        }
        self.buffer[self.head] = value;
        self.sum += value;
        self.head = (self.head + 1) % self.period;
        if self.count < self.period {
            self.count += 1;
        }
        // Resync once per lap so the running sum cannot drift.
        if self.head == 0 && self.count >= self.period {
            self.sum = self.buffer.iter().sum();
        }
        self.value()
    }

    pub fn value(&self) -> Option<f64> {
        if self.is_ready() {
            Some(self.sum / self.period as f64)
        } else {
            None
        }
    }

    pub fn is_ready(&self) -> bool {
        self.count >= self.period
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

/// SMA over a whole slice, aligned with the input: `None` for the first
/// `period - 1` points. A zero period yields no values at all.
pub fn sma_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }
    let mut sma = Sma::new(period);
    values.iter().map(|&v| sma.push(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_sma() {
        let mut sma = Sma::new(3);
        assert_eq!(sma.push(1.0), None);
        assert_eq!(sma.push(2.0), None);
        assert!(!sma.is_ready());

        let v = sma.push(3.0).unwrap();
        assert!((v - 2.0).abs() < f64::EPSILON);

        let v = sma.push(4.0).unwrap();
        assert!((v - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn series_leading_gap() {
        let out = sma_series(&[2.0, 4.0, 6.0, 8.0], 2);
        assert_eq!(out[0], None);
        assert_eq!(out[1], Some(3.0));
        assert_eq!(out[2], Some(5.0));
        assert_eq!(out[3], Some(7.0));
    }

    #[test]
    fn series_shorter_than_period() {
        assert!(sma_series(&[1.0, 2.0], 50).iter().all(Option::is_none));
    }

    #[test]
    fn zero_period_series_is_empty_of_values() {
        assert_eq!(sma_series(&[1.0, 2.0, 3.0], 0), vec![None, None, None]);
    }

    #[test]
    #[should_panic(expected = "SMA period must be > 0")]
    fn zero_period_panics() {
        Sma::new(0);
    }
}
