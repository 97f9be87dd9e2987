//! MACD (Moving Average Convergence Divergence) indicator.

use super::ema::ema;
use super::Indicator;
use crate::types::{IndicatorSeries, PriceBar, PriceBarsExt};

/// MACD line, signal line and histogram aligned with the input.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// MACD indicator.
///
/// - MACD Line = EMA(fast) - EMA(slow)
/// - Signal Line = EMA(signal) of MACD Line
/// - Histogram = MACD Line - Signal Line
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }

    /// Compute all three MACD sequences over `closes`.
    pub fn series(&self, closes: &[f64]) -> MacdSeries {
        let fast = ema(closes, self.fast_period);
        let slow = ema(closes, self.slow_period);

        let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema(&line, self.signal_period);
        let histogram = line.iter().zip(&signal).map(|(m, s)| m - s).collect();

        MacdSeries {
            line,
            signal,
            histogram,
        }
    }
}

impl Indicator for Macd {
    fn id(&self) -> &str {
        "macd"
    }

    fn name(&self) -> &str {
        "MACD"
    }

    // EMAs are seeded from the first close, so every index is defined.
    fn min_periods(&self) -> usize {
        1
    }

    fn calculate(&self, bars: &[PriceBar], out: &mut IndicatorSeries) {
        let MacdSeries {
            line,
            signal,
            histogram,
        } = self.series(&bars.closes());

        out.insert("macd", line);
        out.insert("macd_signal", signal);
        out.insert("macd_hist", histogram);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macd_histogram_identity() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let out = Macd::default().series(&closes);

        assert_eq!(out.line.len(), closes.len());
        for i in 0..closes.len() {
            assert_eq!(out.histogram[i], out.line[i] - out.signal[i]);
        }
    }

    #[test]
    fn test_macd_starts_at_zero() {
        let out = Macd::default().series(&[50.0, 51.0, 52.0]);
        assert_eq!(out.line[0], 0.0);
        assert_eq!(out.signal[0], 0.0);
        assert_eq!(out.histogram[0], 0.0);
    }

    #[test]
    fn test_macd_uptrend_positive() {
        let closes: Vec<f64> = (0..80).map(|i| 100.0 + i as f64).collect();
        let out = Macd::default().series(&closes);
        assert!(*out.line.last().unwrap() > 0.0);
    }
}
