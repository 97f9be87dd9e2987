//! Simple Moving Average (SMA) indicator.

use super::Indicator;
use crate::types::{IndicatorSeries, PriceBar, PriceBarsExt};

/// Trailing arithmetic mean over `period` values.
///
/// Entry `i` is defined from `i = period - 1` onward and depends only on
/// `values[i + 1 - period..=i]`. A `NaN` inside the window yields `NaN`.
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];

    if period == 0 || values.len() < period {
        return out;
    }

    for i in (period - 1)..values.len() {
        let window = &values[(i + 1 - period)..=i];
        out[i] = window.iter().sum::<f64>() / period as f64;
    }

    out
}

/// SMA of closing prices.
pub struct Sma {
    period: usize,
    id: String,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            id: format!("sma{}", period),
            name: format!("SMA ({})", period),
        }
    }
}

impl Indicator for Sma {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[PriceBar], out: &mut IndicatorSeries) {
        out.insert(self.id.clone(), sma(&bars.closes(), self.period));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_basic() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let out = sma(&values, 3);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert_eq!(out[2], 2.0);
        assert_eq!(out[3], 3.0);
        assert_eq!(out[4], 4.0);
    }

    #[test]
    fn test_sma_insufficient_data() {
        let out = sma(&[1.0, 2.0], 5);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_sma_zero_period() {
        let out = sma(&[1.0, 2.0, 3.0], 0);
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_sma_nan_in_window() {
        let out = sma(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 2);
        assert!(out[1].is_nan());
        assert!(out[2].is_nan());
        assert_eq!(out[3], 3.5);
    }

    #[test]
    fn test_sma_id() {
        assert_eq!(Sma::new(20).id(), "sma20");
        assert_eq!(Sma::new(20).min_periods(), 20);
    }
}
