//! Weighted Moving Average (WMA) indicator.

use super::Indicator;
use crate::types::{IndicatorSeries, PriceBar, PriceBarsExt};

/// Sum of the linear weights `period + (period - 1) + ... + 1`.
pub fn weight_sum(period: usize) -> f64 {
    (period * (period + 1) / 2) as f64
}

/// Linearly weighted mean: newest value weighted `period`, oldest weighted 1.
pub fn wma(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];

    if period == 0 || values.len() < period {
        return out;
    }

    let divisor = weight_sum(period);
    for i in (period - 1)..values.len() {
        let weighted: f64 = (0..period)
            .map(|j| values[i - j] * (period - j) as f64)
            .sum();
        out[i] = weighted / divisor;
    }

    out
}

/// WMA of closing prices, used for the weekly-line panel.
pub struct Wma {
    period: usize,
    id: String,
    name: String,
}

impl Wma {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            id: format!("wma{}", period),
            name: format!("{}WMA", period),
        }
    }
}

impl Indicator for Wma {
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
        out.insert(self.id.clone(), wma(&bars.closes(), self.period));
    }
}
