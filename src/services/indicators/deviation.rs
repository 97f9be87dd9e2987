//! Percentage deviation between two aligned series.

use super::Indicator;
use crate::types::{IndicatorSeries, PriceBar, PriceBarsExt};

/// `(a - b) / b * 100`, `NaN` when either side is undefined or `b` is zero.
pub fn deviation(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter()
        .zip(b)
        .map(|(&a, &b)| {
            if a.is_nan() || b.is_nan() || b == 0.0 {
                f64::NAN
            } else {
                (a - b) / b * 100.0
            }
        })
        .collect()
}

/// Where a deviation operand comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Close,
    Indicator(&'static str),
}

impl Operand {
    fn resolve(&self, bars: &[PriceBar], series: &IndicatorSeries) -> Vec<f64> {
        match self {
            Operand::Close => bars.closes(),
            Operand::Indicator(name) => series
                .get(name)
                .map(<[f64]>::to_vec)
                .unwrap_or_else(|| vec![f64::NAN; bars.len()]),
        }
    }
}

/// Deviation of one series from another, e.g. `dev_5_20` = SMA5 vs SMA20.
///
/// Operands naming other indicators must already be in the series set.
pub struct Deviation {
    id: &'static str,
    name: &'static str,
    numerator: Operand,
    denominator: Operand,
    min_periods: usize,
}

impl Deviation {
    pub fn new(
        id: &'static str,
        name: &'static str,
        numerator: Operand,
        denominator: Operand,
        min_periods: usize,
    ) -> Self {
        Self {
            id,
            name,
            numerator,
            denominator,
            min_periods,
        }
    }
}

impl Indicator for Deviation {
    fn id(&self) -> &str {
        self.id
    }

    fn name(&self) -> &str {
        self.name
    }

    fn min_periods(&self) -> usize {
        self.min_periods
    }

    fn calculate(&self, bars: &[PriceBar], out: &mut IndicatorSeries) {
        let a = self.numerator.resolve(bars, out);
        let b = self.denominator.resolve(bars, out);
        out.insert(self.id, deviation(&a, &b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deviation_values() {
        let out = deviation(&[110.0, 90.0], &[100.0, 100.0]);
        assert!((out[0] - 10.0).abs() < 1e-12);
        assert!((out[1] + 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_deviation_undefined_inputs() {
        let out = deviation(&[f64::NAN, 1.0, 1.0], &[1.0, f64::NAN, 0.0]);
        assert!(out.iter().all(|v| v.is_nan()));
    }
}
