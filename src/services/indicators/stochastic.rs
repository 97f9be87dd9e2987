//! Stochastic Oscillator (KD) indicator.

use super::sma::sma;
use super::Indicator;
use crate::types::{IndicatorSeries, PriceBar};

/// Stochastic Oscillator.
///
/// Raw %K = (Close - Lowest Low) / (Highest High - Lowest Low) * 100 over
/// `k_period` bars, then:
/// - %K = trailing mean of raw %K over `k_slowing`
/// - %D = trailing mean of %K over `d_period`
///
/// A flat high/low range leaves raw %K undefined (`NaN`).
pub struct Stochastic {
    k_period: usize,
    k_slowing: usize,
    d_period: usize,
}

impl Default for Stochastic {
    fn default() -> Self {
        Self {
            k_period: 9,
            k_slowing: 3,
            d_period: 3,
        }
    }
}

impl Stochastic {
    pub fn new(k_period: usize, k_slowing: usize, d_period: usize) -> Self {
        Self {
            k_period,
            k_slowing,
            d_period,
        }
    }

    /// Unsmoothed %K.
    pub fn raw_k(&self, bars: &[PriceBar]) -> Vec<f64> {
        let mut out = vec![f64::NAN; bars.len()];

        if self.k_period == 0 || bars.len() < self.k_period {
            return out;
        }

        for i in (self.k_period - 1)..bars.len() {
            let window = &bars[(i + 1 - self.k_period)..=i];

            let lowest_low = window_extreme(window.iter().map(|b| b.low), f64::min);
            let highest_high = window_extreme(window.iter().map(|b| b.high), f64::max);
            let range = highest_high - lowest_low;

            // NaN comparisons are false, so undefined windows stay NaN too.
            if range > 0.0 {
                out[i] = (bars[i].close - lowest_low) / range * 100.0;
            }
        }

        out
    }

    /// Smoothed %K and %D.
    pub fn series(&self, bars: &[PriceBar]) -> (Vec<f64>, Vec<f64>) {
        let k = sma(&self.raw_k(bars), self.k_slowing);
        let d = sma(&k, self.d_period);
        (k, d)
    }
}

/// Fold a window with `pick`, returning `NaN` if any value is `NaN`.
fn window_extreme(values: impl Iterator<Item = f64>, pick: fn(f64, f64) -> f64) -> f64 {
    let mut acc: Option<f64> = None;
    for value in values {
        if value.is_nan() {
            return f64::NAN;
        }
        acc = Some(match acc {
            None => value,
            Some(a) => pick(a, value),
        });
    }
    acc.unwrap_or(f64::NAN)
}

impl Indicator for Stochastic {
    fn id(&self) -> &str {
        "k"
    }

    fn name(&self) -> &str {
        "Stochastic"
    }

    fn min_periods(&self) -> usize {
        (self.k_period + self.k_slowing + self.d_period).saturating_sub(2)
    }

    fn calculate(&self, bars: &[PriceBar], out: &mut IndicatorSeries) {
        let (k, d) = self.series(bars);
        out.insert("k", k);
        out.insert("d", d);
    }
}
