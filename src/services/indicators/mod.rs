//! Technical indicator implementations.
//!
//! Every indicator writes sequences aligned 1:1 with the input bars into an
//! [`IndicatorSeries`]; warm-up entries are `NaN`. Indicators work
//! positionally, so calendar gaps between bars are irrelevant.

pub mod deviation;
pub mod ema;
pub mod macd;
pub mod sma;
pub mod stochastic;
pub mod wma;

pub use deviation::{deviation, Deviation, Operand};
pub use ema::ema;
pub use macd::{Macd, MacdSeries};
pub use sma::{sma, Sma};
pub use stochastic::Stochastic;
pub use wma::{wma, Wma};

use crate::types::{IndicatorSeries, PriceBar};

/// Trait for indicators computed over a bar sequence.
pub trait Indicator: Send + Sync {
    /// Key of the (first) sequence this indicator produces.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Bars needed before the output is defined.
    fn min_periods(&self) -> usize;

    /// Compute and store this indicator's sequences.
    ///
    /// May read sequences stored by indicators that ran earlier.
    fn calculate(&self, bars: &[PriceBar], out: &mut IndicatorSeries);
}

/// The dashboard's indicator set, in evaluation order.
pub fn default_indicators() -> Vec<Box<dyn Indicator>> {
    vec![
        // Moving averages
        Box::new(Sma::new(5)),
        Box::new(Sma::new(20)),
        Box::new(Sma::new(60)),
        // Momentum
        Box::new(Stochastic::default()),
        // Deviations between the averages (need the SMAs above)
        Box::new(Deviation::new(
            "dev_5_20",
            "SMA5 vs SMA20",
            Operand::Indicator("sma5"),
            Operand::Indicator("sma20"),
            20,
        )),
        Box::new(Deviation::new(
            "dev_20_60",
            "SMA20 vs SMA60",
            Operand::Indicator("sma20"),
            Operand::Indicator("sma60"),
            60,
        )),
        Box::new(Deviation::new(
            "dev_5_60",
            "SMA5 vs SMA60",
            Operand::Indicator("sma5"),
            Operand::Indicator("sma60"),
            60,
        )),
        Box::new(Deviation::new(
            "dev_1_20",
            "Close vs SMA20",
            Operand::Close,
            Operand::Indicator("sma20"),
            20,
        )),
        // Trend
        Box::new(Macd::default()),
        // Weekly lines
        Box::new(Wma::new(5)),
        Box::new(Wma::new(10)),
    ]
}

/// Run `indicators` in order over `bars`.
pub fn compute_with(indicators: &[Box<dyn Indicator>], bars: &[PriceBar]) -> IndicatorSeries {
    let mut out = IndicatorSeries::new(bars.len());
    for indicator in indicators {
        indicator.calculate(bars, &mut out);
    }
    out
}

/// Run the default indicator set over `bars`.
pub fn compute_indicators(bars: &[PriceBar]) -> IndicatorSeries {
    compute_with(&default_indicators(), bars)
}

/// Longest warm-up among `indicators`.
pub fn max_warmup(indicators: &[Box<dyn Indicator>]) -> usize {
    indicators
        .iter()
        .map(|i| i.min_periods().saturating_sub(1))
        .max()
        .unwrap_or(0)
}
