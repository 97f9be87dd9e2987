//! Discrete trading signals derived from indicator values.
//!
//! Every rule is index-local: the code at `i` depends only on indicator
//! values at `i`. Undefined inputs produce undefined (`None`) codes.

use crate::types::{IndicatorSeries, SignalSeries, StairSignal};

/// Deviation (close vs mid average) beyond which a stretch code fires.
pub const DEVIATION_THRESHOLD: f64 = 5.0;
/// %K at or above which the market is overbought.
pub const KD_OVERBOUGHT: f64 = 80.0;
/// %K at or below which the market is oversold.
pub const KD_OVERSOLD: f64 = 20.0;

/// Classify the order of the three moving-average deviations.
///
/// Ties resolve to the first matching ordering in the fixed precedence
/// +1, +2, +3, -1, -2, -3, so every finite triple maps to exactly one variant.
pub fn stair(fast_mid: f64, mid_slow: f64, fast_slow: f64) -> Option<StairSignal> {
    if fast_mid.is_nan() || mid_slow.is_nan() || fast_slow.is_nan() {
        return None;
    }

    let ordered = |a: f64, b: f64, c: f64| a >= b && b >= c;

    let signal = if ordered(fast_mid, fast_slow, mid_slow) {
        StairSignal::FastMidLeads
    } else if ordered(fast_slow, fast_mid, mid_slow) {
        StairSignal::FastSlowLeadsFastMid
    } else if ordered(fast_slow, mid_slow, fast_mid) {
        StairSignal::FastSlowLeadsMidSlow
    } else if ordered(mid_slow, fast_slow, fast_mid) {
        StairSignal::MidSlowLeadsFastSlow
    } else if ordered(mid_slow, fast_mid, fast_slow) {
        StairSignal::MidSlowLeadsFastMid
    } else {
        StairSignal::FastMidOverMidSlow
    };

    Some(signal)
}

/// +4 when price is stretched above the mid average, -4 when below.
pub fn deviation_signal(price_vs_mid: f64) -> Option<i8> {
    if price_vs_mid >= DEVIATION_THRESHOLD {
        Some(4)
    } else if price_vs_mid <= -DEVIATION_THRESHOLD {
        Some(-4)
    } else {
        None
    }
}

/// +3 when the fast average sits at or above the slow one, else -3.
pub fn trend_signal(fast_slow: f64) -> Option<i8> {
    if fast_slow.is_nan() {
        None
    } else if fast_slow >= 0.0 {
        Some(3)
    } else {
        Some(-3)
    }
}

/// 100 when overbought, 0 when oversold.
pub fn kd_extreme(k: f64) -> Option<i8> {
    if k >= KD_OVERBOUGHT {
        Some(100)
    } else if k <= KD_OVERSOLD {
        Some(0)
    } else {
        None
    }
}

/// Encode the stair, deviation, trend and KD signals for every bar.
pub fn compute_signals(indicators: &IndicatorSeries) -> SignalSeries {
    let len = indicators.len();
    let at = |name: &str, i: usize| indicators.value_at(name, i);

    let stair_codes = (0..len)
        .map(|i| stair(at("dev_5_20", i), at("dev_20_60", i), at("dev_5_60", i)).map(|s| s.code()))
        .collect();
    let deviation_codes = (0..len).map(|i| deviation_signal(at("dev_1_20", i))).collect();
    let trend_codes = (0..len).map(|i| trend_signal(at("dev_5_60", i))).collect();
    let kd_codes = (0..len).map(|i| kd_extreme(at("k", i))).collect();

    let mut signals = SignalSeries::new(len);
    signals.insert("stair", stair_codes);
    signals.insert("deviation", deviation_codes);
    signals.insert("trend", trend_codes);
    signals.insert("kd", kd_codes);
    signals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stair_each_ordering() {
        assert_eq!(stair(3.0, 1.0, 2.0).unwrap().code(), 1);
        assert_eq!(stair(2.0, 1.0, 3.0).unwrap().code(), 2);
        assert_eq!(stair(1.0, 2.0, 3.0).unwrap().code(), 3);
        assert_eq!(stair(1.0, 3.0, 2.0).unwrap().code(), -1);
        assert_eq!(stair(2.0, 3.0, 1.0).unwrap().code(), -2);
        assert_eq!(stair(3.0, 2.0, 1.0).unwrap().code(), -3);
    }

    #[test]
    fn test_stair_ties_take_first_branch() {
        assert_eq!(stair(0.0, 0.0, 0.0), Some(StairSignal::FastMidLeads));
    }

    #[test]
    fn test_stair_undefined() {
        assert_eq!(stair(f64::NAN, 1.0, 2.0), None);
    }

    #[test]
    fn test_deviation_signal() {
        assert_eq!(deviation_signal(5.0), Some(4));
        assert_eq!(deviation_signal(-5.0), Some(-4));
        assert_eq!(deviation_signal(4.99), None);
        assert_eq!(deviation_signal(f64::NAN), None);
    }

    #[test]
    fn test_trend_signal() {
        assert_eq!(trend_signal(0.0), Some(3));
        assert_eq!(trend_signal(-0.1), Some(-3));
        assert_eq!(trend_signal(f64::NAN), None);
    }

    #[test]
    fn test_kd_extreme() {
        assert_eq!(kd_extreme(80.0), Some(100));
        assert_eq!(kd_extreme(20.0), Some(0));
        assert_eq!(kd_extreme(50.0), None);
        assert_eq!(kd_extreme(f64::NAN), None);
    }
}
