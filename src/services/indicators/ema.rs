//! Exponential Moving Average (EMA).

/// EMA with smoothing span `span`, seeded with the first value.
///
/// `EMA[0] = x[0]`, `EMA[i] = EMA[i-1] + alpha * (x[i] - EMA[i-1])` with
/// `alpha = 2 / (span + 1)`. There is no warm-up gap.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return vec![f64::NAN; values.len()];
    }

    let multiplier = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());

    let mut prev: Option<f64> = None;
    for &value in values {
        let next = match prev {
            None => value,
            Some(p) => (value - p) * multiplier + p,
        };
        out.push(next);
        prev = Some(next);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_seeded_with_first_value() {
        let out = ema(&[10.0, 20.0], 3);
        // alpha = 0.5
        assert_eq!(out[0], 10.0);
        assert_eq!(out[1], 15.0);
    }

    #[test]
    fn test_ema_constant_series() {
        let out = ema(&[42.0; 50], 26);
        assert!(out.iter().all(|v| *v == 42.0));
    }

    #[test]
    fn test_ema_empty() {
        assert!(ema(&[], 12).is_empty());
    }
}
