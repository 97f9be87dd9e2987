use serde::Serialize;
use std::collections::BTreeMap;

/// Named indicator outputs aligned 1:1 with a bar sequence.
///
/// Undefined entries (warm-up, flat ranges, zero denominators) are `NaN`.
/// Every stored sequence has exactly `len()` entries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndicatorSeries {
    len: usize,
    values: BTreeMap<String, Vec<f64>>,
}

impl IndicatorSeries {
    /// Create an empty series set for `len` bars.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            values: BTreeMap::new(),
        }
    }

    /// Number of bars every sequence is aligned to.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store a sequence under `name`, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.len, "indicator length mismatch");
        self.values.insert(name.into(), values);
    }

    /// Look up a sequence by name.
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.values.get(name).map(Vec::as_slice)
    }

    /// Value of `name` at `index`, `NaN` when unknown.
    pub fn value_at(&self, name: &str, index: usize) -> f64 {
        self.get(name)
            .and_then(|v| v.get(index).copied())
            .unwrap_or(f64::NAN)
    }

    /// Indicator names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut series = IndicatorSeries::new(3);
        series.insert("sma5", vec![f64::NAN, 1.0, 2.0]);

        assert_eq!(series.len(), 3);
        assert_eq!(series.get("sma5").map(|v| v.len()), Some(3));
        assert_eq!(series.value_at("sma5", 2), 2.0);
        assert!(series.value_at("sma5", 0).is_nan());
        assert!(series.value_at("missing", 1).is_nan());
    }

    #[test]
    fn test_names_sorted() {
        let mut series = IndicatorSeries::new(1);
        series.insert("wma5", vec![1.0]);
        series.insert("k", vec![1.0]);
        assert_eq!(series.names().collect::<Vec<_>>(), vec!["k", "wma5"]);
    }
}
