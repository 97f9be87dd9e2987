use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordering of the three moving-average deviations.
///
/// Variants are named after the descending order of
/// (fast-mid, mid-slow, fast-slow) they classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StairSignal {
    /// fast-mid >= fast-slow >= mid-slow
    FastMidLeads,
    /// fast-slow >= fast-mid >= mid-slow
    FastSlowLeadsFastMid,
    /// fast-slow >= mid-slow >= fast-mid
    FastSlowLeadsMidSlow,
    /// mid-slow >= fast-slow >= fast-mid
    MidSlowLeadsFastSlow,
    /// mid-slow >= fast-mid >= fast-slow
    MidSlowLeadsFastMid,
    /// fast-mid >= mid-slow >= fast-slow, the remaining order
    FastMidOverMidSlow,
}

impl StairSignal {
    pub const ALL: [StairSignal; 6] = [
        StairSignal::FastMidLeads,
        StairSignal::FastSlowLeadsFastMid,
        StairSignal::FastSlowLeadsMidSlow,
        StairSignal::MidSlowLeadsFastSlow,
        StairSignal::MidSlowLeadsFastMid,
        StairSignal::FastMidOverMidSlow,
    ];

    /// Chart code for this ordering.
    pub fn code(&self) -> i8 {
        match self {
            StairSignal::FastMidLeads => 1,
            StairSignal::FastSlowLeadsFastMid => 2,
            StairSignal::FastSlowLeadsMidSlow => 3,
            StairSignal::MidSlowLeadsFastSlow => -1,
            StairSignal::MidSlowLeadsFastMid => -2,
            StairSignal::FastMidOverMidSlow => -3,
        }
    }
}

/// Named discrete signal codes aligned 1:1 with a bar sequence.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignalSeries {
    len: usize,
    values: BTreeMap<String, Vec<Option<i8>>>,
}

impl SignalSeries {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            values: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<Option<i8>>) {
        debug_assert_eq!(values.len(), self.len, "signal length mismatch");
        self.values.insert(name.into(), values);
    }

    pub fn get(&self, name: &str) -> Option<&[Option<i8>]> {
        self.values.get(name).map(Vec::as_slice)
    }

    /// Codes as reals for plotting, undefined entries become `NaN`.
    pub fn as_f64(&self, name: &str) -> Option<Vec<f64>> {
        self.get(name).map(|codes| {
            codes
                .iter()
                .map(|c| c.map(f64::from).unwrap_or(f64::NAN))
                .collect()
        })
    }
}
