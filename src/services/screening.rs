//! Rule-based screen over the chip-concentration ranking.

use crate::types::{ConcentrationColumn, ConcentrationRecord, ConcentrationTable, DisplayTable};

/// Default minimum 10-day average volume (lots).
pub const DEFAULT_MIN_VOLUME: f64 = 2000.0;

/// Concentration screen thresholds.
#[derive(Debug, Clone, Copy)]
pub struct ConcentrationScreen {
    pub min_volume: f64,
}

impl Default for ConcentrationScreen {
    fn default() -> Self {
        Self {
            min_volume: DEFAULT_MIN_VOLUME,
        }
    }
}

impl ConcentrationScreen {
    pub fn new(min_volume: f64) -> Self {
        Self { min_volume }
    }

    /// Rising short-term concentration on liquid names:
    /// 5d > 10d > 20d, 5d > 0, 10d > 0 and volume above the threshold.
    pub fn matches(&self, record: &ConcentrationRecord) -> bool {
        record.conc_5 > record.conc_10
            && record.conc_10 > record.conc_20
            && record.conc_5 > 0.0
            && record.conc_10 > 0.0
            && record.avg_volume_10 > self.min_volume
    }

    /// Keep matching rows in input order, with the same columns.
    pub fn apply(&self, table: &ConcentrationTable) -> ConcentrationTable {
        ConcentrationTable {
            columns: table.columns.clone(),
            records: table
                .records
                .iter()
                .filter(|r| self.matches(r))
                .cloned()
                .collect(),
        }
    }
}

/// Fixed display projection; columns the source header lacked are left out.
pub fn display_table(table: &ConcentrationTable) -> DisplayTable {
    let columns: Vec<ConcentrationColumn> = ConcentrationColumn::DISPLAY_ORDER
        .into_iter()
        .filter(|c| table.columns.contains(c))
        .collect();

    DisplayTable {
        columns: columns.iter().map(|c| c.header().to_string()).collect(),
        rows: table
            .records
            .iter()
            .map(|r| columns.iter().map(|c| r.display(*c)).collect())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, c5: f64, c10: f64, c20: f64, volume: u64) -> ConcentrationRecord {
        ConcentrationRecord {
            rank: None,
            code: code.to_string(),
            name: format!("Stock {}", code),
            conc_1: 0.0,
            conc_5: c5,
            conc_10: c10,
            conc_20: c20,
            conc_60: 0.0,
            conc_120: 0.0,
            avg_volume_10: volume as f64,
        }
    }

    #[test]
    fn test_matches_requires_strict_order() {
        let screen = ConcentrationScreen::default();
        assert!(screen.matches(&record("1101", 3.0, 2.0, 1.0, 5000)));
        assert!(!screen.matches(&record("1101", 2.0, 2.0, 1.0, 5000)));
        assert!(!screen.matches(&record("1101", 3.0, 2.0, 2.0, 5000)));
    }

    #[test]
    fn test_matches_requires_positive() {
        let screen = ConcentrationScreen::default();
        assert!(!screen.matches(&record("1101", -1.0, -2.0, -3.0, 5000)));
        assert!(!screen.matches(&record("1101", 1.0, 0.0, -3.0, 5000)));
    }

    #[test]
    fn test_volume_threshold_is_exclusive() {
        let screen = ConcentrationScreen::new(2000.0);
        assert!(!screen.matches(&record("1101", 3.0, 2.0, 1.0, 2000)));
        assert!(screen.matches(&record("1101", 3.0, 2.0, 1.0, 2001)));
    }

    #[test]
    fn test_fractional_volume_above_threshold() {
        let screen = ConcentrationScreen::new(2000.0);
        let mut row = record("1101", 3.0, 2.0, 1.0, 0);
        row.avg_volume_10 = 2000.4;
        assert!(screen.matches(&row));
        row.avg_volume_10 = 1999.6;
        assert!(!screen.matches(&row));
    }

    #[test]
    fn test_display_table_omits_missing_columns() {
        let table = ConcentrationTable {
            columns: vec![
                ConcentrationColumn::Code,
                ConcentrationColumn::Name,
                ConcentrationColumn::Conc5,
            ],
            records: vec![record("2330", 3.0, 2.0, 1.0, 5000)],
        };
        let display = display_table(&table);
        assert_eq!(display.columns, vec!["代碼", "股票名稱", "5日集中度"]);
        assert_eq!(display.rows, vec![vec!["2330", "Stock 2330", "3.00"]]);
    }
}
