use serde::{Deserialize, Serialize};

/// Columns of the chip-concentration ranking, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationColumn {
    Rank,
    Code,
    Name,
    Conc1,
    Conc5,
    Conc10,
    Conc20,
    Conc60,
    Conc120,
    AvgVolume10,
}

impl ConcentrationColumn {
    /// Display order of the screening result table.
    pub const DISPLAY_ORDER: [ConcentrationColumn; 10] = [
        ConcentrationColumn::Rank,
        ConcentrationColumn::Code,
        ConcentrationColumn::Name,
        ConcentrationColumn::Conc1,
        ConcentrationColumn::Conc5,
        ConcentrationColumn::Conc10,
        ConcentrationColumn::Conc20,
        ConcentrationColumn::Conc60,
        ConcentrationColumn::Conc120,
        ConcentrationColumn::AvgVolume10,
    ];

    /// Columns a row must coerce to numbers to survive normalization.
    pub const NUMERIC_REQUIRED: [ConcentrationColumn; 7] = [
        ConcentrationColumn::Conc1,
        ConcentrationColumn::Conc5,
        ConcentrationColumn::Conc10,
        ConcentrationColumn::Conc20,
        ConcentrationColumn::Conc60,
        ConcentrationColumn::Conc120,
        ConcentrationColumn::AvgVolume10,
    ];

    /// Header label as printed by the source.
    pub fn header(&self) -> &'static str {
        match self {
            ConcentrationColumn::Rank => "編號",
            ConcentrationColumn::Code => "代碼",
            ConcentrationColumn::Name => "股票名稱",
            ConcentrationColumn::Conc1 => "1日集中度",
            ConcentrationColumn::Conc5 => "5日集中度",
            ConcentrationColumn::Conc10 => "10日集中度",
            ConcentrationColumn::Conc20 => "20日集中度",
            ConcentrationColumn::Conc60 => "60日集中度",
            ConcentrationColumn::Conc120 => "120日集中度",
            ConcentrationColumn::AvgVolume10 => "10日均量",
        }
    }

    /// Resolve a scraped header label, accepting known aliases.
    pub fn from_header(label: &str) -> Option<Self> {
        let key: String = label.chars().filter(|c| !c.is_whitespace()).collect();
        // Some snapshots print the short form of the name header.
        if key == "名稱" {
            return Some(ConcentrationColumn::Name);
        }
        Self::DISPLAY_ORDER.into_iter().find(|c| c.header() == key)
    }
}

/// One row of the chip-concentration ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationRecord {
    pub rank: Option<u32>,
    pub code: String,
    pub name: String,
    pub conc_1: f64,
    pub conc_5: f64,
    pub conc_10: f64,
    pub conc_20: f64,
    pub conc_60: f64,
    pub conc_120: f64,
    pub avg_volume_10: f64,
}

impl ConcentrationRecord {
    /// Cell text for a display column.
    pub fn display(&self, column: ConcentrationColumn) -> String {
        match column {
            ConcentrationColumn::Rank => self.rank.map(|r| r.to_string()).unwrap_or_default(),
            ConcentrationColumn::Code => self.code.clone(),
            ConcentrationColumn::Name => self.name.clone(),
            ConcentrationColumn::Conc1 => format!("{:.2}", self.conc_1),
            ConcentrationColumn::Conc5 => format!("{:.2}", self.conc_5),
            ConcentrationColumn::Conc10 => format!("{:.2}", self.conc_10),
            ConcentrationColumn::Conc20 => format!("{:.2}", self.conc_20),
            ConcentrationColumn::Conc60 => format!("{:.2}", self.conc_60),
            ConcentrationColumn::Conc120 => format!("{:.2}", self.conc_120),
            ConcentrationColumn::AvgVolume10 => self.avg_volume_10.to_string(),
        }
    }
}

/// Normalized concentration ranking plus the columns its header carried.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationTable {
    pub columns: Vec<ConcentrationColumn>,
    pub records: Vec<ConcentrationRecord>,
}

impl ConcentrationTable {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Flat table ready for display: header labels and stringified rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Weekly major-shareholder percentages for one stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareholderRecord {
    pub code: String,
    pub name: String,
    /// (date label, percentage) in source column order.
    pub holdings: Vec<(String, Option<f64>)>,
}

/// Row of an externally pre-filtered stock screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenedStock {
    pub code: String,
    pub name: String,
    pub market: String,
    pub trade_date: String,
    pub close: Option<f64>,
    pub change: Option<f64>,
    pub change_pct: Option<f64>,
    pub lots: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_alias() {
        assert_eq!(
            ConcentrationColumn::from_header("名稱"),
            Some(ConcentrationColumn::Name)
        );
        assert_eq!(
            ConcentrationColumn::from_header("股票名稱"),
            Some(ConcentrationColumn::Name)
        );
        assert_eq!(
            ConcentrationColumn::from_header(" 10日 均量 "),
            Some(ConcentrationColumn::AvgVolume10)
        );
        assert_eq!(ConcentrationColumn::from_header("備註"), None);
    }
}
