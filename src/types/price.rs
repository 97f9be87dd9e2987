use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// External data source identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Daily chip-concentration ranking.
    Peicheng,
    /// Weekly major-shareholder continuity table.
    Twsthr,
    /// Custom screen results.
    Goodinfo,
    /// Daily prices and monthly revenue.
    FinMind,
}

impl DataSource {
    /// Charset the source's pages are served in.
    pub fn charset(&self) -> &'static str {
        match self {
            DataSource::Peicheng => "big5",
            DataSource::Twsthr | DataSource::Goodinfo | DataSource::FinMind => "utf-8",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataSource::Peicheng => "peicheng",
            DataSource::Twsthr => "twsthr",
            DataSource::Goodinfo => "goodinfo",
            DataSource::FinMind => "finmind",
        };
        write!(f, "{}", name)
    }
}

/// One end-of-day bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Column views over a bar sequence.
pub trait PriceBarsExt {
    fn closes(&self) -> Vec<f64>;
    fn highs(&self) -> Vec<f64>;
    fn lows(&self) -> Vec<f64>;
    fn dates(&self) -> Vec<NaiveDate>;
}

impl PriceBarsExt for [PriceBar] {
    fn closes(&self) -> Vec<f64> {
        self.iter().map(|b| b.close).collect()
    }

    fn highs(&self) -> Vec<f64> {
        self.iter().map(|b| b.high).collect()
    }

    fn lows(&self) -> Vec<f64> {
        self.iter().map(|b| b.low).collect()
    }

    fn dates(&self) -> Vec<NaiveDate> {
        self.iter().map(|b| b.date).collect()
    }
}

/// Monthly revenue report for one stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    /// Publication date.
    pub date: NaiveDate,
    /// Revenue in TWD.
    pub revenue: f64,
    /// Year the revenue belongs to (may differ from the publication date).
    pub revenue_year: i32,
    /// Month the revenue belongs to, 1-12.
    pub revenue_month: u32,
}
