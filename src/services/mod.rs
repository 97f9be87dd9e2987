pub mod analyzer;
pub mod chart;
pub mod directory;
pub mod indicators;
pub mod revenue;
pub mod screening;
pub mod shareholders;
pub mod signals;

pub use analyzer::{Analyzer, ChartKind, ItemOutcome, StockReport};
pub use chart::{ChartSink, JsonChartSink};
pub use directory::{StockDirectory, StockEntry};
pub use indicators::{compute_indicators, default_indicators, Indicator};
pub use screening::{display_table, ConcentrationScreen};
pub use signals::compute_signals;
