use serde::{Deserialize, Serialize};

/// Logical display panel of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    Price,
    Volume,
    Oscillator,
    Deviation,
    Signals,
    Macd,
    WeeklyWma,
    Revenue,
    Shareholders,
}

impl PanelKind {
    /// Relative height of the panel.
    pub fn ratio(&self) -> u8 {
        match self {
            PanelKind::Price => 40,
            PanelKind::Revenue | PanelKind::Shareholders => 100,
            _ => 15,
        }
    }
}

/// How the sink should draw a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesStyle {
    Line,
    Bar,
    Scatter,
    Step,
}

/// One labeled, index-aligned series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSeries {
    pub key: String,
    pub label: String,
    pub style: SeriesStyle,
    pub color: String,
    /// Undefined points are `NaN` and serialize as `null`.
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn new(key: &str, label: &str, style: SeriesStyle, color: &str, values: Vec<f64>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            style,
            color: color.to_string(),
            values,
        }
    }
}

/// Group of series drawn on a shared axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartPanel {
    pub kind: PanelKind,
    pub ratio: u8,
    pub series: Vec<ChartSeries>,
}

impl ChartPanel {
    pub fn new(kind: PanelKind, series: Vec<ChartSeries>) -> Self {
        Self {
            kind,
            ratio: kind.ratio(),
            series,
        }
    }
}

/// OHLC candle for the price panel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Everything the rendering sink needs to draw one chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    /// X-axis labels; every series has this many points.
    pub x_labels: Vec<String>,
    /// Candles for the price panel, empty for non-price charts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candles: Vec<Candle>,
    pub panels: Vec<ChartPanel>,
}

impl ChartSpec {
    /// Check that every series and the candles match the x axis.
    pub fn is_aligned(&self) -> bool {
        let n = self.x_labels.len();
        (self.candles.is_empty() || self.candles.len() == n)
            && self
                .panels
                .iter()
                .flat_map(|p| p.series.iter())
                .all(|s| s.values.len() == n)
    }

    /// Find a series by key across all panels.
    pub fn series(&self, key: &str) -> Option<&ChartSeries> {
        self.panels
            .iter()
            .flat_map(|p| p.series.iter())
            .find(|s| s.key == key)
    }
}
