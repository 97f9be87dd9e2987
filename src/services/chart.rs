//! Chart assembly and rendering.
//!
//! Builders turn computed data into a [`ChartSpec`]; a [`ChartSink`] turns
//! it into a file. Builders never touch the filesystem.

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::services::revenue::RevenueHistory;
use crate::types::{
    Candle, ChartPanel, ChartSeries, ChartSpec, IndicatorSeries, PanelKind, PriceBar,
    SeriesStyle, SignalSeries,
};

/// Assemble the seven-panel technical chart, dropping the first `warmup` bars.
pub fn technical_chart(
    code: &str,
    name: &str,
    bars: &[PriceBar],
    indicators: &IndicatorSeries,
    signals: &SignalSeries,
    warmup: usize,
) -> Result<ChartSpec> {
    if bars.len() <= warmup {
        return Err(AppError::DataUnavailable(format!(
            "{} has {} bars, need more than {}",
            code,
            bars.len(),
            warmup
        )));
    }

    let visible = &bars[warmup..];
    // Sequences not aligned with `bars` plot as undefined.
    let trim = |values: &[f64]| -> Vec<f64> {
        match values.get(warmup..) {
            Some(rest) if values.len() == bars.len() => rest.to_vec(),
            _ => vec![f64::NAN; visible.len()],
        }
    };
    let tail = |key: &str| -> Vec<f64> {
        indicators
            .get(key)
            .map(|values| trim(values))
            .unwrap_or_else(|| vec![f64::NAN; visible.len()])
    };
    let signal_tail = |key: &str| -> Vec<f64> {
        signals
            .as_f64(key)
            .map(|values| trim(&values))
            .unwrap_or_else(|| vec![f64::NAN; visible.len()])
    };

    let histogram = tail("macd_hist");
    let hist_pos = histogram
        .iter()
        .map(|&h| if h > 0.0 { h } else { f64::NAN })
        .collect();
    let hist_neg = histogram
        .iter()
        .map(|&h| if h <= 0.0 { h } else { f64::NAN })
        .collect();

    use SeriesStyle::{Bar, Line, Scatter};
    let panels = vec![
        ChartPanel::new(
            PanelKind::Price,
            vec![
                ChartSeries::new("sma5", "週線", Line, "blue", tail("sma5")),
                ChartSeries::new("sma20", "月線", Line, "orange", tail("sma20")),
                ChartSeries::new("sma60", "季線", Line, "red", tail("sma60")),
            ],
        ),
        ChartPanel::new(
            PanelKind::Volume,
            vec![ChartSeries::new(
                "volume",
                "成交量",
                Bar,
                "gray",
                visible.iter().map(|b| b.volume).collect(),
            )],
        ),
        ChartPanel::new(
            PanelKind::Oscillator,
            vec![
                ChartSeries::new("k", "K值", Line, "red", tail("k")),
                ChartSeries::new("d", "D值", Line, "green", tail("d")),
                ChartSeries::new("kd", "KD信號", Scatter, "blue", signal_tail("kd")),
            ],
        ),
        ChartPanel::new(
            PanelKind::Deviation,
            vec![
                ChartSeries::new("dev_5_20", "週-月", Line, "red", tail("dev_5_20")),
                ChartSeries::new("dev_20_60", "月-季", Line, "green", tail("dev_20_60")),
                ChartSeries::new("dev_5_60", "週-季", Line, "orange", tail("dev_5_60")),
            ],
        ),
        ChartPanel::new(
            PanelKind::Signals,
            vec![
                ChartSeries::new("stair", "階梯信號", Bar, "red", signal_tail("stair")),
                ChartSeries::new("deviation", "乖離信號", Scatter, "blue", signal_tail("deviation")),
                ChartSeries::new("trend", "多空信號", Line, "orange", signal_tail("trend")),
            ],
        ),
        ChartPanel::new(
            PanelKind::Macd,
            vec![
                ChartSeries::new("macd", "MACD", Line, "blue", tail("macd")),
                ChartSeries::new("macd_signal", "Signal", Line, "red", tail("macd_signal")),
                ChartSeries::new("macd_hist_pos", "Histogram (+)", Bar, "red", hist_pos),
                ChartSeries::new("macd_hist_neg", "Histogram (-)", Bar, "green", hist_neg),
            ],
        ),
        ChartPanel::new(
            PanelKind::WeeklyWma,
            vec![
                ChartSeries::new("wma5", "5WMA", Line, "red", tail("wma5")),
                ChartSeries::new("wma10", "10WMA", Line, "green", tail("wma10")),
            ],
        ),
    ];

    Ok(ChartSpec {
        title: format!("{} ({})", name, code),
        x_labels: visible.iter().map(|b| b.date.to_string()).collect(),
        candles: visible
            .iter()
            .map(|b| Candle {
                open: b.open,
                high: b.high,
                low: b.low,
                close: b.close,
            })
            .collect(),
        panels,
    })
}

/// Line colour for a revenue year relative to the current year.
fn year_color(year: i32, current_year: i32) -> &'static str {
    match current_year - year {
        0 => "blue",
        1 => "orange",
        2 => "green",
        3 => "red",
        _ => "gray",
    }
}

/// Monthly revenue lines per year plus the current year's YoY bars.
pub fn revenue_chart(code: &str, name: &str, history: &RevenueHistory) -> Result<ChartSpec> {
    if history.years.is_empty() {
        return Err(AppError::DataUnavailable(format!(
            "{} has no revenue since {}",
            code,
            history.first_year()
        )));
    }

    let mut series: Vec<ChartSeries> = history
        .years
        .iter()
        .map(|(year, months)| {
            ChartSeries::new(
                &format!("revenue_{}", year),
                &format!("{}年", year),
                SeriesStyle::Line,
                year_color(*year, history.current_year),
                months.to_vec(),
            )
        })
        .collect();

    if let Some(yoy) = history.yoy.get(&history.current_year) {
        series.push(ChartSeries::new(
            &format!("yoy_{}", history.current_year),
            &format!("{} YOY", history.current_year),
            SeriesStyle::Bar,
            "lightgreen",
            yoy.to_vec(),
        ));
    }

    Ok(ChartSpec {
        title: format!("{} {} 營收變化圖", code, name),
        x_labels: (1..=12).map(|m| format!("{}月", m)).collect(),
        candles: Vec::new(),
        panels: vec![ChartPanel::new(PanelKind::Revenue, series)],
    })
}

/// Step series of the major-holder percentage over time.
pub fn shareholder_chart(code: &str, name: &str, points: &[(NaiveDate, f64)]) -> Result<ChartSpec> {
    if points.is_empty() {
        return Err(AppError::DataUnavailable(format!(
            "{} has no dated shareholder values",
            code
        )));
    }

    Ok(ChartSpec {
        title: format!("{} {} 大戶股權變化圖 (持股>400張)", code, name),
        x_labels: points.iter().map(|(d, _)| d.to_string()).collect(),
        candles: Vec::new(),
        panels: vec![ChartPanel::new(
            PanelKind::Shareholders,
            vec![ChartSeries::new(
                "holding",
                "大戶股權比例 (%)",
                SeriesStyle::Step,
                "dodgerblue",
                points.iter().map(|(_, v)| *v).collect(),
            )],
        )],
    })
}

/// Renders a [`ChartSpec`] to a file.
pub trait ChartSink: Send + Sync {
    /// File extension written by this sink, without the dot.
    fn extension(&self) -> &str;

    /// Write `spec` to `path`, replacing any existing file.
    fn render(&self, spec: &ChartSpec, path: &Path) -> Result<()>;

    /// `dir/stem.ext` for this sink.
    fn output_path(&self, dir: &Path, stem: &str) -> PathBuf {
        dir.join(format!("{}.{}", stem, self.extension()))
    }
}

/// Writes the chart payload as JSON for a browser-side renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonChartSink;

impl ChartSink for JsonChartSink {
    fn extension(&self) -> &str {
        "json"
    }

    fn render(&self, spec: &ChartSpec, path: &Path) -> Result<()> {
        if !spec.is_aligned() {
            return Err(AppError::Internal(format!(
                "chart '{}' has series of mismatched length",
                spec.title
            )));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec(spec)?;
        fs::write(path, json)?;
        debug!("Rendered chart '{}' to {}", spec.title, path.display());
        Ok(())
    }
}
