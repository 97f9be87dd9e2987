//! Per-stock chart pipeline and the sequential batch runner.

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::chart::{revenue_chart, shareholder_chart, technical_chart, ChartSink};
use crate::services::directory::StockEntry;
use crate::services::indicators::{compute_with, default_indicators, max_warmup};
use crate::services::revenue::{revenue_history, YEARS_BACK};
use crate::services::shareholders;
use crate::services::signals::compute_signals;
use crate::sources::FinMindClient;

/// The three charts built per stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Technical,
    Revenue,
    Shareholders,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [
        ChartKind::Technical,
        ChartKind::Revenue,
        ChartKind::Shareholders,
    ];

    /// File stem, e.g. `stock_analysis_2330`.
    pub fn file_stem(&self, code: &str) -> String {
        match self {
            ChartKind::Technical => format!("stock_analysis_{}", code),
            ChartKind::Revenue => format!("revenue_{}", code),
            ChartKind::Shareholders => format!("shareholders_{}", code),
        }
    }
}

/// Result of one chart build. Failures are reported, never raised.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ItemOutcome {
    Rendered(PathBuf),
    Cached(PathBuf),
    Failed(String),
}

impl ItemOutcome {
    fn from_result(result: Result<PathBuf>) -> Self {
        match result {
            Ok(path) => ItemOutcome::Rendered(path),
            Err(e) => ItemOutcome::Failed(e.to_string()),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ItemOutcome::Failed(_))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartOutcome {
    pub kind: ChartKind,
    pub outcome: ItemOutcome,
}

/// Everything built for one stock.
#[derive(Debug, Clone, Serialize)]
pub struct StockReport {
    pub code: String,
    pub name: String,
    pub charts: Vec<ChartOutcome>,
}

impl StockReport {
    pub fn failures(&self) -> usize {
        self.charts.iter().filter(|c| c.outcome.is_failed()).count()
    }
}

/// Builds and writes charts for individual stocks.
pub struct Analyzer {
    config: Arc<Config>,
    finmind: FinMindClient,
    sink: Arc<dyn ChartSink>,
}

impl Analyzer {
    pub fn new(config: Arc<Config>, finmind: FinMindClient, sink: Arc<dyn ChartSink>) -> Self {
        Self {
            config,
            finmind,
            sink,
        }
    }

    pub fn chart_path(&self, kind: ChartKind, code: &str) -> PathBuf {
        self.sink
            .output_path(&self.config.static_dir, &kind.file_stem(code))
    }

    /// Leading bars hidden from the technical chart.
    pub fn warmup(&self) -> usize {
        self.config
            .chart_warmup
            .max(max_warmup(&default_indicators()))
    }

    /// Fetch prices, compute indicators and signals, render the technical chart.
    pub async fn technical(&self, entry: &StockEntry, today: NaiveDate) -> Result<PathBuf> {
        let start = today - Duration::days(self.config.analysis_days);
        let bars = self.finmind.fetch_prices(&entry.code, start, today).await?;

        let indicators = compute_with(&default_indicators(), &bars);
        let signals = compute_signals(&indicators);
        let spec = technical_chart(
            &entry.code,
            &entry.name,
            &bars,
            &indicators,
            &signals,
            self.warmup(),
        )?;

        let path = self.chart_path(ChartKind::Technical, &entry.code);
        self.sink.render(&spec, &path)?;
        Ok(path)
    }

    /// Monthly revenue for the last few years plus the current one.
    pub async fn revenue(&self, entry: &StockEntry, today: NaiveDate) -> Result<PathBuf> {
        let current_year = today.year();
        // One extra year so the oldest displayed year has YoY values.
        let start = NaiveDate::from_ymd_opt(current_year - YEARS_BACK - 1, 1, 1)
            .ok_or_else(|| AppError::Internal(format!("bad year {}", current_year)))?;
        let reports = self
            .finmind
            .fetch_monthly_revenue(&entry.code, start, today)
            .await?;

        let history = revenue_history(&reports, current_year);
        let spec = revenue_chart(&entry.code, &entry.name, &history)?;

        let path = self.chart_path(ChartKind::Revenue, &entry.code);
        self.sink.render(&spec, &path)?;
        Ok(path)
    }

    /// Step chart from the stored shareholder table.
    pub fn shareholders(&self, entry: &StockEntry) -> Result<PathBuf> {
        let records = shareholders::read_csv(&self.config.shareholder_csv)?;
        let record = records
            .iter()
            .find(|r| r.code == entry.code)
            .ok_or_else(|| {
                AppError::NotFound(format!("{} is not in the shareholder table", entry.code))
            })?;

        let points = shareholders::dated_points(record);
        let spec = shareholder_chart(&record.code, &record.name, &points)?;

        let path = self.chart_path(ChartKind::Shareholders, &entry.code);
        self.sink.render(&spec, &path)?;
        Ok(path)
    }

    async fn build_one(&self, kind: ChartKind, entry: &StockEntry, today: NaiveDate) -> Result<PathBuf> {
        match kind {
            ChartKind::Technical => self.technical(entry, today).await,
            ChartKind::Revenue => self.revenue(entry, today).await,
            ChartKind::Shareholders => self.shareholders(entry),
        }
    }

    /// Build all three charts for `entry`.
    ///
    /// Unless `force` is set, charts whose file already exists are reused.
    pub async fn build(&self, entry: &StockEntry, force: bool) -> StockReport {
        let today = Local::now().date_naive();
        let mut charts = Vec::with_capacity(ChartKind::ALL.len());

        for kind in ChartKind::ALL {
            let path = self.chart_path(kind, &entry.code);
            let outcome = if !force && path.exists() {
                ItemOutcome::Cached(path)
            } else {
                let outcome = ItemOutcome::from_result(self.build_one(kind, entry, today).await);
                if let ItemOutcome::Failed(reason) = &outcome {
                    warn!("{:?} chart for {} ({}) failed: {}", kind, entry.name, entry.code, reason);
                }
                outcome
            };
            charts.push(ChartOutcome { kind, outcome });
        }

        StockReport {
            code: entry.code.clone(),
            name: entry.name.clone(),
            charts,
        }
    }

    /// Rebuild charts for every candidate in order. One stock's failure never
    /// stops the rest.
    pub async fn build_batch(&self, entries: &[StockEntry]) -> Vec<StockReport> {
        info!("Building charts for {} stocks", entries.len());
        let mut reports = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            info!("[{}/{}] {} ({})", i + 1, entries.len(), entry.name, entry.code);
            reports.push(self.build(entry, true).await);
        }

        let failed = reports.iter().filter(|r| r.failures() > 0).count();
        info!(
            "Batch finished: {} stocks, {} with failed charts",
            reports.len(),
            failed
        );
        reports
    }
}
