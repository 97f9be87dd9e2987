//! chipdash - Taiwan equities chip-concentration screening and charting dashboard

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use axum::Router;
use std::sync::Arc;

use config::Config;
use error::Result;
use services::{Analyzer, ChartSink, JsonChartSink, StockDirectory};
use sources::{build_client, FinMindClient};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: reqwest::Client,
    pub directory: Arc<StockDirectory>,
    pub analyzer: Arc<Analyzer>,
}

impl AppState {
    /// Build state from config, loading the directory from the shareholder CSV.
    pub fn new(config: Config) -> Result<Self> {
        let directory = StockDirectory::load(config.shareholder_csv.clone());
        Self::with_directory(config, directory)
    }

    pub fn with_directory(config: Config, directory: StockDirectory) -> Result<Self> {
        let config = Arc::new(config);
        let client = build_client(config.http_timeout)?;
        let finmind = FinMindClient::new(client.clone(), config.finmind_api_token.clone());
        let sink: Arc<dyn ChartSink> = Arc::new(JsonChartSink);

        Ok(Self {
            analyzer: Arc::new(Analyzer::new(config.clone(), finmind, sink)),
            config,
            client,
            directory: Arc::new(directory),
        })
    }
}

/// API routes plus the chart directory under `/static`.
pub fn app(state: AppState) -> Router {
    let static_files = tower_http::services::ServeDir::new(&state.config.static_dir);
    api::router()
        .nest_service("/static", static_files)
        .with_state(state)
}
