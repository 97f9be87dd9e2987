use crate::api::ApiResponse;
use crate::error::{AppError, Result};
use crate::services::shareholders::write_csv;
use crate::sources::fetch_shareholders;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use chrono::{Datelike, Local};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct UpdateSummary {
    pub rows: usize,
    pub weeks: usize,
    pub stocks_loaded: usize,
}

/// POST /api/shareholders/update
///
/// Scrape the weekly table, overwrite the CSV and reload the directory.
async fn update(State(state): State<AppState>) -> Result<Json<ApiResponse<UpdateSummary>>> {
    let year = Local::now().year();
    let records = fetch_shareholders(&state.client, year).await?;
    if records.is_empty() {
        // Keep the previous file rather than replacing it with nothing.
        return Err(AppError::DataUnavailable(
            "shareholder table had no stock rows".into(),
        ));
    }

    write_csv(&state.config.shareholder_csv, &records)?;
    let stocks_loaded = state.directory.reload()?;
    info!("Shareholder update complete: {} stocks", stocks_loaded);

    Ok(Json(ApiResponse::new(UpdateSummary {
        rows: records.len(),
        weeks: records.first().map(|r| r.holdings.len()).unwrap_or(0),
        stocks_loaded,
    })))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/update", post(update))
}
