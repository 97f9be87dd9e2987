use crate::api::ApiResponse;
use crate::error::Result;
use crate::services::analyzer::StockReport;
use crate::services::screening::{display_table, ConcentrationScreen};
use crate::services::StockEntry;
use crate::sources::{fetch_concentration, fetch_screened};
use crate::types::{DisplayTable, ScreenedStock};
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct ConcentrationPick {
    pub table: DisplayTable,
    pub reports: Vec<StockReport>,
}

/// POST /api/picks/concentration
///
/// Scrape the ranking, keep rising-concentration names and rebuild their charts.
async fn concentration(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ConcentrationPick>>> {
    let ranking = fetch_concentration(&state.client).await?;
    let picked = ConcentrationScreen::new(state.config.min_volume).apply(&ranking);
    info!(
        "Concentration screen kept {} of {} stocks",
        picked.records.len(),
        ranking.records.len()
    );

    let table = display_table(&picked);
    if picked.is_empty() {
        return Ok(Json(ApiResponse::with_message(
            ConcentrationPick {
                table,
                reports: Vec::new(),
            },
            "No stocks match the concentration screen",
        )));
    }

    let entries: Vec<StockEntry> = picked
        .records
        .iter()
        .map(|r| StockEntry {
            code: r.code.clone(),
            name: r.name.clone(),
        })
        .collect();
    let reports = state.analyzer.build_batch(&entries).await;

    let failed = reports.iter().filter(|r| r.failures() > 0).count();
    let pick = ConcentrationPick { table, reports };
    Ok(Json(if failed > 0 {
        ApiResponse::with_message(pick, format!("{} stock(s) had failed charts", failed))
    } else {
        ApiResponse::new(pick)
    }))
}

/// POST /api/picks/screen
async fn screen(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<ScreenedStock>>>> {
    let stocks = fetch_screened(&state.client, state.config.goodinfo_cookie.as_deref()).await?;
    Ok(Json(if stocks.is_empty() {
        ApiResponse::with_message(stocks, "The saved screen returned no stocks")
    } else {
        ApiResponse::new(stocks)
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/concentration", post(concentration))
        .route("/screen", post(screen))
}
