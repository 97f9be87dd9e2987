use crate::api::ApiResponse;
use crate::error::Result;
use crate::services::analyzer::{ChartKind, ItemOutcome, StockReport};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub struct LookupQuery {
    /// Rebuild charts even when files already exist.
    #[serde(default)]
    pub force: bool,
}

/// One chart as seen by the front end.
#[derive(Debug, Serialize)]
pub struct ChartLink {
    pub kind: ChartKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StockResponse {
    pub code: String,
    pub name: String,
    /// "name (code)" heading.
    pub display: String,
    pub charts: Vec<ChartLink>,
}

/// Public URL of a file under the static directory.
pub fn static_url(path: &FsPath) -> Option<String> {
    path.file_name()
        .and_then(|f| f.to_str())
        .map(|f| format!("/static/{}", f))
}

impl From<StockReport> for StockResponse {
    fn from(report: StockReport) -> Self {
        let charts = report
            .charts
            .into_iter()
            .map(|c| match c.outcome {
                ItemOutcome::Rendered(path) | ItemOutcome::Cached(path) => ChartLink {
                    kind: c.kind,
                    url: static_url(&path),
                    error: None,
                },
                ItemOutcome::Failed(reason) => ChartLink {
                    kind: c.kind,
                    url: None,
                    error: Some(reason),
                },
            })
            .collect();

        Self {
            display: format!("{} ({})", report.name, report.code),
            code: report.code,
            name: report.name,
            charts,
        }
    }
}

/// GET /api/stocks/:identifier
async fn lookup(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<ApiResponse<StockResponse>>> {
    let entry = state.directory.resolve(&identifier)?;
    info!("Lookup '{}' resolved to {} ({})", identifier, entry.name, entry.code);

    let report = state.analyzer.build(&entry, query.force).await;
    let failures = report.failures();
    let response = StockResponse::from(report);

    Ok(Json(if failures > 0 {
        ApiResponse::with_message(response, format!("{} chart(s) failed", failures))
    } else {
        ApiResponse::new(response)
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/:identifier", get(lookup))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_static_url() {
        let path = PathBuf::from("static/revenue_2330.json");
        assert_eq!(static_url(&path).as_deref(), Some("/static/revenue_2330.json"));
    }

    #[test]
    fn test_failed_chart_has_no_url() {
        let report = StockReport {
            code: "2330".into(),
            name: "台積電".into(),
            charts: vec![crate::services::analyzer::ChartOutcome {
                kind: ChartKind::Revenue,
                outcome: ItemOutcome::Failed("timeout".into()),
            }],
        };
        let response = StockResponse::from(report);
        assert_eq!(response.display, "台積電 (2330)");
        assert!(response.charts[0].url.is_none());
        assert_eq!(response.charts[0].error.as_deref(), Some("timeout"));
    }
}
