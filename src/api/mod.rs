pub mod health;
pub mod picks;
pub mod shareholders;
pub mod stocks;

use crate::AppState;
use axum::Router;
use serde::Serialize;

/// Response wrapper shared by the JSON endpoints.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub meta: ApiMeta,
}

#[derive(Debug, Default, Serialize)]
pub struct ApiMeta {
    /// Set when the result is empty or partially failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: ApiMeta::default(),
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            meta: ApiMeta {
                message: Some(message.into()),
            },
        }
    }
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/stocks", stocks::router())
        .nest("/api/picks", picks::router())
        .nest("/api/shareholders", shareholders::router())
}
