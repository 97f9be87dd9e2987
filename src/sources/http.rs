//! Shared HTTP transport for the scraped sources.

use reqwest::{header, Client};
use std::time::Duration;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::types::DataSource;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";

/// Build the client every source shares. Requests are never retried.
pub fn build_client(timeout: Duration) -> Result<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static("zh-TW,zh;q=0.9,en-US;q=0.8,en;q=0.7"),
    );

    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))
}

/// GET a page and decode it with the source's charset.
///
/// A charset declared in the response's Content-Type takes precedence.
pub async fn fetch_html(
    client: &Client,
    source: DataSource,
    url: &str,
    query: &[(&str, &str)],
    cookie: Option<&str>,
) -> Result<String> {
    let mut request = client.get(url).query(query);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }

    let response = request
        .send()
        .await
        .map_err(|e| AppError::SourceUnavailable(format!("{} request failed: {}", source, e)))?;

    if !response.status().is_success() {
        return Err(AppError::SourceUnavailable(format!(
            "{} returned {}",
            source,
            response.status()
        )));
    }

    let body = response
        .text_with_charset(source.charset())
        .await
        .map_err(|e| AppError::SourceUnavailable(format!("{} body read failed: {}", source, e)))?;

    debug!("Fetched {} bytes from {}", body.len(), source);
    Ok(body)
}
