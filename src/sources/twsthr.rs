//! Weekly major-shareholder (>400 lots) continuity table.

use chrono::NaiveDate;
use regex::Regex;
use reqwest::Client;
use scraper::Html;
use tracing::{debug, info};

use super::http::fetch_html;
use super::table::{coerce_number, table_by_class};
use crate::error::{AppError, Result};
use crate::types::{DataSource, ShareholderRecord};

pub const SHAREHOLDERS_URL: &str = "https://norway.twsthr.info/StockHoldersContinue.aspx";

const QUERY: [(&str, &str); 8] = [
    ("Show", "1"),
    ("continue", "Y"),
    ("weeks", "0"),
    ("growthrate", "-101"),
    ("beforeweek", "1"),
    ("price", "5000"),
    ("valuerank", "1-3000"),
    ("display", "1"),
];

const TABLE_CLASSES: [&str; 3] = ["display", "dataTable", "no-footer"];

/// Column carrying "CODE NAME".
const STOCK_COLUMN: usize = 3;
/// Weekly percentage columns, newest first.
const WEEK_COLUMNS: std::ops::Range<usize> = 6..18;

pub async fn fetch_shareholders(client: &Client, year: i32) -> Result<Vec<ShareholderRecord>> {
    let html = fetch_html(client, DataSource::Twsthr, SHAREHOLDERS_URL, &QUERY, None).await?;
    let records = parse_shareholders(&html, year)?;
    info!("Parsed {} shareholder rows", records.len());
    Ok(records)
}

/// Extract per-stock weekly holdings. `year` completes bare `MMDD` headers.
pub fn parse_shareholders(html: &str, year: i32) -> Result<Vec<ShareholderRecord>> {
    let document = Html::parse_document(html);
    let table = table_by_class(&document, &TABLE_CLASSES)?
        .ok_or_else(|| AppError::DataUnavailable("shareholder table not found".into()))?;

    let Some((header, body)) = table.rows.split_first() else {
        return Err(AppError::DataUnavailable("shareholder table is empty".into()));
    };

    let end = WEEK_COLUMNS.end.min(header.len());
    let labels: Vec<String> = header
        .get(WEEK_COLUMNS.start..end)
        .unwrap_or_default()
        .iter()
        .map(|h| parse_week_label(h, year).unwrap_or_else(|| h.clone()))
        .collect();

    let stock = stock_pattern()?;
    let mut records = Vec::with_capacity(body.len());
    for row in body {
        let Some(caps) = row.get(STOCK_COLUMN).and_then(|c| stock.captures(c)) else {
            debug!("Skipping shareholder row without a stock code: {:?}", row);
            continue;
        };

        let holdings = labels
            .iter()
            .enumerate()
            .map(|(offset, label)| {
                let value = row
                    .get(WEEK_COLUMNS.start + offset)
                    .and_then(|c| coerce_number(c));
                (label.clone(), value)
            })
            .collect();

        records.push(ShareholderRecord {
            code: caps[1].to_string(),
            name: caps[2].trim().to_string(),
            holdings,
        });
    }

    Ok(records)
}

fn stock_pattern() -> Result<Regex> {
    Regex::new(r"(\d{4})\s*(.*)").map_err(|e| AppError::Internal(e.to_string()))
}

/// Turn a week header into `YYYY-MM-DD`.
///
/// Accepts `YYYY MMDD` (any separator) or bare `MMDD` in `year`.
pub fn parse_week_label(label: &str, year: i32) -> Option<String> {
    let digits: Vec<&str> = label
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .collect();

    let (year, month_day) = match digits.as_slice() {
        [y, md] if y.len() == 4 && md.len() == 4 => (y.parse().ok()?, *md),
        [ymd] if ymd.len() == 8 => (ymd[..4].parse().ok()?, &ymd[4..]),
        [md] if md.len() == 4 => (year, *md),
        _ => return None,
    };

    let month = month_day[..2].parse().ok()?;
    let day = month_day[2..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.format("%Y-%m-%d").to_string())
}
