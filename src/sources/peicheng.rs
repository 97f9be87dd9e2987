//! Daily chip-concentration ranking.

use reqwest::Client;
use scraper::Html;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::http::fetch_html;
use super::table::{all_tables, coerce_number, table_by_id, HtmlTable};
use crate::error::{AppError, Result};
use crate::types::{ConcentrationColumn, ConcentrationRecord, ConcentrationTable, DataSource};

/// 1-day concentration ranking page (Big5).
pub const CONCENTRATION_URL: &str = "http://asp.peicheng.com.tw/main/report/dream_report/%E7%B1%8C%E7%A2%BC%E9%9B%86%E4%B8%AD%E5%BA%A61%E6%97%A5%E6%8E%92%E8%A1%8C.htm";

/// Id of the ranking table in the exported report.
pub const CONCENTRATION_TABLE_ID: &str = "籌碼集中度排行轉網頁.(排程)_3148";

/// Fetch and normalize today's ranking.
pub async fn fetch_concentration(client: &Client) -> Result<ConcentrationTable> {
    let html = fetch_html(client, DataSource::Peicheng, CONCENTRATION_URL, &[], None).await?;
    let table = parse_concentration(&html)?;
    info!("Parsed {} concentration rows", table.records.len());
    Ok(table)
}

/// Locate the ranking table and normalize it.
///
/// Falls back to the first table in the page when the id is absent.
pub fn parse_concentration(html: &str) -> Result<ConcentrationTable> {
    let document = Html::parse_document(html);

    let table = match table_by_id(&document, CONCENTRATION_TABLE_ID)? {
        Some(table) => table,
        None => {
            warn!("Concentration table id not found, falling back to first table");
            all_tables(&document)?
                .into_iter()
                .next()
                .ok_or_else(|| AppError::DataUnavailable("page contains no tables".into()))?
        }
    };

    normalize(&table)
}

fn normalize(table: &HtmlTable) -> Result<ConcentrationTable> {
    let header_index = table
        .header_row(ConcentrationColumn::Code.header())
        .ok_or_else(|| AppError::DataUnavailable("no header row with 代碼".into()))?;

    let mut positions: HashMap<ConcentrationColumn, usize> = HashMap::new();
    for (i, label) in table.rows[header_index].iter().enumerate() {
        if let Some(column) = ConcentrationColumn::from_header(label) {
            positions.entry(column).or_insert(i);
        }
    }

    let missing: Vec<&str> = [ConcentrationColumn::Code, ConcentrationColumn::Name]
        .iter()
        .chain(ConcentrationColumn::NUMERIC_REQUIRED.iter())
        .filter(|c| !positions.contains_key(*c))
        .map(|c| c.header())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::DataUnavailable(format!(
            "concentration header lacks {}",
            missing.join(", ")
        )));
    }

    let cell = |row: &[String], column: ConcentrationColumn| -> Option<String> {
        positions.get(&column).and_then(|&i| row.get(i)).cloned()
    };

    let body = &table.rows[header_index + 1..];
    // Footer and notes follow the last row with a numeric code.
    let last_data_row = body.iter().rposition(|row| {
        cell(row, ConcentrationColumn::Code)
            .and_then(|code| coerce_number(&code))
            .is_some()
    });
    let body = match last_data_row {
        Some(last) => &body[..=last],
        None => &body[..0],
    };

    let mut records = Vec::with_capacity(body.len());
    for row in body {
        let number = |column| cell(row, column).and_then(|text| coerce_number(&text));

        let numbers: Option<Vec<f64>> = ConcentrationColumn::NUMERIC_REQUIRED
            .iter()
            .map(|c| number(*c))
            .collect();
        let Some(numbers) = numbers else {
            debug!("Dropping concentration row with non-numeric cells: {:?}", row);
            continue;
        };
        let volume = numbers[6];
        if volume < 0.0 {
            debug!("Dropping concentration row with negative volume: {:?}", row);
            continue;
        }

        records.push(ConcentrationRecord {
            rank: number(ConcentrationColumn::Rank)
                .filter(|r| *r >= 0.0)
                .map(|r| r as u32),
            code: cell(row, ConcentrationColumn::Code).unwrap_or_default(),
            name: cell(row, ConcentrationColumn::Name).unwrap_or_default(),
            conc_1: numbers[0],
            conc_5: numbers[1],
            conc_10: numbers[2],
            conc_20: numbers[3],
            conc_60: numbers[4],
            conc_120: numbers[5],
            avg_volume_10: volume,
        });
    }

    let columns = ConcentrationColumn::DISPLAY_ORDER
        .into_iter()
        .filter(|c| positions.contains_key(c))
        .collect();

    Ok(ConcentrationTable { columns, records })
}
