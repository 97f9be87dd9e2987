//! FinMind open-data API: daily prices and monthly revenue.

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::types::{DataSource, MonthlyRevenue, PriceBar};

pub const API_URL: &str = "https://api.finmindtrade.com/api/v4/data";

const PRICE_DATASET: &str = "TaiwanStockPrice";
const REVENUE_DATASET: &str = "TaiwanStockMonthRevenue";

/// Raw FinMind envelope; rows stay untyped so missing fields can be reported.
#[derive(Debug, Deserialize)]
pub struct FinMindResponse {
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub data: Vec<Map<String, Value>>,
}

impl FinMindResponse {
    fn ensure_ok(&self) -> Result<()> {
        let ok = self.status == Some(200) || self.msg.as_deref() == Some("success");
        if ok {
            Ok(())
        } else {
            Err(AppError::DataUnavailable(format!(
                "FinMind error: status={:?} msg={}",
                self.status,
                self.msg.as_deref().unwrap_or("")
            )))
        }
    }
}

/// FinMind client.
#[derive(Clone)]
pub struct FinMindClient {
    client: Client,
    token: Option<String>,
}

impl FinMindClient {
    pub fn new(client: Client, token: Option<String>) -> Self {
        if token.is_none() {
            warn!("FINMIND_API_TOKEN not set, using anonymous FinMind quota");
        }
        Self { client, token }
    }

    async fn query(
        &self,
        dataset: &str,
        stock_id: &str,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<FinMindResponse> {
        let params = query_params(dataset, stock_id, start, end);
        let mut request = self.client.get(API_URL).query(&params);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(AppError::SourceUnavailable(format!(
                "{} returned {}",
                DataSource::FinMind,
                response.status()
            )));
        }

        let body: FinMindResponse = response.json().await?;
        body.ensure_ok()?;
        debug!("FinMind {} {}: {} rows", dataset, stock_id, body.data.len());
        Ok(body)
    }

    /// Daily bars from `start` to `end` inclusive, ascending.
    pub async fn fetch_prices(
        &self,
        stock_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>> {
        let body = self.query(PRICE_DATASET, stock_id, start, Some(end)).await?;
        price_bars(&body)
    }

    /// Monthly revenue reports published between `start` and `end`.
    pub async fn fetch_monthly_revenue(
        &self,
        stock_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MonthlyRevenue>> {
        let body = self.query(REVENUE_DATASET, stock_id, start, Some(end)).await?;
        monthly_revenue(&body)
    }
}

fn query_params(
    dataset: &str,
    stock_id: &str,
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("dataset", dataset.to_string()),
        ("data_id", stock_id.to_string()),
        ("start_date", start.format("%Y-%m-%d").to_string()),
    ];
    if let Some(end) = end {
        params.push(("end_date", end.format("%Y-%m-%d").to_string()));
    }
    params
}

fn require<'a>(row: &'a Map<String, Value>, field: &str) -> Result<&'a Value> {
    row.get(field)
        .ok_or_else(|| AppError::DataUnavailable(format!("FinMind row lacks field {}", field)))
}

/// Numbers may arrive as JSON numbers or numeric strings.
fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    number.filter(|v: &f64| v.is_finite())
}

fn as_date(value: &Value) -> Option<NaiveDate> {
    value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d").ok())
}

/// Convert price rows into bars.
///
/// Rows without a usable date or close are dropped; other unparseable
/// fields become `NaN`. Output is sorted by date with duplicates removed.
pub fn price_bars(body: &FinMindResponse) -> Result<Vec<PriceBar>> {
    let mut bars = Vec::with_capacity(body.data.len());
    for row in &body.data {
        let date = require(row, "date")?;
        let open = require(row, "open")?;
        let high = require(row, "max")?;
        let low = require(row, "min")?;
        let close = require(row, "close")?;
        let volume = require(row, "Trading_Volume")?;

        let (Some(date), Some(close)) = (as_date(date), as_number(close)) else {
            continue;
        };

        bars.push(PriceBar {
            date,
            open: as_number(open).unwrap_or(f64::NAN),
            high: as_number(high).unwrap_or(f64::NAN),
            low: as_number(low).unwrap_or(f64::NAN),
            close,
            volume: as_number(volume).unwrap_or(f64::NAN),
        });
    }

    bars.sort_by_key(|b| b.date);
    bars.dedup_by_key(|b| b.date);

    if bars.is_empty() {
        return Err(AppError::DataUnavailable("no usable price rows".into()));
    }
    Ok(bars)
}

/// Convert revenue rows, dropping rows whose fields don't parse.
pub fn monthly_revenue(body: &FinMindResponse) -> Result<Vec<MonthlyRevenue>> {
    let mut reports = Vec::with_capacity(body.data.len());
    for row in &body.data {
        let date = as_date(require(row, "date")?);
        let revenue = as_number(require(row, "revenue")?);
        let year = as_number(require(row, "revenue_year")?);
        let month = as_number(require(row, "revenue_month")?);

        let (Some(date), Some(revenue), Some(year), Some(month)) = (date, revenue, year, month)
        else {
            continue;
        };
        if !(1.0..=12.0).contains(&month) {
            continue;
        }

        reports.push(MonthlyRevenue {
            date,
            revenue,
            revenue_year: year as i32,
            revenue_month: month as u32,
        });
    }

    if reports.is_empty() {
        return Err(AppError::DataUnavailable("no usable revenue rows".into()));
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> FinMindResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_error_status() {
        let body = response(json!({"msg": "Your level is register", "status": 402, "data": []}));
        match body.ensure_ok() {
            Err(AppError::DataUnavailable(msg)) => assert!(msg.contains("Your level is register")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_query_params_carry_date_range() {
        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap();
        let params = query_params(REVENUE_DATASET, "2330", start, Some(end));
        assert_eq!(
            params,
            vec![
                ("dataset", "TaiwanStockMonthRevenue".to_string()),
                ("data_id", "2330".to_string()),
                ("start_date", "2021-01-01".to_string()),
                ("end_date", "2025-03-08".to_string()),
            ]
        );
    }

    #[test]
    fn test_prices_sorted_and_deduplicated() {
        let body = response(json!({
            "msg": "success",
            "status": 200,
            "data": [
                {"date": "2024-01-03", "open": 10, "max": 11, "min": 9, "close": 10.5, "Trading_Volume": 1000},
                {"date": "2024-01-02", "open": 9, "max": 10, "min": 8, "close": 9.5, "Trading_Volume": 900},
                {"date": "2024-01-02", "open": 9, "max": 10, "min": 8, "close": 9.5, "Trading_Volume": 900},
                {"date": "2024-01-04", "open": 10, "max": 11, "min": 9, "close": null, "Trading_Volume": 0}
            ]
        }));
        let bars = price_bars(&body).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[1].close, 10.5);
    }

    #[test]
    fn test_missing_field_is_data_unavailable() {
        let body = response(json!({
            "status": 200,
            "data": [{"date": "2024-01-03", "open": 10, "close": 10.5}]
        }));
        assert!(matches!(price_bars(&body), Err(AppError::DataUnavailable(_))));
    }

    #[test]
    fn test_revenue_rows() {
        let body = response(json!({
            "status": 200,
            "data": [
                {"date": "2024-02-01", "revenue": 1.5e9, "revenue_year": 2024, "revenue_month": 1},
                {"date": "2024-03-01", "revenue": "bad", "revenue_year": 2024, "revenue_month": 2}
            ]
        }));
        let reports = monthly_revenue(&body).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].revenue_month, 1);
    }
}
