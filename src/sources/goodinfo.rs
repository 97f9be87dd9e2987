//! Saved custom screen on the Goodinfo stock list.

use reqwest::Client;
use scraper::Html;
use tracing::{debug, info};

use super::http::fetch_html;
use super::table::{coerce_number, element_by_id, normalize_key, tables_in};
use crate::error::{AppError, Result};
use crate::types::{DataSource, ScreenedStock};

pub const STOCK_LIST_URL: &str = "https://goodinfo.tw/tw/StockList.asp";

/// The saved screen: red candle 2.5-10%, 5k-900k lots, within 5% of the
/// quarterly line, weekly K below 50 and rising, daily K over D, volume up 30%.
/// The monthly/quarterly bearish-alignment rule rides along unchecked
/// (`FL_RULE_CHK1` empty), so it does not filter the list.
pub const SCREEN_QUERY: [(&str, &str); 24] = [
    ("SHEET", "交易狀況"),
    ("SHEET2", "日"),
    ("MARKET_CAT", "自訂篩選"),
    ("INDUSTRY_CAT", "我的條件"),
    ("FL_ITEM0", "當日：紅K棒棒幅(%)"),
    ("FL_VAL_S0", "2.5"),
    ("FL_VAL_E0", "10"),
    ("FL_ITEM1", "成交張數 (張)"),
    ("FL_VAL_S1", "5000"),
    ("FL_VAL_E1", "900000"),
    ("FL_ITEM3", "均線乖離(%)–季"),
    ("FL_VAL_S3", "-5"),
    ("FL_VAL_E3", "5"),
    ("FL_ITEM4", "K值 (週)"),
    ("FL_VAL_S4", "0"),
    ("FL_VAL_E4", "50"),
    ("FL_RULE0", "KD||週K值 ↗@@週KD走勢@@K值 ↗"),
    ("FL_RULE1", "均線位置||月/季線空頭排列@@均價線空頭排列@@月/季"),
    ("FL_RULE_CHK1", ""),
    ("FL_FD0", "K值 (日)||1||0||>||D值 (日)||1||0"),
    ("FL_FD1", "成交張數 (張)||1||0||>||昨日成交張數 (張)||1.3||0"),
    ("FL_MARKET", "上市/上櫃"),
    ("RPT_TIME", "最新資料"),
    ("MY_FL_RULE_NM", "選股103"),
];

const CONTAINER_ID: &str = "txtStockListData";

const CODE: &str = "代號";
const NAME: &str = "名稱";
const MARKET: &str = "市場";
const TRADE_DATE: &str = "股價日期";
const CLOSE: &str = "成交";
const CHANGE: &str = "漲跌價";
const CHANGE_PCT: &str = "漲跌幅";
const LOTS: &str = "成交張數";

pub async fn fetch_screened(client: &Client, cookie: Option<&str>) -> Result<Vec<ScreenedStock>> {
    let html = fetch_html(
        client,
        DataSource::Goodinfo,
        STOCK_LIST_URL,
        &SCREEN_QUERY,
        cookie,
    )
    .await?;
    let stocks = parse_screened(&html)?;
    info!("Parsed {} screened stocks", stocks.len());
    Ok(stocks)
}

pub fn parse_screened(html: &str) -> Result<Vec<ScreenedStock>> {
    let document = Html::parse_document(html);
    let container = element_by_id(&document, CONTAINER_ID)?
        .ok_or_else(|| AppError::DataUnavailable("screen result container missing".into()))?;

    let table = tables_in(container)?
        .into_iter()
        .find(|t| t.contains(CODE))
        .ok_or_else(|| AppError::DataUnavailable("no table with a 代號 header".into()))?;

    let header_index = table
        .header_row(CODE)
        .ok_or_else(|| AppError::DataUnavailable("no table with a 代號 header".into()))?;
    let header: Vec<String> = table.rows[header_index]
        .iter()
        .map(|h| normalize_key(h))
        .collect();

    let position = |label: &str| -> Result<usize> {
        header
            .iter()
            .position(|h| h == label)
            .ok_or_else(|| AppError::DataUnavailable(format!("screen table lacks {}", label)))
    };
    let code = position(CODE)?;
    let name = position(NAME)?;
    let market = position(MARKET)?;
    let trade_date = position(TRADE_DATE)?;
    let close = position(CLOSE)?;
    let change = position(CHANGE)?;
    let change_pct = position(CHANGE_PCT)?;
    let lots = position(LOTS)?;

    let mut stocks = Vec::new();
    for row in &table.rows[header_index + 1..] {
        let text = |i: usize| row.get(i).map(|s| s.trim().to_string()).unwrap_or_default();
        let number = |i: usize| row.get(i).and_then(|s| coerce_number(s));

        let stock_code = text(code);
        let stock_name = text(name);
        // Long result lists repeat the header every few rows.
        if stock_code.is_empty()
            || stock_name.is_empty()
            || normalize_key(&stock_code) == CODE
        {
            debug!("Skipping screen row: {:?}", row);
            continue;
        }

        stocks.push(ScreenedStock {
            code: stock_code,
            name: stock_name,
            market: text(market),
            trade_date: text(trade_date),
            close: number(close),
            change: number(change),
            change_pct: number(change_pct),
            lots: number(lots),
        });
    }

    Ok(stocks)
}
