//! Integration tests for chart assembly and the JSON sink

use chipdash::services::chart::{technical_chart, ChartSink, JsonChartSink};
use chipdash::services::indicators::compute_indicators;
use chipdash::services::revenue::revenue_history;
use chipdash::services::signals::compute_signals;
use chipdash::types::{MonthlyRevenue, PanelKind, PriceBar};
use chrono::{Duration, NaiveDate};

fn bars(n: usize) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
    (0..n)
        .map(|i| {
            let close = 50.0 + (i as f64 / 9.0).cos() * 5.0;
            PriceBar {
                date: start + Duration::days(i as i64),
                open: close - 0.2,
                high: close + 0.5,
                low: close - 0.5,
                close,
                volume: 2_000.0,
            }
        })
        .collect()
}

#[test]
fn test_warmup_trimmed_and_aligned() {
    let bars = bars(200);
    let indicators = compute_indicators(&bars);
    let signals = compute_signals(&indicators);

    let spec = technical_chart("2330", "台積電", &bars, &indicators, &signals, 101).unwrap();

    assert_eq!(spec.title, "台積電 (2330)");
    assert_eq!(spec.x_labels.len(), 99);
    assert_eq!(spec.x_labels[0], bars[101].date.to_string());
    assert_eq!(spec.candles.len(), 99);
    assert!(spec.is_aligned());

    let kinds: Vec<PanelKind> = spec.panels.iter().map(|p| p.kind).collect();
    assert_eq!(
        kinds,
        vec![
            PanelKind::Price,
            PanelKind::Volume,
            PanelKind::Oscillator,
            PanelKind::Deviation,
            PanelKind::Signals,
            PanelKind::Macd,
            PanelKind::WeeklyWma,
        ]
    );

    // Past the warm-up every moving average is defined
    assert!(spec.series("sma60").unwrap().values.iter().all(|v| !v.is_nan()));
}

#[test]
fn test_histogram_parts_recombine() {
    let bars = bars(150);
    let indicators = compute_indicators(&bars);
    let spec = technical_chart("2330", "台積電", &bars, &indicators, &compute_signals(&indicators), 101)
        .unwrap();

    let hist = &indicators.get("macd_hist").unwrap()[101..];
    let pos = &spec.series("macd_hist_pos").unwrap().values;
    let neg = &spec.series("macd_hist_neg").unwrap().values;
    for i in 0..hist.len() {
        let part = if pos[i].is_nan() { neg[i] } else { pos[i] };
        assert_eq!(part, hist[i]);
        assert!(pos[i].is_nan() != neg[i].is_nan());
    }
}

#[test]
fn test_exactly_warmup_bars_is_unavailable() {
    let bars = bars(101);
    let indicators = compute_indicators(&bars);
    let result = technical_chart("2330", "台積電", &bars, &indicators, &compute_signals(&indicators), 101);
    assert!(result.is_err());
}

#[test]
fn test_json_sink_writes_nulls() {
    let dir = tempfile::tempdir().unwrap();
    let bars = bars(120);
    let indicators = compute_indicators(&bars);
    let spec = technical_chart("2330", "台積電", &bars, &indicators, &compute_signals(&indicators), 101)
        .unwrap();

    let sink = JsonChartSink;
    let path = sink.output_path(&dir.path().join("static"), "stock_analysis_2330");
    sink.render(&spec, &path).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["title"], "台積電 (2330)");
    assert_eq!(written["x_labels"].as_array().unwrap().len(), 19);

    // Undefined signal codes come out as null
    let signals_panel = &written["panels"][4]["series"];
    let deviation = signals_panel
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["key"] == "deviation")
        .unwrap();
    assert!(deviation["values"]
        .as_array()
        .unwrap()
        .iter()
        .any(|v| v.is_null()));
}

#[test]
fn test_revenue_chart_layout() {
    let reports: Vec<MonthlyRevenue> = (2021..=2025)
        .flat_map(|year| {
            (1..=12u32).map(move |month| MonthlyRevenue {
                date: NaiveDate::from_ymd_opt(year, month, 10).unwrap(),
                revenue: (year - 2000) as f64 * 1_000_000.0,
                revenue_year: year,
                revenue_month: month,
            })
        })
        .collect();

    let history = revenue_history(&reports, 2025);
    let spec = chipdash::services::chart::revenue_chart("2330", "台積電", &history).unwrap();

    assert_eq!(spec.title, "2330 台積電 營收變化圖");
    assert_eq!(spec.x_labels.len(), 12);
    assert!(spec.series("revenue_2021").is_none());
    assert_eq!(spec.series("revenue_2025").unwrap().values[0], 25_000.0);
    let yoy = &spec.series("yoy_2025").unwrap().values;
    assert!((yoy[0] - 4.166_666_666).abs() < 1e-6);
}

#[test]
fn test_sink_from_async_context() {
    let dir = tempfile::tempdir().unwrap();
    let bars = bars(110);
    let indicators = compute_indicators(&bars);
    let spec = technical_chart("1101", "台泥", &bars, &indicators, &compute_signals(&indicators), 101)
        .unwrap();
    let path = dir.path().join("chart.json");

    tokio_test::block_on(async {
        let sink = JsonChartSink;
        sink.render(&spec, &path)
    })
    .unwrap();
    assert!(path.exists());
}
