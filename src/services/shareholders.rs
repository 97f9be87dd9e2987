//! Flat-file store for the weekly major-shareholder table.
//!
//! Layout: `Code,Name,<date>,<date>,...`, one row per stock. Every update
//! replaces the file wholesale.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{AppError, Result};
use crate::sources::table::coerce_number;
use crate::types::ShareholderRecord;

const CODE_HEADER: &str = "Code";
const NAME_HEADER: &str = "Name";

/// Write `records` to `path`, replacing any existing file.
///
/// The date header comes from the first record; all rows are expected to
/// share it.
pub fn write_csv(path: &Path, records: &[ShareholderRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    let labels: Vec<&str> = records
        .first()
        .map(|r| r.holdings.iter().map(|(label, _)| label.as_str()).collect())
        .unwrap_or_default();

    let mut header = vec![CODE_HEADER, NAME_HEADER];
    header.extend(labels.iter().copied());
    writer.write_record(&header)?;

    for record in records {
        let mut row = vec![record.code.clone(), record.name.clone()];
        row.extend(
            record
                .holdings
                .iter()
                .map(|(_, value)| value.map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&row)?;
    }

    writer.flush()?;
    info!("Saved {} shareholder rows to {}", records.len(), path.display());
    Ok(())
}

/// Read the table back. Unparseable cells load as `None`.
pub fn read_csv(path: &Path) -> Result<Vec<ShareholderRecord>> {
    if !path.exists() {
        return Err(AppError::NotFound(format!(
            "{} is missing; run a shareholder update first",
            path.display()
        )));
    }

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();
    if headers.get(0).map(strip_bom) != Some(CODE_HEADER) || headers.get(1) != Some(NAME_HEADER) {
        return Err(AppError::DataUnavailable(format!(
            "{} does not start with Code,Name",
            path.display()
        )));
    }
    let labels: Vec<String> = headers.iter().skip(2).map(str::to_string).collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let code = row.get(0).unwrap_or_default().trim();
        if code.is_empty() {
            continue;
        }
        records.push(ShareholderRecord {
            code: code.to_string(),
            name: row.get(1).unwrap_or_default().trim().to_string(),
            holdings: labels
                .iter()
                .enumerate()
                .map(|(i, label)| (label.clone(), row.get(i + 2).and_then(coerce_number)))
                .collect(),
        });
    }

    Ok(records)
}

fn strip_bom(s: &str) -> &str {
    s.trim_start_matches('\u{feff}')
}

/// Dated values of one stock, ascending. Non-date columns and empty cells
/// are skipped.
pub fn dated_points(record: &ShareholderRecord) -> Vec<(NaiveDate, f64)> {
    let mut points: Vec<(NaiveDate, f64)> = record
        .holdings
        .iter()
        .filter_map(|(label, value)| {
            let date = NaiveDate::parse_from_str(label.trim(), "%Y-%m-%d").ok()?;
            let value = value.filter(|v| v.is_finite())?;
            Some((date, value))
        })
        .collect();
    points.sort_by_key(|(date, _)| *date);
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dated_points_sorted_and_filtered() {
        let record = ShareholderRecord {
            code: "2330".into(),
            name: "台積電".into(),
            holdings: vec![
                ("2024-03-08".into(), Some(80.2)),
                ("2024-03-01".into(), Some(80.0)),
                ("2024-02-23".into(), None),
                ("週別".into(), Some(1.0)),
            ],
        };
        let points = dated_points(&record);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].0, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(points[1].1, 80.2);
    }

    #[test]
    fn test_csv_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holders.csv");
        let records = vec![ShareholderRecord {
            code: "2330".into(),
            name: "台積電".into(),
            holdings: vec![("2024-03-08".into(), Some(80.2)), ("2024-03-01".into(), None)],
        }];

        write_csv(&path, &records).unwrap();
        assert_eq!(read_csv(&path).unwrap(), records);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_csv(&dir.path().join("none.csv")),
            Err(AppError::NotFound(_))
        ));
    }
}
