//! Monthly revenue by year with year-over-year growth.

use std::collections::BTreeMap;

use crate::types::MonthlyRevenue;

/// Years shown before the current one.
pub const YEARS_BACK: i32 = 3;

/// Revenue (thousand TWD) and YoY (%) indexed by year, then month - 1.
///
/// Months without a report are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueHistory {
    pub current_year: i32,
    pub years: BTreeMap<i32, [f64; 12]>,
    pub yoy: BTreeMap<i32, [f64; 12]>,
}

impl RevenueHistory {
    pub fn first_year(&self) -> i32 {
        self.current_year - YEARS_BACK
    }
}

/// Group reports by the year and month the revenue belongs to.
///
/// YoY compares each month with the same month of the previous reported
/// year, using reports older than the display window when available.
pub fn revenue_history(reports: &[MonthlyRevenue], current_year: i32) -> RevenueHistory {
    // Later publications of the same month (restatements) win.
    let mut sorted: Vec<&MonthlyRevenue> = reports.iter().collect();
    sorted.sort_by_key(|r| r.date);
    let mut by_month: BTreeMap<(u32, i32), f64> = BTreeMap::new();
    for report in sorted {
        by_month.insert((report.revenue_month, report.revenue_year), report.revenue / 1000.0);
    }

    let first_year = current_year - YEARS_BACK;
    let mut history = RevenueHistory {
        current_year,
        years: BTreeMap::new(),
        yoy: BTreeMap::new(),
    };

    let mut previous: Option<(u32, f64)> = None;
    for (&(month, year), &revenue) in &by_month {
        let growth = match previous {
            Some((prev_month, prev)) if prev_month == month && prev != 0.0 => {
                (revenue - prev) / prev * 100.0
            }
            _ => f64::NAN,
        };
        previous = Some((month, revenue));

        if year < first_year {
            continue;
        }
        let slot = (month as usize).saturating_sub(1).min(11);
        history.years.entry(year).or_insert([f64::NAN; 12])[slot] = revenue;
        history.yoy.entry(year).or_insert([f64::NAN; 12])[slot] = growth;
    }

    history
}
