use crate::assets::AssetRecord;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

/// Look-ahead horizon used to flag assets as expiring soon.
pub const EXPIRY_WINDOW_DAYS: i64 = 30;

/// Status literal that marks an asset as active. Exact, case-sensitive match.
const ACTIVE_STATUS: &str = "Active";

/// Derived snapshot of one table at one instant. Recomputed on every view so
/// it always reflects the caller's `now`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub total_count: usize,
    pub expiring: Vec<AssetRecord>,
    pub active_count: usize,
    pub total_value: f64,
    pub average_age_days: Option<f64>,
}

/// Compute expiry metrics for `table` as seen from `now`.
///
/// Pure function of its inputs; `now` is injected rather than read from the
/// clock so results are reproducible under test.
pub fn analyze(table: &[AssetRecord], now: DateTime<Utc>) -> AnalysisResult {
    let horizon = now + Duration::days(EXPIRY_WINDOW_DAYS);

    let expiring: Vec<AssetRecord> = table
        .iter()
        .filter(|record| {
            record
                .expiry_date
                .map(date_start_utc)
                .is_some_and(|expiry| expiry > now && expiry <= horizon)
        })
        .cloned()
        .collect();

    // When the sheet carries no Status column at all, every asset counts as
    // active rather than none.
    let has_status = table.iter().any(|record| record.status.is_some());
    let active_count = if has_status {
        table
            .iter()
            .filter(|record| record.status.as_deref() == Some(ACTIVE_STATUS))
            .count()
    } else {
        table.len()
    };

    let total_value = table.iter().filter_map(|record| record.value).sum();

    let ages: Vec<i64> = table
        .iter()
        .filter_map(|record| record.acquisition_date)
        .map(|acquired| (now.date_naive() - acquired).num_days())
        .collect();
    let average_age_days = if ages.is_empty() {
        None
    } else {
        let mean = ages.iter().sum::<i64>() as f64 / ages.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    };

    AnalysisResult {
        total_count: table.len(),
        expiring,
        active_count,
        total_value,
        average_age_days,
    }
}

/// Date-only cells compare at their UTC midnight.
fn date_start_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
