/// Weekly bucketing of a month's habit records
///
/// A "week" here is a day-of-month range, not an ISO week: days 1-7, 8-14,
/// 15-21, 22-28 and 29-31. Five buckets are computed but only the first
/// four are reported - the month is presented as exactly four weeks and any
/// day-29-31 activity is dropped. That truncation is an existing product
/// decision carried forward as-is (see DESIGN.md).

use chrono::Datelike;
use serde::Serialize;

use crate::domain::HabitRecord;

/// How many buckets a month is partitioned into
const BUCKETS: usize = 5;

/// How many of those buckets are reported
const REPORTED_WEEKS: usize = 4;

/// Per-week completion percentages for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStat {
    /// The month selector echoed back as "MM-YYYY"
    pub month: String,
    /// Chronological percentages for weeks 1-4, each rounded to 2 decimals
    ///
    /// Floats rather than strings - the asymmetry with the single-day
    /// statistic matches the existing API and is intentional.
    pub weekly_completion_percentages: [f64; REPORTED_WEEKS],
}

/// Partition a month's records into weekly buckets and aggregate each
///
/// An empty bucket yields 0.00 instead of failing: unlike the single-day
/// statistic, sparse weeks inside an otherwise active month are expected.
pub(crate) fn bucketize(month: u32, year: i32, records: &[HabitRecord]) -> WeeklyStat {
    let mut buckets: [Vec<&HabitRecord>; BUCKETS] = Default::default();

    for record in records {
        // day_of_month is 1-based, so days 1-7 land in bucket 0
        let bucket = ((record.created_at.day() - 1) / 7) as usize;
        buckets[bucket].push(record);
    }

    let mut percentages = [0.0; REPORTED_WEEKS];
    for (week, bucket) in buckets.iter().take(REPORTED_WEEKS).enumerate() {
        percentages[week] = bucket_percentage(bucket);
    }

    WeeklyStat {
        month: format!("{:02}-{}", month, year),
        weekly_completion_percentages: percentages,
    }
}

/// Completion percentage of one bucket, rounded to 2 decimals
fn bucket_percentage(bucket: &[&HabitRecord]) -> f64 {
    if bucket.is_empty() {
        return 0.0;
    }

    let completed = bucket.iter().filter(|record| record.status).count();
    let percentage = (completed as f64 / bucket.len() as f64) * 100.0;
    (percentage * 100.0).round() / 100.0
}
