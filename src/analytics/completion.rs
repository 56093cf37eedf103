/// Completion aggregation for a single day's habit records
///
/// Field names serialize in camelCase to match the JSON shape the HTTP
/// collaborator exposes.

use serde::Serialize;

use crate::domain::HabitRecord;

/// Completion statistic for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStat {
    /// The original `dd-mm-yyyy` selector, echoed back
    pub date: String,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Two-decimal, percent-suffixed string such as "75.00%"
    pub completion_percentage: String,
}

/// Aggregate a non-empty record set into a completion statistic
///
/// Precondition: `records` is non-empty. The engine guards this with its
/// no-records check before calling; an empty set must surface as "no
/// records found", never as a zero-denominator percentage.
pub(crate) fn aggregate(date: &str, records: &[HabitRecord]) -> CompletionStat {
    debug_assert!(!records.is_empty(), "caller must reject empty record sets");

    let total_tasks = records.len();
    let completed_tasks = records.iter().filter(|record| record.status).count();
    let percentage = (completed_tasks as f64 / total_tasks as f64) * 100.0;

    CompletionStat {
        date: date.to_string(),
        total_tasks,
        completed_tasks,
        completion_percentage: format!("{:.2}%", percentage),
    }
}
