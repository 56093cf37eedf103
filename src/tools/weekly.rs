/// Tool for the monthly per-week completion statistic
///
/// This module implements the weekly_completion MCP tool: a month reported
/// as four weekly completion percentages.

use serde::Deserialize;

use crate::analytics::{AnalyticsEngine, AnalyticsError, WeeklyStat};
use crate::domain::UserId;
use crate::storage::HabitQueries;
use crate::tools::ToolError;

/// Parameters for the monthly statistic
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyCompletionParams {
    pub user_id: Option<i64>,
    /// Calendar month, 1-12
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// Compute per-week completion percentages for one calendar month
pub fn weekly_completion<S: HabitQueries>(
    store: &S,
    engine: &AnalyticsEngine,
    params: WeeklyCompletionParams,
) -> Result<WeeklyStat, ToolError> {
    let user_id = params
        .user_id
        .ok_or(AnalyticsError::MissingParameter { name: "userId" })?;
    let month = params
        .month
        .ok_or(AnalyticsError::MissingParameter { name: "month" })?;
    let year = params
        .year
        .ok_or(AnalyticsError::MissingParameter { name: "year" })?;

    let stat = engine.weekly_completion(store, UserId(user_id), month, year)?;
    Ok(stat)
}
