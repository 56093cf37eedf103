/// Tool for the single-day completion statistic
///
/// This module implements the daily_completion MCP tool: how much of one
/// calendar day's habits a user completed.

use serde::Deserialize;

use crate::analytics::{AnalyticsEngine, AnalyticsError, CompletionStat};
use crate::domain::UserId;
use crate::storage::HabitQueries;
use crate::tools::ToolError;

/// Parameters for the single-day statistic
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCompletionParams {
    pub user_id: Option<i64>,
    /// Day selector in dd-mm-yyyy form
    pub date: Option<String>,
}

/// Compute the completion percentage for one calendar day
///
/// Selector validation happens before any query; a missing field never
/// reaches the engine.
pub fn daily_completion<S: HabitQueries>(
    store: &S,
    engine: &AnalyticsEngine,
    params: DailyCompletionParams,
) -> Result<CompletionStat, ToolError> {
    let user_id = params
        .user_id
        .ok_or(AnalyticsError::MissingParameter { name: "userId" })?;
    let date = params
        .date
        .ok_or(AnalyticsError::MissingParameter { name: "date" })?;

    let stat = engine.daily_completion(store, UserId(user_id), &date)?;
    Ok(stat)
}
