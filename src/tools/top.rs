/// Tool for the habit-title frequency ranking
///
/// This module implements the top_habits MCP tool: the user's most
/// frequently recorded habit titles, at most three.

use serde::Deserialize;

use crate::analytics::{AnalyticsEngine, AnalyticsError, RankedHabit};
use crate::domain::UserId;
use crate::storage::HabitQueries;
use crate::tools::ToolError;

/// Parameters for the frequency ranking
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopHabitsParams {
    pub user_id: Option<i64>,
}

/// Rank the user's habit titles by occurrence count
///
/// A user with no records gets an empty list back; unlike the completion
/// statistics this is an ordinary answer, not a not-found signal.
pub fn top_habits<S: HabitQueries>(
    store: &S,
    engine: &AnalyticsEngine,
    params: TopHabitsParams,
) -> Result<Vec<RankedHabit>, ToolError> {
    let user_id = params
        .user_id
        .ok_or(AnalyticsError::MissingParameter { name: "userId" })?;

    let ranked = engine.top_habits(store, UserId(user_id))?;
    Ok(ranked)
}
