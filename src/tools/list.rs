/// Tool for listing a user's habit records
///
/// This module implements the habit_list MCP tool.

use serde::{Deserialize, Serialize};

use crate::domain::{HabitRecord, UserId};
use crate::storage::HabitStore;
use crate::tools::ToolError;

/// Parameters for listing habit records
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListHabitsParams {
    pub user_id: i64,
}

/// Response from listing habit records
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitRecord>,
}

/// List all habit records for a user, in insertion order
///
/// Fails with `UserNotFound` for an unknown user rather than returning an
/// empty list, so a typo'd id doesn't look like a fresh account.
pub fn list_habits<S: HabitStore>(
    store: &S,
    params: ListHabitsParams,
) -> Result<ListHabitsResponse, ToolError> {
    let user_id = UserId(params.user_id);

    // Validate the owner exists first
    store.get_user(user_id)?;

    let habits = store.find_all_by_user(user_id)?;
    Ok(ListHabitsResponse { habits })
}
