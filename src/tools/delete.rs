/// Tool for deleting habit records
///
/// This module implements the habit_delete MCP tool.

use serde::{Deserialize, Serialize};

use crate::domain::HabitId;
use crate::storage::HabitStore;
use crate::tools::ToolError;

/// Parameters for deleting a habit record
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteHabitParams {
    pub habit_id: i64,
}

/// Response from deleting a habit record
#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    pub message: String,
}

/// Delete a habit record using the provided storage
pub fn delete_habit<S: HabitStore>(
    store: &S,
    params: DeleteHabitParams,
) -> Result<DeleteHabitResponse, ToolError> {
    let habit_id = HabitId(params.habit_id);
    store.delete_habit(habit_id)?;

    Ok(DeleteHabitResponse {
        message: format!("Habit {} deleted", habit_id),
    })
}
