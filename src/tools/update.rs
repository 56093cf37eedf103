/// Tool for updating existing habit records
///
/// This module implements the habit_update MCP tool. Absent fields keep
/// their current value; `created_at` can never be changed.

use serde::{Deserialize, Serialize};

use crate::domain::{HabitId, HabitRecord};
use crate::storage::HabitStore;
use crate::tools::ToolError;

/// Parameters for updating a habit record
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHabitParams {
    pub habit_id: i64,
    pub title: Option<String>,
    pub time: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<bool>,
}

/// Response from updating a habit record
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHabitResponse {
    pub habit: HabitRecord,
    pub message: String,
}

/// Update a habit record using the provided storage
pub fn update_habit<S: HabitStore>(
    store: &S,
    params: UpdateHabitParams,
) -> Result<UpdateHabitResponse, ToolError> {
    let mut record = store.get_habit(HabitId(params.habit_id))?;

    record.apply_update(params.title, params.time, params.kind, params.status)?;
    store.update_habit(&record)?;

    let message = format!("Habit {} updated", record.id);
    Ok(UpdateHabitResponse {
        habit: record,
        message,
    })
}
