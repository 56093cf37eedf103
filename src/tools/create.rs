/// Tool for creating new habit records
///
/// This module implements the habit_create MCP tool.

use serde::{Deserialize, Serialize};

use crate::domain::{HabitRecord, NewHabit, UserId};
use crate::storage::HabitStore;
use crate::tools::ToolError;

/// Parameters for creating a new habit record
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitParams {
    pub user_id: i64,
    pub title: String,
    pub time: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: Option<bool>,
}

/// Response from creating a habit record
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitResponse {
    pub habit: HabitRecord,
    pub message: String,
}

/// Create a new habit record using the provided storage
pub fn create_habit<S: HabitStore>(
    store: &S,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, ToolError> {
    let habit = NewHabit::new(params.title, params.time, params.kind, params.status)?;
    let record = store.create_habit(UserId(params.user_id), &habit)?;

    let message = format!("Habit '{}' created with id {}", record.title, record.id);
    Ok(CreateHabitResponse {
        habit: record,
        message,
    })
}
