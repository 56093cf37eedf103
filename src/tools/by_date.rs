/// Tool for listing a user's habit records on one calendar day
///
/// Same day-selector handling as the daily statistic, but the records
/// themselves come back instead of an aggregate.

use serde::{Deserialize, Serialize};

use crate::analytics::range::day_range;
use crate::analytics::AnalyticsError;
use crate::domain::{HabitRecord, UserId};
use crate::storage::HabitQueries;
use crate::tools::ToolError;

/// Parameters for the single-day listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitsByDateParams {
    pub user_id: Option<i64>,
    /// Day selector in dd-mm-yyyy form
    pub date: Option<String>,
}

/// Response from the single-day listing
#[derive(Debug, Serialize)]
pub struct HabitsByDateResponse {
    pub habits: Vec<HabitRecord>,
}

/// List the habit records a user logged on one calendar day
///
/// An empty day is reported through the no-records signal, matching the
/// statistics tools; an unknown user simply has no records either.
pub fn habits_by_date<S: HabitQueries>(
    store: &S,
    params: HabitsByDateParams,
) -> Result<HabitsByDateResponse, ToolError> {
    let user_id = params
        .user_id
        .ok_or(AnalyticsError::MissingParameter { name: "userId" })?;
    let date = params
        .date
        .ok_or(AnalyticsError::MissingParameter { name: "date" })?;

    let range = day_range(&date)?;
    let habits = store.find_by_user_and_range(UserId(user_id), range.start, range.end)?;

    if habits.is_empty() {
        return Err(AnalyticsError::NoRecordsFound.into());
    }

    Ok(HabitsByDateResponse { habits })
}
