/// Habit record entity and related functionality
///
/// A habit record is one logged habit entry for a user: a title, the
/// scheduled wall-clock time, a free-form type label, and a completion flag.
/// The store assigns `id` and `created_at`; `created_at` is the sole
/// temporal anchor for every date-based query and is never updated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, HabitId, UserId};

/// A habit record owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitRecord {
    /// Store-assigned identifier
    pub id: HabitId,
    /// Display title (e.g., "Morning Run")
    pub title: String,
    /// Scheduled time label (e.g., "07:30")
    pub time: String,
    /// Habit type label (e.g., "exercise")
    #[serde(rename = "type")]
    pub kind: String,
    /// Completion flag - the sole completion signal, no partial states
    pub status: bool,
    /// Owning user
    pub user_id: UserId,
    /// Assigned by the store at insertion, immutable afterwards
    pub created_at: DateTime<Utc>,
}

impl HabitRecord {
    /// Rebuild a record from stored data (used when loading from the database)
    ///
    /// Assumes the data was validated on the way in; only the storage layer
    /// should call this.
    pub fn from_existing(
        id: HabitId,
        title: String,
        time: String,
        kind: String,
        status: bool,
        user_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            time,
            kind,
            status,
            user_id,
            created_at,
        }
    }

    /// Apply a partial update, keeping current values where none is given
    ///
    /// Only title, time, type and status are mutable; `created_at` stays
    /// fixed so analytics queries remain stable.
    pub fn apply_update(
        &mut self,
        title: Option<String>,
        time: Option<String>,
        kind: Option<String>,
        status: Option<bool>,
    ) -> Result<(), DomainError> {
        if let Some(ref new_title) = title {
            NewHabit::validate_title(new_title)?;
        }
        if let Some(ref new_time) = time {
            NewHabit::validate_label("time", new_time)?;
        }
        if let Some(ref new_kind) = kind {
            NewHabit::validate_label("type", new_kind)?;
        }

        if let Some(new_title) = title {
            self.title = new_title;
        }
        if let Some(new_time) = time {
            self.time = new_time;
        }
        if let Some(new_kind) = kind {
            self.kind = new_kind;
        }
        if let Some(new_status) = status {
            self.status = new_status;
        }

        Ok(())
    }
}

/// A habit record awaiting insertion - no id or timestamp yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewHabit {
    pub title: String,
    pub time: String,
    pub kind: String,
    pub status: bool,
}

impl NewHabit {
    /// Create a new habit with validation
    ///
    /// `status` defaults to false (not yet completed) when omitted.
    pub fn new(
        title: String,
        time: String,
        kind: String,
        status: Option<bool>,
    ) -> Result<Self, DomainError> {
        Self::validate_title(&title)?;
        Self::validate_label("time", &time)?;
        Self::validate_label("type", &kind)?;

        Ok(Self {
            title,
            time,
            kind,
            status: status.unwrap_or(false),
        })
    }

    /// Validate a habit title according to business rules
    pub(crate) fn validate_title(title: &str) -> Result<(), DomainError> {
        let trimmed = title.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidTitle(
                "Habit title cannot be empty".to_string(),
            ));
        }

        if trimmed.len() > 100 {
            return Err(DomainError::InvalidTitle(
                "Habit title cannot be longer than 100 characters".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate one of the short label fields (time, type)
    pub(crate) fn validate_label(field: &str, value: &str) -> Result<(), DomainError> {
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(DomainError::Validation {
                message: format!("Habit {} cannot be empty", field),
            });
        }

        if trimmed.len() > 50 {
            return Err(DomainError::Validation {
                message: format!("Habit {} cannot be longer than 50 characters", field),
            });
        }

        Ok(())
    }
}
