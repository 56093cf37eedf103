/// Storage layer for persisting users and habit records
///
/// This module handles all database operations using SQLite. The analytics
/// engine only depends on the narrow `HabitQueries` trait; the full
/// `HabitStore` trait adds the CRUD surface used by the tools.

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{HabitId, HabitRecord, NewHabit, NewUser, User, UserId};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// The persistence layer could not be reached; fatal for the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: HabitId },

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: UserId },

    #[error("A user with email '{email}' already exists")]
    DuplicateEmail { email: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Read-only query contract consumed by the analytics engine
///
/// Both methods return records for a single user; `find_all_by_user` keeps
/// insertion order, which the frequency ranking's tie-break relies on.
pub trait HabitQueries {
    /// Records whose `created_at` falls within `[start, end]` inclusive
    fn find_by_user_and_range(
        &self,
        user_id: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HabitRecord>, StorageError>;

    /// All records for a user, unfiltered by time, in insertion order
    fn find_all_by_user(&self, user_id: UserId) -> Result<Vec<HabitRecord>, StorageError>;
}

/// Full storage interface used by the CRUD tools
///
/// Keeping this as a trait allows swapping SQLite for another database
/// without touching the tools or the analytics engine.
pub trait HabitStore: HabitQueries {
    /// Insert a new habit record for a user; the store assigns id and
    /// `created_at`. Fails with `UserNotFound` for an unknown owner.
    fn create_habit(&self, user_id: UserId, habit: &NewHabit) -> Result<HabitRecord, StorageError>;

    /// Get a habit record by id
    fn get_habit(&self, habit_id: HabitId) -> Result<HabitRecord, StorageError>;

    /// Persist updated fields of an existing record (`created_at` is never
    /// written back)
    fn update_habit(&self, habit: &HabitRecord) -> Result<(), StorageError>;

    /// Delete a habit record
    fn delete_habit(&self, habit_id: HabitId) -> Result<(), StorageError>;

    /// Insert a new user; the store assigns the id
    fn create_user(&self, user: &NewUser) -> Result<User, StorageError>;

    /// Get a user by id
    fn get_user(&self, user_id: UserId) -> Result<User, StorageError>;

    /// Look a user up by email (used for the uniqueness check)
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;

    /// List all users
    fn list_users(&self) -> Result<Vec<User>, StorageError>;

    /// Persist updated fields of an existing user
    fn update_user(&self, user: &User) -> Result<(), StorageError>;

    /// Delete a user and, by cascade, all of their habit records
    fn delete_user(&self, user_id: UserId) -> Result<(), StorageError>;
}
