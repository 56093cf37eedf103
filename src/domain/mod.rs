/// Domain module containing core entities and their validation rules
///
/// This module defines the persisted entities (HabitRecord, User) and the
/// identifier newtypes. The analytics engine consumes these types read-only;
/// mutation happens through the CRUD tools.

pub mod habit;
pub mod types;
pub mod user;

// Re-export public types for easy access
pub use habit::*;
pub use types::*;
pub use user::*;

use thiserror::Error;

/// Errors that can occur during domain validation
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit title: {0}")]
    InvalidTitle(String),

    #[error("Invalid user field: {0}")]
    InvalidUserField(String),
}
