/// Tools exposed over the MCP surface
///
/// Each tool is a free function generic over the storage trait, with serde
/// param/response structs. The analytics tools consume only the narrow
/// query trait; the CRUD tools use the full store.

pub mod by_date;
pub mod create;
pub mod daily;
pub mod delete;
pub mod list;
pub mod top;
pub mod update;
pub mod users;
pub mod weekly;

// Re-export tool functions for easy access
pub use by_date::*;
pub use create::*;
pub use daily::*;
pub use delete::*;
pub use list::*;
pub use top::*;
pub use update::*;
pub use users::*;
pub use weekly::*;

use thiserror::Error;

use crate::analytics::AnalyticsError;
use crate::domain::DomainError;
use crate::storage::StorageError;

/// Errors surfaced by the tool layer
///
/// A thin union over the layers below; nothing is swallowed or rewrapped.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

impl ToolError {
    /// Whether this failure is the "no records" signal rather than an error
    ///
    /// The MCP layer reports it as an ordinary (non-error) result, matching
    /// the not-found semantics of the original API.
    pub fn is_no_records(&self) -> bool {
        matches!(self, ToolError::Analytics(AnalyticsError::NoRecordsFound))
    }
}
