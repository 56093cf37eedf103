/// Analytics engine for deriving completion statistics from habit records
///
/// This is the core of the system: it resolves calendar selectors into UTC
/// intervals, aggregates completion percentages for a day, buckets a month
/// into weeks, and ranks the most frequently recorded habit titles. The
/// engine is read-only and stateless between calls - it fetches a fresh
/// record set through the injected query trait, aggregates it in memory,
/// and returns plain data.

pub mod completion;
pub mod range;
pub mod ranking;
pub mod weekly;

pub use completion::CompletionStat;
pub use range::DateRange;
pub use ranking::RankedHabit;
pub use weekly::WeeklyStat;

use thiserror::Error;

use crate::domain::UserId;
use crate::storage::{HabitQueries, StorageError};

/// Errors produced by the analytics engine
///
/// Store failures pass through untouched; everything else is detected
/// locally before a query is issued.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// A required selector field was absent; no computation was attempted
    #[error("Missing required parameter: {name}")]
    MissingParameter { name: &'static str },

    /// The date or month selector could not be parsed or is out of range
    #[error("Invalid date selector: {0}")]
    InvalidDateSelector(String),

    /// The query returned no records for the requested window
    ///
    /// A "not found" signal rather than an error - the aggregator must not
    /// be invoked on an empty set.
    #[error("No habit records found for the requested period")]
    NoRecordsFound,

    #[error(transparent)]
    Store(#[from] StorageError),
}

/// Analytics engine facade
///
/// Each method issues exactly one read query against the injected store and
/// performs the aggregation synchronously over the returned set.
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    /// Create a new analytics engine
    pub fn new() -> Self {
        Self
    }

    /// Completion percentage for one calendar day
    ///
    /// `date` is a `dd-mm-yyyy` selector treated as UTC wall-clock. Fails
    /// with `NoRecordsFound` when the user logged nothing that day; a 0%
    /// answer is never fabricated from an empty set.
    pub fn daily_completion<S: HabitQueries>(
        &self,
        store: &S,
        user_id: UserId,
        date: &str,
    ) -> Result<CompletionStat, AnalyticsError> {
        let range = range::day_range(date)?;
        let records = store.find_by_user_and_range(user_id, range.start, range.end)?;

        if records.is_empty() {
            return Err(AnalyticsError::NoRecordsFound);
        }

        Ok(completion::aggregate(date, &records))
    }

    /// Per-week completion percentages for one calendar month
    ///
    /// Fails with `NoRecordsFound` when the whole month is empty; sparse
    /// individual weeks inside a non-empty month report 0.00 instead.
    pub fn weekly_completion<S: HabitQueries>(
        &self,
        store: &S,
        user_id: UserId,
        month: u32,
        year: i32,
    ) -> Result<WeeklyStat, AnalyticsError> {
        let range = range::month_range(month, year)?;
        let records = store.find_by_user_and_range(user_id, range.start, range.end)?;

        if records.is_empty() {
            return Err(AnalyticsError::NoRecordsFound);
        }

        Ok(weekly::bucketize(month, year, &records))
    }

    /// Most frequently recorded habit titles for a user, at most three
    ///
    /// Unlike the two statistics above, an empty record set here yields an
    /// empty list - the policies are intentionally different.
    pub fn top_habits<S: HabitQueries>(
        &self,
        store: &S,
        user_id: UserId,
    ) -> Result<Vec<RankedHabit>, AnalyticsError> {
        let records = store.find_all_by_user(user_id)?;
        Ok(ranking::rank_titles(&records))
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}
