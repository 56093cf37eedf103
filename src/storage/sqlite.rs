/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing and
/// retrieving users and habit records. Timestamps are stored as RFC 3339
/// strings with millisecond precision, which keeps lexicographic comparison
/// aligned with chronological order for the range queries.

use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};

use crate::domain::{HabitId, HabitRecord, NewHabit, NewUser, User, UserId};
use crate::storage::{migrations, HabitQueries, HabitStore, StorageError};

/// SQLite-based storage implementation
///
/// Holds a connection to the SQLite database and implements the query and
/// CRUD operations defined by the storage traits.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations to
    /// ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Unavailable(format!("Failed to open database: {}", e)))?;

        // Foreign keys are off by default in SQLite; the user -> habits
        // cascade depends on them
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Unavailable(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite storage initialized at: {:?}", db_path);

        Ok(Self { conn })
    }

    /// Format a timestamp the way this store persists it
    fn format_timestamp(ts: DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Map a habits-table row to a HabitRecord
    fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<HabitRecord> {
        let created_at_str: String = row.get(6)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|_| {
                rusqlite::Error::InvalidColumnType(
                    6,
                    "Invalid datetime".to_string(),
                    rusqlite::types::Type::Text,
                )
            })?
            .with_timezone(&Utc);

        Ok(HabitRecord::from_existing(
            HabitId(row.get(0)?),
            row.get(1)?, // title
            row.get(2)?, // time
            row.get(3)?, // type
            row.get(4)?, // status
            UserId(row.get(5)?),
            created_at,
        ))
    }

    /// Map a users-table row to a User
    fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
        Ok(User::from_existing(
            UserId(row.get(0)?),
            row.get(1)?, // name
            row.get(2)?, // email
            row.get(3)?, // age
            row.get(4)?, // role
            row.get(5)?, // password
        ))
    }

    /// Check that a user row exists
    fn require_user(&self, user_id: UserId) -> Result<(), StorageError> {
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM users WHERE id = ?1",
                params![user_id.0],
                |_| Ok(()),
            );

        match exists {
            Ok(()) => Ok(()),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(StorageError::UserNotFound { user_id })
            }
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// Insert a habit record with an explicit creation timestamp
    ///
    /// Production inserts go through `create_habit`, which stamps the
    /// current instant; tests use this to place records on specific days.
    pub fn create_habit_at(
        &self,
        user_id: UserId,
        habit: &NewHabit,
        created_at: DateTime<Utc>,
    ) -> Result<HabitRecord, StorageError> {
        self.require_user(user_id)?;

        self.conn.execute(
            "INSERT INTO habits (title, time, type, status, user_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                habit.title,
                habit.time,
                habit.kind,
                habit.status,
                user_id.0,
                Self::format_timestamp(created_at),
            ],
        )?;

        let id = HabitId(self.conn.last_insert_rowid());
        tracing::debug!("Created habit record: '{}' ({})", habit.title, id);

        Ok(HabitRecord::from_existing(
            id,
            habit.title.clone(),
            habit.time.clone(),
            habit.kind.clone(),
            habit.status,
            user_id,
            created_at,
        ))
    }
}

impl HabitQueries for SqliteStorage {
    /// Records whose created_at falls within [start, end] inclusive
    fn find_by_user_and_range(
        &self,
        user_id: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HabitRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, time, type, status, user_id, created_at
             FROM habits
             WHERE user_id = ?1 AND created_at BETWEEN ?2 AND ?3
             ORDER BY id",
        )?;

        let record_iter = stmt.query_map(
            params![
                user_id.0,
                Self::format_timestamp(start),
                Self::format_timestamp(end),
            ],
            Self::habit_from_row,
        )?;

        let mut records = Vec::new();
        for record in record_iter {
            records.push(record?);
        }

        Ok(records)
    }

    /// All records for a user in insertion order
    fn find_all_by_user(&self, user_id: UserId) -> Result<Vec<HabitRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, time, type, status, user_id, created_at
             FROM habits WHERE user_id = ?1
             ORDER BY id",
        )?;

        let record_iter = stmt.query_map(params![user_id.0], Self::habit_from_row)?;

        let mut records = Vec::new();
        for record in record_iter {
            records.push(record?);
        }

        Ok(records)
    }
}

impl HabitStore for SqliteStorage {
    /// Insert a new habit record, stamping the current instant
    fn create_habit(&self, user_id: UserId, habit: &NewHabit) -> Result<HabitRecord, StorageError> {
        self.create_habit_at(user_id, habit, Utc::now())
    }

    /// Get a habit record by its id
    fn get_habit(&self, habit_id: HabitId) -> Result<HabitRecord, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, time, type, status, user_id, created_at
             FROM habits WHERE id = ?1",
        )?;

        let result = stmt.query_row(params![habit_id.0], Self::habit_from_row);

        match result {
            Ok(record) => Ok(record),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(StorageError::HabitNotFound { habit_id })
            }
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// Update the mutable fields of an existing habit record
    ///
    /// `created_at` is deliberately not written back.
    fn update_habit(&self, habit: &HabitRecord) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET
                title = ?2,
                time = ?3,
                type = ?4,
                status = ?5
             WHERE id = ?1",
            params![habit.id.0, habit.title, habit.time, habit.kind, habit.status],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound { habit_id: habit.id });
        }

        tracing::debug!("Updated habit record: '{}' ({})", habit.title, habit.id);
        Ok(())
    }

    /// Delete a habit record
    fn delete_habit(&self, habit_id: HabitId) -> Result<(), StorageError> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM habits WHERE id = ?1", params![habit_id.0])?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound { habit_id });
        }

        tracing::debug!("Deleted habit record: {}", habit_id);
        Ok(())
    }

    /// Insert a new user
    fn create_user(&self, user: &NewUser) -> Result<User, StorageError> {
        if self.find_user_by_email(&user.email)?.is_some() {
            return Err(StorageError::DuplicateEmail {
                email: user.email.clone(),
            });
        }

        self.conn.execute(
            "INSERT INTO users (name, email, age, role, password)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user.name, user.email, user.age, user.role, user.password],
        )?;

        let id = UserId(self.conn.last_insert_rowid());
        tracing::debug!("Created user: '{}' ({})", user.name, id);

        Ok(User::from_existing(
            id,
            user.name.clone(),
            user.email.clone(),
            user.age,
            user.role.clone(),
            user.password.clone(),
        ))
    }

    /// Get a user by id
    fn get_user(&self, user_id: UserId) -> Result<User, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, email, age, role, password FROM users WHERE id = ?1",
        )?;

        let result = stmt.query_row(params![user_id.0], Self::user_from_row);

        match result {
            Ok(user) => Ok(user),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(StorageError::UserNotFound { user_id })
            }
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// Look a user up by email
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, email, age, role, password FROM users WHERE email = ?1",
        )?;

        let result = stmt.query_row(params![email], Self::user_from_row);

        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// List all users
    fn list_users(&self) -> Result<Vec<User>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, email, age, role, password FROM users ORDER BY id")?;

        let user_iter = stmt.query_map([], Self::user_from_row)?;

        let mut users = Vec::new();
        for user in user_iter {
            users.push(user?);
        }

        Ok(users)
    }

    /// Update an existing user
    fn update_user(&self, user: &User) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE users SET
                name = ?2,
                email = ?3,
                age = ?4,
                role = ?5,
                password = ?6
             WHERE id = ?1",
            params![user.id.0, user.name, user.email, user.age, user.role, user.password],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::UserNotFound { user_id: user.id });
        }

        tracing::debug!("Updated user: '{}' ({})", user.name, user.id);
        Ok(())
    }

    /// Delete a user; their habit records go with them via the cascade
    fn delete_user(&self, user_id: UserId) -> Result<(), StorageError> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1", params![user_id.0])?;

        if rows_affected == 0 {
            return Err(StorageError::UserNotFound { user_id });
        }

        tracing::debug!("Deleted user: {}", user_id);
        Ok(())
    }
}
