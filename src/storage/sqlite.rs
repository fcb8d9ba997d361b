/// SQLite implementation of the habit and completion stores
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habit data. It handles all SQL queries and data conversion.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, FixedOffset, NaiveDate};
use rusqlite::{params, Connection, ErrorCode, Row};

use crate::domain::{Completion, CompletionId, Frequency, Habit, HabitId};
use crate::storage::{migrations, CompletionStore, HabitStore, StorageError};

const HABIT_COLUMNS: &str =
    "id, name, description, frequency, color, category, created_at, updated_at";

const COMPLETION_COLUMNS: &str = "id, habit_id, completed_on, notes, created_at";

/// SQLite-based storage implementation
///
/// Holds a single connection; the mutex serializes statements so the store
/// can be shared across request handlers.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (or create) the database file at `db_path`
    ///
    /// This enables foreign keys and runs any necessary migrations to ensure
    /// the schema is up to date.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {}", db_path.display());
        Ok(storage)
    }

    /// Open a private in-memory database
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open in-memory database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        // Cascading deletes depend on this pragma
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Connection("connection mutex poisoned".to_string()))
    }

    fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
        let id_str: String = row.get(0)?;
        let id = HabitId::from_string(&id_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(0, "Invalid UUID".to_string(), rusqlite::types::Type::Text)
        })?;

        let frequency_str: String = row.get(3)?;
        let frequency: Frequency = frequency_str.parse().map_err(|_| {
            rusqlite::Error::InvalidColumnType(3, "Invalid frequency".to_string(), rusqlite::types::Type::Text)
        })?;

        Ok(Habit {
            id,
            name: row.get(1)?,
            description: row.get(2)?,
            frequency,
            color: row.get(4)?,
            category: row.get(5)?,
            created_at: parse_timestamp(row, 6)?,
            updated_at: parse_timestamp(row, 7)?,
        })
    }

    fn completion_from_row(row: &Row<'_>) -> rusqlite::Result<Completion> {
        let id_str: String = row.get(0)?;
        let id = CompletionId::from_string(&id_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(0, "Invalid UUID".to_string(), rusqlite::types::Type::Text)
        })?;

        let habit_id_str: String = row.get(1)?;
        let habit_id = HabitId::from_string(&habit_id_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(1, "Invalid UUID".to_string(), rusqlite::types::Type::Text)
        })?;

        let day_str: String = row.get(2)?;
        let completed_at = NaiveDate::parse_from_str(&day_str, "%Y-%m-%d").map_err(|_| {
            rusqlite::Error::InvalidColumnType(2, "Invalid date".to_string(), rusqlite::types::Type::Text)
        })?;

        Ok(Completion {
            id,
            habit_id,
            completed_at,
            notes: row.get(3)?,
            created_at: parse_timestamp(row, 4)?,
        })
    }
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<FixedOffset>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw).map_err(|_| {
        rusqlite::Error::InvalidColumnType(idx, "Invalid datetime".to_string(), rusqlite::types::Type::Text)
    })
}

/// Which constraint rejected an insert, if any
fn constraint_violation(err: &rusqlite::Error) -> Option<std::os::raw::c_int> {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) if failure.code == ErrorCode::ConstraintViolation => {
            Some(failure.extended_code)
        }
        _ => None,
    }
}

impl HabitStore for SqliteStorage {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        self.conn()?.execute(
            "INSERT INTO habits (
                id, name, description, frequency, color, category, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                habit.id.to_string(),
                habit.name,
                habit.description,
                habit.frequency.as_str(),
                habit.color,
                habit.category,
                habit.created_at.to_rfc3339(),
                habit.updated_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!("Created habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS))?;

        match stmt.query_row(params![habit_id.to_string()], Self::habit_from_row) {
            Ok(habit) => Ok(habit),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            }),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    fn list_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM habits ORDER BY created_at DESC, rowid DESC",
            HABIT_COLUMNS
        ))?;

        let habits = stmt
            .query_map([], Self::habit_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(habits)
    }

    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let rows_affected = self.conn()?.execute(
            "UPDATE habits SET
                name = ?2,
                description = ?3,
                frequency = ?4,
                color = ?5,
                category = ?6,
                updated_at = ?7
             WHERE id = ?1",
            params![
                habit.id.to_string(),
                habit.name,
                habit.description,
                habit.frequency.as_str(),
                habit.color,
                habit.category,
                habit.updated_at.to_rfc3339(),
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit.id.to_string(),
            });
        }

        tracing::debug!("Updated habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let rows_affected = self.conn()?.execute(
            "DELETE FROM habits WHERE id = ?1",
            params![habit_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!("Deleted habit: {}", habit_id);
        Ok(())
    }
}

impl CompletionStore for SqliteStorage {
    fn create_completion(&self, completion: &Completion) -> Result<(), StorageError> {
        let result = self.conn()?.execute(
            &format!(
                "INSERT INTO completions ({}) VALUES (?1, ?2, ?3, ?4, ?5)",
                COMPLETION_COLUMNS
            ),
            params![
                completion.id.to_string(),
                completion.habit_id.to_string(),
                completion.completed_at.format("%Y-%m-%d").to_string(),
                completion.notes,
                completion.created_at.to_rfc3339(),
            ],
        );

        match result {
            Ok(_) => {
                tracing::debug!(
                    "Created completion {} for habit {} on {}",
                    completion.id,
                    completion.habit_id,
                    completion.completed_at
                );
                Ok(())
            }
            Err(e) => match constraint_violation(&e) {
                Some(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE) => Err(StorageError::DuplicateCompletion {
                    habit_id: completion.habit_id.to_string(),
                    day: completion.completed_at,
                }),
                Some(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => Err(StorageError::HabitNotFound {
                    habit_id: completion.habit_id.to_string(),
                }),
                _ => Err(StorageError::Query(e)),
            },
        }
    }

    fn delete_completion(&self, habit_id: &HabitId, day: NaiveDate) -> Result<(), StorageError> {
        let rows_affected = self.conn()?.execute(
            "DELETE FROM completions WHERE habit_id = ?1 AND completed_on = ?2",
            params![habit_id.to_string(), day.format("%Y-%m-%d").to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::CompletionNotFound {
                habit_id: habit_id.to_string(),
                day,
            });
        }

        tracing::debug!("Deleted completion for habit {} on {}", habit_id, day);
        Ok(())
    }

    fn list_completions(&self, habit_id: &HabitId) -> Result<Vec<Completion>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM completions WHERE habit_id = ?1 ORDER BY completed_on DESC",
            COMPLETION_COLUMNS
        ))?;

        let completions = stmt
            .query_map(params![habit_id.to_string()], Self::completion_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(completions)
    }
}
