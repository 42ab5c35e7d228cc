//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the read/write contracts over the goal and completion stores.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce domain validation before persistence.
//! - Repository constructors reject connections whose schema does not match
//!   this binary.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::{migrations, DbError};
use crate::model::goal::{GoalId, GoalValidationError};
use rusqlite::Connection;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod completion_repo;
pub mod goal_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for goal and completion persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(GoalValidationError),
    Db(DbError),
    /// A completion referenced a goal that is not stored.
    UnknownGoal(GoalId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UnknownGoal(id) => write!(f, "goal not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it via db::open_db"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GoalValidationError> for RepoError {
    fn from(value: GoalValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Verifies that a connection carries the schema this binary expects.
///
/// Checked once at repository construction so query paths can assume a
/// well-formed store.
pub(crate) fn verify_schema(
    conn: &Connection,
    table: &'static str,
    columns: &'static [&'static str],
) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = migrations::latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(RepoError::MissingRequiredTable(table));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let present: HashSet<String> = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<_, _>>()?;

    for &column in columns {
        if !present.contains(column) {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}
