//! Goal store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist goal definitions and answer the week-cutoff listing query.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Goal::validate()` before SQL mutations.
//! - Goals are append-only; there is no update or delete path.

use crate::model::goal::{Goal, GoalId};
use crate::repo::{verify_schema, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const GOAL_SELECT_SQL: &str = "SELECT
    id,
    title,
    desired_weekly_frequency,
    created_at
FROM goals";

const GOAL_COLUMNS: &[&str] = &["id", "title", "desired_weekly_frequency", "created_at"];

/// Read/write interface over stored goal definitions.
pub trait GoalRepository {
    fn create_goal(&self, goal: &Goal) -> RepoResult<GoalId>;

    /// Lists every goal with `created_at <= cutoff_ms`.
    ///
    /// Ordered by creation time, then id, for deterministic output.
    fn list_goals_created_before(&self, cutoff_ms: i64) -> RepoResult<Vec<Goal>>;
}

/// SQLite-backed goal repository.
pub struct SqliteGoalRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGoalRepository<'conn> {
    /// Wraps a connection after verifying it carries the expected schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        verify_schema(conn, "goals", GOAL_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl GoalRepository for SqliteGoalRepository<'_> {
    fn create_goal(&self, goal: &Goal) -> RepoResult<GoalId> {
        goal.validate()?;

        self.conn.execute(
            "INSERT INTO goals (id, title, desired_weekly_frequency, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                goal.id.to_string(),
                goal.title.as_str(),
                i64::from(goal.desired_weekly_frequency),
                goal.created_at,
            ],
        )?;

        Ok(goal.id)
    }

    fn list_goals_created_before(&self, cutoff_ms: i64) -> RepoResult<Vec<Goal>> {
        let mut stmt = self.conn.prepare(&format!(
            "{GOAL_SELECT_SQL}
             WHERE created_at <= ?1
             ORDER BY created_at ASC, id ASC;"
        ))?;

        let mut rows = stmt.query(params![cutoff_ms])?;
        let mut goals = Vec::new();

        while let Some(row) = rows.next()? {
            goals.push(parse_goal_row(row)?);
        }

        Ok(goals)
    }
}

fn parse_goal_row(row: &Row<'_>) -> RepoResult<Goal> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in goals.id"))
    })?;

    let frequency_raw: i64 = row.get("desired_weekly_frequency")?;
    let desired_weekly_frequency = u8::try_from(frequency_raw).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid frequency value `{frequency_raw}` in goals.desired_weekly_frequency"
        ))
    })?;

    let goal = Goal {
        id,
        title: row.get("title")?,
        desired_weekly_frequency,
        created_at: row.get("created_at")?,
    };
    goal.validate()?;
    Ok(goal)
}
