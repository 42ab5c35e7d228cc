//! Completion store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist completion events and answer the two windowed read queries the
//!   report builders need: sparse per-goal counts and a title-joined listing.
//!
//! # Invariants
//! - Completions are append-only and immutable.
//! - A completion must reference a stored goal.
//! - Windowed queries treat `[start_ms, end_ms]` as a closed interval.

use crate::model::goal::{CompletionId, GoalCompletion, GoalId};
use crate::repo::{verify_schema, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use std::collections::HashMap;
use uuid::Uuid;

const COMPLETION_COLUMNS: &[&str] = &["id", "goal_id", "created_at"];

/// One completion event joined to its goal title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedGoal {
    pub id: CompletionId,
    pub goal_id: GoalId,
    pub title: String,
    pub completed_at: i64,
}

/// Read/write interface over stored completion events.
pub trait CompletionRepository {
    fn create_completion(&self, completion: &GoalCompletion) -> RepoResult<CompletionId>;

    /// Counts completions per goal within the closed window.
    ///
    /// The mapping is sparse: goals without completions in the window are
    /// absent, not zero.
    fn count_completions_by_goal(
        &self,
        start_ms: i64,
        end_ms: i64,
    ) -> RepoResult<HashMap<GoalId, u32>>;

    /// Lists completions within the closed window, each joined to its goal
    /// title, ascending by completion time then id.
    fn list_completions_in_range(
        &self,
        start_ms: i64,
        end_ms: i64,
    ) -> RepoResult<Vec<CompletedGoal>>;
}

/// SQLite-backed completion repository.
pub struct SqliteCompletionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCompletionRepository<'conn> {
    /// Wraps a connection after verifying it carries the expected schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        verify_schema(conn, "goal_completions", COMPLETION_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl CompletionRepository for SqliteCompletionRepository<'_> {
    fn create_completion(&self, completion: &GoalCompletion) -> RepoResult<CompletionId> {
        let goal_exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM goals WHERE id = ?1);",
            [completion.goal_id.to_string()],
            |row| row.get(0),
        )?;
        if goal_exists == 0 {
            return Err(RepoError::UnknownGoal(completion.goal_id));
        }

        self.conn.execute(
            "INSERT INTO goal_completions (id, goal_id, created_at)
             VALUES (?1, ?2, ?3);",
            params![
                completion.id.to_string(),
                completion.goal_id.to_string(),
                completion.created_at,
            ],
        )?;

        Ok(completion.id)
    }

    fn count_completions_by_goal(
        &self,
        start_ms: i64,
        end_ms: i64,
    ) -> RepoResult<HashMap<GoalId, u32>> {
        let mut stmt = self.conn.prepare(
            "SELECT goal_id, COUNT(id) AS completion_count
             FROM goal_completions
             WHERE created_at >= ?1 AND created_at <= ?2
             GROUP BY goal_id;",
        )?;

        let mut rows = stmt.query(params![start_ms, end_ms])?;
        let mut counts = HashMap::new();

        while let Some(row) = rows.next()? {
            let goal_id = parse_uuid_column(row, "goal_id", "goal_completions.goal_id")?;
            let count_raw: i64 = row.get("completion_count")?;
            let count = u32::try_from(count_raw).map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid completion count `{count_raw}` for goal {goal_id}"
                ))
            })?;
            counts.insert(goal_id, count);
        }

        Ok(counts)
    }

    fn list_completions_in_range(
        &self,
        start_ms: i64,
        end_ms: i64,
    ) -> RepoResult<Vec<CompletedGoal>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                goal_completions.id AS id,
                goal_completions.goal_id AS goal_id,
                goals.title AS title,
                goal_completions.created_at AS created_at
             FROM goal_completions
             INNER JOIN goals ON goals.id = goal_completions.goal_id
             WHERE goal_completions.created_at >= ?1
               AND goal_completions.created_at <= ?2
             ORDER BY goal_completions.created_at ASC, goal_completions.id ASC;",
        )?;

        let mut rows = stmt.query(params![start_ms, end_ms])?;
        let mut completions = Vec::new();

        while let Some(row) = rows.next()? {
            completions.push(CompletedGoal {
                id: parse_uuid_column(row, "id", "goal_completions.id")?,
                goal_id: parse_uuid_column(row, "goal_id", "goal_completions.goal_id")?,
                title: row.get("title")?,
                completed_at: row.get("created_at")?,
            });
        }

        Ok(completions)
    }
}

fn parse_uuid_column(row: &Row<'_>, column: &str, qualified: &str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in {qualified}")))
}
