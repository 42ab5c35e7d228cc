//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `weekgoal_core` wiring.
//! - Seed an in-memory store and print both weekly reports as JSON.

use chrono::Utc;
use std::error::Error;
use weekgoal_core::db::open_db_in_memory;
use weekgoal_core::{
    CreateGoalRequest, GoalService, ReportService, SqliteCompletionRepository,
    SqliteGoalRepository,
};

fn main() -> Result<(), Box<dyn Error>> {
    println!("weekgoal_core version={}", weekgoal_core::core_version());

    let conn = open_db_in_memory()?;
    let goal_service = GoalService::new(
        SqliteGoalRepository::try_new(&conn)?,
        SqliteCompletionRepository::try_new(&conn)?,
    );

    let now_ms = Utc::now().timestamp_millis();
    let exercise = goal_service.create_goal(
        &CreateGoalRequest {
            title: "Exercise".to_string(),
            desired_weekly_frequency: 3,
        },
        now_ms,
    )?;
    goal_service.create_goal(
        &CreateGoalRequest {
            title: "Read a chapter".to_string(),
            desired_weekly_frequency: 5,
        },
        now_ms,
    )?;
    goal_service.complete_goal(exercise, now_ms)?;

    let reports = ReportService::new(
        SqliteGoalRepository::try_new(&conn)?,
        SqliteCompletionRepository::try_new(&conn)?,
    );

    let pending = reports.build_pending_goals_report(now_ms)?;
    let summary = reports.build_week_summary_report(now_ms)?;

    println!("pending={}", serde_json::to_string_pretty(&pending)?);
    println!("summary={}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
