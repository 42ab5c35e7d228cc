use chrono::{TimeZone, Utc};
use rusqlite::Connection;
use uuid::Uuid;
use weekgoal_core::db::migrations::latest_version;
use weekgoal_core::db::open_db_in_memory;
use weekgoal_core::{
    CompletionRepository, Goal, GoalCompletion, GoalRepository, GoalValidationError, RepoError,
    SqliteCompletionRepository, SqliteGoalRepository,
};

fn ms(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
        .single()
        .unwrap()
        .timestamp_millis()
}

#[test]
fn create_and_list_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGoalRepository::try_new(&conn).unwrap();

    let goal = Goal::new("Exercise", 3, ms(2024, 9, 9, 10, 0, 0));
    let id = repo.create_goal(&goal).unwrap();
    assert_eq!(id, goal.id);

    let listed = repo.list_goals_created_before(ms(2024, 9, 14, 23, 59, 59)).unwrap();
    assert_eq!(listed, vec![goal]);
}

#[test]
fn create_rejects_invalid_frequency_and_blank_title() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGoalRepository::try_new(&conn).unwrap();

    let err = repo.create_goal(&Goal::new("Exercise", 0, 0)).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(GoalValidationError::FrequencyOutOfRange(0))
    ));

    let err = repo.create_goal(&Goal::new("  ", 3, 0)).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(GoalValidationError::EmptyTitle)
    ));
}

#[test]
fn list_honors_cutoff_and_orders_by_creation_time() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGoalRepository::try_new(&conn).unwrap();

    let early = Goal::new("early", 1, ms(2024, 9, 2, 8, 0, 0));
    let mid = Goal::new("mid", 2, ms(2024, 9, 10, 8, 0, 0));
    let late = Goal::new("late", 3, ms(2024, 9, 20, 8, 0, 0));
    repo.create_goal(&late).unwrap();
    repo.create_goal(&early).unwrap();
    repo.create_goal(&mid).unwrap();

    let cutoff = ms(2024, 9, 14, 23, 59, 59);
    let listed = repo.list_goals_created_before(cutoff).unwrap();
    let titles: Vec<_> = listed.iter().map(|goal| goal.title.as_str()).collect();
    assert_eq!(titles, vec!["early", "mid"]);

    // A goal created exactly on the cutoff instant is included.
    let on_cutoff = Goal::new("boundary", 4, cutoff);
    repo.create_goal(&on_cutoff).unwrap();
    assert_eq!(repo.list_goals_created_before(cutoff).unwrap().len(), 3);
}

#[test]
fn completion_for_unknown_goal_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCompletionRepository::try_new(&conn).unwrap();

    let orphan = GoalCompletion::new(Uuid::new_v4(), ms(2024, 9, 10, 9, 0, 0));
    let err = repo.create_completion(&orphan).unwrap_err();
    assert!(matches!(err, RepoError::UnknownGoal(id) if id == orphan.goal_id));
}

#[test]
fn completion_counts_are_sparse_and_window_scoped() {
    let conn = open_db_in_memory().unwrap();
    let goals = SqliteGoalRepository::try_new(&conn).unwrap();
    let completions = SqliteCompletionRepository::try_new(&conn).unwrap();

    let exercise = Goal::new("Exercise", 3, ms(2024, 9, 9, 8, 0, 0));
    let read = Goal::new("Read", 5, ms(2024, 9, 9, 8, 0, 0));
    goals.create_goal(&exercise).unwrap();
    goals.create_goal(&read).unwrap();

    for day in [10, 11] {
        completions
            .create_completion(&GoalCompletion::new(exercise.id, ms(2024, 9, day, 7, 0, 0)))
            .unwrap();
    }
    // Outside the queried window.
    completions
        .create_completion(&GoalCompletion::new(exercise.id, ms(2024, 9, 20, 7, 0, 0)))
        .unwrap();

    let counts = completions
        .count_completions_by_goal(ms(2024, 9, 8, 0, 0, 0), ms(2024, 9, 14, 23, 59, 59) + 999)
        .unwrap();
    assert_eq!(counts.get(&exercise.id), Some(&2));
    assert_eq!(counts.get(&read.id), None);
}

#[test]
fn listed_completions_join_titles_in_ascending_time_order() {
    let conn = open_db_in_memory().unwrap();
    let goals = SqliteGoalRepository::try_new(&conn).unwrap();
    let completions = SqliteCompletionRepository::try_new(&conn).unwrap();

    let goal = Goal::new("Meditate", 2, ms(2024, 9, 9, 6, 0, 0));
    goals.create_goal(&goal).unwrap();

    let later = GoalCompletion::new(goal.id, ms(2024, 9, 11, 18, 0, 0));
    let earlier = GoalCompletion::new(goal.id, ms(2024, 9, 10, 6, 30, 0));
    completions.create_completion(&later).unwrap();
    completions.create_completion(&earlier).unwrap();

    let listed = completions
        .list_completions_in_range(ms(2024, 9, 8, 0, 0, 0), ms(2024, 9, 14, 23, 59, 59) + 999)
        .unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, earlier.id);
    assert_eq!(listed[0].title, "Meditate");
    assert_eq!(listed[1].id, later.id);
}

#[test]
fn repositories_reject_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteGoalRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repositories_reject_connection_without_required_tables() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteGoalRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("goals"))
    ));
    assert!(matches!(
        SqliteCompletionRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("goal_completions"))
    ));
}

#[test]
fn repositories_reject_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE goals (
            id TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteGoalRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "goals",
            column: "desired_weekly_frequency"
        })
    ));
}
