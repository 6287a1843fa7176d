//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `goaltrack_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use goaltrack_core::db::open_db_in_memory;
use goaltrack_core::{stats, GoalService, SqliteGoalStore};
use std::error::Error;

fn main() {
    if let Err(err) = run() {
        eprintln!("goaltrack_cli smoke failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    println!("goaltrack_core version={}", goaltrack_core::core_version());

    // In-memory end-to-end probe: one goal, one task, complete both.
    let conn = open_db_in_memory()?;
    let mut service = GoalService::open(SqliteGoalStore::new(&conn));

    let goal_id = service.create_goal("Smoke goal", "CLI probe")?;
    let task_id = service.add_task(&goal_id, "Smoke task", Some(5), None)?;
    service.toggle_task(&goal_id, &task_id)?;
    service.toggle_completion(&goal_id)?;

    let goals = service.goals();
    let progress = goals
        .first()
        .map(|goal| stats::progress(&goal.tasks))
        .unwrap_or_default();
    println!(
        "goaltrack_core smoke goals={} progress={progress}",
        goals.len()
    );

    Ok(())
}
