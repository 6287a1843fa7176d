use goaltrack_core::db::open_db_in_memory;
use goaltrack_core::{
    filter_goals, import_goals_from_json, CardColor, CompletionBlocked, Goal, GoalService,
    ServiceError, SqliteGoalStore, Task,
};

#[test]
fn create_goal_appends_with_next_order() {
    let conn = open_db_in_memory().unwrap();
    let mut service = GoalService::open(SqliteGoalStore::new(&conn));

    service.create_goal("First", "").unwrap();
    service.create_goal("Second", "").unwrap();

    let goals = service.goals();
    assert_eq!(goals.len(), 2);
    assert_eq!(goals[0].order, 1);
    assert_eq!(goals[1].order, 2);
}

#[test]
fn create_goal_rejects_blank_name() {
    let conn = open_db_in_memory().unwrap();
    let mut service = GoalService::open(SqliteGoalStore::new(&conn));

    let err = service.create_goal("  ", "desc").unwrap_err();
    assert!(matches!(err, ServiceError::InvalidGoal(_)));
    assert!(service.goals().is_empty());
}

#[test]
fn completion_flow_guards_then_completes() {
    let conn = open_db_in_memory().unwrap();
    let mut service = GoalService::open(SqliteGoalStore::new(&conn));

    let goal_id = service.create_goal("Ship", "").unwrap();

    // No tasks yet: blocked.
    let err = service.toggle_completion(&goal_id).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Blocked(CompletionBlocked::NoTasks)
    ));

    let task_id = service.add_task(&goal_id, "Tag release", Some(5), None).unwrap();

    // Task still pending: blocked.
    let err = service.toggle_completion(&goal_id).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Blocked(CompletionBlocked::IncompleteTasks)
    ));

    assert!(service.toggle_task(&goal_id, &task_id).unwrap());
    assert!(service.toggle_completion(&goal_id).unwrap());

    let goal = &service.goals()[0];
    assert!(goal.completed);
    assert!(goal.completed_date.is_some());
}

#[test]
fn reopening_a_task_reconciles_goal_completion() {
    let conn = open_db_in_memory().unwrap();
    let mut service = GoalService::open(SqliteGoalStore::new(&conn));

    let goal_id = service.create_goal("Ship", "").unwrap();
    let task_id = service.add_task(&goal_id, "Only task", None, None).unwrap();
    service.toggle_task(&goal_id, &task_id).unwrap();
    service.toggle_completion(&goal_id).unwrap();

    // Flipping the task back also reopens the goal.
    assert!(!service.toggle_task(&goal_id, &task_id).unwrap());
    let goal = &service.goals()[0];
    assert!(!goal.completed);
    assert_eq!(goal.completed_date, None);
}

#[test]
fn adding_a_task_to_a_completed_goal_reopens_it() {
    let conn = open_db_in_memory().unwrap();
    let mut service = GoalService::open(SqliteGoalStore::new(&conn));

    let goal_id = service.create_goal("Ship", "").unwrap();
    let task_id = service.add_task(&goal_id, "Done", None, None).unwrap();
    service.toggle_task(&goal_id, &task_id).unwrap();
    service.toggle_completion(&goal_id).unwrap();

    service.add_task(&goal_id, "Follow-up", None, None).unwrap();
    assert!(!service.goals()[0].completed);
}

#[test]
fn move_goal_reorders_one_based() {
    let conn = open_db_in_memory().unwrap();
    let mut service = GoalService::open(SqliteGoalStore::new(&conn));

    service.create_goal("a", "").unwrap();
    service.create_goal("b", "").unwrap();
    service.create_goal("c", "").unwrap();

    service.move_goal(0, 2);

    let names: Vec<_> = service.goals().iter().map(|g| g.goal_name.as_str()).collect();
    assert_eq!(names, ["b", "c", "a"]);
    let orders: Vec<_> = service.goals().iter().map(|g| g.order).collect();
    assert_eq!(orders, [1, 2, 3]);

    // Out-of-range drag is a no-op.
    service.move_goal(0, 9);
    let names: Vec<_> = service.goals().iter().map(|g| g.goal_name.as_str()).collect();
    assert_eq!(names, ["b", "c", "a"]);
}

#[test]
fn move_task_reorders_zero_based() {
    let conn = open_db_in_memory().unwrap();
    let mut service = GoalService::open(SqliteGoalStore::new(&conn));

    let goal_id = service.create_goal("g", "").unwrap();
    service.add_task(&goal_id, "a", None, None).unwrap();
    service.add_task(&goal_id, "b", None, None).unwrap();
    service.add_task(&goal_id, "c", None, None).unwrap();

    service.move_task(&goal_id, 2, 0).unwrap();

    let goal = &service.goals()[0];
    let names: Vec<_> = goal.tasks.iter().map(|t| t.task_name.as_str()).collect();
    assert_eq!(names, ["c", "a", "b"]);
    let orders: Vec<_> = goal.tasks.iter().map(|t| t.order).collect();
    assert_eq!(orders, [0, 1, 2]);
}

#[test]
fn task_and_goal_lookups_signal_not_found() {
    let conn = open_db_in_memory().unwrap();
    let mut service = GoalService::open(SqliteGoalStore::new(&conn));

    let err = service.delete_goal("goal-missing").unwrap_err();
    assert!(matches!(err, ServiceError::GoalNotFound(_)));

    let goal_id = service.create_goal("g", "").unwrap();
    let err = service.toggle_task(&goal_id, "task-missing").unwrap_err();
    assert!(matches!(err, ServiceError::TaskNotFound { .. }));
}

#[test]
fn set_card_color_persists_the_tag() {
    let conn = open_db_in_memory().unwrap();
    let mut service = GoalService::open(SqliteGoalStore::new(&conn));

    let goal_id = service.create_goal("g", "").unwrap();
    service
        .set_card_color(&goal_id, Some(CardColor::Peach))
        .unwrap();

    assert_eq!(service.goals()[0].card_color, Some(CardColor::Peach));
}

#[test]
fn mutations_persist_across_service_instances() {
    let conn = open_db_in_memory().unwrap();

    let goal_id = {
        let mut service = GoalService::open(SqliteGoalStore::new(&conn));
        let goal_id = service.create_goal("Durable", "outlives the session").unwrap();
        let task_id = service.add_task(&goal_id, "step", Some(10), None).unwrap();
        service.toggle_task(&goal_id, &task_id).unwrap();
        service.toggle_completion(&goal_id).unwrap();
        goal_id
    };

    let service = GoalService::open(SqliteGoalStore::new(&conn));
    let goals = service.goals();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].id, goal_id);
    assert!(goals[0].completed);
    // The baseline is reconstructed on load, so reconciliation keeps working.
    assert_eq!(goals[0].completion_baseline, Some(1));
}

#[test]
fn export_then_import_feeds_replace_all() {
    let conn = open_db_in_memory().unwrap();
    let mut service = GoalService::open(SqliteGoalStore::new(&conn));
    service.create_goal("Exported", "travels as JSON").unwrap();

    let document = service.export();
    let imported = import_goals_from_json(&document).unwrap();
    assert_eq!(imported, service.goals());

    service.replace_all(Vec::new());
    assert!(service.goals().is_empty());

    service.replace_all(imported);
    assert_eq!(service.goals()[0].goal_name, "Exported");
}

#[test]
fn replace_all_reconciles_completion_over_incomplete_tasks() {
    let conn = open_db_in_memory().unwrap();
    let mut service = GoalService::open(SqliteGoalStore::new(&conn));

    let text = r#"{
        "goals": [
            {
                "id": "goal-1",
                "goalName": "contradictory",
                "completed": true,
                "completedDate": "2026-01-02T03:04:05Z",
                "tasks": [
                    { "taskName": "done", "completed": true },
                    { "taskName": "pending", "completed": false }
                ]
            }
        ]
    }"#;
    service.replace_all(import_goals_from_json(text).unwrap());

    let goal = &service.goals()[0];
    assert!(!goal.completed);
    assert_eq!(goal.completed_date, None);

    // Same guard for a caller-built collection that skipped the codec.
    let mut built = Goal::new("hand built", "", 0).unwrap();
    built.tasks.push(Task::new("open", None, None, 0).unwrap());
    built.completed = true;
    service.replace_all(vec![built]);

    assert!(!service.goals()[0].completed);
}

#[test]
fn hide_completed_preference_flows_through_service_and_filter() {
    let conn = open_db_in_memory().unwrap();
    let mut service = GoalService::open(SqliteGoalStore::new(&conn));

    assert!(!service.hide_completed());
    service.set_hide_completed(true);
    assert!(service.hide_completed());

    let goal_id = service.create_goal("Done", "").unwrap();
    let task_id = service.add_task(&goal_id, "t", None, None).unwrap();
    service.toggle_task(&goal_id, &task_id).unwrap();
    service.toggle_completion(&goal_id).unwrap();
    service.create_goal("Open", "").unwrap();

    let visible = filter_goals(service.goals(), "", service.hide_completed());
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].goal_name, "Open");
}
