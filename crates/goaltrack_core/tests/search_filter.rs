use chrono::Utc;
use goaltrack_core::engine::toggle_completion;
use goaltrack_core::{filter_goals, matches_query, Goal, Task};

fn goal_with_task(name: &str, description: &str, task_name: &str, count: usize) -> Goal {
    let mut goal = Goal::new(name, description, count).unwrap();
    goal.tasks
        .push(Task::new(task_name, Some(10), None, 0).unwrap());
    goal
}

#[test]
fn blank_query_matches_everything() {
    let goal = goal_with_task("Read more", "", "Pick a book", 0);
    assert!(matches_query(&goal, ""));
    assert!(matches_query(&goal, "   "));
}

#[test]
fn query_matches_name_description_and_task_names() {
    let goal = goal_with_task("Learn Rust", "systems programming", "Read the book", 0);

    assert!(matches_query(&goal, "rust"));
    assert!(matches_query(&goal, "SYSTEMS"));
    assert!(matches_query(&goal, "the book"));
    assert!(!matches_query(&goal, "gardening"));
}

#[test]
fn filter_applies_hide_completed_then_query() {
    let open = goal_with_task("Learn Rust", "", "Read", 0);

    let mut done = goal_with_task("Learn Go", "", "Read", 1);
    done.tasks[0].set_completion(true, Utc::now());
    let done = toggle_completion(&done, Utc::now()).unwrap();

    let goals = vec![open.clone(), done.clone()];

    let all = filter_goals(&goals, "learn", false);
    assert_eq!(all.len(), 2);

    let visible = filter_goals(&goals, "learn", true);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, open.id);

    let none = filter_goals(&goals, "piano", false);
    assert!(none.is_empty());
}
