//! Integration tests for `week_planner`.

use chrono::NaiveDate;
use tempfile::TempDir;
use week_planner::app::Planner;
use week_planner::calendar::parse_date_key;
use week_planner::categories::CategoryUpdate;
use week_planner::planner::{DateHint, PlanRequest, PlannerError};
use week_planner::storage::{keys, SqliteStore};
use week_planner::tasks::{Priority, TaskDraft};
use week_planner::testing::MockChatClient;
use week_planner::traits::KeyValueStore;
use week_planner::view::{AppState, CategoryFilter, ViewMode};
use week_planner::VERSION;

fn d(s: &str) -> NaiveDate {
    parse_date_key(s).unwrap()
}

#[test]
fn test_version_exists() {
    assert!(!VERSION.is_empty());
}

#[test]
fn test_state_survives_reopening() {
    let dir = TempDir::new().unwrap();
    let id = {
        let store = SqliteStore::new(dir.path()).unwrap();
        let mut planner = Planner::new(&store).unwrap();
        planner.categories_mut().add("Errands", "#123456").unwrap();
        planner
            .tasks()
            .add(TaskDraft::new("Buy stamps", d("2025-02-11")).with_category("errands"))
            .unwrap()
            .id
    };

    let store = SqliteStore::new(dir.path()).unwrap();
    let planner = Planner::new(&store).unwrap();
    let task = planner.tasks().get(&id).unwrap().unwrap();
    assert_eq!(task.title, "Buy stamps");
    assert_eq!(planner.categories().color("errands"), "#123456");
    assert_eq!(planner.categories().all().len(), 5);
}

#[test]
fn test_corrupt_task_data_resets() {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::new(dir.path()).unwrap();
    store.set(keys::TASKS, "{not json").unwrap();

    let planner = Planner::new(&store).unwrap();
    assert!(planner.tasks().all().unwrap().is_empty());
    planner.tasks().add(TaskDraft::new("Fresh start", d("2025-02-11"))).unwrap();
    assert_eq!(planner.tasks().all().unwrap().len(), 1);
}

#[test]
fn test_week_flow_with_filter_and_sticker() {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::new(dir.path()).unwrap();
    let planner = Planner::new(&store).unwrap();
    let today = d("2025-02-12");

    let tasks = planner.tasks();
    let mut ids = Vec::new();
    for (title, day) in [("A", "2025-02-10"), ("B", "2025-02-11"), ("C", "2025-02-12"), ("D", "2025-02-13"), ("E", "2025-02-16")] {
        ids.push(tasks.add(TaskDraft::new(title, d(day))).unwrap().id);
    }
    tasks.add(TaskDraft::new("Outside", d("2025-02-17")).with_priority(Priority::High)).unwrap();

    for id in &ids[..3] {
        tasks.toggle_complete(id).unwrap();
    }
    let mut state = AppState::new(today);
    let screen = planner.week_view(&state, today).unwrap();
    assert_eq!(screen.view.progress.pct, 60);
    assert!(screen.new_sticker.is_none());

    tasks.toggle_complete(&ids[3]).unwrap();
    let screen = planner.week_view(&state, today).unwrap();
    let sticker = screen.new_sticker.unwrap();
    assert_eq!(sticker.pct, 80);
    assert_eq!(sticker.week_label, "Feb 10 - 16, 2025");

    state.set_filter(CategoryFilter::Category("health".to_string()));
    let screen = planner.week_view(&state, today).unwrap();
    assert_eq!(screen.view.progress.label, "No tasks this week");
    assert!(screen.view.days.iter().all(|day| day.tasks.is_empty()));

    state.next();
    state.set_filter(CategoryFilter::All);
    let screen = planner.week_view(&state, today).unwrap();
    assert_eq!(screen.view.days[0].tasks[0].title, "Outside");
    assert_eq!(screen.sticker_count, 1);
}

#[test]
fn test_month_navigation_carries_position() {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::new(dir.path()).unwrap();
    let planner = Planner::new(&store).unwrap();
    let today = d("2025-02-12");

    let mut state = AppState::new(today);
    state.set_view(ViewMode::Month);
    state.next();
    let screen = planner.month_view(&state, today).unwrap();
    assert_eq!(screen.view.label, "March 2025");

    state.set_view(ViewMode::Week);
    assert_eq!(state.week_start, d("2025-02-24"));
}

#[test]
fn test_deleted_category_leaves_tasks_orphaned() {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::new(dir.path()).unwrap();
    let mut planner = Planner::new(&store).unwrap();
    planner.tasks().add(TaskDraft::new("Yoga", d("2025-02-12")).with_category("health")).unwrap();

    planner
        .categories_mut()
        .update("health", CategoryUpdate { name: Some("Wellness".to_string()), color: None })
        .unwrap();
    assert!(planner.categories_mut().remove("health").unwrap());

    let screen = planner.week_view(&AppState::new(d("2025-02-12")), d("2025-02-12")).unwrap();
    let card = &screen.view.days[2].tasks[0];
    assert_eq!(card.category_name, "health");
    assert_eq!(card.color, "#94A3B8");
}

#[test]
fn test_plan_review_confirm_flow() {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::new(dir.path()).unwrap();
    let planner = Planner::new(&store).unwrap();
    let today = d("2025-02-12");

    let client = MockChatClient::new();
    client.push_reply(Ok(concat!(
        "```json\n",
        r#"[{"title":"Email Sam","date":"2025-02-13","category":"work","priority":"high"},"#,
        r#"{"title":"Dentist","date":"2025-02-14","category":"unknown","priority":"urgent"},"#,
        r#"{"title":"Gym","date":"tomorrow","category":"health"}]"#,
        "\n```"
    )
    .to_string()));

    let mut request = PlanRequest::new("Email Sam, dentist Friday, gym");
    request.date_hint = DateHint::ThisWeek;
    let mut review = planner.plan_with(&client, &request, today).unwrap();
    assert_eq!(review.len(), 3);
    assert_eq!(review.drafts()[1].category.as_deref(), Some("work"));
    assert_eq!(review.drafts()[1].priority, Some(Priority::Medium));
    assert_eq!(review.drafts()[2].date, today);

    let system = &client.requests()[0].system;
    assert!(system.contains("this week"));

    review.remove(2);
    let added = review.confirm(&planner.tasks()).unwrap();
    assert_eq!(added.len(), 2);
    assert_eq!(planner.tasks().by_date(d("2025-02-13")).unwrap()[0].title, "Email Sam");
}

#[test]
fn test_plan_failure_adds_nothing() {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::new(dir.path()).unwrap();
    let planner = Planner::new(&store).unwrap();

    let client = MockChatClient::new();
    client.push_reply(Ok("I could not find any tasks.".to_string()));
    let err = planner
        .plan_with(&client, &PlanRequest::new("hello"), d("2025-02-12"))
        .unwrap_err();
    assert_eq!(err.to_string(), PlannerError::NoActionableTasks.to_string());
    assert!(planner.tasks().all().unwrap().is_empty());
}
