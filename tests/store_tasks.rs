use chrono::NaiveDate;
use taskpilot::models::task::{NewTask, Priority, SortKey, TaskPatch, TaskStatus};
use taskpilot::store::TaskStore;

fn new_task(title: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: String::new(),
        due_date: None,
        priority: None,
        status: None,
        tags: vec![],
    }
}

#[test]
fn store_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");

    let created_id = {
        let store = TaskStore::load(&path).unwrap();
        let mut task = new_task("Buy milk");
        task.priority = Some(Priority::High);
        task.due_date = NaiveDate::from_ymd_opt(2026, 8, 10);
        task.tags = vec!["errand".to_string()];
        store.create(task).unwrap().id
    };

    let reloaded = TaskStore::load(&path).unwrap();
    assert_eq!(reloaded.len(), 1);

    let task = reloaded.get(created_id).unwrap();
    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.priority, Some(Priority::High));
    assert_eq!(task.tags, vec!["errand"]);
}

#[test]
fn mutations_persist() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");

    let store = TaskStore::load(&path).unwrap();
    let a = store.create(new_task("a")).unwrap();
    let b = store.create(new_task("b")).unwrap();

    store
        .update(
            a.id,
            TaskPatch {
                status: Some(TaskStatus::Done),
                ..Default::default()
            },
        )
        .unwrap();
    store.delete(b.id).unwrap();

    let reloaded = TaskStore::load(&path).unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.get(a.id).unwrap().status, TaskStatus::Done);
}

#[test]
fn missing_file_is_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = TaskStore::load(dir.path().join("nope.json")).unwrap();
    assert!(store.is_empty());
}

#[test]
fn due_date_sort_puts_undated_last() {
    let store = TaskStore::in_memory();

    let mut later = new_task("later");
    later.due_date = NaiveDate::from_ymd_opt(2026, 9, 1);
    store.create(later).unwrap();

    store.create(new_task("undated")).unwrap();

    let mut soon = new_task("soon");
    soon.due_date = NaiveDate::from_ymd_opt(2026, 8, 8);
    store.create(soon).unwrap();

    let titles: Vec<_> = store
        .list(SortKey::DueDate)
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["soon", "later", "undated"]);
}
