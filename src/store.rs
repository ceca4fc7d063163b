use dashmap::DashMap;
use std::cmp::Reverse;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::task::{NewTask, SortKey, Task, TaskPatch, TaskStatus};

/// Task storage: a concurrent in-memory map persisted to a JSON file.
///
/// The file is read once at startup and rewritten after every mutation;
/// tasks are stored as a JSON array ordered by creation time so the file
/// is stable across saves.
pub struct TaskStore {
    tasks: DashMap<Uuid, Task>,
    path: Option<PathBuf>,
}

impl TaskStore {
    /// Store without persistence (tests, ephemeral runs)
    pub fn in_memory() -> Self {
        Self {
            tasks: DashMap::new(),
            path: None,
        }
    }

    /// Load the store from a JSON file; a missing file is an empty store
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let tasks = DashMap::new();

        match fs::read(&path) {
            Ok(bytes) => {
                let loaded: Vec<Task> = serde_json::from_slice(&bytes)?;
                info!("Loaded {} tasks from {}", loaded.len(), path.display());
                for task in loaded {
                    tasks.insert(task.id, task);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No task file at {}, starting empty", path.display());
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Self {
            tasks,
            path: Some(path),
        })
    }

    pub fn create(&self, new: NewTask) -> Result<Task> {
        let task = Task::from_new(new);
        self.tasks.insert(task.id, task.clone());
        self.save()?;
        Ok(task)
    }

    pub fn get(&self, id: Uuid) -> Result<Task> {
        self.tasks
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(AppError::TaskNotFound(id))
    }

    pub fn update(&self, id: Uuid, patch: TaskPatch) -> Result<Task> {
        let task = {
            let mut entry = self.tasks.get_mut(&id).ok_or(AppError::TaskNotFound(id))?;
            entry.value_mut().apply(patch);
            entry.value().clone()
        };
        self.save()?;
        Ok(task)
    }

    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.tasks
            .remove(&id)
            .ok_or(AppError::TaskNotFound(id))?;
        self.save()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Sorted listing
    pub fn list(&self, sort: SortKey) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.tasks.iter().map(|e| e.value().clone()).collect();
        match sort {
            SortKey::Default => tasks.sort_by_key(|t| {
                (
                    t.status == TaskStatus::Done,
                    t.due_date.is_none(),
                    t.due_date,
                    Reverse(t.priority.map(|p| p.rank()).unwrap_or(0)),
                    t.created_at,
                )
            }),
            SortKey::DueDate => {
                tasks.sort_by_key(|t| (t.due_date.is_none(), t.due_date, t.created_at))
            }
            SortKey::Priority => tasks.sort_by_key(|t| {
                (
                    t.priority.is_none(),
                    Reverse(t.priority.map(|p| p.rank()).unwrap_or(0)),
                    t.created_at,
                )
            }),
            SortKey::Created => tasks.sort_by_key(|t| t.created_at),
        }
        tasks
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut tasks: Vec<Task> = self.tasks.iter().map(|e| e.value().clone()).collect();
        tasks.sort_by_key(|t| t.created_at);

        let json = serde_json::to_string_pretty(&tasks)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::Priority;
    use chrono::NaiveDate;

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
    fn test_crud_roundtrip() {
        let store = TaskStore::in_memory();
        let task = store.create(new_task("Buy milk")).unwrap();

        assert_eq!(store.get(task.id).unwrap().title, "Buy milk");

        let updated = store
            .update(
                task.id,
                TaskPatch {
                    status: Some(TaskStatus::Done),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Done);

        store.delete(task.id).unwrap();
        assert!(matches!(
            store.get(task.id),
            Err(AppError::TaskNotFound(_))
        ));
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let store = TaskStore::in_memory();
        let id = Uuid::new_v4();
        assert!(matches!(store.get(id), Err(AppError::TaskNotFound(_))));
        assert!(store.update(id, TaskPatch::default()).is_err());
        assert!(store.delete(id).is_err());
    }

    #[test]
    fn test_default_sort_puts_done_last() {
        let store = TaskStore::in_memory();

        let mut urgent = new_task("urgent");
        urgent.priority = Some(Priority::High);
        urgent.due_date = NaiveDate::from_ymd_opt(2026, 8, 8);
        store.create(urgent).unwrap();

        let done = store.create(new_task("done")).unwrap();
        store
            .update(
                done.id,
                TaskPatch {
                    status: Some(TaskStatus::Done),
                    ..Default::default()
                },
            )
            .unwrap();

        store.create(new_task("someday")).unwrap();

        let listed = store.list(SortKey::Default);
        assert_eq!(listed[0].title, "urgent");
        assert_eq!(listed.last().unwrap().title, "done");
    }

    #[test]
    fn test_priority_sort() {
        let store = TaskStore::in_memory();
        for (title, priority) in [
            ("low", Some(Priority::Low)),
            ("none", None),
            ("high", Some(Priority::High)),
        ] {
            let mut task = new_task(title);
            task.priority = priority;
            store.create(task).unwrap();
        }

        let titles: Vec<_> = store
            .list(SortKey::Priority)
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["high", "low", "none"]);
    }
}
