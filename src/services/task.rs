//! Task service
//!
//! Business logic for tasks: editing, status changes, comments and the
//! per-task checklist.

use chrono::NaiveDate;

use crate::audit::Action;
use crate::error::{BackofficeError, BackofficeResult};
use crate::models::{ChecklistItemId, CollectionKind, Comment, Task, TaskStatus};
use crate::services::confirm::{BulkOutcome, Confirm};
use crate::services::filter::ListFilter;
use crate::storage::Storage;

/// Input for creating a task
#[derive(Debug, Clone, Default)]
pub struct CreateTaskInput {
    pub title: String,
    pub date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub status: Option<TaskStatus>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
}

/// Changes to a task
///
/// For the optional URL fields `Some("")` clears the value.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    /// `Some(None)` clears the due date
    pub due_date: Option<Option<NaiveDate>>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Service for task management
pub struct TaskService<'a> {
    storage: &'a Storage,
}

impl<'a> TaskService<'a> {
    /// Create a new task service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new task
    pub fn create(&self, input: CreateTaskInput) -> BackofficeResult<Task> {
        let mut task = Task::new(input.title.trim(), input.date);
        task.due_date = input.due_date;
        if let Some(status) = input.status {
            task.status = status;
        }
        task.description = input.description.unwrap_or_default();
        task.notes = input.notes.unwrap_or_default();
        task.image_url = non_empty(input.image_url);
        task.link_url = non_empty(input.link_url);

        task.validate().map_err(BackofficeError::Validation)?;

        self.storage.tasks.upsert(task.clone())?;
        self.storage.tasks.save()?;

        self.storage.log_create(
            CollectionKind::Tasks,
            task.id.to_string(),
            task.title.clone(),
            &task,
        )?;

        Ok(task)
    }

    /// Find a task by id or id prefix
    pub fn find(&self, identifier: &str) -> BackofficeResult<Task> {
        self.storage.tasks.find(identifier)
    }

    /// List tasks through a filter
    pub fn list(&self, filter: &ListFilter) -> BackofficeResult<Vec<Task>> {
        Ok(filter.apply(self.storage.tasks.get_all()?))
    }

    /// Edit a task
    pub fn update(&self, identifier: &str, update: TaskUpdate) -> BackofficeResult<Task> {
        self.mutate(identifier, |task| {
            if let Some(title) = update.title {
                task.title = title.trim().to_string();
            }
            if let Some(date) = update.date {
                task.date = date;
            }
            if let Some(due_date) = update.due_date {
                task.due_date = due_date;
            }
            if let Some(description) = update.description {
                task.description = description;
            }
            if let Some(notes) = update.notes {
                task.notes = notes;
            }
            if update.image_url.is_some() {
                task.image_url = non_empty(update.image_url);
            }
            if update.link_url.is_some() {
                task.link_url = non_empty(update.link_url);
            }
            task.updated_at = chrono::Utc::now();
            Ok(())
        })
    }

    /// Set the status of a task
    pub fn set_status(&self, identifier: &str, status: TaskStatus) -> BackofficeResult<Task> {
        self.mutate(identifier, |task| {
            task.set_status(status);
            Ok(())
        })
    }

    /// Append a comment to a task
    pub fn add_comment(
        &self,
        identifier: &str,
        author: &str,
        text: &str,
        link_url: Option<String>,
    ) -> BackofficeResult<Task> {
        let text = text.trim();
        if text.is_empty() {
            return Err(BackofficeError::Validation("Comment cannot be empty".into()));
        }
        let author = match author.trim() {
            "" => "User",
            a => a,
        };

        self.mutate(identifier, |task| {
            task.add_comment(Comment::new(author, text).with_link(non_empty(link_url)));
            Ok(())
        })
    }

    /// Add a checklist entry to a task
    pub fn add_checklist_item(
        &self,
        identifier: &str,
        text: &str,
    ) -> BackofficeResult<(Task, ChecklistItemId)> {
        let text = text.trim();
        if text.is_empty() {
            return Err(BackofficeError::Validation(
                "Checklist item cannot be empty".into(),
            ));
        }

        let mut new_id = None;
        let task = self.mutate(identifier, |task| {
            new_id = Some(task.add_checklist_item(text));
            Ok(())
        })?;

        match new_id {
            Some(id) => Ok((task, id)),
            None => Err(BackofficeError::Storage(
                "Checklist item was not recorded".into(),
            )),
        }
    }

    /// Flip a checklist entry between done and not done
    pub fn toggle_checklist_item(&self, identifier: &str, item: &str) -> BackofficeResult<Task> {
        self.mutate(identifier, |task| {
            task.toggle_checklist_item(item)
                .map(|_| ())
                .ok_or_else(|| checklist_not_found(item))
        })
    }

    /// Remove a checklist entry
    pub fn remove_checklist_item(&self, identifier: &str, item: &str) -> BackofficeResult<Task> {
        self.mutate(identifier, |task| {
            task.remove_checklist_item(item)
                .map(|_| ())
                .ok_or_else(|| checklist_not_found(item))
        })
    }

    /// Delete a task after confirmation
    ///
    /// Returns `None` when the user declines.
    pub fn delete(&self, identifier: &str, confirm: &dyn Confirm) -> BackofficeResult<Option<Task>> {
        let task = self.storage.tasks.find(identifier)?;

        if !confirm.confirm(&format!("Delete task '{}'?", task.title)) {
            return Ok(None);
        }

        self.storage.tasks.delete(task.id)?;
        self.storage.tasks.save()?;

        self.storage.log_delete(
            CollectionKind::Tasks,
            task.id.to_string(),
            task.title.clone(),
            &task,
        )?;

        Ok(Some(task))
    }

    /// Delete every task after confirmation
    pub fn delete_all(&self, confirm: &dyn Confirm) -> BackofficeResult<BulkOutcome> {
        let tasks = self.storage.tasks.get_all()?;
        if tasks.is_empty() {
            return Ok(BulkOutcome::NothingToDelete);
        }

        if !confirm.confirm("Delete all tasks? This action cannot be undone.") {
            return Ok(BulkOutcome::Cancelled);
        }

        self.storage.tasks.clear()?;
        self.storage.tasks.save()?;

        self.storage.log_bulk(
            Action::Clear,
            CollectionKind::Tasks,
            tasks.iter().map(|r| r.id.to_string()).collect(),
        )?;

        Ok(BulkOutcome::Deleted(tasks.len()))
    }

    /// Load a task, apply `f`, validate, save and audit
    fn mutate<F>(&self, identifier: &str, f: F) -> BackofficeResult<Task>
    where
        F: FnOnce(&mut Task) -> BackofficeResult<()>,
    {
        let mut task = self.storage.tasks.find(identifier)?;
        let before = task.clone();

        f(&mut task)?;
        task.validate().map_err(BackofficeError::Validation)?;

        self.storage.tasks.upsert(task.clone())?;
        self.storage.tasks.save()?;

        self.storage.log_update(
            CollectionKind::Tasks,
            task.id.to_string(),
            task.title.clone(),
            &before,
            &task,
        )?;

        Ok(task)
    }
}

fn checklist_not_found(item: &str) -> BackofficeError {
    BackofficeError::NotFound {
        entity_type: "Checklist item",
        identifier: item.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BackofficePaths;
    use crate::services::confirm::{AssumeNo, AssumeYes};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackofficePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn input(title: &str) -> CreateTaskInput {
        CreateTaskInput {
            title: title.into(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_task_defaults() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TaskService::new(&storage);

        let task = service.create(input("Paint fence")).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert!(task.due_date.is_none());
        assert!(service.create(input("   ")).unwrap_err().is_validation());
    }

    #[test]
    fn test_update_and_clear_due_date() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TaskService::new(&storage);
        let task = service.create(input("Paint fence")).unwrap();
        let id = task.id.to_string();

        let due = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let task = service
            .update(
                &id,
                TaskUpdate {
                    due_date: Some(Some(due)),
                    notes: Some("two coats".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(task.due_date, Some(due));
        assert_eq!(task.notes, "two coats");

        let task = service
            .update(
                &id,
                TaskUpdate {
                    due_date: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_checklist_operations() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TaskService::new(&storage);
        let task = service.create(input("Paint fence")).unwrap();
        let id = task.id.to_string();

        let (_, item_id) = service.add_checklist_item(&id, "buy paint").unwrap();
        let task = service.toggle_checklist_item(&id, &item_id.to_string()).unwrap();
        assert_eq!(task.checklist_progress(), (1, 1));

        let err = service.toggle_checklist_item(&id, "chk-ffffffff").unwrap_err();
        assert!(err.is_not_found());

        let task = service.remove_checklist_item(&id, &item_id.to_string()).unwrap();
        assert!(task.checklist.is_empty());
    }

    #[test]
    fn test_comments_and_status() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TaskService::new(&storage);
        let task = service.create(input("Paint fence")).unwrap();
        let id = task.id.to_string();

        service
            .add_comment(&id, "Ana", "See photo", Some("https://img.example/1".into()))
            .unwrap();
        let task = service.set_status(&id, TaskStatus::Completed).unwrap();
        assert_eq!(task.comments.len(), 1);
        assert_eq!(task.comments[0].link_url.as_deref(), Some("https://img.example/1"));
        assert_eq!(task.status, TaskStatus::Completed);
    }

    #[test]
    fn test_delete_and_delete_all() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TaskService::new(&storage);
        let a = service.create(input("a")).unwrap();
        service.create(input("b")).unwrap();

        assert!(service.delete(&a.id.to_string(), &AssumeNo).unwrap().is_none());
        assert!(service.delete(&a.id.to_string(), &AssumeYes).unwrap().is_some());
        assert_eq!(service.delete_all(&AssumeYes).unwrap(), BulkOutcome::Deleted(1));
        assert_eq!(service.delete_all(&AssumeYes).unwrap(), BulkOutcome::NothingToDelete);
    }
}
