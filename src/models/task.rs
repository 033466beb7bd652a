//! Task model
//!
//! Tasks are independent of invoicing: their statuses never change as a
//! side effect of invoice transitions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::comment::Comment;
use super::ids::{ChecklistItemId, TaskId};
use super::status::TaskStatus;

/// One entry of a task's ordered checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: ChecklistItemId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl ChecklistItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: ChecklistItemId::new(),
            text: text.into(),
            completed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: TaskStatus,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::new(),
            title: title.into(),
            description: String::new(),
            notes: String::new(),
            status: TaskStatus::InProgress,
            date,
            due_date: None,
            image_url: None,
            link_url: None,
            comments: Vec::new(),
            checklist: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
        self.updated_at = Utc::now();
    }

    pub fn add_checklist_item(&mut self, text: impl Into<String>) -> ChecklistItemId {
        let item = ChecklistItem::new(text);
        let id = item.id;
        self.checklist.push(item);
        self.updated_at = Utc::now();
        id
    }

    /// Flip a checklist entry; returns the new state, or None if no entry matches
    pub fn toggle_checklist_item(&mut self, query: &str) -> Option<bool> {
        let item = self.checklist.iter_mut().find(|c| c.id.matches(query))?;
        item.completed = !item.completed;
        let completed = item.completed;
        self.updated_at = Utc::now();
        Some(completed)
    }

    pub fn remove_checklist_item(&mut self, query: &str) -> Option<ChecklistItem> {
        let pos = self.checklist.iter().position(|c| c.id.matches(query))?;
        self.updated_at = Utc::now();
        Some(self.checklist.remove(pos))
    }

    /// (completed, total) checklist entries
    pub fn checklist_progress(&self) -> (usize, usize) {
        let done = self.checklist.iter().filter(|c| c.completed).count();
        (done, self.checklist.len())
    }

    /// Due before `today` and still open
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => due < today && !self.status.is_closed(),
            None => false,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Task title cannot be empty".into());
        }
        Ok(())
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [{}]", self.date.format("%Y-%m-%d"), self.title, self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_checklist_toggle_and_remove() {
        let mut task = Task::new("Paint fence", ymd(2024, 5, 1));
        let first = task.add_checklist_item("buy paint");
        task.add_checklist_item("sand boards");

        assert_eq!(task.toggle_checklist_item(&first.to_string()), Some(true));
        assert_eq!(task.checklist_progress(), (1, 2));
        assert_eq!(task.toggle_checklist_item(&first.to_string()), Some(false));

        let removed = task.remove_checklist_item(&first.to_string()).unwrap();
        assert_eq!(removed.text, "buy paint");
        assert_eq!(task.checklist.len(), 1);
        assert_eq!(task.toggle_checklist_item("chk-zzzz"), None);
    }

    #[test]
    fn test_overdue() {
        let mut task = Task::new("Invoice client", ymd(2024, 5, 1));
        let today = ymd(2024, 5, 10);
        assert!(!task.is_overdue(today));

        task.due_date = Some(ymd(2024, 5, 9));
        assert!(task.is_overdue(today));

        task.set_status(TaskStatus::Completed);
        assert!(!task.is_overdue(today));
    }
}
