//! Task display formatting

use chrono::NaiveDate;
use tabled::Tabled;

use super::{render_table, truncate};
use crate::models::Task;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Checklist")]
    checklist: String,
}

/// Format tasks as a table; overdue due dates are flagged with `!`
pub fn format_task_list(tasks: &[Task], today: NaiveDate) -> String {
    let rows: Vec<TaskRow> = tasks
        .iter()
        .map(|task| {
            let (done, total) = task.checklist_progress();
            TaskRow {
                id: task.id.to_string(),
                date: task.date.to_string(),
                title: truncate(&task.title, 36),
                status: task.status.to_string(),
                due: match task.due_date {
                    Some(due) if task.is_overdue(today) => format!("{} !", due),
                    Some(due) => due.to_string(),
                    None => String::new(),
                },
                checklist: if total == 0 {
                    String::new()
                } else {
                    format!("{}/{}", done, total)
                },
            }
        })
        .collect();

    render_table(rows, "No tasks found.")
}

/// Format a single task's details with checklist and comments
pub fn format_task_details(task: &Task, today: NaiveDate) -> String {
    let mut output = String::new();

    output.push_str(&format!("Task: {}\n", task.title));
    output.push_str(&format!("  ID:          {}\n", task.id));
    output.push_str(&format!("  Date:        {}\n", task.date));
    output.push_str(&format!("  Status:      {}\n", task.status));
    if let Some(due) = task.due_date {
        output.push_str(&format!(
            "  Due:         {}{}\n",
            due,
            if task.is_overdue(today) { " (overdue)" } else { "" }
        ));
    }
    if !task.description.is_empty() {
        output.push_str(&format!("  Description: {}\n", task.description));
    }
    if !task.notes.is_empty() {
        output.push_str("  Notes:\n");
        for line in task.notes.lines() {
            output.push_str(&format!("    {}\n", line));
        }
    }
    if let Some(image) = &task.image_url {
        output.push_str(&format!("  Image:       {}\n", image));
    }
    if let Some(link) = &task.link_url {
        output.push_str(&format!("  Link:        {}\n", link));
    }

    if !task.checklist.is_empty() {
        let (done, total) = task.checklist_progress();
        output.push_str(&format!("\nChecklist ({}/{}):\n", done, total));
        for item in &task.checklist {
            output.push_str(&format!(
                "  [{}] {}  {}\n",
                if item.completed { "x" } else { " " },
                item.text,
                item.id
            ));
        }
    }

    if !task.comments.is_empty() {
        output.push_str("\nComments:\n");
        for comment in &task.comments {
            output.push_str(&format!(
                "  [{}] {}: {}\n",
                comment.timestamp.format("%Y-%m-%d %H:%M"),
                comment.author,
                comment.text
            ));
        }
    }

    output
}
