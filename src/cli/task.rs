//! Task CLI commands

use clap::Subcommand;

use super::{parse_date, parse_date_or_today, print_bulk_outcome, today, ListArgs, StdinConfirm};
use crate::display::task::{format_task_details, format_task_list};
use crate::error::{BackofficeError, BackofficeResult};
use crate::models::TaskStatus;
use crate::services::{CreateTaskInput, TaskService, TaskUpdate};
use crate::storage::Storage;

/// Task subcommands
#[derive(Subcommand)]
pub enum TaskCommands {
    /// Create a task
    Add {
        /// Task title
        title: String,
        /// Task date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Status (in-progress, completed, unpaid, paid)
        #[arg(short, long)]
        status: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Image URL
        #[arg(long)]
        image: Option<String>,
        /// Related link
        #[arg(short, long)]
        link: Option<String>,
    },
    /// List tasks
    List {
        #[command(flatten)]
        filter: ListArgs,
    },
    /// Show a task with its checklist and comments
    Show {
        /// Task ID
        id: String,
    },
    /// Edit a task
    Edit {
        /// Task ID
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        /// New due date ("" or "none" removes it)
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// New image URL ("" removes it)
        #[arg(long)]
        image: Option<String>,
        /// New link ("" removes it)
        #[arg(short, long)]
        link: Option<String>,
    },
    /// Change a task's status
    Status {
        /// Task ID
        id: String,
        /// New status (in-progress, completed, unpaid, paid)
        status: String,
    },
    /// Add a comment to a task
    Comment {
        /// Task ID
        id: String,
        /// Comment text
        text: String,
        /// Comment author
        #[arg(short, long, default_value = "User")]
        author: String,
        /// Link attached to the comment
        #[arg(short, long)]
        link: Option<String>,
    },
    /// Manage a task's checklist
    #[command(subcommand)]
    Checklist(ChecklistCommands),
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete all tasks
    DeleteAll {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Checklist subcommands
#[derive(Subcommand)]
pub enum ChecklistCommands {
    /// Add a checklist entry
    Add {
        /// Task ID
        task: String,
        /// Entry text
        text: String,
    },
    /// Tick or untick a checklist entry
    Toggle {
        /// Task ID
        task: String,
        /// Checklist entry ID
        item: String,
    },
    /// Remove a checklist entry
    Remove {
        /// Task ID
        task: String,
        /// Checklist entry ID
        item: String,
    },
}

fn parse_task_status(value: &str) -> BackofficeResult<TaskStatus> {
    TaskStatus::parse(value).ok_or_else(|| {
        BackofficeError::Validation(format!(
            "Invalid status: '{}'. Valid statuses: in-progress, completed, unpaid, paid",
            value
        ))
    })
}

fn parse_due_update(value: &str) -> BackofficeResult<Option<chrono::NaiveDate>> {
    match value.trim().to_lowercase().as_str() {
        "" | "none" => Ok(None),
        _ => parse_date(value, "due date").map(Some),
    }
}

/// Handle a task command
pub fn handle_task_command(storage: &Storage, cmd: TaskCommands) -> BackofficeResult<()> {
    let service = TaskService::new(storage);

    match cmd {
        TaskCommands::Add {
            title,
            date,
            due,
            status,
            description,
            notes,
            image,
            link,
        } => {
            let input = CreateTaskInput {
                title,
                date: parse_date_or_today(date.as_deref(), "date")?,
                due_date: due.as_deref().map(|d| parse_date(d, "due date")).transpose()?,
                status: status.as_deref().map(parse_task_status).transpose()?,
                description,
                notes,
                image_url: image,
                link_url: link,
            };
            let task = service.create(input)?;

            println!("Created task: {}", task.title);
            println!("  Status: {}", task.status);
            println!("  ID: {}", task.id);
        }

        TaskCommands::List { filter } => {
            let tasks = service.list(&filter.to_filter())?;
            print!("{}", format_task_list(&tasks, today()));
        }

        TaskCommands::Show { id } => {
            let task = service.find(&id)?;
            print!("{}", format_task_details(&task, today()));
        }

        TaskCommands::Edit {
            id,
            title,
            date,
            due,
            description,
            notes,
            image,
            link,
        } => {
            let update = TaskUpdate {
                title,
                date: date.as_deref().map(|d| parse_date(d, "date")).transpose()?,
                due_date: due.as_deref().map(parse_due_update).transpose()?,
                description,
                notes,
                image_url: image,
                link_url: link,
            };
            if update.title.is_none()
                && update.date.is_none()
                && update.due_date.is_none()
                && update.description.is_none()
                && update.notes.is_none()
                && update.image_url.is_none()
                && update.link_url.is_none()
            {
                println!("No changes specified. Run 'backoffice task edit --help' for options.");
                return Ok(());
            }

            let task = service.update(&id, update)?;
            println!("Updated task: {}", task.title);
        }

        TaskCommands::Status { id, status } => {
            let task = service.set_status(&id, parse_task_status(&status)?)?;
            println!("Task '{}' is now {}", task.title, task.status);
        }

        TaskCommands::Comment {
            id,
            text,
            author,
            link,
        } => {
            let task = service.add_comment(&id, &author, &text, link)?;
            println!(
                "Added comment to '{}' ({} comments)",
                task.title,
                task.comments.len()
            );
        }

        TaskCommands::Checklist(cmd) => handle_checklist_command(&service, cmd)?,

        TaskCommands::Delete { id, yes } => {
            match service.delete(&id, &StdinConfirm::new(yes))? {
                Some(task) => println!("Deleted task: {}", task.title),
                None => println!("Cancelled."),
            }
        }

        TaskCommands::DeleteAll { yes } => {
            let outcome = service.delete_all(&StdinConfirm::new(yes))?;
            print_bulk_outcome(outcome, "tasks");
        }
    }

    Ok(())
}

fn handle_checklist_command(service: &TaskService, cmd: ChecklistCommands) -> BackofficeResult<()> {
    match cmd {
        ChecklistCommands::Add { task, text } => {
            let (task, item_id) = service.add_checklist_item(&task, &text)?;
            println!("Added checklist entry {} to '{}'", item_id, task.title);
        }
        ChecklistCommands::Toggle { task, item } => {
            let task = service.toggle_checklist_item(&task, &item)?;
            let (done, total) = task.checklist_progress();
            println!("Checklist for '{}': {}/{} done", task.title, done, total);
        }
        ChecklistCommands::Remove { task, item } => {
            let task = service.remove_checklist_item(&task, &item)?;
            println!("Removed checklist entry from '{}'", task.title);
        }
    }
    Ok(())
}
