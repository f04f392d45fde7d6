//! Task management commands.

use clap::Subcommand;
use studytrack_core::{NewTask, Priority, TaskPatch};

use super::{open_repository, parse_subject};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(long, default_value = "")]
        description: String,
        /// Due date label (e.g. "Today", "Sep 23")
        #[arg(long, default_value = "Today")]
        due: String,
        /// Priority: high, medium or low
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Subject ID to associate with
        #[arg(long)]
        subject: Option<u32>,
    },
    /// List tasks
    List {
        /// Only tasks that are not completed
        #[arg(long)]
        pending: bool,
    },
    /// Update a task
    Update {
        /// Task ID
        id: u32,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New due date label
        #[arg(long)]
        due: Option<String>,
        /// New priority
        #[arg(long)]
        priority: Option<String>,
        /// Set completed status
        #[arg(long)]
        completed: Option<bool>,
        /// Subject ID, or "none" to clear the link
        #[arg(long)]
        subject: Option<String>,
    },
    /// Mark a task completed
    Done {
        /// Task ID
        id: u32,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: u32,
    },
}

fn parse_priority(arg: &str) -> Result<Priority, Box<dyn std::error::Error>> {
    match arg.to_ascii_lowercase().as_str() {
        "high" => Ok(Priority::High),
        "medium" => Ok(Priority::Medium),
        "low" => Ok(Priority::Low),
        other => Err(format!("unknown priority '{other}' (expected high, medium or low)").into()),
    }
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let repo = open_repository()?;

    match action {
        TaskAction::Add {
            title,
            description,
            due,
            priority,
            subject,
        } => {
            let task = repo.add_task(NewTask {
                title,
                description,
                due_date: due,
                priority: parse_priority(&priority)?,
                completed: false,
                subject_id: subject,
            })?;
            println!("Added task {} '{}'", task.id, task.title);
        }
        TaskAction::List { pending } => {
            for t in repo.tasks() {
                if pending && t.completed {
                    continue;
                }
                let mark = if t.completed { "x" } else { " " };
                println!(
                    "{:>4} [{}] {:<32} {:?} due {}",
                    t.id, mark, t.title, t.priority, t.due_date
                );
            }
        }
        TaskAction::Update {
            id,
            title,
            description,
            due,
            priority,
            completed,
            subject,
        } => {
            let priority = priority.as_deref().map(parse_priority).transpose()?;
            let subject_id = subject.as_deref().map(parse_subject).transpose()?;
            repo.update_task(
                id,
                TaskPatch {
                    title,
                    description,
                    due_date: due,
                    priority,
                    completed,
                    subject_id,
                },
            )?;
            println!("Updated task {id}");
        }
        TaskAction::Done { id } => {
            repo.update_task(
                id,
                TaskPatch {
                    completed: Some(true),
                    ..Default::default()
                },
            )?;
            println!("Completed task {id}");
        }
        TaskAction::Delete { id } => {
            repo.delete_task(id)?;
            println!("Deleted task {id}");
        }
    }

    Ok(())
}
