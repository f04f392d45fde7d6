//! Goal commands.

use clap::Subcommand;
use studytrack_core::data::goal_progress_pct;
use studytrack_core::{GoalPatch, NewGoal};

use super::open_repository;

#[derive(Subcommand)]
pub enum GoalAction {
    /// Add a goal
    Add {
        /// Goal title
        title: String,
        /// Target amount
        target: f64,
        /// Unit label (e.g. hours, pages)
        #[arg(long, default_value = "hours")]
        unit: String,
        /// Starting amount
        #[arg(long, default_value = "0")]
        current: f64,
    },
    /// List goals with progress
    List,
    /// Update goal fields
    Update {
        /// Goal ID
        id: u32,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New target
        #[arg(long)]
        target: Option<f64>,
        /// New unit label
        #[arg(long)]
        unit: Option<String>,
    },
    /// Set progress (clamped to 0..target)
    Progress {
        /// Goal ID
        id: u32,
        /// New current amount
        value: f64,
    },
    /// Delete a goal
    Delete {
        /// Goal ID
        id: u32,
    },
}

pub fn run(action: GoalAction) -> Result<(), Box<dyn std::error::Error>> {
    let repo = open_repository()?;

    match action {
        GoalAction::Add {
            title,
            target,
            unit,
            current,
        } => {
            let goal = repo.add_goal(NewGoal {
                title,
                target,
                current,
                unit,
            })?;
            println!("Added goal {} '{}'", goal.id, goal.title);
        }
        GoalAction::List => {
            for g in repo.goals() {
                println!(
                    "{:>4}  {:<24} {:>6}/{:<6} {:<10} {:>3}%",
                    g.id,
                    g.title,
                    g.current,
                    g.target,
                    g.unit,
                    goal_progress_pct(g.current, g.target)
                );
            }
        }
        GoalAction::Update {
            id,
            title,
            target,
            unit,
        } => {
            repo.update_goal(
                id,
                GoalPatch {
                    title,
                    target,
                    current: None,
                    unit,
                },
            )?;
            println!("Updated goal {id}");
        }
        GoalAction::Progress { id, value } => {
            repo.set_goal_progress(id, value)?;
            println!("Updated goal {id} progress");
        }
        GoalAction::Delete { id } => {
            repo.delete_goal(id)?;
            println!("Deleted goal {id}");
        }
    }

    Ok(())
}
