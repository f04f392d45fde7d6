//! Subject management commands.

use clap::Subcommand;
use studytrack_core::SubjectPatch;

use super::open_repository;

#[derive(Subcommand)]
pub enum SubjectAction {
    /// Add a subject (progress 0, random accent color)
    Add {
        /// Subject name
        name: String,
    },
    /// List subjects
    List,
    /// Update a subject
    Update {
        /// Subject ID
        id: u32,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New progress (0-100)
        #[arg(long)]
        progress: Option<u8>,
        /// New hex color
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a subject
    Delete {
        /// Subject ID
        id: u32,
    },
}

pub fn run(action: SubjectAction) -> Result<(), Box<dyn std::error::Error>> {
    let repo = open_repository()?;

    match action {
        SubjectAction::Add { name } => {
            let subject = repo.add_subject(name)?;
            println!(
                "Added subject {} '{}' ({})",
                subject.id, subject.name, subject.color
            );
        }
        SubjectAction::List => {
            for s in repo.subjects() {
                println!("{:>4}  {:<24} {:>3}%  {}", s.id, s.name, s.progress, s.color);
            }
        }
        SubjectAction::Update {
            id,
            name,
            progress,
            color,
        } => {
            repo.update_subject(
                id,
                SubjectPatch {
                    name,
                    progress,
                    color,
                },
            )?;
            println!("Updated subject {id}");
        }
        SubjectAction::Delete { id } => {
            repo.delete_subject(id)?;
            println!("Deleted subject {id}");
        }
    }

    Ok(())
}
