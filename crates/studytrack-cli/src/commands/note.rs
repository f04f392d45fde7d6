//! Note commands.

use chrono::{SecondsFormat, Utc};
use clap::Subcommand;
use studytrack_core::{NewNote, NotePatch};

use super::{open_repository, parse_subject};

#[derive(Subcommand)]
pub enum NoteAction {
    /// Add a note
    Add {
        /// Note title
        title: String,
        /// Note body
        #[arg(long, default_value = "")]
        content: String,
        /// Subject ID to file under
        #[arg(long)]
        subject: Option<u32>,
    },
    /// List notes
    List,
    /// Update a note
    Update {
        /// Note ID
        id: u32,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New body
        #[arg(long)]
        content: Option<String>,
        /// Subject ID, or "none" to clear the link
        #[arg(long)]
        subject: Option<String>,
    },
    /// Delete a note
    Delete {
        /// Note ID
        id: u32,
    },
}

pub fn run(action: NoteAction) -> Result<(), Box<dyn std::error::Error>> {
    let repo = open_repository()?;

    match action {
        NoteAction::Add {
            title,
            content,
            subject,
        } => {
            let note = repo.add_note(NewNote {
                title,
                content,
                subject_id: subject,
                date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            })?;
            println!("Added note {} '{}'", note.id, note.title);
        }
        NoteAction::List => {
            for n in repo.notes() {
                println!("{:>4}  {:<32} {}", n.id, n.title, n.date);
            }
        }
        NoteAction::Update {
            id,
            title,
            content,
            subject,
        } => {
            let subject_id = subject.as_deref().map(parse_subject).transpose()?;
            repo.update_note(
                id,
                NotePatch {
                    title,
                    content,
                    subject_id,
                    date: None,
                },
            )?;
            println!("Updated note {id}");
        }
        NoteAction::Delete { id } => {
            repo.delete_note(id)?;
            println!("Deleted note {id}");
        }
    }

    Ok(())
}
