//! Study session log commands.

use chrono::{SecondsFormat, Utc};
use clap::Subcommand;
use studytrack_core::NewSession;

use super::open_repository;

#[derive(Subcommand)]
pub enum SessionAction {
    /// Record a study session
    Add {
        /// Duration in hours
        duration: f64,
        /// Subject ID to credit
        #[arg(long)]
        subject: Option<u32>,
        /// ISO timestamp (defaults to now)
        #[arg(long)]
        date: Option<String>,
    },
    /// List study sessions
    List,
    /// Delete a session
    Delete {
        /// Session ID
        id: u32,
    },
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let repo = open_repository()?;

    match action {
        SessionAction::Add {
            duration,
            subject,
            date,
        } => {
            let date =
                date.unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
            let session = repo.add_session(NewSession {
                date,
                duration,
                subject_id: subject,
            })?;
            println!("Recorded session {} ({}h)", session.id, session.duration);
        }
        SessionAction::List => {
            for s in repo.sessions() {
                let subject = s
                    .subject_id
                    .and_then(|id| repo.subject(id))
                    .map(|sub| sub.name)
                    .unwrap_or_else(|| "-".to_string());
                println!("{:>4}  {}  {:>5.2}h  {}", s.id, s.date, s.duration, subject);
            }
        }
        SessionAction::Delete { id } => {
            repo.delete_session(id)?;
            println!("Deleted session {id}");
        }
    }

    Ok(())
}
