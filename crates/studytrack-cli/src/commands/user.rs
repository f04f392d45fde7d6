//! User profile commands.

use clap::Subcommand;
use studytrack_core::UserPatch;

use super::open_repository;

#[derive(Subcommand)]
pub enum UserAction {
    /// Show the profile
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update the profile (created with Guest defaults on first update)
    Update {
        /// Full name
        #[arg(long)]
        name: Option<String>,
        /// Role
        #[arg(long)]
        role: Option<String>,
        /// Age
        #[arg(long)]
        age: Option<String>,
        /// Education level
        #[arg(long)]
        education_level: Option<String>,
        /// Institute
        #[arg(long)]
        institute: Option<String>,
        /// Study goal
        #[arg(long)]
        study_goal: Option<String>,
    },
}

pub fn run(action: UserAction) -> Result<(), Box<dyn std::error::Error>> {
    let repo = open_repository()?;

    match action {
        UserAction::Show { json } => match repo.user() {
            Some(user) if json => println!("{}", serde_json::to_string_pretty(&user)?),
            Some(user) => {
                println!("{} ({}) - {}", user.name, user.initials, user.role);
                if let Some(age) = &user.age {
                    println!("  age: {age}");
                }
                if let Some(level) = &user.education_level {
                    println!("  education: {level}");
                }
                if let Some(institute) = &user.institute {
                    println!("  institute: {institute}");
                }
                if let Some(goal) = &user.study_goal {
                    println!("  goal: {goal}");
                }
            }
            None => println!("No profile yet. Use `studytrack user update` to create one."),
        },
        UserAction::Update {
            name,
            role,
            age,
            education_level,
            institute,
            study_goal,
        } => {
            let user = repo.update_user(UserPatch {
                name,
                role,
                age,
                education_level,
                institute,
                study_goal,
            })?;
            println!("Profile saved: {} ({})", user.name, user.initials);
        }
    }

    Ok(())
}
