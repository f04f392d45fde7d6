//! Domain model for the study tracker.
//!
//! Records are plain data; relationships are by integer id (`subject_id`),
//! never by embedding. Serde names match the persisted JSON layout of the
//! aggregate under the `studyTrackerData` key, so an aggregate written by an
//! older deployment round-trips unchanged.

use chrono::{Duration, SecondsFormat, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: u32,
    pub name: String,
    /// 0-100.
    pub progress: u8,
    /// Hex accent color, drawn from [`ACCENT_PALETTE`].
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u32,
    pub title: String,
    pub description: String,
    /// Free-form label ("Today", "Sep 23"), not a parsed date.
    pub due_date: String,
    pub priority: Priority,
    pub completed: bool,
    pub subject_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: u32,
    /// ISO timestamp.
    pub date: String,
    /// Hours.
    pub duration: f64,
    pub subject_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: u32,
    pub title: String,
    pub content: String,
    pub subject_id: Option<u32>,
    /// ISO timestamp.
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: u32,
    pub title: String,
    pub target: f64,
    pub current: f64,
    pub unit: String,
}

/// Singleton user profile. Not a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub initials: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_goal: Option<String>,
}

impl User {
    /// The default profile synthesized on first write.
    pub fn guest() -> Self {
        Self {
            name: "Guest User".to_string(),
            initials: "GU".to_string(),
            role: "Student".to_string(),
            age: None,
            education_level: None,
            institute: None,
            study_goal: None,
        }
    }
}

/// The full persisted aggregate: five collections plus the user singleton,
/// written to storage as one unit on every mutation.
///
/// Collections are `Option` so a partially corrupted or hand-edited entry
/// with missing keys is representable; mutating an absent collection is a
/// no-op at the repository layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppData {
    #[serde(default)]
    pub subjects: Option<Vec<Subject>>,
    #[serde(default)]
    pub tasks: Option<Vec<Task>>,
    #[serde(default, rename = "studySessions")]
    pub study_sessions: Option<Vec<StudySession>>,
    #[serde(default)]
    pub notes: Option<Vec<Note>>,
    #[serde(default)]
    pub goals: Option<Vec<Goal>>,
    #[serde(default)]
    pub user: Option<User>,
}

impl AppData {
    /// The seeded default aggregate used when storage is absent or
    /// unparsable: 4 subjects, 4 tasks, 7 sessions spanning the past week,
    /// 4 notes, 3 goals, no user (the profile is created on first write).
    pub fn seed() -> Self {
        let now = Utc::now();
        let iso = |delta: Duration| (now - delta).to_rfc3339_opts(SecondsFormat::Millis, true);

        Self {
            subjects: Some(vec![
                Subject {
                    id: 1,
                    name: "Mathematics".into(),
                    progress: 75,
                    color: "#4A6FFF".into(),
                },
                Subject {
                    id: 2,
                    name: "Science".into(),
                    progress: 60,
                    color: "#FF6B6B".into(),
                },
                Subject {
                    id: 3,
                    name: "History".into(),
                    progress: 40,
                    color: "#8A4FFF".into(),
                },
                Subject {
                    id: 4,
                    name: "English".into(),
                    progress: 85,
                    color: "#4ADE80".into(),
                },
            ]),
            tasks: Some(vec![
                Task {
                    id: 1,
                    title: "Complete Mathematics Assignment".into(),
                    description: "Chapter 5 - Calculus Problems".into(),
                    due_date: "Today".into(),
                    priority: Priority::High,
                    completed: false,
                    subject_id: Some(1),
                },
                Task {
                    id: 2,
                    title: "Prepare Science Project".into(),
                    description: "Research on Renewable Energy".into(),
                    due_date: "Tomorrow".into(),
                    priority: Priority::Medium,
                    completed: false,
                    subject_id: Some(2),
                },
                Task {
                    id: 3,
                    title: "Review History Notes".into(),
                    description: "Chapter 7 - World War II".into(),
                    due_date: "Sep 23".into(),
                    priority: Priority::Low,
                    completed: false,
                    subject_id: Some(3),
                },
                Task {
                    id: 4,
                    title: "Prepare for English Presentation".into(),
                    description: "Literary Analysis Essay".into(),
                    due_date: "Sep 25".into(),
                    priority: Priority::High,
                    completed: false,
                    subject_id: Some(4),
                },
            ]),
            study_sessions: Some(vec![
                StudySession {
                    id: 1,
                    date: iso(Duration::days(6)),
                    duration: 3.5,
                    subject_id: Some(1),
                },
                StudySession {
                    id: 2,
                    date: iso(Duration::days(5)),
                    duration: 2.2,
                    subject_id: Some(2),
                },
                StudySession {
                    id: 3,
                    date: iso(Duration::days(4)),
                    duration: 4.5,
                    subject_id: Some(3),
                },
                StudySession {
                    id: 4,
                    date: iso(Duration::days(3)),
                    duration: 3.0,
                    subject_id: Some(4),
                },
                StudySession {
                    id: 5,
                    date: iso(Duration::days(2)),
                    duration: 4.0,
                    subject_id: Some(1),
                },
                StudySession {
                    id: 6,
                    date: iso(Duration::days(1)),
                    duration: 1.5,
                    subject_id: Some(2),
                },
                StudySession {
                    id: 7,
                    date: iso(Duration::zero()),
                    duration: 1.0,
                    subject_id: Some(3),
                },
            ]),
            notes: Some(vec![
                Note {
                    id: 1,
                    title: "Integration Techniques".into(),
                    content: "Methods for solving various types of integrals including substitution, parts, partial fractions...".into(),
                    subject_id: Some(1),
                    date: iso(Duration::hours(2)),
                },
                Note {
                    id: 2,
                    title: "Periodic Table Elements".into(),
                    content: "Key properties of transition metals and their compounds, including catalytic activity...".into(),
                    subject_id: Some(2),
                    date: iso(Duration::days(1)),
                },
                Note {
                    id: 3,
                    title: "World War II Timeline".into(),
                    content: "Major events chronologically ordered with key figures and turning points in the conflict...".into(),
                    subject_id: Some(3),
                    date: iso(Duration::days(2)),
                },
                Note {
                    id: 4,
                    title: "Literary Analysis Techniques".into(),
                    content: "Methods for analyzing themes, characters, and symbolism in literature with examples...".into(),
                    subject_id: Some(4),
                    date: iso(Duration::days(3)),
                },
            ]),
            goals: Some(vec![
                Goal {
                    id: 1,
                    title: "Study Time".into(),
                    target: 4.0,
                    current: 3.0,
                    unit: "hours".into(),
                },
                Goal {
                    id: 2,
                    title: "Practice Problems".into(),
                    target: 20.0,
                    current: 10.0,
                    unit: "problems".into(),
                },
                Goal {
                    id: 3,
                    title: "Reading".into(),
                    target: 50.0,
                    current: 15.0,
                    unit: "pages".into(),
                },
            ]),
            user: None,
        }
    }
}

/// Fixed accent palette for subjects.
pub const ACCENT_PALETTE: [&str; 5] = [
    "#4A6FFF", // Primary
    "#FF6B6B", // Secondary
    "#8A4FFF", // Accent
    "#4ADE80", // Success
    "#F43F5E", // Error
];

/// A random accent color from the palette.
pub fn random_color() -> String {
    let i = rand::thread_rng().gen_range(0..ACCENT_PALETTE.len());
    ACCENT_PALETTE[i].to_string()
}

/// Uppercased first letter of each whitespace-separated word.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(|c| c.to_uppercase())
        .collect()
}

/// `mm:ss` rendering of a second count.
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Goal completion percentage, capped at 100.
pub fn goal_progress_pct(current: f64, target: f64) -> u32 {
    if target <= 0.0 {
        return 0;
    }
    ((current / target * 100.0).round() as u32).min(100)
}
