//! Study data repository.
//!
//! Typed CRUD over the five collections and the user singleton, built on a
//! single [`PersistentStore`] holding the whole [`AppData`] aggregate. Every
//! mutation rewrites the aggregate; the store reports persistence failures
//! through the returned `Result` while the in-memory change always applies.
//!
//! Ids are assigned by max-scan: `1 + max(existing ids)`, or 1 for an empty
//! or absent collection. Deleting the max-id record means its id can be
//! reissued by the next add; kept as found.
//!
//! No validation happens here. Empty titles or non-positive targets are the
//! caller's problem to reject before the write.

use std::sync::Arc;

use crate::data::{
    initials, random_color, AppData, Goal, Note, Priority, StudySession, Subject, Task, User,
};
use crate::error::Result;
use crate::store::{ChangeBus, PersistentStore, StorageMedium};

/// Storage key of the aggregate.
pub const DATA_KEY: &str = "studyTrackerData";

/// Fields of a new task, id excluded.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: Priority,
    pub completed: bool,
    pub subject_id: Option<u32>,
}

/// Fields of a new study session, id excluded.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub date: String,
    pub duration: f64,
    pub subject_id: Option<u32>,
}

/// Fields of a new note, id excluded.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub subject_id: Option<u32>,
    pub date: String,
}

/// Fields of a new goal, id excluded.
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub title: String,
    pub target: f64,
    pub current: f64,
    pub unit: String,
}

/// Partial subject update. `None` fields keep the current value.
#[derive(Debug, Clone, Default)]
pub struct SubjectPatch {
    pub name: Option<String>,
    pub progress: Option<u8>,
    pub color: Option<String>,
}

/// Partial task update. `subject_id: Some(None)` clears the subject link.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
    pub subject_id: Option<Option<u32>>,
}

/// Partial session update.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub date: Option<String>,
    pub duration: Option<f64>,
    pub subject_id: Option<Option<u32>>,
}

/// Partial note update.
#[derive(Debug, Clone, Default)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub subject_id: Option<Option<u32>>,
    pub date: Option<String>,
}

/// Partial goal update. `current` is stored as given; use
/// [`StudyRepository::set_goal_progress`] for the clamped path.
#[derive(Debug, Clone, Default)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub target: Option<f64>,
    pub current: Option<f64>,
    pub unit: Option<String>,
}

/// Partial user update. A `name` change recomputes the initials.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub age: Option<String>,
    pub education_level: Option<String>,
    pub institute: Option<String>,
    pub study_goal: Option<String>,
}

/// CRUD layer over the persisted aggregate.
///
/// The store (and with it the medium and change bus) is injected, so tests
/// and multi-context setups construct isolated repositories at will.
pub struct StudyRepository {
    store: PersistentStore<AppData>,
}

fn next_id(ids: impl Iterator<Item = u32>) -> u32 {
    ids.max().unwrap_or(0) + 1
}

impl StudyRepository {
    pub fn new(store: PersistentStore<AppData>) -> Self {
        Self { store }
    }

    /// Open a repository over `medium`, seeding defaults when the entry is
    /// absent or unparsable.
    pub fn open(medium: Arc<dyn StorageMedium>, bus: &ChangeBus) -> Self {
        Self::new(PersistentStore::open(medium, bus, DATA_KEY, AppData::seed()))
    }

    // ── Read accessors ───────────────────────────────────────────────

    /// The current aggregate.
    pub fn data(&self) -> AppData {
        self.store.get()
    }

    pub fn subjects(&self) -> Vec<Subject> {
        self.store.get().subjects.unwrap_or_default()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.store.get().tasks.unwrap_or_default()
    }

    pub fn sessions(&self) -> Vec<StudySession> {
        self.store.get().study_sessions.unwrap_or_default()
    }

    pub fn notes(&self) -> Vec<Note> {
        self.store.get().notes.unwrap_or_default()
    }

    pub fn goals(&self) -> Vec<Goal> {
        self.store.get().goals.unwrap_or_default()
    }

    pub fn user(&self) -> Option<User> {
        self.store.get().user
    }

    pub fn subject(&self, id: u32) -> Option<Subject> {
        self.subjects().into_iter().find(|s| s.id == id)
    }

    // ── Subjects ─────────────────────────────────────────────────────

    /// Add a subject by name: progress starts at 0, color drawn from the
    /// accent palette.
    pub fn add_subject(&self, name: impl Into<String>) -> Result<Subject> {
        let mut data = self.store.get();
        let subjects = data.subjects.get_or_insert_with(Vec::new);
        let subject = Subject {
            id: next_id(subjects.iter().map(|s| s.id)),
            name: name.into(),
            progress: 0,
            color: random_color(),
        };
        subjects.push(subject.clone());
        self.store.set(data)?;
        Ok(subject)
    }

    pub fn update_subject(&self, id: u32, patch: SubjectPatch) -> Result<()> {
        let mut data = self.store.get();
        let Some(subjects) = data.subjects.as_mut() else {
            return Ok(());
        };
        if let Some(subject) = subjects.iter_mut().find(|s| s.id == id) {
            if let Some(name) = patch.name {
                subject.name = name;
            }
            if let Some(progress) = patch.progress {
                subject.progress = progress;
            }
            if let Some(color) = patch.color {
                subject.color = color;
            }
        }
        self.store.set(data)
    }

    pub fn delete_subject(&self, id: u32) -> Result<()> {
        let mut data = self.store.get();
        let Some(subjects) = data.subjects.as_mut() else {
            return Ok(());
        };
        subjects.retain(|s| s.id != id);
        self.store.set(data)
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn add_task(&self, new: NewTask) -> Result<Task> {
        let mut data = self.store.get();
        let tasks = data.tasks.get_or_insert_with(Vec::new);
        let task = Task {
            id: next_id(tasks.iter().map(|t| t.id)),
            title: new.title,
            description: new.description,
            due_date: new.due_date,
            priority: new.priority,
            completed: new.completed,
            subject_id: new.subject_id,
        };
        tasks.push(task.clone());
        self.store.set(data)?;
        Ok(task)
    }

    pub fn update_task(&self, id: u32, patch: TaskPatch) -> Result<()> {
        let mut data = self.store.get();
        let Some(tasks) = data.tasks.as_mut() else {
            return Ok(());
        };
        if let Some(task) = tasks.iter_mut().find(|t| t.id == id) {
            if let Some(title) = patch.title {
                task.title = title;
            }
            if let Some(description) = patch.description {
                task.description = description;
            }
            if let Some(due_date) = patch.due_date {
                task.due_date = due_date;
            }
            if let Some(priority) = patch.priority {
                task.priority = priority;
            }
            if let Some(completed) = patch.completed {
                task.completed = completed;
            }
            if let Some(subject_id) = patch.subject_id {
                task.subject_id = subject_id;
            }
        }
        self.store.set(data)
    }

    pub fn delete_task(&self, id: u32) -> Result<()> {
        let mut data = self.store.get();
        let Some(tasks) = data.tasks.as_mut() else {
            return Ok(());
        };
        tasks.retain(|t| t.id != id);
        self.store.set(data)
    }

    // ── Study sessions ───────────────────────────────────────────────

    pub fn add_session(&self, new: NewSession) -> Result<StudySession> {
        let mut data = self.store.get();
        let sessions = data.study_sessions.get_or_insert_with(Vec::new);
        let session = StudySession {
            id: next_id(sessions.iter().map(|s| s.id)),
            date: new.date,
            duration: new.duration,
            subject_id: new.subject_id,
        };
        sessions.push(session.clone());
        self.store.set(data)?;
        Ok(session)
    }

    pub fn update_session(&self, id: u32, patch: SessionPatch) -> Result<()> {
        let mut data = self.store.get();
        let Some(sessions) = data.study_sessions.as_mut() else {
            return Ok(());
        };
        if let Some(session) = sessions.iter_mut().find(|s| s.id == id) {
            if let Some(date) = patch.date {
                session.date = date;
            }
            if let Some(duration) = patch.duration {
                session.duration = duration;
            }
            if let Some(subject_id) = patch.subject_id {
                session.subject_id = subject_id;
            }
        }
        self.store.set(data)
    }

    pub fn delete_session(&self, id: u32) -> Result<()> {
        let mut data = self.store.get();
        let Some(sessions) = data.study_sessions.as_mut() else {
            return Ok(());
        };
        sessions.retain(|s| s.id != id);
        self.store.set(data)
    }

    // ── Notes ────────────────────────────────────────────────────────

    pub fn add_note(&self, new: NewNote) -> Result<Note> {
        let mut data = self.store.get();
        let notes = data.notes.get_or_insert_with(Vec::new);
        let note = Note {
            id: next_id(notes.iter().map(|n| n.id)),
            title: new.title,
            content: new.content,
            subject_id: new.subject_id,
            date: new.date,
        };
        notes.push(note.clone());
        self.store.set(data)?;
        Ok(note)
    }

    pub fn update_note(&self, id: u32, patch: NotePatch) -> Result<()> {
        let mut data = self.store.get();
        let Some(notes) = data.notes.as_mut() else {
            return Ok(());
        };
        if let Some(note) = notes.iter_mut().find(|n| n.id == id) {
            if let Some(title) = patch.title {
                note.title = title;
            }
            if let Some(content) = patch.content {
                note.content = content;
            }
            if let Some(subject_id) = patch.subject_id {
                note.subject_id = subject_id;
            }
            if let Some(date) = patch.date {
                note.date = date;
            }
        }
        self.store.set(data)
    }

    pub fn delete_note(&self, id: u32) -> Result<()> {
        let mut data = self.store.get();
        let Some(notes) = data.notes.as_mut() else {
            return Ok(());
        };
        notes.retain(|n| n.id != id);
        self.store.set(data)
    }

    // ── Goals ────────────────────────────────────────────────────────

    pub fn add_goal(&self, new: NewGoal) -> Result<Goal> {
        let mut data = self.store.get();
        let goals = data.goals.get_or_insert_with(Vec::new);
        let goal = Goal {
            id: next_id(goals.iter().map(|g| g.id)),
            title: new.title,
            target: new.target,
            current: new.current,
            unit: new.unit,
        };
        goals.push(goal.clone());
        self.store.set(data)?;
        Ok(goal)
    }

    pub fn update_goal(&self, id: u32, patch: GoalPatch) -> Result<()> {
        let mut data = self.store.get();
        let Some(goals) = data.goals.as_mut() else {
            return Ok(());
        };
        if let Some(goal) = goals.iter_mut().find(|g| g.id == id) {
            if let Some(title) = patch.title {
                goal.title = title;
            }
            if let Some(target) = patch.target {
                goal.target = target;
            }
            if let Some(current) = patch.current {
                goal.current = current;
            }
            if let Some(unit) = patch.unit {
                goal.unit = unit;
            }
        }
        self.store.set(data)
    }

    /// Set a goal's current value, clamped to `[0, target]`.
    pub fn set_goal_progress(&self, id: u32, value: f64) -> Result<()> {
        let mut data = self.store.get();
        let Some(goals) = data.goals.as_mut() else {
            return Ok(());
        };
        if let Some(goal) = goals.iter_mut().find(|g| g.id == id) {
            goal.current = value.clamp(0.0, goal.target.max(0.0));
        }
        self.store.set(data)
    }

    pub fn delete_goal(&self, id: u32) -> Result<()> {
        let mut data = self.store.get();
        let Some(goals) = data.goals.as_mut() else {
            return Ok(());
        };
        goals.retain(|g| g.id != id);
        self.store.set(data)
    }

    // ── User singleton ───────────────────────────────────────────────

    /// Merge `patch` into the user profile, synthesizing the Guest/Student
    /// defaults when no user exists yet. A supplied name recomputes the
    /// initials; otherwise the prior initials stand.
    pub fn update_user(&self, patch: UserPatch) -> Result<User> {
        let mut data = self.store.get();
        let user = match data.user.take() {
            None => {
                let name = patch.name.unwrap_or_else(|| "Guest User".to_string());
                User {
                    initials: initials(&name),
                    name,
                    role: patch.role.unwrap_or_else(|| "Student".to_string()),
                    age: patch.age,
                    education_level: patch.education_level,
                    institute: patch.institute,
                    study_goal: patch.study_goal,
                }
            }
            Some(mut user) => {
                if let Some(name) = patch.name {
                    user.initials = initials(&name);
                    user.name = name;
                }
                if let Some(role) = patch.role {
                    user.role = role;
                }
                if patch.age.is_some() {
                    user.age = patch.age;
                }
                if patch.education_level.is_some() {
                    user.education_level = patch.education_level;
                }
                if patch.institute.is_some() {
                    user.institute = patch.institute;
                }
                if patch.study_goal.is_some() {
                    user.study_goal = patch.study_goal;
                }
                user
            }
        };
        data.user = Some(user.clone());
        self.store.set(data)?;
        Ok(user)
    }
}
