//! # Studytrack Core Library
//!
//! Core logic for the Studytrack study tracker: a persistent keyed store,
//! a typed repository over the study data aggregate, and a pomodoro-style
//! countdown timer. The CLI binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Persistent store**: [`PersistentStore`] synchronizes an in-memory
//!   value with one entry of a [`StorageMedium`] and adopts changes other
//!   contexts publish on a [`ChangeBus`]. Persistence failures are logged
//!   and reported, never raised.
//! - **Repository**: [`StudyRepository`] exposes CRUD over the five
//!   collections (subjects, tasks, sessions, notes, goals) and the user
//!   singleton, persisted together as one aggregate.
//! - **Timer**: [`CountdownTimer`] is a caller-ticked state machine; the
//!   caller's loop is the single tick source.

pub mod data;
pub mod error;
pub mod events;
pub mod repo;
pub mod store;
pub mod timer;

pub use data::{AppData, Goal, Note, Priority, StudySession, Subject, Task, User};
pub use error::{Result, StoreError};
pub use events::Event;
pub use repo::{
    GoalPatch, NewGoal, NewNote, NewSession, NewTask, NotePatch, SessionPatch, StudyRepository,
    SubjectPatch, TaskPatch, UserPatch, DATA_KEY,
};
pub use store::{ChangeBus, FileMedium, MemoryMedium, PersistentStore, StorageMedium, Subscription};
pub use timer::{CountdownTimer, TimerMode, TimerState};
