//! Countdown timer.
//!
//! A caller-ticked state machine: it owns no clock and no thread. The
//! caller invokes [`CountdownTimer::tick`] once per second while it wants
//! the countdown to advance, which makes the caller's loop the single tick
//! source; starting a new loop after dropping the old one can never stack
//! intervals.
//!
//! ## State transitions
//!
//! ```text
//! Idle -> Running -> (Paused <-> Running) -> Completed -> Idle
//! ```
//!
//! Reset or a mode change returns to `Idle` at the new preset from any
//! state, with no partial credit for the abandoned run.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;

/// Duration presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    /// 25 minutes of focus.
    Pomodoro,
    /// 5 minute break.
    ShortBreak,
    /// 15 minute break.
    LongBreak,
}

impl TimerMode {
    pub fn duration_secs(self) -> u32 {
        match self {
            TimerMode::Pomodoro => 25 * 60,
            TimerMode::ShortBreak => 5 * 60,
            TimerMode::LongBreak => 15 * 60,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Pomodoro => "Pomodoro",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Pomodoro-style countdown with an optional subject association.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownTimer {
    mode: TimerMode,
    state: TimerState,
    remaining_secs: u32,
    /// Duration captured when the run started; the completion's elapsed
    /// time is computed from this, not from wall clock.
    nominal_secs: Option<u32>,
    subject_id: Option<u32>,
}

impl CountdownTimer {
    /// New timer in `Idle` at the preset's full duration.
    pub fn new(mode: TimerMode) -> Self {
        Self {
            mode,
            state: TimerState::Idle,
            remaining_secs: mode.duration_secs(),
            nominal_secs: None,
            subject_id: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn subject_id(&self) -> Option<u32> {
        self.subject_id
    }

    /// 0.0 .. 1.0 progress through the current preset.
    pub fn progress(&self) -> f64 {
        let total = self.mode.duration_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / total as f64)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Associate (or clear) the subject credited on completion.
    pub fn set_subject(&mut self, subject_id: Option<u32>) {
        self.subject_id = subject_id;
    }

    /// Switch preset: stops the clock and resets to the new full duration,
    /// silently discarding any in-progress run.
    pub fn set_mode(&mut self, mode: TimerMode) -> Option<Event> {
        self.mode = mode;
        self.reset()
    }

    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle => {
                self.nominal_secs = Some(self.remaining_secs);
                self.state = TimerState::Running;
                Some(Event::TimerStarted {
                    mode: self.mode,
                    duration_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            TimerState::Completed => {
                // Rearm for the next run.
                self.remaining_secs = self.mode.duration_secs();
                self.nominal_secs = Some(self.remaining_secs);
                self.state = TimerState::Running;
                Some(Event::TimerStarted {
                    mode: self.mode,
                    duration_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            TimerState::Paused => self.resume(),
            TimerState::Running => None,
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.state = TimerState::Paused;
                Some(Event::TimerPaused {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    pub fn resume(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Paused => {
                self.state = TimerState::Running;
                Some(Event::TimerResumed {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.state = TimerState::Idle;
        self.remaining_secs = self.mode.duration_secs();
        self.nominal_secs = None;
        Some(Event::TimerReset {
            mode: self.mode,
            at: Utc::now(),
        })
    }

    /// Advance the countdown by one second. Does nothing unless `Running`.
    ///
    /// Returns `Some(Event::TimerCompleted)` exactly once per run, when the
    /// countdown reaches zero; the event carries the nominal duration in
    /// hours and the associated subject.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        self.state = TimerState::Completed;
        let nominal = self.nominal_secs.take().unwrap_or(0);
        Some(Event::TimerCompleted {
            mode: self.mode,
            hours: f64::from(nominal) / 3600.0,
            subject_id: self.subject_id,
            at: Utc::now(),
        })
    }
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new(TimerMode::Pomodoro)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(event: Option<Event>) -> Option<(f64, Option<u32>)> {
        match event {
            Some(Event::TimerCompleted {
                hours, subject_id, ..
            }) => Some((hours, subject_id)),
            _ => None,
        }
    }

    #[test]
    fn presets() {
        assert_eq!(TimerMode::Pomodoro.duration_secs(), 1500);
        assert_eq!(TimerMode::ShortBreak.duration_secs(), 300);
        assert_eq!(TimerMode::LongBreak.duration_secs(), 900);
    }

    #[test]
    fn start_pause_resume() {
        let mut timer = CountdownTimer::default();
        assert_eq!(timer.state(), TimerState::Idle);

        assert!(timer.start().is_some());
        assert_eq!(timer.state(), TimerState::Running);
        // Starting again while running is a no-op.
        assert!(timer.start().is_none());

        assert!(timer.pause().is_some());
        assert_eq!(timer.state(), TimerState::Paused);

        assert!(timer.resume().is_some());
        assert_eq!(timer.state(), TimerState::Running);
    }

    #[test]
    fn tick_only_decrements_while_running() {
        let mut timer = CountdownTimer::default();
        timer.tick();
        assert_eq!(timer.remaining_secs(), 1500);

        timer.start();
        timer.tick();
        assert_eq!(timer.remaining_secs(), 1499);

        timer.pause();
        timer.tick();
        timer.tick();
        assert_eq!(timer.remaining_secs(), 1499);
    }

    #[test]
    fn rapid_start_pause_cycles_never_double_decrement() {
        let mut timer = CountdownTimer::default();
        for _ in 0..10 {
            timer.start();
            timer.pause();
        }
        timer.start();
        timer.tick();
        assert_eq!(timer.remaining_secs(), 1499);
    }

    #[test]
    fn resume_continues_from_remaining_time() {
        let mut timer = CountdownTimer::new(TimerMode::ShortBreak);
        timer.start();
        for _ in 0..100 {
            timer.tick();
        }
        timer.pause();
        assert_eq!(timer.remaining_secs(), 200);
        timer.resume();
        timer.tick();
        assert_eq!(timer.remaining_secs(), 199);
    }

    #[test]
    fn completion_fires_once_with_nominal_hours_and_subject() {
        let mut timer = CountdownTimer::default();
        timer.set_subject(Some(3));
        timer.start();

        let mut completions = Vec::new();
        for _ in 0..1500 {
            if let Some(c) = completed(timer.tick()) {
                completions.push(c);
            }
        }
        assert_eq!(completions.len(), 1);
        let (hours, subject_id) = completions[0];
        assert!((hours - 1500.0 / 3600.0).abs() < 1e-9);
        assert_eq!(subject_id, Some(3));
        assert_eq!(timer.state(), TimerState::Completed);

        // Further ticks stay silent.
        assert!(timer.tick().is_none());
    }

    #[test]
    fn start_after_completion_rearms_full_preset() {
        let mut timer = CountdownTimer::new(TimerMode::ShortBreak);
        timer.start();
        for _ in 0..300 {
            timer.tick();
        }
        assert_eq!(timer.state(), TimerState::Completed);

        timer.start();
        assert_eq!(timer.state(), TimerState::Running);
        assert_eq!(timer.remaining_secs(), 300);
    }

    #[test]
    fn mode_change_while_running_discards_the_run() {
        let mut timer = CountdownTimer::default();
        timer.start();
        timer.tick();
        timer.set_mode(TimerMode::LongBreak);
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.remaining_secs(), 900);

        // The abandoned run earns no completion.
        assert!(timer.tick().is_none());
    }

    #[test]
    fn progress_tracks_elapsed_fraction() {
        let mut timer = CountdownTimer::new(TimerMode::ShortBreak);
        assert_eq!(timer.progress(), 0.0);

        timer.start();
        for _ in 0..75 {
            timer.tick();
        }
        // 75 of 300 seconds elapsed.
        assert!((timer.progress() - 0.25).abs() < 1e-9);

        for _ in 0..225 {
            timer.tick();
        }
        assert_eq!(timer.progress(), 1.0);

        timer.reset();
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn reset_returns_to_full_duration() {
        let mut timer = CountdownTimer::default();
        timer.start();
        timer.tick();
        timer.tick();
        timer.reset();
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.remaining_secs(), 1500);
    }
}
