use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerMode;

/// Timer transitions produce an Event; callers render or record them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero. `hours` is the nominal duration captured at
    /// start, converted to hours.
    TimerCompleted {
        mode: TimerMode,
        hours: f64,
        subject_id: Option<u32>,
        at: DateTime<Utc>,
    },
}
