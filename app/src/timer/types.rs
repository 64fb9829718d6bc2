//! Domain types for the countdown timer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use todo_timer_core::effect::EffectId;
use todo_timer_core::environment::Clock;

/// Id under which the running countdown's tick is scheduled
pub const TIMER_TICK: EffectId = EffectId::new("timer-tick");

/// Longest countdown that can be started, in minutes
pub const MAX_MINUTES: u32 = 60;

/// Default time between two ticks: one minute
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(60);

/// Why a duration input was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationError {
    /// Input is empty, zero, or not a whole number
    #[error("please enter a duration")]
    Missing,

    /// Input is above [`MAX_MINUTES`]
    ///
    /// Shown with the same prompt as [`DurationError::Missing`]; the
    /// variant only tells the two apart in logs and matches.
    #[error("please enter a duration")]
    TooLong,
}

/// Parses a duration input into whole minutes in `1..=MAX_MINUTES`
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`DurationError::Missing`] for anything that is not a positive
/// whole number and [`DurationError::TooLong`] above [`MAX_MINUTES`].
///
/// # Examples
///
/// ```
/// use todo_timer::timer::{parse_minutes, DurationError};
///
/// assert_eq!(parse_minutes(" 25 "), Ok(25));
/// assert_eq!(parse_minutes("0"), Err(DurationError::Missing));
/// assert_eq!(parse_minutes("90"), Err(DurationError::TooLong));
/// ```
pub fn parse_minutes(input: &str) -> Result<u32, DurationError> {
    match input.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(DurationError::Missing),
        Ok(minutes) if minutes > u64::from(MAX_MINUTES) => Err(DurationError::TooLong),
        Ok(minutes) => u32::try_from(minutes).map_err(|_| DurationError::TooLong),
    }
}

/// Where the countdown is
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerPhase {
    /// No countdown
    Idle,

    /// Counting down
    Running {
        /// Whole minutes left, always at least 1
        remaining_minutes: u32,
        /// When this run was started
        started_at: DateTime<Utc>,
        /// Run number, carried by every tick of this run
        session: u64,
    },

    /// The countdown reached zero. Behaves like `Idle` but keeps the prompt
    /// on screen until stopped or restarted.
    Expired,
}

/// State of the countdown timer and its duration input
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub(crate) phase: TimerPhase,
    pub(crate) duration_field: String,
    pub(crate) error: Option<DurationError>,
    pub(crate) last_session: u64,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerState {
    /// Creates an idle timer with an empty input
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: TimerPhase::Idle,
            duration_field: String::new(),
            error: None,
            last_session: 0,
        }
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> &TimerPhase {
        &self.phase
    }

    /// Whether a countdown is in progress
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.phase, TimerPhase::Running { .. })
    }

    /// Whether the last countdown ran out and has not been dismissed
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        matches!(self.phase, TimerPhase::Expired)
    }

    /// Minutes left: the count while running, 0 once expired, `None` when idle
    #[must_use]
    pub const fn remaining_minutes(&self) -> Option<u32> {
        match self.phase {
            TimerPhase::Running {
                remaining_minutes, ..
            } => Some(remaining_minutes),
            TimerPhase::Expired => Some(0),
            TimerPhase::Idle => None,
        }
    }

    /// Start time of the current run
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        match self.phase {
            TimerPhase::Running { started_at, .. } => Some(started_at),
            TimerPhase::Idle | TimerPhase::Expired => None,
        }
    }

    /// Text currently in the duration input
    #[must_use]
    pub fn duration_field(&self) -> &str {
        &self.duration_field
    }

    /// Last rejected start, if not yet cleared
    #[must_use]
    pub const fn error(&self) -> Option<DurationError> {
        self.error
    }

    /// Heading shown above the timer
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self.phase {
            TimerPhase::Idle => "Set a time limit",
            TimerPhase::Running { .. } => "Finish your todos",
            TimerPhase::Expired => "Time is up! Pick a todo and begin",
        }
    }

    /// Empties the duration input and forgets the last error
    pub fn clear_input(&mut self) {
        self.duration_field.clear();
        self.error = None;
    }
}

/// Actions on the countdown timer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerAction {
    /// Replace the duration input. Whole numbers above [`MAX_MINUTES`] are
    /// dropped and the previous text is kept.
    EditDuration {
        /// New input text
        text: String,
    },

    /// Start a countdown
    Start {
        /// Minutes to count down; `None` uses the duration input
        input: Option<String>,
    },

    /// One tick period elapsed for the run tagged `session`
    Tick {
        /// Run the tick belongs to
        session: u64,
    },

    /// Stop the countdown, or dismiss the expiry prompt
    Stop,
}

/// Environment dependencies for the timer reducer
#[derive(Clone)]
pub struct TimerEnvironment {
    /// Clock stamping the start of each run
    pub clock: Arc<dyn Clock>,
    /// Time between two ticks
    pub tick_period: Duration,
}

impl TimerEnvironment {
    /// Creates a new `TimerEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, tick_period: Duration) -> Self {
        Self { clock, tick_period }
    }
}

impl std::fmt::Debug for TimerEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEnvironment")
            .field("tick_period", &self.tick_period)
            .finish_non_exhaustive()
    }
}
