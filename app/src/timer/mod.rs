//! The countdown timer: a three-phase state machine driven by a
//! once-per-period tick.

pub mod reducer;
pub mod types;

pub use reducer::TimerReducer;
pub use types::{
    parse_minutes, DurationError, TimerAction, TimerEnvironment, TimerPhase, TimerState,
    DEFAULT_TICK_PERIOD, MAX_MINUTES, TIMER_TICK,
};
