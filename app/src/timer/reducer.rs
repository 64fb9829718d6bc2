//! Reducer logic for the countdown timer.
//!
//! A start installs one repeating tick tagged with a fresh session number.
//! Only ticks carrying the current session move the countdown, so a tick
//! that was already in flight when its run ended is dropped here even if
//! the runtime delivers it.

use super::types::{
    parse_minutes, TimerAction, TimerEnvironment, TimerPhase, TimerState, MAX_MINUTES, TIMER_TICK,
};
use todo_timer_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};

/// Reducer for the countdown timer
#[derive(Clone, Copy, Debug, Default)]
pub struct TimerReducer;

impl TimerReducer {
    /// Creates a new `TimerReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Whether the text reads as a whole number above the limit
    ///
    /// Only the leading digits count, after an optional `+`, so `"75min"`
    /// and `"+75"` are over the limit.
    fn exceeds_limit(text: &str) -> bool {
        let trimmed = text.trim_start();
        let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let digits_end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let significant = trimmed[..digits_end].trim_start_matches('0');

        significant.len() > 2
            || significant
                .parse::<u32>()
                .is_ok_and(|minutes| minutes > MAX_MINUTES)
    }

    fn start(
        state: &mut TimerState,
        input: Option<String>,
        env: &TimerEnvironment,
    ) -> SmallVec<[Effect<TimerAction>; 4]> {
        if state.is_running() {
            tracing::debug!("Start ignored, timer already running");
            return SmallVec::new();
        }

        let input = input.unwrap_or_else(|| state.duration_field.clone());
        let minutes = match parse_minutes(&input) {
            Ok(minutes) => minutes,
            Err(error) => {
                tracing::debug!(%error, "Rejected timer duration");
                state.error = Some(error);
                return SmallVec::new();
            },
        };

        state.last_session += 1;
        let session = state.last_session;
        state.phase = TimerPhase::Running {
            remaining_minutes: minutes,
            started_at: env.clock.now(),
            session,
        };
        state.clear_input();
        tracing::info!(minutes, session, "Timer started");

        smallvec![Effect::Interval {
            id: TIMER_TICK,
            period: env.tick_period,
            action: Box::new(TimerAction::Tick { session }),
        }]
    }

    fn tick(state: &mut TimerState, session: u64) -> SmallVec<[Effect<TimerAction>; 4]> {
        let TimerPhase::Running {
            remaining_minutes,
            session: current,
            ..
        } = &mut state.phase
        else {
            tracing::debug!(session, "Tick ignored, timer not running");
            return SmallVec::new();
        };

        if *current != session {
            tracing::debug!(session, current = *current, "Stale tick ignored");
            return SmallVec::new();
        }

        if *remaining_minutes <= 1 {
            state.phase = TimerPhase::Expired;
            state.clear_input();
            tracing::info!(session, "Timer expired");
            return smallvec![Effect::Cancel(TIMER_TICK)];
        }

        *remaining_minutes -= 1;
        tracing::debug!(remaining = *remaining_minutes, "Timer ticked");
        SmallVec::new()
    }

    fn stop(state: &mut TimerState) -> SmallVec<[Effect<TimerAction>; 4]> {
        match state.phase {
            TimerPhase::Running { session, .. } => {
                state.phase = TimerPhase::Idle;
                state.clear_input();
                tracing::info!(session, "Timer stopped");
                smallvec![Effect::Cancel(TIMER_TICK)]
            },
            TimerPhase::Expired => {
                state.phase = TimerPhase::Idle;
                state.clear_input();
                SmallVec::new()
            },
            TimerPhase::Idle => {
                tracing::debug!("Stop ignored, timer idle");
                SmallVec::new()
            },
        }
    }
}

impl Reducer for TimerReducer {
    type State = TimerState;
    type Action = TimerAction;
    type Environment = TimerEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TimerAction::EditDuration { text } => {
                if Self::exceeds_limit(&text) {
                    tracing::debug!(%text, "Duration input over the limit, keeping previous value");
                } else {
                    state.duration_field = text;
                }
                SmallVec::new()
            },
            TimerAction::Start { input } => Self::start(state, input, env),
            TimerAction::Tick { session } => Self::tick(state, session),
            TimerAction::Stop => Self::stop(state),
        }
    }
}
