//! Application state and the root reducer.
//!
//! The root reducer is assembled from three parts that each see every
//! action, in this order:
//!
//! 1. the todo reducer, scoped to [`AppState::todos`]
//! 2. the timer reducer, scoped to [`AppState::timer`]
//! 3. the view reducer, for the filter bar, the timer overlay and edit mode
//!
//! The view reducer runs last so it observes the todo and timer slices
//! after they have been updated by the same action.

use crate::config::Config;
use crate::filter::{filter_todos, Filter};
use crate::timer::{TimerAction, TimerEnvironment, TimerReducer, TimerState};
use crate::todo::{Todo, TodoAction, TodoId, TodoReducer, TodoState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use todo_timer_core::composition::{combine_reducers, scope_reducer, CombinedReducer, SharedReducer};
use todo_timer_core::environment::{Clock, SystemClock};
use todo_timer_core::{effect::Effect, reducer::Reducer, SmallVec};
use todo_timer_runtime::Store;

/// Visibility of the timer overlay
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Overlay {
    /// Not shown
    #[default]
    Hidden,
    /// Shown and taking input
    Open,
    /// Closed while a countdown runs; the countdown keeps going
    Minimized,
}

/// State of the whole application
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    /// The todo list
    pub todos: TodoState,
    /// The countdown timer
    pub timer: TimerState,
    /// Active filter
    pub filter: Filter,
    /// Timer overlay visibility
    pub overlay: Overlay,
    /// Todo currently being edited
    pub editing: Option<TodoId>,
}

impl AppState {
    /// Creates the initial state: no todos, idle timer, everything shown
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Todos passing the active filter, newest first
    #[must_use]
    pub fn visible_todos(&self) -> Vec<&Todo> {
        filter_todos(self.todos.todos(), self.filter)
    }

    /// Whether the timer overlay is taking input
    #[must_use]
    pub fn overlay_open(&self) -> bool {
        self.overlay == Overlay::Open
    }
}

/// Every input the application reacts to
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppAction {
    /// Todo list action
    Todo(TodoAction),
    /// Timer action
    Timer(TimerAction),
    /// Change the active filter
    SetFilter(Filter),
    /// Show the timer overlay
    OpenTimer,
    /// Hide the timer overlay
    CloseTimer,
    /// Enter edit mode for a todo
    BeginEdit(TodoId),
    /// Leave edit mode without saving
    CancelEdit,
}

/// Environment dependencies for the application
#[derive(Clone, Debug)]
pub struct AppEnvironment {
    /// Timer dependencies
    pub timer: TimerEnvironment,
}

impl AppEnvironment {
    /// Creates a new `AppEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, config: &Config) -> Self {
        Self {
            timer: TimerEnvironment::new(clock, config.tick_period),
        }
    }

    /// Production environment: system clock and configured tick period
    #[must_use]
    pub fn live(config: &Config) -> Self {
        Self::new(Arc::new(SystemClock), config)
    }
}

/// Store running the application reducer
pub type AppStore = Store<AppState, AppAction, AppEnvironment, AppReducer>;

/// Builds a store for the application
#[must_use]
pub fn app_store(environment: AppEnvironment, config: &Config) -> AppStore {
    Store::with_config(AppState::new(), AppReducer::new(), environment, config.store_config())
}

fn todos_slice(state: &mut AppState) -> &mut TodoState {
    &mut state.todos
}

fn timer_slice(state: &mut AppState) -> &mut TimerState {
    &mut state.timer
}

fn todo_action(action: AppAction) -> Option<TodoAction> {
    match action {
        AppAction::Todo(action) => Some(action),
        _ => None,
    }
}

fn timer_action(action: AppAction) -> Option<TimerAction> {
    match action {
        AppAction::Timer(action) => Some(action),
        _ => None,
    }
}

const fn no_environment(_: &AppEnvironment) -> &() {
    &()
}

fn timer_environment(env: &AppEnvironment) -> &TimerEnvironment {
    &env.timer
}

/// Reducer for everything the todo and timer reducers do not own
#[derive(Clone, Copy, Debug, Default)]
struct ViewReducer;

impl Reducer for ViewReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AppAction::SetFilter(filter) => {
                tracing::debug!(%filter, "Filter changed");
                state.filter = filter;
            },
            AppAction::OpenTimer => {
                state.overlay = Overlay::Open;
                state.timer.clear_input();
            },
            AppAction::CloseTimer => {
                state.overlay = if state.timer.is_running() {
                    Overlay::Minimized
                } else {
                    Overlay::Hidden
                };
                state.timer.clear_input();
            },
            AppAction::BeginEdit(id) => {
                if state.todos.exists(id) {
                    state.editing = Some(id);
                } else {
                    tracing::debug!(%id, "Edit ignored, no such todo");
                }
            },
            AppAction::CancelEdit | AppAction::Todo(TodoAction::Update { .. }) => {
                state.editing = None;
            },
            AppAction::Todo(TodoAction::Delete { id }) if state.editing == Some(id) => {
                state.editing = None;
            },
            AppAction::Timer(TimerAction::Tick { .. })
                if state.timer.is_expired() && state.overlay == Overlay::Minimized =>
            {
                tracing::info!("Time is up, reopening timer");
                state.overlay = Overlay::Open;
            },
            AppAction::Todo(_) | AppAction::Timer(_) => {},
        }

        SmallVec::new()
    }
}

/// Root reducer of the application
#[derive(Clone)]
pub struct AppReducer {
    inner: CombinedReducer<AppState, AppAction, AppEnvironment>,
}

impl AppReducer {
    /// Creates a new `AppReducer`
    #[must_use]
    pub fn new() -> Self {
        let reducers: Vec<SharedReducer<AppState, AppAction, AppEnvironment>> = vec![
            Arc::new(scope_reducer(
                TodoReducer::new(),
                todos_slice,
                todo_action,
                AppAction::Todo,
                no_environment,
            )),
            Arc::new(scope_reducer(
                TimerReducer::new(),
                timer_slice,
                timer_action,
                AppAction::Timer,
                timer_environment,
            )),
            Arc::new(ViewReducer),
        ];

        Self {
            inner: combine_reducers(reducers),
        }
    }
}

impl Default for AppReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AppReducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppReducer").finish_non_exhaustive()
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        self.inner.reduce(state, action, env)
    }
}
