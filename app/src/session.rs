//! Interactive session: turns committed lines into store actions and
//! decides what to print back.

use crate::app::{AppAction, AppStore};
use crate::command::{parse, Command, Screen, MAIN_HELP, TIMER_HELP};
use crate::timer::TimerAction;
use crate::view;
use thiserror::Error;
use todo_timer_runtime::StoreError;

/// Errors that end the session
#[derive(Error, Debug)]
pub enum SessionError {
    /// The store refused the action
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The todo list could not be exported
    #[error("failed to export todos: {0}")]
    Export(#[from] serde_json::Error),
}

/// What to do after a line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// Print this text and keep reading
    Print(String),
    /// Stop reading
    Quit,
}

/// Handles one committed line
///
/// Malformed commands are answered inline and never end the session.
///
/// # Errors
///
/// Returns [`SessionError`] if the store is shutting down or the export
/// fails to serialize.
pub async fn handle_line(store: &AppStore, line: &str) -> Result<Reply, SessionError> {
    let screen = store.state(Screen::of).await;

    let command = match parse(line, screen) {
        Ok(command) => command,
        Err(error) => {
            tracing::debug!(%error, line, "Rejected command");
            metrics::counter!("session.commands.rejected").increment(1);
            return Ok(Reply::Print(format!("! {error}\n")));
        },
    };

    let reply = match command {
        Command::Dispatch(action) => {
            store.send(action).await?;
            Reply::Print(store.state(view::render).await)
        },
        Command::Export => {
            let json = store
                .state(|state| serde_json::to_string_pretty(state.todos.todos()))
                .await?;
            Reply::Print(format!("{json}\n"))
        },
        Command::Help => {
            let help = match screen {
                Screen::Main { .. } => MAIN_HELP,
                Screen::Timer => TIMER_HELP,
            };
            Reply::Print(format!("{help}\n"))
        },
        Command::Quit => Reply::Quit,
    };

    Ok(reply)
}

/// Output for an action the store produced on its own, if any
///
/// Ticks re-render the overlay when it is open and the status line
/// otherwise.
pub async fn on_observed(store: &AppStore, action: &AppAction) -> Option<String> {
    if !matches!(action, AppAction::Timer(TimerAction::Tick { .. })) {
        return None;
    }

    store
        .state(|state| {
            if state.overlay_open() {
                Some(view::render_timer(state))
            } else {
                view::status_line(state).map(|line| format!("{line}\n"))
            }
        })
        .await
}
