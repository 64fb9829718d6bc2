//! Line commands read from standard input.
//!
//! One line is one committed intent. What a line means depends on the
//! screen: the main list, or the timer overlay when it is open. While a
//! todo is in edit mode, a plain line on the main screen replaces its text.

use crate::app::{AppAction, AppState};
use crate::filter::{Filter, ParseFilterError};
use crate::timer::TimerAction;
use crate::todo::{TodoAction, TodoId};
use thiserror::Error;

/// Help text for the main screen
pub const MAIN_HELP: &str = "\
commands:
  <text> | add <text>    add a todo (replaces the text while editing)
  toggle <id>            mark done or not done
  delete <id>            remove a todo
  edit <id> [text]       edit a todo, or replace its text directly
  cancel                 leave edit mode
  filter <name>          all, incomplete or completed
  timer                  open the timer
  export                 print the list as JSON
  help                   show this help
  quit                   exit";

/// Help text for the timer overlay
pub const TIMER_HELP: &str = "\
timer commands:
  <minutes>              set the duration (60 or less)
  start [minutes]        start the countdown
  stop                   stop the countdown
  close                  hide the timer
  help                   show this help
  quit                   exit";

/// Input context a line is read in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    /// The todo list, optionally with a todo in edit mode
    Main {
        /// Todo being edited
        editing: Option<TodoId>,
    },
    /// The timer overlay
    Timer,
}

impl Screen {
    /// The screen input currently goes to
    #[must_use]
    pub fn of(state: &AppState) -> Self {
        if state.overlay_open() {
            Self::Timer
        } else {
            Self::Main {
                editing: state.editing,
            }
        }
    }
}

/// What a line asks for
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Send an action to the store
    Dispatch(AppAction),
    /// Print the todo list as JSON
    Export,
    /// Print help for the current screen
    Help,
    /// Exit
    Quit,
}

/// Why a line could not be understood
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The command needs a todo id
    #[error("`{0}` needs a todo id")]
    MissingId(&'static str),

    /// The id is not a number
    #[error("`{0}` is not a todo id")]
    InvalidId(String),

    /// `filter` without a name
    #[error("`filter` needs a name: all, incomplete or completed")]
    MissingFilter,

    /// `filter` with an unknown name
    #[error(transparent)]
    Filter(#[from] ParseFilterError),
}

/// Parses one committed line in the context of `screen`
///
/// # Errors
///
/// Returns a [`CommandError`] when a command's arguments are missing or
/// malformed. Unknown words are never an error: they become a new todo, or
/// the duration input on the timer screen.
///
/// # Examples
///
/// ```
/// use todo_timer::command::{parse, Command, Screen};
/// use todo_timer::app::AppAction;
/// use todo_timer::todo::{TodoAction, TodoId};
///
/// let screen = Screen::Main { editing: None };
/// assert_eq!(
///     parse("toggle 3", screen),
///     Ok(Command::Dispatch(AppAction::Todo(TodoAction::Toggle { id: TodoId::new(3) })))
/// );
/// ```
pub fn parse(line: &str, screen: Screen) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = split_word(line);

    match screen {
        Screen::Main { editing } => parse_main(line, word, rest, editing),
        Screen::Timer => Ok(parse_timer(line, word, rest)),
    }
}

fn split_word(line: &str) -> (&str, &str) {
    line.split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim_start()))
}

fn parse_id(command: &'static str, text: &str) -> Result<TodoId, CommandError> {
    if text.is_empty() {
        return Err(CommandError::MissingId(command));
    }
    text.parse::<u64>()
        .map(TodoId::new)
        .map_err(|_| CommandError::InvalidId(text.to_string()))
}

fn todo(action: TodoAction) -> Command {
    Command::Dispatch(AppAction::Todo(action))
}

fn parse_main(
    line: &str,
    word: &str,
    rest: &str,
    editing: Option<TodoId>,
) -> Result<Command, CommandError> {
    let command = match word {
        "add" => todo(TodoAction::Add {
            text: rest.to_string(),
        }),
        "toggle" => todo(TodoAction::Toggle {
            id: parse_id("toggle", rest)?,
        }),
        "delete" => todo(TodoAction::Delete {
            id: parse_id("delete", rest)?,
        }),
        "edit" => {
            let (id, body) = split_word(rest);
            let id = parse_id("edit", id)?;
            if body.is_empty() {
                Command::Dispatch(AppAction::BeginEdit(id))
            } else {
                todo(TodoAction::Update {
                    id,
                    body: body.to_string(),
                })
            }
        },
        "cancel" => Command::Dispatch(AppAction::CancelEdit),
        "filter" if rest.is_empty() => return Err(CommandError::MissingFilter),
        "filter" => Command::Dispatch(AppAction::SetFilter(rest.parse::<Filter>()?)),
        "timer" => Command::Dispatch(AppAction::OpenTimer),
        "export" => Command::Export,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => match editing {
            Some(id) => todo(TodoAction::Update {
                id,
                body: line.to_string(),
            }),
            None => todo(TodoAction::Add {
                text: line.to_string(),
            }),
        },
    };

    Ok(command)
}

fn parse_timer(line: &str, word: &str, rest: &str) -> Command {
    let timer = |action| Command::Dispatch(AppAction::Timer(action));

    match word {
        "start" => timer(TimerAction::Start {
            input: (!rest.is_empty()).then(|| rest.to_string()),
        }),
        "stop" => timer(TimerAction::Stop),
        "close" => Command::Dispatch(AppAction::CloseTimer),
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => timer(TimerAction::EditDuration {
            text: line.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAIN: Screen = Screen::Main { editing: None };

    fn todo_cmd(action: TodoAction) -> Result<Command, CommandError> {
        Ok(Command::Dispatch(AppAction::Todo(action)))
    }

    #[test]
    fn plain_text_adds_a_todo() {
        assert_eq!(
            parse("  buy milk ", MAIN),
            todo_cmd(TodoAction::Add {
                text: "buy milk".to_string()
            })
        );
        assert_eq!(
            parse("add toggle the lights", MAIN),
            todo_cmd(TodoAction::Add {
                text: "toggle the lights".to_string()
            })
        );
    }

    #[test]
    fn blank_line_is_an_empty_add() {
        assert_eq!(parse("", MAIN), todo_cmd(TodoAction::Add { text: String::new() }));
    }

    #[test]
    fn id_commands() {
        assert_eq!(
            parse("delete 12", MAIN),
            todo_cmd(TodoAction::Delete { id: TodoId::new(12) })
        );
        assert_eq!(parse("toggle", MAIN), Err(CommandError::MissingId("toggle")));
        assert_eq!(
            parse("delete one", MAIN),
            Err(CommandError::InvalidId("one".to_string()))
        );
    }

    #[test]
    fn edit_with_and_without_text() {
        assert_eq!(
            parse("edit 2", MAIN),
            Ok(Command::Dispatch(AppAction::BeginEdit(TodoId::new(2))))
        );
        assert_eq!(
            parse("edit 2   call the bank", MAIN),
            todo_cmd(TodoAction::Update {
                id: TodoId::new(2),
                body: "call the bank".to_string()
            })
        );
    }

    #[test]
    fn plain_text_while_editing_updates() {
        let screen = Screen::Main {
            editing: Some(TodoId::new(4)),
        };
        assert_eq!(
            parse("new words", screen),
            todo_cmd(TodoAction::Update {
                id: TodoId::new(4),
                body: "new words".to_string()
            })
        );
        assert_eq!(parse("cancel", screen), Ok(Command::Dispatch(AppAction::CancelEdit)));
    }

    #[test]
    fn filter_command() {
        assert_eq!(
            parse("filter incomplete", MAIN),
            Ok(Command::Dispatch(AppAction::SetFilter(Filter::Incomplete)))
        );
        assert_eq!(parse("filter", MAIN), Err(CommandError::MissingFilter));
        assert!(matches!(parse("filter done", MAIN), Err(CommandError::Filter(_))));
    }

    #[test]
    fn main_screen_keywords() {
        assert_eq!(parse("timer", MAIN), Ok(Command::Dispatch(AppAction::OpenTimer)));
        assert_eq!(parse("export", MAIN), Ok(Command::Export));
        assert_eq!(parse("help", MAIN), Ok(Command::Help));
        assert_eq!(parse("quit", MAIN), Ok(Command::Quit));
    }

    #[test]
    fn timer_screen_commands() {
        let timer = |action| -> Result<Command, CommandError> { Ok(Command::Dispatch(AppAction::Timer(action))) };

        assert_eq!(
            parse("25", Screen::Timer),
            timer(TimerAction::EditDuration {
                text: "25".to_string()
            })
        );
        assert_eq!(parse("start", Screen::Timer), timer(TimerAction::Start { input: None }));
        assert_eq!(
            parse("start 10", Screen::Timer),
            timer(TimerAction::Start {
                input: Some("10".to_string())
            })
        );
        assert_eq!(parse("stop", Screen::Timer), timer(TimerAction::Stop));
        assert_eq!(parse("close", Screen::Timer), Ok(Command::Dispatch(AppAction::CloseTimer)));
    }

    #[test]
    fn screen_follows_overlay() {
        let mut state = AppState::new();
        assert_eq!(Screen::of(&state), MAIN);

        state.overlay = crate::app::Overlay::Open;
        assert_eq!(Screen::of(&state), Screen::Timer);

        state.overlay = crate::app::Overlay::Minimized;
        state.editing = Some(TodoId::new(1));
        assert_eq!(
            Screen::of(&state),
            Screen::Main {
                editing: Some(TodoId::new(1))
            }
        );
    }
}
