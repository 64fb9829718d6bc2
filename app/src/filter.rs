//! Filter view over the todo list.
//!
//! Filtering borrows from the list and never mutates it; the view is
//! recomputed on every read.

use crate::todo::Todo;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Which todos are shown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every todo
    #[default]
    All,
    /// Todos not yet done
    Incomplete,
    /// Todos already done
    Completed,
}

impl Filter {
    /// Every filter, in display order
    pub const ALL: [Self; 3] = [Self::All, Self::Incomplete, Self::Completed];

    /// Name used on the command line and in the filter bar
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Incomplete => "incomplete",
            Self::Completed => "completed",
        }
    }

    /// Whether a todo belongs in this view
    #[must_use]
    pub const fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Incomplete => !todo.completed,
            Self::Completed => todo.completed,
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when text names no filter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown filter `{0}`, expected all, incomplete or completed")]
pub struct ParseFilterError(String);

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseFilterError(s.to_string()))
    }
}

/// Returns the todos matching `filter`, keeping their order
///
/// # Examples
///
/// ```
/// use todo_timer::filter::{filter_todos, Filter};
/// use todo_timer::todo::{Todo, TodoId};
///
/// let mut done = Todo::new(TodoId::new(2), "file taxes".to_string());
/// done.completed = true;
/// let open = Todo::new(TodoId::new(1), "call mom".to_string());
/// let todos = vec![done, open];
///
/// let completed = filter_todos(&todos, Filter::Completed);
/// assert_eq!(completed.len(), 1);
/// assert_eq!(completed[0].body, "file taxes");
/// ```
#[must_use]
pub fn filter_todos(todos: &[Todo], filter: Filter) -> Vec<&Todo> {
    todos.iter().filter(|todo| filter.matches(todo)).collect()
}
