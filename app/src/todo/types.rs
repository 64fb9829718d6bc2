//! Domain types for the todo list.
//!
//! Records are kept newest first. Ids come from a counter owned by the
//! list itself, so two lists never share a sequence and an id is never
//! handed out twice by the same list.

use serde::{Deserialize, Serialize};

/// Identifier of a todo record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from its numeric value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,
    /// Text of the todo, never empty
    pub body: String,
    /// Whether the todo is done
    pub completed: bool,
}

impl Todo {
    /// Creates a new, open todo
    #[must_use]
    pub const fn new(id: TodoId, body: String) -> Self {
        Self {
            id,
            body,
            completed: false,
        }
    }
}

/// State of the todo list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoState {
    pub(crate) todos: Vec<Todo>,
    pub(crate) next_id: u64,
}

impl Default for TodoState {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoState {
    /// Creates an empty list whose first id will be 1
    #[must_use]
    pub const fn new() -> Self {
        Self {
            todos: Vec::new(),
            next_id: 1,
        }
    }

    /// All records, newest first
    #[must_use]
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// Returns the number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Returns the number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn exists(&self, id: TodoId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn get_mut(&mut self, id: TodoId) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|t| t.id == id)
    }

    pub(crate) fn allocate_id(&mut self) -> TodoId {
        let id = TodoId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Actions on the todo list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    /// Add a todo at the top of the list (empty text is ignored)
    Add {
        /// Text of the new todo
        text: String,
    },

    /// Flip the completed flag
    Toggle {
        /// Todo to toggle
        id: TodoId,
    },

    /// Replace the body (empty body is ignored)
    Update {
        /// Todo to edit
        id: TodoId,
        /// New text
        body: String,
    },

    /// Remove a todo
    Delete {
        /// Todo to delete
        id: TodoId,
    },
}
