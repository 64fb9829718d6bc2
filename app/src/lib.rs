//! Terminal todo list with a countdown timer.
//!
//! The application is a set of reducers running on the todo timer
//! [`Store`](todo_timer_runtime::Store):
//!
//! - [`todo`]: the list of records (add, toggle, edit, delete)
//! - [`filter`]: the all / incomplete / completed view
//! - [`timer`]: an Idle / Running / Expired countdown ticking once a minute
//! - [`app`]: the composition of the above plus overlay and edit mode
//!
//! Input arrives as lines ([`command`]), output is plain text ([`view`]),
//! and [`session`] glues the two to the store.
//!
//! # Quick Start
//!
//! ```no_run
//! use todo_timer::app::{app_store, AppAction, AppEnvironment};
//! use todo_timer::config::Config;
//! use todo_timer::todo::TodoAction;
//!
//! # async fn example() -> Result<(), todo_timer_runtime::StoreError> {
//! let config = Config::from_env();
//! let store = app_store(AppEnvironment::live(&config), &config);
//!
//! store
//!     .send(AppAction::Todo(TodoAction::Add {
//!         text: "Buy milk".to_string(),
//!     }))
//!     .await?;
//!
//! let count = store.state(|s| s.todos.count()).await;
//! assert_eq!(count, 1);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod command;
pub mod config;
pub mod filter;
pub mod session;
pub mod timer;
pub mod todo;
pub mod view;

// Re-export commonly used types
pub use app::{app_store, AppAction, AppEnvironment, AppReducer, AppState, AppStore, Overlay};
pub use config::Config;
pub use filter::{filter_todos, Filter};
pub use timer::{TimerAction, TimerReducer, TimerState};
pub use todo::{Todo, TodoAction, TodoId, TodoReducer, TodoState};
