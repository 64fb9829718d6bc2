//! Reducer logic for the todo list.
//!
//! Every action either applies in full or leaves the list untouched. Missing
//! ids and empty text are not errors: they are logged and dropped.

use super::types::{Todo, TodoAction, TodoState};
use todo_timer_core::{effect::Effect, reducer::Reducer, SmallVec};

/// Reducer for the todo list
///
/// Needs no environment and never produces effects.
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodoAction::Add { text } => {
                if text.is_empty() {
                    tracing::debug!("Ignoring empty todo");
                    return SmallVec::new();
                }

                let id = state.allocate_id();
                state.todos.insert(0, Todo::new(id, text));
                tracing::debug!(%id, "Todo added");
            },
            TodoAction::Toggle { id } => match state.get_mut(id) {
                Some(todo) => {
                    todo.completed = !todo.completed;
                    tracing::debug!(%id, completed = todo.completed, "Todo toggled");
                },
                None => tracing::debug!(%id, "Toggle ignored, no such todo"),
            },
            TodoAction::Update { id, body } => {
                if body.is_empty() {
                    tracing::debug!(%id, "Ignoring empty edit");
                    return SmallVec::new();
                }

                match state.get_mut(id) {
                    Some(todo) => todo.body = body,
                    None => tracing::debug!(%id, "Update ignored, no such todo"),
                }
            },
            TodoAction::Delete { id } => {
                let before = state.todos.len();
                state.todos.retain(|t| t.id != id);
                if state.todos.len() == before {
                    tracing::debug!(%id, "Delete ignored, no such todo");
                }
            },
        }

        SmallVec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::TodoId;
    use proptest::prelude::*;
    use todo_timer_testing::{assertions, ReducerTest};

    fn add(text: &str) -> TodoAction {
        TodoAction::Add {
            text: text.to_string(),
        }
    }

    fn seeded(bodies: &[&str]) -> TodoState {
        let mut state = TodoState::new();
        for body in bodies {
            let _ = TodoReducer.reduce(&mut state, add(body), &());
        }
        state
    }

    fn ids(state: &TodoState) -> Vec<u64> {
        state.todos().iter().map(|t| t.id.get()).collect()
    }

    #[test]
    fn add_prepends_open_todo() {
        ReducerTest::new(TodoReducer::new())
            .with_env(())
            .given_state(seeded(&["walk dog"]))
            .when_action(add("buy milk"))
            .then_state(|state| {
                assert_eq!(state.count(), 2);
                assert_eq!(state.todos()[0], Todo::new(TodoId::new(2), "buy milk".to_string()));
                assert_eq!(state.todos()[1].body, "walk dog");
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn add_empty_text_is_ignored() {
        ReducerTest::new(TodoReducer::new())
            .with_env(())
            .given_state(TodoState::new())
            .when_action(add(""))
            .when_action(add("first"))
            .then_state(|state| {
                assert_eq!(state.count(), 1);
                // The rejected add did not consume an id
                assert_eq!(state.todos()[0].id, TodoId::new(1));
            })
            .run();
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        ReducerTest::new(TodoReducer::new())
            .with_env(())
            .given_state(seeded(&["a", "b"]))
            .when_action(TodoAction::Delete { id: TodoId::new(2) })
            .when_action(add("c"))
            .then_state(|state| assert_eq!(ids(state), vec![3, 1]))
            .run();
    }

    #[test]
    fn toggle_flips_only_target() {
        ReducerTest::new(TodoReducer::new())
            .with_env(())
            .given_state(seeded(&["a", "b", "c"]))
            .when_action(TodoAction::Toggle { id: TodoId::new(2) })
            .then_state(|state| {
                assert_eq!(ids(state), vec![3, 2, 1]);
                assert_eq!(state.completed_count(), 1);
                assert!(state.get(TodoId::new(2)).is_some_and(|t| t.completed));
            })
            .run();
    }

    #[test]
    fn toggle_missing_id_is_noop() {
        let before = seeded(&["a"]);
        let expected = before.clone();

        ReducerTest::new(TodoReducer::new())
            .with_env(())
            .given_state(before)
            .when_action(TodoAction::Toggle { id: TodoId::new(42) })
            .then_state(move |state| assert_eq!(*state, expected))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn update_replaces_body_only() {
        ReducerTest::new(TodoReducer::new())
            .with_env(())
            .given_state(seeded(&["a", "b"]))
            .when_action(TodoAction::Toggle { id: TodoId::new(1) })
            .when_action(TodoAction::Update {
                id: TodoId::new(1),
                body: "x".to_string(),
            })
            .then_state(|state| {
                let todo = state.get(TodoId::new(1));
                assert_eq!(todo.map(|t| t.body.as_str()), Some("x"));
                assert!(todo.is_some_and(|t| t.completed));
                assert_eq!(ids(state), vec![2, 1]);
            })
            .run();
    }

    #[test]
    fn update_with_empty_body_keeps_text() {
        ReducerTest::new(TodoReducer::new())
            .with_env(())
            .given_state(seeded(&["keep me"]))
            .when_action(TodoAction::Update {
                id: TodoId::new(1),
                body: String::new(),
            })
            .then_state(|state| {
                assert_eq!(state.get(TodoId::new(1)).map(|t| t.body.as_str()), Some("keep me"));
            })
            .run();
    }

    #[test]
    fn delete_keeps_order_of_the_rest() {
        ReducerTest::new(TodoReducer::new())
            .with_env(())
            .given_state(seeded(&["a", "b", "c", "d"]))
            .when_action(TodoAction::Delete { id: TodoId::new(3) })
            .then_state(|state| assert_eq!(ids(state), vec![4, 2, 1]))
            .run();
    }

    #[test]
    fn delete_missing_id_is_noop() {
        ReducerTest::new(TodoReducer::new())
            .with_env(())
            .given_state(seeded(&["a"]))
            .when_action(TodoAction::Delete { id: TodoId::new(9) })
            .then_state(|state| assert_eq!(ids(state), vec![1]))
            .run();
    }

    #[test]
    fn update_missing_id_is_noop() {
        let before = seeded(&["a"]);
        let expected = before.clone();

        ReducerTest::new(TodoReducer::new())
            .with_env(())
            .given_state(before)
            .when_action(TodoAction::Update {
                id: TodoId::new(42),
                body: "x".to_string(),
            })
            .then_state(move |state| assert_eq!(*state, expected))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    proptest! {
        #[test]
        fn adds_yield_distinct_increasing_ids(bodies in prop::collection::vec("[a-z]{1,12}", 0..40)) {
            let mut state = TodoState::new();
            for body in &bodies {
                let _ = TodoReducer.reduce(&mut state, add(body), &());
            }

            prop_assert_eq!(state.count(), bodies.len());
            // Newest first: ids strictly decrease down the list
            let ids = ids(&state);
            prop_assert!(ids.windows(2).all(|w| w[0] > w[1]));
        }

        #[test]
        fn toggle_twice_is_identity(len in 1usize..20, pick in any::<prop::sample::Index>()) {
            let bodies: Vec<String> = (0..len).map(|i| format!("todo {i}")).collect();
            let refs: Vec<&str> = bodies.iter().map(String::as_str).collect();
            let mut state = seeded(&refs);
            let before = state.clone();
            let id = state.todos()[pick.index(len)].id;

            let _ = TodoReducer.reduce(&mut state, TodoAction::Toggle { id }, &());
            prop_assert_ne!(&state, &before);
            let _ = TodoReducer.reduce(&mut state, TodoAction::Toggle { id }, &());
            prop_assert_eq!(state, before);
        }

        #[test]
        fn delete_removes_exactly_one(len in 1usize..20, pick in any::<prop::sample::Index>()) {
            let bodies: Vec<String> = (0..len).map(|i| format!("todo {i}")).collect();
            let refs: Vec<&str> = bodies.iter().map(String::as_str).collect();
            let mut state = seeded(&refs);
            let id = state.todos()[pick.index(len)].id;
            let mut expected = ids(&state);
            expected.retain(|&other| other != id.get());

            let _ = TodoReducer.reduce(&mut state, TodoAction::Delete { id }, &());
            prop_assert_eq!(ids(&state), expected);

            let again = state.clone();
            let _ = TodoReducer.reduce(&mut state, TodoAction::Delete { id }, &());
            prop_assert_eq!(state, again);
        }
    }
}
