//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers in various ways:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Embed a child reducer in a parent state, action and
//!   environment
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use todo_timer_core::composition::{combine_reducers, scope_reducer, SharedReducer};
//! use todo_timer_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Clone, Default)]
//! struct Tally {
//!     hits: u32,
//! }
//!
//! #[derive(Clone)]
//! enum TallyAction {
//!     Hit,
//! }
//!
//! #[derive(Clone)]
//! struct TallyReducer;
//!
//! impl Reducer for TallyReducer {
//!     type State = Tally;
//!     type Action = TallyAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut Tally, action: TallyAction, _env: &()) -> SmallVec<[Effect<TallyAction>; 4]> {
//!         match action {
//!             TallyAction::Hit => state.hits += 1,
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! #[derive(Clone, Default)]
//! struct Board {
//!     left: Tally,
//!     right: Tally,
//! }
//!
//! #[derive(Clone)]
//! enum BoardAction {
//!     Left(TallyAction),
//!     Right(TallyAction),
//! }
//!
//! let left = scope_reducer(
//!     TallyReducer,
//!     |board: &mut Board| &mut board.left,
//!     |action| match action {
//!         BoardAction::Left(action) => Some(action),
//!         BoardAction::Right(_) => None,
//!     },
//!     BoardAction::Left,
//!     |env: &()| env,
//! );
//! let right = scope_reducer(
//!     TallyReducer,
//!     |board: &mut Board| &mut board.right,
//!     |action| match action {
//!         BoardAction::Right(action) => Some(action),
//!         BoardAction::Left(_) => None,
//!     },
//!     BoardAction::Right,
//!     |env: &()| env,
//! );
//!
//! let reducers: Vec<SharedReducer<Board, BoardAction, ()>> = vec![Arc::new(left), Arc::new(right)];
//! let board = combine_reducers(reducers);
//! let mut state = Board::default();
//! let _ = board.reduce(&mut state, BoardAction::Right(TallyAction::Hit), &());
//! assert_eq!(state.left.hits, 0);
//! assert_eq!(state.right.hits, 1);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;
use std::sync::Arc;

/// A reducer that can be shared across the runtime's tasks
pub type SharedReducer<S, A, E> = Arc<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence, and all effects are collected and concatenated.
/// This is useful when you want to split reducer logic across multiple implementations.
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<SharedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    CombinedReducer {
        reducers: reducers.into(),
    }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    reducers: Arc<[SharedReducer<S, A, E>]>,
}

impl<S, A, E> Clone for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    fn clone(&self) -> Self {
        Self {
            reducers: Arc::clone(&self.reducers),
        }
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &*self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects);
        }

        all_effects
    }
}

/// Scopes a child reducer into a parent domain.
///
/// - `state` focuses the parent state on the child's slice
/// - `extract` picks the child action out of a parent action (`None` skips)
/// - `embed` lifts the actions produced by child effects back to the parent
/// - `environment` focuses the parent environment on the child's dependencies
pub fn scope_reducer<S, A, E, R>(
    reducer: R,
    state: fn(&mut S) -> &mut R::State,
    extract: fn(A) -> Option<R::Action>,
    embed: fn(R::Action) -> A,
    environment: fn(&E) -> &R::Environment,
) -> ScopedReducer<S, A, E, R>
where
    R: Reducer,
    R::Action: 'static,
    A: 'static,
{
    ScopedReducer {
        reducer,
        state,
        extract,
        embed,
        environment,
    }
}

/// A reducer running a child reducer on a slice of parent state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, A, E, R>
where
    R: Reducer,
{
    reducer: R,
    state: fn(&mut S) -> &mut R::State,
    extract: fn(A) -> Option<R::Action>,
    embed: fn(R::Action) -> A,
    environment: fn(&E) -> &R::Environment,
}

impl<S, A, E, R> Clone for ScopedReducer<S, A, E, R>
where
    R: Reducer + Clone,
{
    fn clone(&self) -> Self {
        Self {
            reducer: self.reducer.clone(),
            state: self.state,
            extract: self.extract,
            embed: self.embed,
            environment: self.environment,
        }
    }
}

impl<S, A, E, R> Reducer for ScopedReducer<S, A, E, R>
where
    R: Reducer,
    R::Action: 'static,
    A: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let Some(child_action) = (self.extract)(action) else {
            return SmallVec::new();
        };

        let child_state = (self.state)(state);
        let child_env = (self.environment)(env);

        self.reducer
            .reduce(child_state, child_action, child_env)
            .into_iter()
            .map(|effect| effect.map(self.embed))
            .collect()
    }
}
