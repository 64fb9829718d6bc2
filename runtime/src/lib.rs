//! # Todo Timer Runtime
//!
//! Runtime implementation for the todo timer.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Scheduled effects**: Repeating effects registered by id, torn down by
//!   `Effect::Cancel` or on shutdown
//!
//! ## Example
//!
//! ```ignore
//! use todo_timer_runtime::Store;
//!
//! let store = Store::new(AppState::default(), AppReducer::new(), environment);
//!
//! // Send an action
//! store.send(AppAction::Todo(TodoAction::Add { text: "buy milk".into() })).await?;
//!
//! // Read state
//! let count = store.state(|s| s.todos.count()).await;
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use todo_timer_core::effect::{Effect, EffectId};
use todo_timer_core::reducer::Reducer;
use tokio::sync::{watch, RwLock};
use tokio::task::AbortHandle;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for an action's effects to complete
        #[error("Timeout waiting for effects")]
        Timeout,
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use todo_timer_runtime::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(128)
///     .with_shutdown_timeout(Duration::from_secs(2));
/// assert_eq!(config.broadcast_capacity, 128);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Capacity of the action broadcast channel
    pub broadcast_capacity: usize,
    /// Default timeout for graceful shutdown
    pub default_shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(broadcast_capacity: usize, default_shutdown_timeout: Duration) -> Self {
        Self {
            broadcast_capacity,
            default_shutdown_timeout,
        }
    }

    /// Set the action broadcast capacity (clamped to at least 1)
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = if capacity == 0 { 1 } else { capacity };
        self
    }

    /// Set the default shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.default_shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
            default_shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects of one
/// action to complete. Interval effects are not tracked: they run until
/// cancelled.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(Action::Start).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Number of tracked effects still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all tracked effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all
    /// effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: Effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    /// Increment the effect counter (effect started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the effect counter (effect completed)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements effect counter on drop
///
/// Ensures the effect counter is always decremented, even if the effect panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Internal: registry of live repeating effects, keyed by id
///
/// At most one task per id. Registering over a live id aborts the previous
/// task before the new one takes its slot.
#[derive(Default)]
struct ScheduledEffects {
    tasks: Mutex<HashMap<EffectId, AbortHandle>>,
}

impl ScheduledEffects {
    fn register(&self, id: EffectId, task: AbortHandle) {
        let previous = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, task);

        if let Some(previous) = previous {
            tracing::debug!(effect_id = %id, "Replacing live scheduled effect");
            previous.abort();
        }
    }

    fn cancel(&self, id: EffectId) -> bool {
        let removed = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);

        removed.is_some_and(|task| {
            task.abort();
            true
        })
    }

    fn cancel_all(&self) -> usize {
        let drained: Vec<_> = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .collect();

        for (_, task) in &drained {
            task.abort();
        }
        drained.len()
    }

    fn is_live(&self, id: EffectId) -> bool {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .is_some_and(|task| !task.is_finished())
    }
}

/// Store module - The runtime for reducers
///
/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, DecrementGuard, Duration, Effect,
        EffectHandle, EffectId, EffectTracking, Ordering, Reducer, RwLock, ScheduledEffects,
        StoreConfig, StoreError,
    };
    use tokio::sync::broadcast;
    use tokio::time::MissedTickBehavior;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`; reducers run one at a time under the write lock)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    /// 5. Scheduled effects (repeating actions owned by an id)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        config: StoreConfig,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        scheduled: Arc<ScheduledEffects>,
        /// Action broadcast channel for observing actions produced by effects.
        ///
        /// Every action fed back by an effect (ticks, delayed actions, future
        /// results) is broadcast right after it is reduced. Views subscribe
        /// to it to re-render on changes they did not initiate.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default()`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new store with a custom configuration
        #[must_use]
        pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                config,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                scheduled: Arc::new(ScheduledEffects::default()),
                action_broadcast,
            }
        }

        /// The configuration this store was built with
        #[must_use]
        pub const fn config(&self) -> &StoreConfig {
            &self.config
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Starts the returned effects before releasing the lock, so a
        ///    cancellation is in place before any other action is reduced
        /// 4. Effects may produce more actions (feedback loop)
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!("Processing action");
            metrics::counter!("store.actions.total").increment(1);

            let (handle, tracking) = EffectHandle::new();

            let mut state = self.state.write().await;
            {
                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                tracing::trace!("Reducer completed, returned {} effects", effects.len());

                for effect in effects {
                    self.execute_effect_internal(effect, tracking.clone());
                }
            }
            drop(state);

            Ok(handle)
        }

        /// Subscribe to all actions produced by effects
        ///
        /// Only actions produced by effects are broadcast, not the actions
        /// passed to [`Store::send`] directly.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let remaining = store.state(|s| s.timer.remaining_minutes()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Whether a scheduled effect is currently live under `id`
        #[must_use]
        pub fn is_scheduled(&self, id: EffectId) -> bool {
            self.scheduled.is_live(id)
        }

        /// Number of tracked effects still running across all actions
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Shut down using the configured default timeout
        ///
        /// # Errors
        ///
        /// See [`Store::shutdown`].
        pub async fn shutdown_default(&self) -> Result<(), StoreError> {
            self.shutdown(self.config.default_shutdown_timeout).await
        }

        /// Initiate graceful shutdown of the store
        ///
        /// 1. Sets the shutdown flag (rejecting new actions)
        /// 2. Aborts every scheduled effect
        /// 3. Waits for pending effects to complete (with timeout)
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.shutdown.store(true, Ordering::Release);

            let cancelled = self.scheduled.cancel_all();
            if cancelled > 0 {
                tracing::debug!(cancelled, "Aborted scheduled effects");
            }

            let start = tokio::time::Instant::now();
            let poll_interval = Duration::from_millis(10);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    metrics::counter!("store.shutdown.completed").increment(1);
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timeout: {} effects still running", pending);
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Begin tracking one spawned effect for both the caller's handle
        /// and shutdown
        fn track(&self, tracking: &EffectTracking) -> (DecrementGuard, AtomicCounterGuard) {
            tracking.increment();
            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            (
                DecrementGuard(tracking.clone()),
                AtomicCounterGuard(Arc::clone(&self.pending_effects)),
            )
        }

        /// Feed an effect-produced action back, then broadcast it
        ///
        /// Subscribers are notified once the action has been reduced, so
        /// state read on notification already reflects it.
        async fn feed_back(&self, action: A) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            let handle = self.send(action.clone()).await?;
            let _ = self.action_broadcast.send(action);
            Ok(handle)
        }

        /// Execute an effect with tracking
        ///
        /// # Effect Types
        ///
        /// - `None`: No-op
        /// - `Future`: Executes async computation, sends resulting action if `Some`
        /// - `Parallel`: Executes effects concurrently
        /// - `Interval`: Registers a repeating task under its id
        /// - `Cancel`: Aborts the task registered under the id
        ///
        /// Effect tasks that panic are isolated in their spawned task; the
        /// guards keep the counters correct.
        #[allow(clippy::needless_pass_by_value)] // tracking is cloned into tasks
        fn execute_effect_internal(&self, effect: Effect<A>, tracking: EffectTracking)
        where
            R: Clone,
            E: Clone,
        {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    let guards = self.track(&tracking);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guards = guards;

                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, sending to store");
                            let _ = store.feed_back(action).await;
                        }
                    });
                },
                Effect::Parallel(effects) => {
                    tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);

                    for effect in effects {
                        self.execute_effect_internal(effect, tracking.clone());
                    }
                },
                Effect::Interval { id, period, action } => {
                    metrics::counter!("store.effects.executed", "type" => "interval").increment(1);

                    if period.is_zero() {
                        tracing::warn!(effect_id = %id, "Ignoring Effect::Interval with a zero period");
                        return;
                    }

                    tracing::debug!(effect_id = %id, period_ms = period.as_millis(), "Scheduling Effect::Interval");
                    let store = self.clone();

                    let task = tokio::spawn(async move {
                        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
                        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

                        loop {
                            ticker.tick().await;
                            tracing::trace!(effect_id = %id, "Effect::Interval fired");

                            if store.feed_back((*action).clone()).await.is_err() {
                                break;
                            }
                        }
                    });

                    self.scheduled.register(id, task.abort_handle());
                },
                Effect::Cancel(id) => {
                    metrics::counter!("store.effects.executed", "type" => "cancel").increment(1);

                    if self.scheduled.cancel(id) {
                        tracing::debug!(effect_id = %id, "Cancelled scheduled effect");
                    } else {
                        tracing::trace!(effect_id = %id, "No live effect to cancel");
                    }
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                config: self.config.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                scheduled: Arc::clone(&self.scheduled),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;
    use todo_timer_core::{smallvec, SmallVec};

    const TICKER: EffectId = EffectId::new("ticker");

    #[derive(Debug, Clone)]
    struct TestState {
        value: i32,
    }

    #[derive(Debug, Clone)]
    enum TestAction {
        Increment,
        Decrement,
        NoOp,
        ProduceEffect,
        ProduceParallelEffects,
        ProducePanickingEffect,
        StartTicking(Duration),
        StopTicking,
    }

    #[derive(Debug, Clone)]
    struct TestEnv;

    #[derive(Debug, Clone)]
    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    smallvec![Effect::None]
                },
                TestAction::Decrement => {
                    state.value -= 1;
                    smallvec![Effect::None]
                },
                TestAction::NoOp => smallvec![Effect::None],
                TestAction::ProduceEffect => {
                    smallvec![Effect::Future(Box::pin(async { Some(TestAction::Increment) }))]
                },
                TestAction::ProduceParallelEffects => smallvec![Effect::Parallel(vec![
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                ])],
                TestAction::ProducePanickingEffect => {
                    smallvec![Effect::Future(Box::pin(async {
                        panic!("Intentional panic in effect for testing");
                    }))]
                },
                TestAction::StartTicking(period) => smallvec![Effect::Interval {
                    id: TICKER,
                    period,
                    action: Box::new(TestAction::Increment),
                }],
                TestAction::StopTicking => smallvec![Effect::Cancel(TICKER)],
            }
        }
    }

    fn store() -> Store<TestState, TestAction, TestEnv, TestReducer> {
        Store::new(TestState { value: 0 }, TestReducer, TestEnv)
    }

    #[tokio::test]
    async fn test_store_creation() {
        let store = store();
        assert_eq!(store.state(|s| s.value).await, 0);
    }

    #[tokio::test]
    async fn test_multiple_actions() -> Result<(), StoreError> {
        let store = store();

        store.send(TestAction::Increment).await?;
        store.send(TestAction::Increment).await?;
        store.send(TestAction::Decrement).await?;
        store.send(TestAction::NoOp).await?;

        assert_eq!(store.state(|s| s.value).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_effect_future() -> Result<(), StoreError> {
        let store = store();

        let mut handle = store.send(TestAction::ProduceEffect).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        assert_eq!(store.state(|s| s.value).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_effect_parallel() -> Result<(), StoreError> {
        let store = store();

        let mut handle = store.send(TestAction::ProduceParallelEffects).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        assert_eq!(store.state(|s| s.value).await, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_sends() {
        let store = store();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    let _ = store.send(TestAction::Increment).await;
                })
            })
            .collect();

        for handle in handles {
            if let Err(e) = handle.await {
                panic!("concurrent send task panicked: {e}");
            }
        }

        assert_eq!(store.state(|s| s.value).await, 10);
    }

    #[tokio::test]
    async fn test_store_clone_shares_state() -> Result<(), StoreError> {
        let store1 = store();
        let store2 = store1.clone();

        store1.send(TestAction::Increment).await?;
        assert_eq!(store2.state(|s| s.value).await, 1);

        store2.send(TestAction::Increment).await?;
        assert_eq!(store1.state(|s| s.value).await, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_effect_panic_isolation() -> Result<(), StoreError> {
        let store = store();

        let mut handle = store.send(TestAction::ProducePanickingEffect).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        store.send(TestAction::Increment).await?;
        assert_eq!(store.state(|s| s.value).await, 1);
        assert_eq!(store.pending_effects(), 0);
        Ok(())
    }

    #[test]
    fn test_completed_handle_has_nothing_pending() {
        let handle = EffectHandle::completed();
        assert_eq!(handle.pending(), 0);
    }

    mod interval_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_interval_dispatches_every_period() -> Result<(), StoreError> {
            let store = store();

            store.send(TestAction::StartTicking(Duration::from_millis(100))).await?;
            assert!(store.is_scheduled(TICKER));

            // No dispatch before the first full period
            tokio::time::sleep(Duration::from_millis(50)).await;
            assert_eq!(store.state(|s| s.value).await, 0);

            tokio::time::sleep(Duration::from_millis(300)).await;
            assert_eq!(store.state(|s| s.value).await, 3);
            Ok(())
        }

        #[tokio::test(start_paused = true)]
        async fn test_cancel_stops_interval() -> Result<(), StoreError> {
            let store = store();

            store.send(TestAction::StartTicking(Duration::from_millis(100))).await?;
            tokio::time::sleep(Duration::from_millis(250)).await;
            store.send(TestAction::StopTicking).await?;
            assert!(!store.is_scheduled(TICKER));

            tokio::time::sleep(Duration::from_secs(5)).await;
            assert_eq!(store.state(|s| s.value).await, 2);
            Ok(())
        }

        #[tokio::test(start_paused = true)]
        async fn test_restarting_interval_replaces_previous() -> Result<(), StoreError> {
            let store = store();

            store.send(TestAction::StartTicking(Duration::from_millis(100))).await?;
            store.send(TestAction::StartTicking(Duration::from_millis(100))).await?;

            // Two registrations under one id must not double the rate
            tokio::time::sleep(Duration::from_millis(350)).await;
            assert_eq!(store.state(|s| s.value).await, 3);
            Ok(())
        }

        #[tokio::test(start_paused = true)]
        async fn test_cancel_without_live_interval_is_noop() -> Result<(), StoreError> {
            let store = store();

            store.send(TestAction::StopTicking).await?;
            assert!(!store.is_scheduled(TICKER));
            assert_eq!(store.state(|s| s.value).await, 0);
            Ok(())
        }

        #[tokio::test(start_paused = true)]
        async fn test_zero_period_is_ignored() -> Result<(), StoreError> {
            let store = store();

            store.send(TestAction::StartTicking(Duration::ZERO)).await?;
            assert!(!store.is_scheduled(TICKER));
            Ok(())
        }

        #[tokio::test(start_paused = true)]
        async fn test_interval_actions_are_broadcast() -> Result<(), StoreError> {
            let store = store();
            let mut rx = store.subscribe_actions();

            store.send(TestAction::StartTicking(Duration::from_millis(100))).await?;

            let observed = tokio::time::timeout(Duration::from_secs(1), rx.recv())
                .await
                .map_err(|_| StoreError::Timeout)?
                .unwrap();
            assert!(matches!(observed, TestAction::Increment));
            Ok(())
        }
    }

    mod shutdown_tests {
        use super::*;

        #[tokio::test]
        async fn test_shutdown_with_no_pending_effects() {
            let store = store();
            assert!(store.shutdown(Duration::from_secs(5)).await.is_ok());
        }

        #[tokio::test]
        async fn test_shutdown_rejects_new_actions() -> Result<(), StoreError> {
            let store = store();
            store.shutdown(Duration::from_secs(1)).await?;

            let result = store.send(TestAction::Increment).await;
            assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
            Ok(())
        }

        #[tokio::test]
        async fn test_shutdown_waits_for_effects() -> Result<(), StoreError> {
            let store = store();

            let _handle = store.send(TestAction::ProduceEffect).await?;
            store.shutdown(Duration::from_secs(5)).await?;

            assert_eq!(store.pending_effects(), 0);
            Ok(())
        }

        #[tokio::test(start_paused = true)]
        async fn test_shutdown_aborts_scheduled_effects() -> Result<(), StoreError> {
            let store = store();

            store.send(TestAction::StartTicking(Duration::from_millis(100))).await?;
            store.shutdown(Duration::from_secs(1)).await?;
            assert!(!store.is_scheduled(TICKER));

            tokio::time::sleep(Duration::from_secs(1)).await;
            assert_eq!(store.state(|s| s.value).await, 0);
            Ok(())
        }

        #[tokio::test]
        async fn test_shutdown_idempotent() -> Result<(), StoreError> {
            let store = store();

            store.shutdown(Duration::from_secs(1)).await?;
            store.shutdown(Duration::from_secs(1)).await?;
            Ok(())
        }

        #[tokio::test]
        async fn test_shutdown_default_uses_config() -> Result<(), StoreError> {
            let config = StoreConfig::default().with_shutdown_timeout(Duration::from_millis(200));
            let store = Store::with_config(TestState { value: 0 }, TestReducer, TestEnv, config);

            assert_eq!(store.config().default_shutdown_timeout, Duration::from_millis(200));
            store.shutdown_default().await?;
            Ok(())
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_store_config_default() {
            let config = StoreConfig::default();
            assert_eq!(config.broadcast_capacity, 16);
            assert_eq!(config.default_shutdown_timeout, Duration::from_secs(30));
        }

        #[test]
        fn test_store_config_zero_capacity_is_clamped() {
            let config = StoreConfig::default().with_broadcast_capacity(0);
            assert_eq!(config.broadcast_capacity, 1);
        }

        #[test]
        fn test_store_config_new() {
            let config = StoreConfig::new(8, Duration::from_secs(1));
            assert_eq!(config.broadcast_capacity, 8);
            assert_eq!(config.default_shutdown_timeout, Duration::from_secs(1));
        }
    }
}
