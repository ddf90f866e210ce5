//! # Widget Runtime
//!
//! Runtime for reducer-driven widgets.
//!
//! The [`Store`] owns a widget's state and is the only place it changes:
//!
//! - **Action serialization**: every action runs through the reducer under a
//!   write lock, one at a time
//! - **Change notification**: every processed action bumps a revision
//!   counter that observers (renderers) watch
//! - **Action broadcast**: every processed action is published to subscribers
//!
//! ## Example
//!
//! ```ignore
//! use widget_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Re-render whenever state changes
//! let mut changes = store.subscribe_changes();
//! tokio::spawn(async move {
//!     while changes.changed().await.is_ok() {
//!         // render...
//!     }
//! });
//!
//! store.send(Action::DoSomething).await?;
//! let value = store.state(|s| s.some_field).await;
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use widget_core::reducer::Reducer;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for an in-flight action to finish
        #[error("Shutdown timed out waiting for an in-flight action")]
        ShutdownTimeout,
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use widget_runtime::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(64)
///     .with_shutdown_timeout(Duration::from_secs(5));
/// assert_eq!(config.broadcast_capacity, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Number of actions buffered for each action subscriber
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

    /// Set the action broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
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

/// Store runtime for coordinating reducer execution and observers.
pub mod store {
    use super::{Arc, AtomicBool, Duration, Ordering, Reducer, RwLock, StoreConfig, StoreError};
    use tokio::sync::{broadcast, watch};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (widget logic)
    /// 3. Environment (injected dependencies)
    /// 4. Observers (change revisions and action broadcast)
    ///
    /// Cloning a store is cheap and yields another handle to the same state.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        config: StoreConfig,
        shutdown: Arc<AtomicBool>,
        /// Every action processed by the reducer, in processing order.
        action_broadcast: broadcast::Sender<A>,
        /// Revision counter, bumped under the state write lock after each action.
        changes: Arc<watch::Sender<u64>>,
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

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));
            let (changes, _) = watch::channel(0);

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                config,
                shutdown: Arc::new(AtomicBool::new(false)),
                action_broadcast,
                changes: Arc::new(changes),
            }
        }

        /// The configuration this store was built with
        #[must_use]
        pub const fn config(&self) -> &StoreConfig {
            &self.config
        }

        /// Returns true once [`Store::shutdown`] has been called
        #[must_use]
        pub fn is_shutting_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        /// Initiate graceful shutdown of the store
        ///
        /// Sets the shutdown flag (rejecting new actions), then waits for the
        /// state lock so that no reducer call or state read is still running
        /// when this returns.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the lock is still held
        /// when the timeout expires.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            if tokio::time::timeout(timeout, self.state.write()).await.is_err() {
                tracing::error!(
                    elapsed_ms = start.elapsed().as_millis(),
                    "Shutdown timeout: state still locked"
                );
                metrics::counter!("store.shutdown.timeout").increment(1);
                return Err(StoreError::ShutdownTimeout);
            }

            tracing::info!("In-flight work drained, shutdown successful");
            metrics::counter!("store.shutdown.completed").increment(1);
            Ok(())
        }

        /// Send an action to the store
        ///
        /// 1. Acquires the write lock on state
        /// 2. Calls the reducer with (state, action, environment)
        /// 3. Bumps the change revision and broadcasts the action
        ///
        /// `send()` returns once the state change is visible to readers.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!("Processing action");
            metrics::counter!("store.commands.total").increment(1);

            let observed = action.clone();
            let mut state = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            {
                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());
            }

            // Bumped while the write lock is held so readers pairing state
            // with a revision always see a consistent pair.
            self.changes.send_modify(|revision| *revision += 1);

            // No subscribers is fine
            let _ = self.action_broadcast.send(observed);
            drop(state);

            tracing::debug!("Action processing completed");
            Ok(())
        }

        /// Subscribe to every action processed by this store
        ///
        /// Actions appear in the order the reducer processed them. A receiver
        /// that falls more than the configured capacity behind gets
        /// `RecvError::Lagged`.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Subscribe to state change notifications
        ///
        /// The receiver yields the store revision, which increases by one for
        /// every processed action. Slow observers only see the latest value.
        #[must_use]
        pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
            self.changes.subscribe()
        }

        /// Current revision (number of actions processed so far)
        #[must_use]
        pub fn revision(&self) -> u64 {
            *self.changes.borrow()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let todo_count = store.state(|s| s.todos.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Read state together with the revision it corresponds to
        pub async fn state_with_revision<F, T>(&self, f: F) -> (T, u64)
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            let revision = *self.changes.borrow();
            (f(&*state), revision)
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
                action_broadcast: self.action_broadcast.clone(),
                changes: Arc::clone(&self.changes),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;
    use widget_core::reducer::Reducer;

    #[derive(Debug, Clone)]
    struct TestState {
        done: u32,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Check,
        Uncheck,
        NoOp,
    }

    #[derive(Debug, Clone)]
    struct TestEnv;

    #[derive(Debug, Clone)]
    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(&self, state: &mut Self::State, action: Self::Action, _env: &Self::Environment) {
            match action {
                TestAction::Check => state.done += 1,
                TestAction::Uncheck => state.done = state.done.saturating_sub(1),
                TestAction::NoOp => {},
            }
        }
    }

    fn test_store() -> Store<TestState, TestAction, TestEnv, TestReducer> {
        Store::new(TestState { done: 0 }, TestReducer, TestEnv)
    }

    #[tokio::test]
    async fn test_store_creation() {
        let store = test_store();

        assert_eq!(store.state(|s| s.done).await, 0);
        assert_eq!(store.revision(), 0);
    }

    #[tokio::test]
    async fn test_send_action() {
        let store = test_store();

        assert!(store.send(TestAction::Check).await.is_ok());
        assert_eq!(store.state(|s| s.done).await, 1);
    }

    #[tokio::test]
    async fn test_multiple_actions() {
        let store = test_store();

        let _ = store.send(TestAction::Check).await;
        let _ = store.send(TestAction::Check).await;
        let _ = store.send(TestAction::Uncheck).await;

        assert_eq!(store.state(|s| s.done).await, 1);
    }

    #[tokio::test]
    async fn test_every_action_bumps_revision() {
        let store = test_store();

        let _ = store.send(TestAction::NoOp).await;
        let _ = store.send(TestAction::Check).await;

        assert_eq!(store.revision(), 2);
        let (done, revision) = store.state_with_revision(|s| s.done).await;
        assert_eq!((done, revision), (1, 2));
    }

    #[tokio::test]
    async fn test_broadcast_sees_actions_in_order() {
        let store = test_store();
        let mut actions = store.subscribe_actions();

        let _ = store.send(TestAction::Check).await;
        let _ = store.send(TestAction::NoOp).await;

        assert_eq!(actions.recv().await.ok(), Some(TestAction::Check));
        assert_eq!(actions.recv().await.ok(), Some(TestAction::NoOp));
    }

    #[tokio::test]
    async fn test_shutdown_rejects_new_actions() {
        let store = test_store();

        assert!(store.shutdown(Duration::from_secs(1)).await.is_ok());
        assert!(store.is_shutting_down());

        let result = store.send(TestAction::Check).await;
        assert_eq!(result, Err(StoreError::ShutdownInProgress));
        assert_eq!(store.state(|s| s.done).await, 0);
        assert_eq!(store.revision(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_shutdown_times_out_while_state_is_held() {
        let store = test_store();
        let (held_tx, held_rx) = tokio::sync::oneshot::channel();

        let reader = store.clone();
        let slow_read = tokio::spawn(async move {
            reader
                .state(|_| {
                    let _ = held_tx.send(());
                    std::thread::sleep(Duration::from_millis(300));
                })
                .await;
        });

        assert!(held_rx.await.is_ok());
        let result = store.shutdown(Duration::from_millis(20)).await;
        assert_eq!(result, Err(StoreError::ShutdownTimeout));

        assert!(slow_read.await.is_ok());
        assert!(store.shutdown(Duration::from_secs(1)).await.is_ok());
    }

    #[test]
    fn test_store_config_builder() {
        let config = StoreConfig::new(4, Duration::from_secs(1))
            .with_broadcast_capacity(8)
            .with_shutdown_timeout(Duration::from_secs(2));

        assert_eq!(config.broadcast_capacity, 8);
        assert_eq!(config.default_shutdown_timeout, Duration::from_secs(2));
        assert_eq!(StoreConfig::default().broadcast_capacity, 16);
    }
}
