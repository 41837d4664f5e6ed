//! # Worknet Runtime
//!
//! Runtime implementation for the worknet state architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: owns the state tree and runs the reducer under a write lock
//! - **Effect Executor**: executes effect descriptions and feeds produced
//!   actions back into the store
//! - **Cancellation Registry**: pending cancellable effects (per-alert
//!   dismissal timers) keyed by effect id
//!
//! ## Ordering Guarantee
//!
//! Actions applied through [`Store::send_batch`] (and the batches produced by
//! settled `Effect::Future`s) are reduced in issue order under a single
//! write-lock acquisition: no action from another effect is interleaved
//! between two actions of the same batch. This is the contract an
//! orchestrated operation (one request, several dispatches) relies on.
//!
//! ## Example
//!
//! ```ignore
//! use worknet_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action and wait for the work it triggered
//! let mut handle = store.send(Action::Refresh).await?;
//! handle.wait().await;
//!
//! // Read state
//! let value = store.state(|s| s.some_field.clone()).await;
//! ```

use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{RwLock, broadcast, watch};
use tokio::task::AbortHandle;
use worknet_core::effect::{ActionBatch, Effect, EffectId};
use worknet_core::reducer::Reducer;

pub use error::StoreError;

/// Default capacity of the applied-action broadcast channel.
const DEFAULT_BROADCAST_CAPACITY: usize = 16;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown
        /// initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for effect completion
        ///
        /// Returned by `EffectHandle::wait_with_timeout` when the timeout
        /// expires before the tracked effects settle.
        #[error("Timeout waiting for effects")]
        Timeout,
    }
}

/// Tracking context shared by the effects spawned for one send.
///
/// The counter holds the number of in-flight tracked effects; the notifier
/// wakes waiters whenever the counter is decremented. Timer effects
/// (`Effect::Delay`) are deliberately NOT tracked: a handle completes when
/// the outstanding request work settles, not when every scheduled dismissal
/// timer has fired.
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    /// Create a tracking context plus the handle observing it.
    fn new() -> (EffectHandle, Self) {
        let (tx, rx) = watch::channel(());
        let counter = Arc::new(AtomicUsize::new(0));
        let tracking = Self {
            counter: Arc::clone(&counter),
            notifier: Arc::new(tx),
        };
        let handle = EffectHandle {
            counter,
            completion: rx,
        };
        (handle, tracking)
    }

    /// A tracking context nobody waits on (timer follow-ups).
    fn detached() -> Self {
        let (tx, _rx) = watch::channel(());
        Self {
            counter: Arc::new(AtomicUsize::new(0)),
            notifier: Arc::new(tx),
        }
    }

    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }
}

/// Decrements the tracked-effect counter on drop.
///
/// Held across effect execution so the counter is released even when the
/// effect task panics or is aborted.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.counter.fetch_sub(1, Ordering::SeqCst);
        let _ = self.0.notifier.send(());
    }
}

/// Decrements the store-wide pending-effect gauge on drop.
struct PendingGuard(Arc<AtomicUsize>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Handle for awaiting the effects spawned by one send.
///
/// Completion covers the async work the send triggered, including the work
/// spawned when a settled effect's action batch is applied (a request, the
/// dispatches it produces, and any follow-up futures such as navigation).
/// Scheduled timers are excluded; they outlive the originating operation by
/// design.
pub struct EffectHandle {
    counter: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Wait until all tracked effects have settled.
    pub async fn wait(&mut self) {
        while self.counter.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                return;
            }
        }
    }

    /// Wait with a timeout.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the tracked effects have not
    /// settled within `timeout`.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }

    /// Number of tracked effects still in flight.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.counter.load(Ordering::SeqCst)
    }
}

/// Entry in the cancellation registry.
///
/// The generation disambiguates a completed effect's self-deregistration
/// from a newer effect registered under the same id.
struct CancellationEntry {
    generation: u64,
    handle: AbortHandle,
}

/// A synchronous state subscriber.
///
/// Invoked inline after every applied action, before the next action of the
/// same batch is reduced. Subscribers MUST NOT dispatch back into the store.
type Subscriber<S> = Box<dyn Fn(&S) + Send + Sync>;

/// The Store - runtime coordinator for a reducer
///
/// The Store manages:
/// 1. State (behind `RwLock` for concurrent access)
/// 2. Reducer (transition logic)
/// 3. Environment (injected collaborators)
/// 4. Effect execution (with feedback loop and cancellation)
///
/// It also exposes three observation surfaces:
/// - [`Store::subscribe_actions`] broadcasts every applied action,
/// - [`Store::subscribe_state`] publishes a state snapshot after every
///   reduce pass, and
/// - [`Store::subscribe`] runs synchronous callbacks inline per applied
///   action - the hook on which the only cross-slice reaction (the
///   auth-token sync) is built, keeping reducers pure.
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
    shutdown: Arc<AtomicBool>,
    pending_effects: Arc<AtomicUsize>,
    action_broadcast: broadcast::Sender<A>,
    state_watch: Arc<watch::Sender<S>>,
    subscribers: Arc<Mutex<Vec<Subscriber<S>>>>,
    cancellations: Arc<Mutex<HashMap<EffectId, CancellationEntry>>>,
    cancellation_generation: Arc<AtomicU64>,
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
            shutdown: Arc::clone(&self.shutdown),
            pending_effects: Arc::clone(&self.pending_effects),
            action_broadcast: self.action_broadcast.clone(),
            state_watch: Arc::clone(&self.state_watch),
            subscribers: Arc::clone(&self.subscribers),
            cancellations: Arc::clone(&self.cancellations),
            cancellation_generation: Arc::clone(&self.cancellation_generation),
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    S: Clone + Send + Sync + 'static,
    A: Clone + Send + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    ///
    /// # Arguments
    ///
    /// - `initial_state`: The starting state for the store
    /// - `reducer`: The reducer implementation (transition logic)
    /// - `environment`: Injected collaborators
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_broadcast_capacity(initial_state, reducer, environment, DEFAULT_BROADCAST_CAPACITY)
    }

    /// Create a new Store with custom applied-action broadcast capacity
    ///
    /// Increase the capacity when observers read the action stream after the
    /// fact (tests asserting dispatch sequences) or lag behind bursts.
    #[must_use]
    pub fn with_broadcast_capacity(
        initial_state: S,
        reducer: R,
        environment: E,
        capacity: usize,
    ) -> Self {
        let (action_broadcast, _) = broadcast::channel(capacity);
        let (state_watch, _) = watch::channel(initial_state.clone());

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            shutdown: Arc::new(AtomicBool::new(false)),
            pending_effects: Arc::new(AtomicUsize::new(0)),
            action_broadcast,
            state_watch: Arc::new(state_watch),
            subscribers: Arc::new(Mutex::new(Vec::new())),
            cancellations: Arc::new(Mutex::new(HashMap::new())),
            cancellation_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Send an action to the store
    ///
    /// 1. Acquires the write lock on state
    /// 2. Calls the reducer with (state, action, environment)
    /// 3. Broadcasts the applied action and publishes a state snapshot
    /// 4. Executes returned effects asynchronously
    ///
    /// `send()` returns after starting effect execution, not completion; use
    /// the returned [`EffectHandle`] to wait for the triggered work.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting
    /// down.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
        let (handle, tracking) = EffectTracking::new();
        self.apply(smallvec::smallvec![action], &tracking).await?;
        Ok(handle)
    }

    /// Apply an ordered batch of actions under one write-lock acquisition
    ///
    /// Every action is reduced in order with no interleaving from other
    /// effects between two actions of the batch. Effects produced by the
    /// whole batch are executed after the lock is released.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting
    /// down.
    #[tracing::instrument(skip(self, actions), name = "store_send_batch")]
    pub async fn send_batch(
        &self,
        actions: impl IntoIterator<Item = A>,
    ) -> Result<EffectHandle, StoreError> {
        let batch: ActionBatch<A> = actions.into_iter().collect();
        let (handle, tracking) = EffectTracking::new();
        self.apply(batch, &tracking).await?;
        Ok(handle)
    }

    /// Read current state via a closure
    ///
    /// Access state through a closure to ensure the lock is released
    /// promptly:
    ///
    /// ```ignore
    /// let profile_count = store.state(|s| s.profiles.profiles.len()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Subscribe to every action applied to the store
    ///
    /// The receiver yields actions in application order. Only actions applied
    /// after subscribing are observed.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Subscribe to state snapshots
    ///
    /// The watch channel holds the snapshot published after the most recent
    /// reduce pass. Consumers await `changed()` and read the latest value;
    /// intermediate snapshots may be coalesced. For observations that must
    /// see every transition in order (the auth-token sync), use
    /// [`Store::subscribe`] instead.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<S> {
        self.state_watch.subscribe()
    }

    /// Register a synchronous state subscriber
    ///
    /// The callback runs inline after every applied action, before the next
    /// action of the same batch is reduced and before any effect the action
    /// produced is executed. This is the hook for cross-slice reactions that
    /// must observe every transition in order and complete before subsequent
    /// dispatches (the auth-token sync subscription).
    ///
    /// Subscribers MUST NOT dispatch back into the store and should return
    /// quickly; they run while the state write lock is held.
    pub fn subscribe(&self, subscriber: impl Fn(&S) + Send + Sync + 'static) {
        self.subscribers_lock().push(Box::new(subscriber));
    }

    /// Initiate graceful shutdown of the store
    ///
    /// Sets the shutdown flag (rejecting new actions), then waits for
    /// pending effects to complete.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before
    /// all pending effects complete.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::info!("Initiating graceful shutdown");
        metrics::counter!("store.shutdown.initiated").increment(1);

        self.shutdown.store(true, Ordering::Release);

        let start = std::time::Instant::now();
        let poll_interval = Duration::from_millis(100);

        loop {
            let pending = self.pending_effects.load(Ordering::Acquire);

            if pending == 0 {
                tracing::info!("All effects completed, shutdown successful");
                metrics::counter!("store.shutdown.completed").increment(1);
                return Ok(());
            }

            if start.elapsed() >= timeout {
                tracing::error!(
                    pending_effects = pending,
                    "Shutdown timeout: {} effects still running",
                    pending
                );
                metrics::counter!("store.shutdown.timeout").increment(1);
                return Err(StoreError::ShutdownTimeout(pending));
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Number of effects currently in flight (all sends combined).
    #[must_use]
    pub fn pending_effects(&self) -> usize {
        self.pending_effects.load(Ordering::SeqCst)
    }

    /// Reduce a batch of actions in order and execute the resulting effects.
    async fn apply(
        &self,
        actions: ActionBatch<A>,
        tracking: &EffectTracking,
    ) -> Result<(), StoreError> {
        if self.shutdown.load(Ordering::Acquire) {
            tracing::warn!("Rejected action: store is shutting down");
            metrics::counter!("store.shutdown.rejected_actions").increment(1);
            return Err(StoreError::ShutdownInProgress);
        }

        let effects = {
            let mut state = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            let mut all_effects: Vec<Effect<A>> = Vec::new();
            for action in actions {
                metrics::counter!("store.actions.total").increment(1);

                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self
                    .reducer
                    .reduce(&mut *state, action.clone(), &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                let _ = self.action_broadcast.send(action);
                self.state_watch.send_replace(state.clone());

                for subscriber in self.subscribers_lock().iter() {
                    subscriber(&*state);
                }

                all_effects.extend(effects);
            }
            all_effects
        };

        tracing::trace!("Executing {} effects", effects.len());
        for effect in effects {
            self.execute_effect(effect, tracking.clone());
        }

        Ok(())
    }

    /// Execute one effect description.
    ///
    /// Futures and sequential chains are spawned as tracked tasks; delayed
    /// actions are spawned untracked (handles complete without waiting out
    /// timers); cancellable effects are registered in the cancellation
    /// registry; cancellations resolve synchronously.
    fn execute_effect(&self, effect: Effect<A>, tracking: EffectTracking) {
        match effect {
            Effect::None => {
                tracing::trace!("Executing Effect::None (no-op)");
            },
            Effect::Cancel(id) => {
                tracing::trace!(effect_id = %id, "Executing Effect::Cancel");
                metrics::counter!("store.effects.executed", "type" => "cancel").increment(1);
                self.cancel(id);
            },
            Effect::Parallel(effects) => {
                tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                for effect in effects {
                    self.execute_effect(effect, tracking.clone());
                }
            },
            Effect::Cancellable { id, effect } => {
                metrics::counter!("store.effects.executed", "type" => "cancellable").increment(1);
                self.execute_cancellable(id, *effect, &tracking);
            },
            Effect::Delay { .. } => {
                metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                self.spawn_effect(effect, EffectTracking::detached(), false);
            },
            Effect::Future(_) | Effect::Sequential(_) => {
                metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                self.spawn_effect(effect, tracking, true);
            },
        }
    }

    /// Spawn a task running one effect inline.
    fn spawn_effect(&self, effect: Effect<A>, tracking: EffectTracking, tracked: bool) {
        if tracked {
            tracking.increment();
        }
        self.pending_effects.fetch_add(1, Ordering::SeqCst);
        let pending_guard = PendingGuard(Arc::clone(&self.pending_effects));

        let store = self.clone();
        tokio::spawn(async move {
            let _guard = tracked.then(|| DecrementGuard(tracking.clone()));
            let _pending_guard = pending_guard;

            Self::run_effect(store, effect, tracking).await;
        });
    }

    /// Register and spawn a cancellable effect.
    ///
    /// A registration under an id that is still pending aborts the earlier
    /// effect. Completed effects deregister themselves; the generation check
    /// keeps a completed effect from removing a newer registration that
    /// reused its id.
    fn execute_cancellable(&self, id: EffectId, effect: Effect<A>, tracking: &EffectTracking) {
        // Timers stay untracked even when wrapped for cancellation.
        let timer_only = matches!(effect, Effect::Delay { .. });
        let tracking = if timer_only {
            EffectTracking::detached()
        } else {
            tracking.clone()
        };
        if !timer_only {
            tracking.increment();
        }

        self.pending_effects.fetch_add(1, Ordering::SeqCst);
        let pending_guard = PendingGuard(Arc::clone(&self.pending_effects));

        let generation = self.cancellation_generation.fetch_add(1, Ordering::SeqCst);
        let store = self.clone();
        let task_tracking = tracking.clone();

        let task = tokio::spawn(async move {
            let _guard = (!timer_only).then(|| DecrementGuard(task_tracking.clone()));
            let _pending_guard = pending_guard;

            Self::run_effect(store.clone(), effect, task_tracking).await;
            store.deregister(id, generation);
        });

        let mut registry = self.cancellations_lock();
        if let Some(previous) = registry.insert(
            id,
            CancellationEntry {
                generation,
                handle: task.abort_handle(),
            },
        ) {
            tracing::debug!(effect_id = %id, "Replacing in-flight cancellable effect");
            previous.handle.abort();
        }
    }

    /// Run one effect to completion inside an already-spawned task.
    fn run_effect(store: Self, effect: Effect<A>, tracking: EffectTracking) -> BoxFuture<'static, ()> {
        async move {
            match effect {
                Effect::None => {},
                Effect::Cancel(id) => store.cancel(id),
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    let batch = fut.await;
                    if batch.is_empty() {
                        tracing::trace!("Effect::Future settled with no actions");
                    } else if let Err(error) = store.apply(batch, &tracking).await {
                        tracing::warn!(%error, "Dropped action batch from settled effect");
                    }
                },
                Effect::Delay { duration, action } => {
                    tracing::trace!("Executing Effect::Delay (duration: {:?})", duration);
                    tokio::time::sleep(duration).await;
                    let batch: ActionBatch<A> = smallvec::smallvec![*action];
                    let detached = EffectTracking::detached();
                    if let Err(error) = store.apply(batch, &detached).await {
                        tracing::warn!(%error, "Dropped delayed action");
                    }
                },
                Effect::Sequential(effects) => {
                    tracing::trace!("Executing Effect::Sequential with {} effects", effects.len());
                    for effect in effects {
                        Self::run_effect(store.clone(), effect, tracking.clone()).await;
                    }
                },
                Effect::Parallel(effects) => {
                    futures::future::join_all(
                        effects
                            .into_iter()
                            .map(|effect| Self::run_effect(store.clone(), effect, tracking.clone())),
                    )
                    .await;
                },
                Effect::Cancellable { id, effect } => {
                    store.execute_cancellable(id, *effect, &tracking);
                },
            }
        }
        .boxed()
    }

    /// Abort the pending effect registered under `id`, if any.
    fn cancel(&self, id: EffectId) {
        if let Some(entry) = self.cancellations_lock().remove(&id) {
            entry.handle.abort();
        }
    }

    /// Remove a registry entry after its effect completed on its own.
    fn deregister(&self, id: EffectId, generation: u64) {
        let mut registry = self.cancellations_lock();
        if registry
            .get(&id)
            .is_some_and(|entry| entry.generation == generation)
        {
            registry.remove(&id);
        }
    }

    fn cancellations_lock(&self) -> MutexGuard<'_, HashMap<EffectId, CancellationEntry>> {
        self.cancellations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn subscribers_lock(&self) -> MutexGuard<'_, Vec<Subscriber<S>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // test code

    use super::*;
    use worknet_core::{SmallVec, smallvec};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct TestState {
        applied: Vec<String>,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Record(String),
        Fanout,
        Schedule { id: EffectId, after: Duration },
        CancelTimer(EffectId),
    }

    #[derive(Clone)]
    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Record(label) => {
                    state.applied.push(label);
                    smallvec![Effect::None]
                },
                TestAction::Fanout => smallvec![Effect::future(async {
                    smallvec![
                        TestAction::Record("first".to_string()),
                        TestAction::Record("second".to_string()),
                        TestAction::Record("third".to_string()),
                    ]
                })],
                TestAction::Schedule { id, after } => smallvec![
                    Effect::Delay {
                        duration: after,
                        action: Box::new(TestAction::Record("fired".to_string())),
                    }
                    .cancellable(id)
                ],
                TestAction::CancelTimer(id) => smallvec![Effect::Cancel(id)],
            }
        }
    }

    fn store() -> Store<TestState, TestAction, (), TestReducer> {
        Store::with_broadcast_capacity(TestState::default(), TestReducer, (), 64)
    }

    #[tokio::test]
    async fn send_applies_action_and_settles() {
        let store = store();
        let mut handle = store
            .send(TestAction::Record("only".to_string()))
            .await
            .unwrap();
        handle.wait().await;

        let applied = store.state(|s| s.applied.clone()).await;
        assert_eq!(applied, vec!["only".to_string()]);
    }

    #[tokio::test]
    async fn settled_future_applies_batch_in_order() {
        let store = store();
        let mut handle = store.send(TestAction::Fanout).await.unwrap();
        handle.wait().await;

        let applied = store.state(|s| s.applied.clone()).await;
        assert_eq!(applied, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn broadcast_observes_actions_in_application_order() {
        let store = store();
        let mut rx = store.subscribe_actions();

        let mut handle = store.send(TestAction::Fanout).await.unwrap();
        handle.wait().await;

        assert_eq!(rx.recv().await.unwrap(), TestAction::Fanout);
        assert_eq!(
            rx.recv().await.unwrap(),
            TestAction::Record("first".to_string())
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            TestAction::Record("second".to_string())
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            TestAction::Record("third".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_action_fires_after_duration() {
        let store = store();
        let id = EffectId::new();
        let mut handle = store
            .send(TestAction::Schedule {
                id,
                after: Duration::from_secs(5),
            })
            .await
            .unwrap();
        // The handle settles without waiting out the timer.
        handle.wait().await;
        assert!(store.state(|s| s.applied.is_empty()).await);

        tokio::time::sleep(Duration::from_secs(6)).await;
        let applied = store.state(|s| s.applied.clone()).await;
        assert_eq!(applied, vec!["fired".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_fires() {
        let store = store();
        let id = EffectId::new();
        store
            .send(TestAction::Schedule {
                id,
                after: Duration::from_secs(5),
            })
            .await
            .unwrap();
        store.send(TestAction::CancelTimer(id)).await.unwrap();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(store.state(|s| s.applied.is_empty()).await);
    }

    #[tokio::test]
    async fn subscribers_observe_every_transition_in_order() {
        let store = store();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in_subscriber = Arc::clone(&seen);
        store.subscribe(move |s: &TestState| {
            seen_in_subscriber
                .lock()
                .unwrap()
                .push(s.applied.len());
        });

        let mut handle = store.send(TestAction::Fanout).await.unwrap();
        handle.wait().await;

        // One notification per applied action: the command, then each
        // action of the settled batch.
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn state_watch_publishes_snapshots() {
        let store = store();
        let mut rx = store.subscribe_state();

        let mut handle = store
            .send(TestAction::Record("watched".to_string()))
            .await
            .unwrap();
        handle.wait().await;

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().applied, vec!["watched".to_string()]);
    }

    #[tokio::test]
    async fn shutdown_rejects_new_actions() {
        let store = store();
        store.shutdown(Duration::from_secs(1)).await.unwrap();

        let result = store.send(TestAction::Record("late".to_string())).await;
        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
    }
}
