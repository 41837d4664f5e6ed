//! # Worknet Core
//!
//! Core traits and types for the worknet client state architecture.
//!
//! This crate provides the fundamental abstractions of the unidirectional
//! data flow used by the worknet client: views dispatch actions, reducers
//! compute state transitions, and effects describe the asynchronous work
//! (HTTP requests, timers, navigation) whose results are fed back into the
//! store as further actions.
//!
//! ## Core Concepts
//!
//! - **State**: owned, `Clone`-able domain state for a slice of the app
//! - **Action**: all possible inputs to a reducer (commands and settled events)
//! - **Reducer**: pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: side effect descriptions (not execution)
//! - **Environment**: injected collaborators behind traits
//!
//! ## Architecture Principles
//!
//! - Unidirectional data flow
//! - Explicit effects (no hidden I/O in reducers)
//! - Dependency injection via Environment
//! - Cross-slice reactions live outside reducers
//!
//! ## Example
//!
//! ```ignore
//! use worknet_core::{Effect, Reducer, SmallVec, smallvec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct SessionState {
//!     token: Option<String>,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum SessionAction {
//!     LoggedIn { token: String },
//!     LoggedOut,
//! }
//!
//! struct SessionReducer;
//!
//! impl Reducer for SessionReducer {
//!     type State = SessionState;
//!     type Action = SessionAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut SessionState,
//!         action: SessionAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<SessionAction>; 4]> {
//!         match action {
//!             SessionAction::LoggedIn { token } => state.token = Some(token),
//!             SessionAction::LoggedOut => state.token = None,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

pub use effect::Effect;
pub use reducer::Reducer;

/// Reducer composition utilities (`combine_reducers`, `scope_reducer`)
pub mod composition;

/// Reducer module - the core trait for state transitions
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They contain the transition logic for one slice of the state tree and are
/// deterministic and testable. Any I/O a transition requires is returned as an
/// [`Effect`](crate::effect::Effect) value, never performed inline.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The slice state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected collaborators this reducer needs
    ///
    /// # Contract
    ///
    /// - Unknown action kinds MUST leave the state unchanged (identity).
    /// - Reducers MUST NOT perform I/O; they return effect descriptions.
    /// - Reducers MUST NOT read state belonging to another slice.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected collaborators
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected collaborators
        ///
        /// # Returns
        ///
        /// The effects to be executed by the runtime. Most transitions return
        /// no effects (`Effect::None`); command actions typically return one
        /// `Effect::Future` describing the async request they trigger.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects describe side effects to be performed by the runtime. They are
/// values (not execution) and are composable and cancellable.
pub mod effect {
    use smallvec::SmallVec;
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// An ordered sequence of actions produced by one settled effect.
    ///
    /// When an async unit of work settles, every action in its batch is
    /// applied to the state tree in order, with no interleaving from other
    /// effects between two actions of the same batch. This is how a single
    /// orchestrated operation (request → several dispatches) keeps its
    /// dispatch order.
    pub type ActionBatch<Action> = SmallVec<[Action; 4]>;

    /// Identifier under which a cancellable effect is registered.
    ///
    /// Dispatching [`Effect::Cancel`] with the same id aborts the registered
    /// effect if it is still pending.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EffectId(pub uuid::Uuid);

    impl EffectId {
        /// Generate a fresh random effect id.
        #[must_use]
        pub fn new() -> Self {
            Self(uuid::Uuid::new_v4())
        }
    }

    impl Default for EffectId {
        fn default() -> Self {
            Self::new()
        }
    }

    impl From<uuid::Uuid> for EffectId {
        fn from(id: uuid::Uuid) -> Self {
            Self(id)
        }
    }

    impl std::fmt::Display for EffectId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            self.0.fmt(f)
        }
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store
    /// runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (timers, scheduled dismissals)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Settles into an [`ActionBatch`] applied to the state tree in
        /// order. An empty batch means the work completed without any state
        /// transition (e.g. a declined confirmation gate).
        Future(Pin<Box<dyn Future<Output = ActionBatch<Action>> + Send>>),

        /// Register the wrapped effect under an id so it can be aborted.
        ///
        /// Registering a new effect under an id that is still pending aborts
        /// the earlier effect (in-flight dedup).
        Cancellable {
            /// Registration id
            id: EffectId,
            /// The effect to register
            effect: Box<Effect<Action>>,
        },

        /// Abort the pending effect registered under this id, if any.
        Cancel(EffectId),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Cancellable { id, effect } => f
                    .debug_struct("Effect::Cancellable")
                    .field("id", id)
                    .field("effect", effect)
                    .finish(),
                Effect::Cancel(id) => f.debug_tuple("Effect::Cancel").field(id).finish(),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap an async unit of work settling into an action batch
        pub fn future<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = ActionBatch<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Make this effect cancellable under the given id
        #[must_use]
        pub fn cancellable(self, id: EffectId) -> Effect<Action> {
            Effect::Cancellable {
                id,
                effect: Box::new(self),
            }
        }
    }
}

/// Environment module - dependency injection traits
///
/// All external collaborators are abstracted behind traits and injected via
/// the Environment parameter, so reducers stay deterministic under test.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// System clock - the production [`Clock`]
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Id generator trait - abstracts entity id minting for testability
    ///
    /// Production implementations return random v4 uuids; tests use a
    /// sequential generator so ids are predictable.
    pub trait IdGenerator: Send + Sync {
        /// Mint a fresh id
        fn generate(&self) -> uuid::Uuid;
    }

    /// Random id generator - the production [`IdGenerator`]
    #[derive(Debug, Clone, Copy, Default)]
    pub struct RandomIdGenerator;

    impl IdGenerator for RandomIdGenerator {
        fn generate(&self) -> uuid::Uuid {
            uuid::Uuid::new_v4()
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)] // test assertions

    use super::effect::{ActionBatch, Effect, EffectId};
    use super::environment::{Clock, IdGenerator, RandomIdGenerator, SystemClock};
    use smallvec::smallvec;

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Ping,
    }

    #[test]
    fn effect_debug_formats_variants() {
        let none: Effect<TestAction> = Effect::None;
        assert_eq!(format!("{none:?}"), "Effect::None");

        let fut = Effect::<TestAction>::future(async { ActionBatch::new() });
        assert_eq!(format!("{fut:?}"), "Effect::Future(<future>)");

        let id = EffectId::new();
        let cancel: Effect<TestAction> = Effect::Cancel(id);
        assert!(format!("{cancel:?}").starts_with("Effect::Cancel"));
    }

    #[test]
    fn cancellable_wraps_effect() {
        let id = EffectId::new();
        let effect = Effect::<TestAction>::None.cancellable(id);
        match effect {
            Effect::Cancellable { id: got, .. } => assert_eq!(got, id),
            other => panic!("expected Cancellable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn future_effect_settles_into_batch() {
        let effect = Effect::future(async { smallvec![TestAction::Ping] });
        match effect {
            Effect::Future(fut) => {
                let batch = fut.await;
                assert_eq!(batch.len(), 1);
                assert_eq!(batch[0], TestAction::Ping);
            },
            other => panic!("expected Future, got {other:?}"),
        }
    }

    #[test]
    fn effect_ids_are_unique() {
        assert_ne!(EffectId::new(), EffectId::new());
    }

    #[test]
    fn system_clock_advances() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn random_ids_are_unique() {
        let ids = RandomIdGenerator;
        assert_ne!(ids.generate(), ids.generate());
    }
}
