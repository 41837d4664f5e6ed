//! Reducer composition utilities
//!
//! This module provides the two combinators the root application reducer is
//! assembled from:
//! - **`combine_reducers`**: run multiple reducers over the same state and
//!   action type in sequence (every reducer sees every action; foreign
//!   actions are identity)
//! - **`scope_reducer`**: focus a slice reducer onto one field of a larger
//!   state tree
//!
//! Together they express the slice model: the application state is a struct
//! of independent slices, each governed by its own reducer, and the root
//! reducer is the sequential combination of every scoped slice reducer.
//!
//! # Examples
//!
//! ```
//! use worknet_core::{Effect, Reducer, SmallVec, smallvec};
//! use worknet_core::composition::{combine_reducers, scope_reducer};
//!
//! #[derive(Clone, Default)]
//! struct CounterState {
//!     count: i32,
//! }
//!
//! #[derive(Clone, Default)]
//! struct AppState {
//!     counter: CounterState,
//! }
//!
//! #[derive(Clone)]
//! enum AppAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = AppAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: AppAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<AppAction>; 4]> {
//!         match action {
//!             AppAction::Increment => state.count += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let root = combine_reducers::<AppState, AppAction, ()>(vec![Box::new(scope_reducer(
//!     CounterReducer,
//!     |app: &mut AppState| &mut app.counter,
//! ))]);
//!
//! let mut state = AppState::default();
//! let _ = root.reduce(&mut state, AppAction::Increment, &());
//! assert_eq!(state.counter.count, 1);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;
use std::sync::Arc;

/// A boxed reducer trait object, the unit [`combine_reducers`] composes.
pub type BoxedReducer<S, A, E> =
    Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence and all effects are concatenated. Every
/// reducer receives every action; reducers are required to treat actions
/// they do not recognize as identity, so the combination behaves like one
/// total reducer over the union of the parts.
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<BoxedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    CombinedReducer {
        reducers: Arc::new(reducers),
    }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`]. Cheap to clone (the reducer list is
/// shared), which the store runtime relies on when spawning effect tasks.
pub struct CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    reducers: Arc<Vec<BoxedReducer<S, A, E>>>,
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

        for reducer in self.reducers.iter() {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects);
        }

        all_effects
    }
}

/// Scopes a reducer to operate on one field of a larger state.
///
/// The slice reducer keeps its own state type and never sees the rest of the
/// tree; the lens selects its field out of the parent state. Actions and
/// environment pass through unchanged, so a scoped slice reducer can still
/// describe effects that feed any root action back into the store (the
/// cross-slice dispatches an orchestrated operation performs).
pub fn scope_reducer<S, SubS, R>(
    reducer: R,
    lens: fn(&mut S) -> &mut SubS,
) -> ScopedReducer<S, SubS, R>
where
    S: 'static,
    SubS: 'static,
    R: Reducer<State = SubS>,
{
    ScopedReducer { reducer, lens }
}

/// A scoped reducer that operates on one field of a larger state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, R>
where
    S: 'static,
    SubS: 'static,
    R: Reducer<State = SubS>,
{
    reducer: R,
    lens: fn(&mut S) -> &mut SubS,
}

impl<S, SubS, R> Clone for ScopedReducer<S, SubS, R>
where
    S: 'static,
    SubS: 'static,
    R: Reducer<State = SubS> + Clone,
{
    fn clone(&self) -> Self {
        Self {
            reducer: self.reducer.clone(),
            lens: self.lens,
        }
    }
}

impl<S, SubS, R> Reducer for ScopedReducer<S, SubS, R>
where
    S: 'static,
    SubS: 'static,
    R: Reducer<State = SubS>,
{
    type State = S;
    type Action = R::Action;
    type Environment = R::Environment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        self.reducer.reduce((self.lens)(state), action, env)
    }
}
