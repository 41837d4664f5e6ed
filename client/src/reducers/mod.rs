//! Slice reducers and the root application reducer.
//!
//! Each slice owns a pure reducer over its own state; the root reducer is
//! their sequential combination, each scoped onto its slice of
//! [`AppState`]. Every reducer sees every action and treats foreign ones as
//! identity, so cross-slice dispatches (a profile failure showing alerts)
//! route naturally without any reducer reading another slice.

pub mod alerts;
pub mod posts;
pub mod profiles;
pub mod users;

use crate::actions::{AlertAction, AppAction};
use crate::environment::ClientEnvironment;
use crate::error::RequestError;
use crate::providers::{ApiClient, ConfirmPrompt, Navigator};
use crate::state::{AlertKind, AppState};
use std::marker::PhantomData;
use std::time::Duration;
use worknet_core::composition::{CombinedReducer, combine_reducers, scope_reducer};
use worknet_core::effect::{ActionBatch, Effect};
use worknet_core::environment::{Clock, IdGenerator};
use worknet_core::reducer::Reducer;
use worknet_core::{SmallVec, smallvec};

// Re-export
pub use alerts::AlertReducer;
pub use posts::PostReducer;
pub use profiles::ProfileReducer;
pub use users::UserReducer;

/// Build the alert action for an outcome message.
pub(crate) fn show_alert(message: impl Into<String>, kind: AlertKind) -> AppAction {
    AppAction::Alert(AlertAction::Show {
        message: message.into(),
        kind,
    })
}

/// One error alert per field error, in the order the server reported them.
pub(crate) fn field_error_alerts(err: &RequestError) -> Vec<AppAction> {
    err.field_errors()
        .iter()
        .map(|field| show_alert(field.msg.clone(), AlertKind::Error))
        .collect()
}

/// Handles [`AppAction::Navigate`]: state-identity, with the navigator call
/// as its only effect. Placing navigation behind an action keeps it
/// strictly ordered after the dispatches that precede it in a batch.
#[derive(Debug, Clone)]
pub struct NavigationReducer<A, N, P, C, I> {
    /// Phantom data to hold type parameters.
    _phantom: PhantomData<(A, N, P, C, I)>,
}

impl<A, N, P, C, I> NavigationReducer<A, N, P, C, I> {
    /// Create a new navigation reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<A, N, P, C, I> Default for NavigationReducer<A, N, P, C, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, N, P, C, I> Reducer for NavigationReducer<A, N, P, C, I>
where
    A: ApiClient + Clone + 'static,
    N: Navigator + Clone + 'static,
    P: ConfirmPrompt + Clone + 'static,
    C: Clock + Clone + 'static,
    I: IdGenerator + Clone + 'static,
{
    type State = AppState;
    type Action = AppAction;
    type Environment = ClientEnvironment<A, N, P, C, I>;

    fn reduce(
        &self,
        _state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let AppAction::Navigate(route) = action else {
            return smallvec![Effect::None];
        };

        let navigator = env.navigator.clone();
        smallvec![Effect::future(async move {
            navigator.push(route.as_str());
            ActionBatch::new()
        })]
    }
}

/// The root application reducer: every slice reducer scoped onto its slice,
/// plus navigation.
pub struct AppReducer<A, N, P, C, I>
where
    A: ApiClient + Clone + 'static,
    N: Navigator + Clone + 'static,
    P: ConfirmPrompt + Clone + 'static,
    C: Clock + Clone + 'static,
    I: IdGenerator + Clone + 'static,
{
    inner: CombinedReducer<AppState, AppAction, ClientEnvironment<A, N, P, C, I>>,
}

impl<A, N, P, C, I> AppReducer<A, N, P, C, I>
where
    A: ApiClient + Clone + 'static,
    N: Navigator + Clone + 'static,
    P: ConfirmPrompt + Clone + 'static,
    C: Clock + Clone + 'static,
    I: IdGenerator + Clone + 'static,
{
    /// Root reducer with the default alert timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_alert_timeout(alerts::DEFAULT_ALERT_TIMEOUT)
    }

    /// Root reducer with a custom alert visibility window.
    #[must_use]
    pub fn with_alert_timeout(timeout: Duration) -> Self {
        Self {
            inner: combine_reducers(vec![
                Box::new(scope_reducer(UserReducer::new(), |state: &mut AppState| {
                    &mut state.users
                })),
                Box::new(scope_reducer(ProfileReducer::new(), |state: &mut AppState| {
                    &mut state.profiles
                })),
                Box::new(scope_reducer(PostReducer::new(), |state: &mut AppState| {
                    &mut state.posts
                })),
                Box::new(scope_reducer(
                    AlertReducer::with_timeout(timeout),
                    |state: &mut AppState| &mut state.alerts,
                )),
                Box::new(NavigationReducer::new()),
            ]),
        }
    }
}

impl<A, N, P, C, I> Default for AppReducer<A, N, P, C, I>
where
    A: ApiClient + Clone + 'static,
    N: Navigator + Clone + 'static,
    P: ConfirmPrompt + Clone + 'static,
    C: Clock + Clone + 'static,
    I: IdGenerator + Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A, N, P, C, I> Clone for AppReducer<A, N, P, C, I>
where
    A: ApiClient + Clone + 'static,
    N: Navigator + Clone + 'static,
    P: ConfirmPrompt + Clone + 'static,
    C: Clock + Clone + 'static,
    I: IdGenerator + Clone + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<A, N, P, C, I> Reducer for AppReducer<A, N, P, C, I>
where
    A: ApiClient + Clone + 'static,
    N: Navigator + Clone + 'static,
    P: ConfirmPrompt + Clone + 'static,
    C: Clock + Clone + 'static,
    I: IdGenerator + Clone + 'static,
{
    type State = AppState;
    type Action = AppAction;
    type Environment = ClientEnvironment<A, N, P, C, I>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        self.inner.reduce(state, action, env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ProfileAction, UserAction};
    use crate::mocks::{MockEnvironment, test_environment};
    use crate::state::Profile;

    type TestReducer = AppReducer<
        crate::mocks::MockApiClient,
        crate::mocks::RecordingNavigator,
        crate::mocks::StaticConfirm,
        worknet_testing::FixedClock,
        worknet_testing::mocks::SequentialIdGenerator,
    >;

    fn env() -> MockEnvironment {
        test_environment()
    }

    #[test]
    fn slice_actions_reach_their_slice_only() {
        let reducer = TestReducer::new();
        let env = env();
        let mut state = AppState::default();

        let _ = reducer.reduce(
            &mut state,
            AppAction::Profile(ProfileAction::Loaded(Profile::default())),
            &env,
        );

        assert!(state.profiles.profile.is_some());
        assert!(state.users.loading);
        assert!(state.posts.loading);
        assert!(state.alerts.alerts.is_empty());
    }

    #[test]
    fn unknown_slice_actions_are_identity_for_others() {
        let reducer = TestReducer::new();
        let env = env();
        let mut state = AppState::default();

        let before = state.clone();
        let _ = reducer.reduce(
            &mut state,
            AppAction::Users(UserAction::SessionRestored {
                token: "tok".to_string(),
            }),
            &env,
        );

        assert_eq!(state.profiles, before.profiles);
        assert_eq!(state.posts, before.posts);
        assert_eq!(state.alerts, before.alerts);
        assert_ne!(state.users, before.users);
    }

    #[test]
    fn navigate_is_state_identity_with_an_effect() {
        let reducer = TestReducer::new();
        let env = env();
        let mut state = AppState::default();

        let before = state.clone();
        let effects = reducer.reduce(
            &mut state,
            AppAction::Navigate(crate::actions::Route::Home),
            &env,
        );

        assert_eq!(state, before);
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, Effect::Future(_)))
        );
    }
}
