//! Authentication reducer.
//!
//! Owns the in-memory auth token. The token's two mirrors outside the
//! state tree (the adapter's default header and the persisted storage) are
//! kept consistent by the store-level subscription, never from here.

use crate::actions::{AppAction, UserAction};
use crate::constants::endpoints;
use crate::environment::ClientEnvironment;
use crate::error::decode;
use crate::providers::{ApiClient, ConfirmPrompt, Navigator};
use crate::reducers::field_error_alerts;
use crate::state::{TokenResponse, User, UsersState};
use std::marker::PhantomData;
use worknet_core::effect::{ActionBatch, Effect};
use worknet_core::environment::{Clock, IdGenerator};
use worknet_core::reducer::Reducer;
use worknet_core::{SmallVec, smallvec};

/// Authentication reducer.
#[derive(Debug, Clone)]
pub struct UserReducer<A, N, P, C, I> {
    /// Phantom data to hold type parameters.
    _phantom: PhantomData<(A, N, P, C, I)>,
}

impl<A, N, P, C, I> UserReducer<A, N, P, C, I> {
    /// Create a new authentication reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<A, N, P, C, I> Default for UserReducer<A, N, P, C, I> {
    fn default() -> Self {
        Self::new()
    }
}

/// Failure batch for non-form auth requests: the error record only.
fn failure(err: &crate::error::RequestError) -> ActionBatch<AppAction> {
    smallvec![AppAction::Users(UserAction::AuthFailed(err.to_error_info()))]
}

/// Failure batch for form submissions: one alert per field error, in
/// order, then the error record.
fn validation_failure(err: &crate::error::RequestError) -> ActionBatch<AppAction> {
    let mut batch: ActionBatch<AppAction> = field_error_alerts(err).into_iter().collect();
    batch.push(AppAction::Users(UserAction::AuthFailed(err.to_error_info())));
    batch
}

impl<A, N, P, C, I> Reducer for UserReducer<A, N, P, C, I>
where
    A: ApiClient + Clone + 'static,
    N: Navigator + Clone + 'static,
    P: ConfirmPrompt + Clone + 'static,
    C: Clock + Clone + 'static,
    I: IdGenerator + Clone + 'static,
{
    type State = UsersState;
    type Action = AppAction;
    type Environment = ClientEnvironment<A, N, P, C, I>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let AppAction::Users(action) = action else {
            return smallvec![Effect::None];
        };

        match action {
            // ═══════════════════════════════════════════════════════════
            // Register: create account, then load the user it belongs to
            // ═══════════════════════════════════════════════════════════
            UserAction::Register(form) => {
                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    let body = serde_json::to_value(&form).unwrap_or(serde_json::Value::Null);
                    match api
                        .post(endpoints::REGISTER, body)
                        .await
                        .and_then(decode::<TokenResponse>)
                    {
                        Ok(TokenResponse { token }) => smallvec![
                            AppAction::Users(UserAction::Registered { token }),
                            AppAction::Users(UserAction::LoadCurrent),
                        ],
                        Err(err) => validation_failure(&err),
                    }
                })]
            },

            // ═══════════════════════════════════════════════════════════
            // Login
            // ═══════════════════════════════════════════════════════════
            UserAction::Login(form) => {
                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    let body = serde_json::to_value(&form).unwrap_or(serde_json::Value::Null);
                    match api
                        .post(endpoints::LOGIN, body)
                        .await
                        .and_then(decode::<TokenResponse>)
                    {
                        Ok(TokenResponse { token }) => smallvec![
                            AppAction::Users(UserAction::LoggedIn { token }),
                            AppAction::Users(UserAction::LoadCurrent),
                        ],
                        Err(err) => validation_failure(&err),
                    }
                })]
            },

            // ═══════════════════════════════════════════════════════════
            // LoadCurrent: resolve the token into its user
            // ═══════════════════════════════════════════════════════════
            UserAction::LoadCurrent => {
                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    match api.get(endpoints::USER_ME).await.and_then(decode::<User>) {
                        Ok(user) => smallvec![AppAction::Users(UserAction::Loaded(user))],
                        Err(err) => failure(&err),
                    }
                })]
            },

            // ═══════════════════════════════════════════════════════════
            // Logout: drop the session; the loaded profile goes with it
            // ═══════════════════════════════════════════════════════════
            UserAction::Logout => {
                state.token = None;
                state.is_authenticated = false;
                state.user = None;
                state.loading = false;

                smallvec![Effect::future(async move {
                    smallvec![AppAction::Profile(crate::actions::ProfileAction::Cleared)]
                })]
            },

            // ═══════════════════════════════════════════════════════════
            // Events
            // ═══════════════════════════════════════════════════════════
            UserAction::SessionRestored { token } => {
                state.token = Some(token);
                smallvec![Effect::None]
            },

            UserAction::Registered { token } | UserAction::LoggedIn { token } => {
                state.token = Some(token);
                state.is_authenticated = true;
                state.loading = false;
                smallvec![Effect::None]
            },

            UserAction::Loaded(user) => {
                state.user = Some(user);
                state.is_authenticated = true;
                state.loading = false;
                smallvec![Effect::None]
            },

            UserAction::AuthFailed(info) => {
                tracing::debug!(?info, "Auth request failed, dropping session");
                state.token = None;
                state.user = None;
                state.is_authenticated = false;
                state.loading = false;
                state.error = info;
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorInfo;
    use crate::mocks::test_environment;
    use worknet_testing::ReducerTest;
    use worknet_testing::reducer_test::assertions;

    type TestReducer = UserReducer<
        crate::mocks::MockApiClient,
        crate::mocks::RecordingNavigator,
        crate::mocks::StaticConfirm,
        worknet_testing::FixedClock,
        worknet_testing::mocks::SequentialIdGenerator,
    >;

    #[test]
    fn logged_in_stores_token_and_authenticates() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_environment())
            .given_state(UsersState::default())
            .when_action(AppAction::Users(UserAction::LoggedIn {
                token: "tok-1".to_string(),
            }))
            .then_state(|state| {
                assert_eq!(state.token.as_deref(), Some("tok-1"));
                assert!(state.is_authenticated);
                assert!(!state.loading);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn session_restored_only_seeds_token() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_environment())
            .given_state(UsersState::default())
            .when_action(AppAction::Users(UserAction::SessionRestored {
                token: "stored".to_string(),
            }))
            .then_state(|state| {
                assert_eq!(state.token.as_deref(), Some("stored"));
                assert!(!state.is_authenticated);
                assert!(state.loading);
            })
            .run();
    }

    #[test]
    fn auth_failure_drops_the_session() {
        let authenticated = UsersState {
            token: Some("tok-1".to_string()),
            is_authenticated: true,
            loading: false,
            user: Some(User::default()),
            error: ErrorInfo::default(),
        };

        ReducerTest::new(TestReducer::new())
            .with_env(test_environment())
            .given_state(authenticated)
            .when_action(AppAction::Users(UserAction::AuthFailed(ErrorInfo {
                msg: "Unauthorized".to_string(),
                status: Some(401),
            })))
            .then_state(|state| {
                assert_eq!(state.token, None);
                assert_eq!(state.user, None);
                assert!(!state.is_authenticated);
                assert_eq!(state.error.status, Some(401));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn login_command_issues_a_future() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_environment())
            .given_state(UsersState::default())
            .when_action(AppAction::Users(UserAction::Login(
                crate::state::LoginForm {
                    email: "jo@example.com".to_string(),
                    password: "hunter2".to_string(),
                },
            )))
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn logout_clears_auth_and_requests_profile_clear() {
        let authenticated = UsersState {
            token: Some("tok-1".to_string()),
            is_authenticated: true,
            loading: false,
            user: Some(User::default()),
            error: ErrorInfo::default(),
        };

        ReducerTest::new(TestReducer::new())
            .with_env(test_environment())
            .given_state(authenticated)
            .when_action(AppAction::Users(UserAction::Logout))
            .then_state(|state| {
                assert_eq!(state.token, None);
                assert!(!state.is_authenticated);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }
}
