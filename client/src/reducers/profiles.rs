//! Profile reducer.
//!
//! One arm per profile operation: commands describe the request and the
//! ordered dispatch batch it settles into; events apply the transitions.
//!
//! Failure contract, uniform across every operation:
//! - the error record carries `{ msg, status }`, with msg falling back to
//!   the generic server-error string when the transport yielded no response;
//! - form submissions additionally surface one alert per field error, in
//!   the order the server reported them, BEFORE the error record.

use crate::actions::{AppAction, ProfileAction, Route};
use crate::constants::{DELETE_ACCOUNT_PROMPT, endpoints};
use crate::environment::ClientEnvironment;
use crate::error::decode;
use crate::providers::{ApiClient, ConfirmPrompt, Navigator};
use crate::reducers::{field_error_alerts, show_alert};
use crate::state::{AlertKind, Profile, ProfileImage, ProfilesState};
use std::marker::PhantomData;
use worknet_core::effect::{ActionBatch, Effect};
use worknet_core::environment::{Clock, IdGenerator};
use worknet_core::reducer::Reducer;
use worknet_core::{SmallVec, smallvec};

/// Field name the upload endpoint expects the image under.
const UPLOAD_FIELD: &str = "file";

/// Profile reducer.
#[derive(Debug, Clone)]
pub struct ProfileReducer<A, N, P, C, I> {
    /// Phantom data to hold type parameters.
    _phantom: PhantomData<(A, N, P, C, I)>,
}

impl<A, N, P, C, I> ProfileReducer<A, N, P, C, I> {
    /// Create a new profile reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<A, N, P, C, I> Default for ProfileReducer<A, N, P, C, I> {
    fn default() -> Self {
        Self::new()
    }
}

fn failure(err: &crate::error::RequestError) -> ActionBatch<AppAction> {
    smallvec![AppAction::Profile(ProfileAction::Failed(err.to_error_info()))]
}

fn validation_failure(err: &crate::error::RequestError) -> ActionBatch<AppAction> {
    let mut batch: ActionBatch<AppAction> = field_error_alerts(err).into_iter().collect();
    batch.push(AppAction::Profile(ProfileAction::Failed(err.to_error_info())));
    batch
}

/// Success batch shared by the sub-resource mutations: the refreshed
/// profile plus an outcome alert, optionally followed by navigation.
fn saved_batch(profile: Profile, alert: &str, navigate: bool) -> ActionBatch<AppAction> {
    let mut batch: ActionBatch<AppAction> = smallvec![
        AppAction::Profile(ProfileAction::Saved(profile)),
        show_alert(alert, AlertKind::Success),
    ];
    if navigate {
        batch.push(AppAction::Navigate(Route::Home));
    }
    batch
}

impl<A, N, P, C, I> Reducer for ProfileReducer<A, N, P, C, I>
where
    A: ApiClient + Clone + 'static,
    N: Navigator + Clone + 'static,
    P: ConfirmPrompt + Clone + 'static,
    C: Clock + Clone + 'static,
    I: IdGenerator + Clone + 'static,
{
    type State = ProfilesState;
    type Action = AppAction;
    type Environment = ClientEnvironment<A, N, P, C, I>;

    #[allow(clippy::too_many_lines)] // one arm per operation of the slice
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let AppAction::Profile(action) = action else {
            return smallvec![Effect::None];
        };

        match action {
            // ═══════════════════════════════════════════════════════════
            // FetchCurrent: the signed-in user's own profile
            // ═══════════════════════════════════════════════════════════
            ProfileAction::FetchCurrent => {
                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    match api
                        .get(endpoints::PROFILE_ME)
                        .await
                        .and_then(decode::<Profile>)
                    {
                        Ok(profile) => smallvec![AppAction::Profile(ProfileAction::Loaded(profile))],
                        Err(err) => failure(&err),
                    }
                })]
            },

            // ═══════════════════════════════════════════════════════════
            // Fetch: a member's profile by user id
            // ═══════════════════════════════════════════════════════════
            ProfileAction::Fetch { user_id } => {
                let api = env.api.clone();
                let path = endpoints::profile_by_user(&user_id);
                smallvec![Effect::future(async move {
                    match api.get(&path).await.and_then(decode::<Profile>) {
                        Ok(profile) => smallvec![AppAction::Profile(ProfileAction::Loaded(profile))],
                        Err(err) => failure(&err),
                    }
                })]
            },

            // ═══════════════════════════════════════════════════════════
            // FetchAll: the directory; clears the loaded profile first
            // ═══════════════════════════════════════════════════════════
            ProfileAction::FetchAll => {
                // Applied before the request is issued, so a stale profile
                // never renders behind the directory view.
                state.profile = None;

                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    match api
                        .get(endpoints::PROFILES)
                        .await
                        .and_then(decode::<Vec<Profile>>)
                    {
                        Ok(profiles) => {
                            smallvec![AppAction::Profile(ProfileAction::ListLoaded(profiles))]
                        },
                        Err(err) => failure(&err),
                    }
                })]
            },

            // ═══════════════════════════════════════════════════════════
            // Save: create or update; navigation only on create
            // ═══════════════════════════════════════════════════════════
            ProfileAction::Save { form, edit } => {
                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    let body = serde_json::to_value(&form).unwrap_or(serde_json::Value::Null);
                    match api
                        .post(endpoints::PROFILES, body)
                        .await
                        .and_then(decode::<Profile>)
                    {
                        Ok(profile) => saved_batch(
                            profile,
                            if edit { "Profile Updated" } else { "Profile Created" },
                            !edit,
                        ),
                        Err(err) => validation_failure(&err),
                    }
                })]
            },

            // ═══════════════════════════════════════════════════════════
            // UploadImage: multipart; failures also alert
            // ═══════════════════════════════════════════════════════════
            ProfileAction::UploadImage { bytes, filename } => {
                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    match api
                        .post_multipart(endpoints::PROFILE_UPLOAD, UPLOAD_FIELD, &filename, bytes)
                        .await
                        .and_then(decode::<ProfileImage>)
                    {
                        Ok(image) => smallvec![
                            AppAction::Profile(ProfileAction::ImageUploaded(image)),
                            show_alert("Profile image uploaded", AlertKind::Success),
                        ],
                        Err(err) => {
                            let mut batch: ActionBatch<AppAction> =
                                smallvec![show_alert(err.message(), AlertKind::Error)];
                            batch.push(AppAction::Profile(ProfileAction::Failed(
                                err.to_error_info(),
                            )));
                            batch
                        },
                    }
                })]
            },

            // ═══════════════════════════════════════════════════════════
            // Experience / education additions: navigate home on success
            // ═══════════════════════════════════════════════════════════
            ProfileAction::AddExperience(form) => {
                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    let body = serde_json::to_value(&form).unwrap_or(serde_json::Value::Null);
                    match api
                        .put(endpoints::EXPERIENCE, body)
                        .await
                        .and_then(decode::<Profile>)
                    {
                        Ok(profile) => saved_batch(profile, "Experience added", true),
                        Err(err) => validation_failure(&err),
                    }
                })]
            },

            ProfileAction::AddEducation(form) => {
                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    let body = serde_json::to_value(&form).unwrap_or(serde_json::Value::Null);
                    match api
                        .put(endpoints::EDUCATION, body)
                        .await
                        .and_then(decode::<Profile>)
                    {
                        Ok(profile) => saved_batch(profile, "Education added", true),
                        Err(err) => validation_failure(&err),
                    }
                })]
            },

            // ═══════════════════════════════════════════════════════════
            // Experience / education deletions: no navigation
            // ═══════════════════════════════════════════════════════════
            ProfileAction::DeleteExperience { id } => {
                let api = env.api.clone();
                let path = endpoints::experience(&id);
                smallvec![Effect::future(async move {
                    match api.delete(&path).await.and_then(decode::<Profile>) {
                        Ok(profile) => saved_batch(profile, "Experience removed", false),
                        Err(err) => failure(&err),
                    }
                })]
            },

            ProfileAction::DeleteEducation { id } => {
                let api = env.api.clone();
                let path = endpoints::education(&id);
                smallvec![Effect::future(async move {
                    match api.delete(&path).await.and_then(decode::<Profile>) {
                        Ok(profile) => saved_batch(profile, "Education removed", false),
                        Err(err) => failure(&err),
                    }
                })]
            },

            // ═══════════════════════════════════════════════════════════
            // DeleteAccount: confirmation gate BEFORE the request
            // ═══════════════════════════════════════════════════════════
            ProfileAction::DeleteAccount => {
                let api = env.api.clone();
                let confirm = env.confirm.clone();
                smallvec![Effect::future(async move {
                    if !confirm.confirm(DELETE_ACCOUNT_PROMPT) {
                        // Declined: no request, no dispatch.
                        return ActionBatch::new();
                    }

                    match api.delete(endpoints::PROFILES).await {
                        Ok(_) => smallvec![
                            AppAction::Profile(ProfileAction::Cleared),
                            show_alert(
                                "Your account has been permanently deleted",
                                AlertKind::Success,
                            ),
                        ],
                        Err(err) => failure(&err),
                    }
                })]
            },

            // ═══════════════════════════════════════════════════════════
            // Events
            // ═══════════════════════════════════════════════════════════
            ProfileAction::Loaded(profile) | ProfileAction::Saved(profile) => {
                state.profile = Some(profile);
                state.loading = false;
                smallvec![Effect::None]
            },

            ProfileAction::ListLoaded(profiles) => {
                state.profiles = profiles;
                state.loading = false;
                smallvec![Effect::None]
            },

            ProfileAction::ImageUploaded(image) => {
                state.image = Some(image);
                smallvec![Effect::None]
            },

            ProfileAction::Cleared => {
                state.profile = None;
                smallvec![Effect::None]
            },

            // Any failure clears the loaded profile, even one unrelated to
            // it (an image-upload error while a profile is on screen).
            ProfileAction::Failed(info) => {
                tracing::debug!(?info, "Profile request failed");
                state.error = info;
                state.loading = false;
                state.profile = None;
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

    type TestReducer = ProfileReducer<
        crate::mocks::MockApiClient,
        crate::mocks::RecordingNavigator,
        crate::mocks::StaticConfirm,
        worknet_testing::FixedClock,
        worknet_testing::mocks::SequentialIdGenerator,
    >;

    fn profile(status: &str) -> Profile {
        Profile {
            status: status.to_string(),
            ..Profile::default()
        }
    }

    #[test]
    fn loaded_replaces_profile_and_stops_loading() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_environment())
            .given_state(ProfilesState::default())
            .when_action(AppAction::Profile(ProfileAction::Loaded(profile(
                "Developer",
            ))))
            .then_state(|state| {
                assert_eq!(
                    state.profile.as_ref().map(|p| p.status.as_str()),
                    Some("Developer")
                );
                assert!(!state.loading);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn saved_is_equivalent_to_loaded() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_environment())
            .given_state(ProfilesState::default())
            .when_action(AppAction::Profile(ProfileAction::Saved(profile("Student"))))
            .then_state(|state| {
                assert!(state.profile.is_some());
                assert!(!state.loading);
            })
            .run();
    }

    #[test]
    fn failed_records_error_and_nulls_profile() {
        let mut seeded = ProfilesState::default();
        seeded.profile = Some(profile("Developer"));
        seeded.loading = false;

        ReducerTest::new(TestReducer::new())
            .with_env(test_environment())
            .given_state(seeded)
            .when_action(AppAction::Profile(ProfileAction::Failed(ErrorInfo {
                msg: "Not Found".to_string(),
                status: Some(404),
            })))
            .then_state(|state| {
                assert_eq!(state.profile, None);
                assert_eq!(state.error.msg, "Not Found");
                assert_eq!(state.error.status, Some(404));
                assert!(!state.loading);
            })
            .run();
    }

    #[test]
    fn cleared_touches_only_the_loaded_profile() {
        let mut seeded = ProfilesState::default();
        seeded.profile = Some(profile("Developer"));
        seeded.profiles = vec![profile("Student")];
        seeded.error = ErrorInfo {
            msg: "Earlier".to_string(),
            status: Some(500),
        };
        seeded.loading = false;

        ReducerTest::new(TestReducer::new())
            .with_env(test_environment())
            .given_state(seeded)
            .when_action(AppAction::Profile(ProfileAction::Cleared))
            .then_state(|state| {
                assert_eq!(state.profile, None);
                assert_eq!(state.profiles.len(), 1);
                assert_eq!(state.error.msg, "Earlier");
                assert!(!state.loading);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn image_upload_replaces_image_only() {
        let mut seeded = ProfilesState::default();
        seeded.profile = Some(profile("Developer"));

        ReducerTest::new(TestReducer::new())
            .with_env(test_environment())
            .given_state(seeded)
            .when_action(AppAction::Profile(ProfileAction::ImageUploaded(
                ProfileImage {
                    url: "/images/u1".to_string(),
                },
            )))
            .then_state(|state| {
                assert_eq!(state.image.as_ref().map(|i| i.url.as_str()), Some("/images/u1"));
                assert!(state.profile.is_some());
            })
            .run();
    }

    #[test]
    fn fetch_all_clears_profile_before_requesting() {
        let mut seeded = ProfilesState::default();
        seeded.profile = Some(profile("Developer"));

        ReducerTest::new(TestReducer::new())
            .with_env(test_environment())
            .given_state(seeded)
            .when_action(AppAction::Profile(ProfileAction::FetchAll))
            .then_state(|state| assert_eq!(state.profile, None))
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn commands_leave_state_untouched_until_settlement() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_environment())
            .given_state(ProfilesState::default())
            .when_action(AppAction::Profile(ProfileAction::FetchCurrent))
            .then_state(|state| {
                assert!(state.loading);
                assert_eq!(state.profile, None);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }
}
