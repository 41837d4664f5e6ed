//! End-to-end flows over a real store with mocked collaborators.
//!
//! Each test drives the full path: command dispatch → reducer → request
//! effect → settled action batch → state transitions, asserting on the
//! applied-action stream, the state tree, and the recorded side effects.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // test code

use serde_json::json;
use worknet_client::actions::{
    AlertAction, AppAction, PostAction, ProfileAction, Route, UserAction,
};
use worknet_client::app::AppStore;
use worknet_client::constants::DELETE_ACCOUNT_PROMPT;
use worknet_client::error::{FieldError, RequestError};
use worknet_client::mocks::{MockApiClient, MockEnvironment, StaticConfirm, test_environment};
use worknet_client::providers::Method;
use worknet_client::reducers::AppReducer;
use worknet_client::state::{AlertKind, AppState, Profile, ProfileForm};
use worknet_client::sync::attach_token_sync;
use worknet_runtime::Store;
use worknet_testing::mocks::SequentialIdGenerator;

type MockStore = AppStore<
    MockApiClient,
    worknet_client::mocks::RecordingNavigator,
    StaticConfirm,
    worknet_testing::FixedClock,
    SequentialIdGenerator,
>;

fn mock_store(env: MockEnvironment) -> MockStore {
    Store::with_broadcast_capacity(AppState::default(), AppReducer::new(), env, 64)
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<AppAction>) -> Vec<AppAction> {
    let mut actions = Vec::new();
    while let Ok(action) = rx.try_recv() {
        actions.push(action);
    }
    actions
}

fn profile_body() -> serde_json::Value {
    json!({
        "_id": "64b0c1",
        "user": { "_id": "64b0aa", "name": "Jo" },
        "status": "Developer",
        "skills": ["Rust"],
        "experience": [],
        "education": []
    })
}

fn decoded_profile() -> Profile {
    serde_json::from_value(profile_body()).expect("fixture should decode")
}

// ═══════════════════════════════════════════════════════════════════════
// Fetching
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn successful_fetch_stores_the_response_body() {
    let env = test_environment();
    env.api
        .respond(Method::Get, "/profiles/me", Ok(profile_body()));
    let store = mock_store(env);

    let mut handle = store
        .send(AppAction::Profile(ProfileAction::FetchCurrent))
        .await
        .unwrap();
    handle.wait().await;

    let profiles = store.state(|s| s.profiles.clone()).await;
    assert_eq!(profiles.profile, Some(decoded_profile()));
    assert!(!profiles.loading);
}

#[tokio::test]
async fn failed_fetch_nulls_profile_and_records_error() {
    let env = test_environment();
    env.api.respond(
        Method::Get,
        "/profiles/me",
        Err(RequestError::Server {
            status: 404,
            message: "Not Found".to_string(),
        }),
    );
    let store = mock_store(env);

    // A profile is already on screen; the failure must clear it.
    store
        .send(AppAction::Profile(ProfileAction::Loaded(decoded_profile())))
        .await
        .unwrap();

    let mut handle = store
        .send(AppAction::Profile(ProfileAction::FetchCurrent))
        .await
        .unwrap();
    handle.wait().await;

    let profiles = store.state(|s| s.profiles.clone()).await;
    assert_eq!(profiles.profile, None);
    assert_eq!(profiles.error.msg, "Not Found");
    assert_eq!(profiles.error.status, Some(404));
}

#[tokio::test]
async fn transport_failure_reports_the_generic_message() {
    let env = test_environment();
    // No scripted response: the request settles as a transport failure.
    let store = mock_store(env);

    let mut handle = store
        .send(AppAction::Profile(ProfileAction::FetchCurrent))
        .await
        .unwrap();
    handle.wait().await;

    let error = store.state(|s| s.profiles.error.clone()).await;
    assert_eq!(error.msg, "Server Error");
    assert_eq!(error.status, None);
}

#[tokio::test]
async fn fetch_by_user_id_loads_that_profile() {
    let env = test_environment();
    env.api
        .respond(Method::Get, "/profiles/user/64b0aa", Ok(profile_body()));
    let store = mock_store(env);

    let mut handle = store
        .send(AppAction::Profile(ProfileAction::Fetch {
            user_id: "64b0aa".to_string(),
        }))
        .await
        .unwrap();
    handle.wait().await;

    let profiles = store.state(|s| s.profiles.clone()).await;
    assert_eq!(profiles.profile, Some(decoded_profile()));
    assert!(!profiles.loading);
}

#[tokio::test]
async fn fetch_all_clears_profile_then_loads_directory() {
    let env = test_environment();
    env.api.respond(
        Method::Get,
        "/profiles",
        Ok(json!([profile_body(), { "status": "Student" }])),
    );
    let store = mock_store(env);

    store
        .send(AppAction::Profile(ProfileAction::Loaded(decoded_profile())))
        .await
        .unwrap();

    let mut handle = store
        .send(AppAction::Profile(ProfileAction::FetchAll))
        .await
        .unwrap();
    handle.wait().await;

    let profiles = store.state(|s| s.profiles.clone()).await;
    assert_eq!(profiles.profile, None);
    assert_eq!(profiles.profiles.len(), 2);
    assert!(!profiles.loading);
}

// ═══════════════════════════════════════════════════════════════════════
// Create / update profile
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn create_profile_dispatches_save_alert_then_navigates_home() {
    let env = test_environment();
    env.api
        .respond(Method::Post, "/profiles", Ok(profile_body()));
    let navigator = env.navigator.clone();
    let store = mock_store(env);
    let mut rx = store.subscribe_actions();

    let mut handle = store
        .send(AppAction::Profile(ProfileAction::Save {
            form: ProfileForm {
                status: "Developer".to_string(),
                ..ProfileForm::default()
            },
            edit: false,
        }))
        .await
        .unwrap();
    handle.wait().await;

    let actions = drain(&mut rx);
    assert_eq!(actions.len(), 4);
    assert!(matches!(actions[0], AppAction::Profile(ProfileAction::Save { .. })));
    assert_eq!(
        actions[1],
        AppAction::Profile(ProfileAction::Saved(decoded_profile()))
    );
    assert_eq!(
        actions[2],
        AppAction::Alert(AlertAction::Show {
            message: "Profile Created".to_string(),
            kind: AlertKind::Success,
        })
    );
    assert_eq!(actions[3], AppAction::Navigate(Route::Home));

    assert_eq!(navigator.routes(), vec!["/home".to_string()]);
}

#[tokio::test]
async fn edit_profile_alerts_updated_and_stays_put() {
    let env = test_environment();
    env.api
        .respond(Method::Post, "/profiles", Ok(profile_body()));
    let navigator = env.navigator.clone();
    let store = mock_store(env);
    let mut rx = store.subscribe_actions();

    let mut handle = store
        .send(AppAction::Profile(ProfileAction::Save {
            form: ProfileForm::default(),
            edit: true,
        }))
        .await
        .unwrap();
    handle.wait().await;

    let actions = drain(&mut rx);
    assert_eq!(actions.len(), 3);
    assert_eq!(
        actions[2],
        AppAction::Alert(AlertAction::Show {
            message: "Profile Updated".to_string(),
            kind: AlertKind::Success,
        })
    );
    assert!(navigator.routes().is_empty());
}

#[tokio::test]
async fn validation_failure_alerts_each_field_before_the_error_record() {
    let env = test_environment();
    env.api.respond(
        Method::Post,
        "/profiles",
        Err(RequestError::Validation {
            status: 400,
            message: "Bad Request".to_string(),
            errors: vec![
                FieldError {
                    msg: "Status is required".to_string(),
                    param: None,
                },
                FieldError {
                    msg: "Skills is required".to_string(),
                    param: None,
                },
                FieldError {
                    msg: "Website must be valid".to_string(),
                    param: None,
                },
            ],
        }),
    );
    let store = mock_store(env);
    let mut rx = store.subscribe_actions();

    let mut handle = store
        .send(AppAction::Profile(ProfileAction::Save {
            form: ProfileForm::default(),
            edit: false,
        }))
        .await
        .unwrap();
    handle.wait().await;

    let actions = drain(&mut rx);
    // Command, three alerts in server order, then the single error record.
    assert_eq!(actions.len(), 5);
    for (index, expected) in [
        "Status is required",
        "Skills is required",
        "Website must be valid",
    ]
    .iter()
    .enumerate()
    {
        assert_eq!(
            actions[index + 1],
            AppAction::Alert(AlertAction::Show {
                message: (*expected).to_string(),
                kind: AlertKind::Error,
            }),
            "alert {index} out of order"
        );
    }
    assert!(matches!(
        actions[4],
        AppAction::Profile(ProfileAction::Failed(_))
    ));

    let state = store.state(std::clone::Clone::clone).await;
    assert_eq!(state.alerts.alerts.len(), 3);
    assert_eq!(state.profiles.error.msg, "Bad Request");
    assert_eq!(state.profiles.error.status, Some(400));
}

// ═══════════════════════════════════════════════════════════════════════
// Experience / education sub-resources
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn adding_experience_refreshes_profile_alerts_and_navigates_home() {
    let env = test_environment();
    env.api
        .respond(Method::Put, "/profiles/experience", Ok(profile_body()));
    let navigator = env.navigator.clone();
    let store = mock_store(env);

    let mut handle = store
        .send(AppAction::Profile(ProfileAction::AddExperience(
            worknet_client::state::ExperienceForm {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                from: "2024-01-01".to_string(),
                current: true,
                ..worknet_client::state::ExperienceForm::default()
            },
        )))
        .await
        .unwrap();
    handle.wait().await;

    let state = store.state(std::clone::Clone::clone).await;
    assert_eq!(state.profiles.profile, Some(decoded_profile()));
    assert_eq!(
        state.alerts.alerts.first().map(|a| a.msg.as_str()),
        Some("Experience added")
    );
    assert_eq!(navigator.routes(), vec!["/home".to_string()]);
}

#[tokio::test]
async fn deleting_education_refreshes_profile_without_navigating() {
    let env = test_environment();
    env.api
        .respond(Method::Delete, "/profiles/education/e1", Ok(profile_body()));
    let navigator = env.navigator.clone();
    let store = mock_store(env);

    let mut handle = store
        .send(AppAction::Profile(ProfileAction::DeleteEducation {
            id: "e1".to_string(),
        }))
        .await
        .unwrap();
    handle.wait().await;

    let state = store.state(std::clone::Clone::clone).await;
    assert_eq!(state.profiles.profile, Some(decoded_profile()));
    assert_eq!(
        state.alerts.alerts.first().map(|a| a.msg.as_str()),
        Some("Education removed")
    );
    assert!(navigator.routes().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════
// Image upload
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn successful_upload_replaces_image_only() {
    let env = test_environment();
    env.api.respond(
        Method::Post,
        "/profiles/upload",
        Ok(json!({"url": "/images/64b0aa.png"})),
    );
    let store = mock_store(env);

    store
        .send(AppAction::Profile(ProfileAction::Loaded(decoded_profile())))
        .await
        .unwrap();

    let mut handle = store
        .send(AppAction::Profile(ProfileAction::UploadImage {
            bytes: vec![0xFF, 0xD8],
            filename: "me.jpg".to_string(),
        }))
        .await
        .unwrap();
    handle.wait().await;

    let state = store.state(std::clone::Clone::clone).await;
    assert_eq!(
        state.profiles.image.as_ref().map(|i| i.url.as_str()),
        Some("/images/64b0aa.png")
    );
    // The loaded profile stays; only the image field changed.
    assert_eq!(state.profiles.profile, Some(decoded_profile()));
}

#[tokio::test]
async fn failed_upload_alerts_before_recording_the_error() {
    let env = test_environment();
    env.api.respond(
        Method::Post,
        "/profiles/upload",
        Err(RequestError::Server {
            status: 413,
            message: "Payload Too Large".to_string(),
        }),
    );
    let store = mock_store(env);
    let mut rx = store.subscribe_actions();

    let mut handle = store
        .send(AppAction::Profile(ProfileAction::UploadImage {
            bytes: vec![0xFF],
            filename: "me.jpg".to_string(),
        }))
        .await
        .unwrap();
    handle.wait().await;

    let actions = drain(&mut rx);
    assert_eq!(actions.len(), 3);
    assert_eq!(
        actions[1],
        AppAction::Alert(AlertAction::Show {
            message: "Payload Too Large".to_string(),
            kind: AlertKind::Error,
        })
    );
    assert!(matches!(
        actions[2],
        AppAction::Profile(ProfileAction::Failed(_))
    ));

    let error = store.state(|s| s.profiles.error.clone()).await;
    assert_eq!(error.status, Some(413));
}

// ═══════════════════════════════════════════════════════════════════════
// Account deletion
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn declined_confirmation_issues_no_request_and_no_dispatch() {
    let env = MockEnvironment::new(
        MockApiClient::new(),
        worknet_client::mocks::RecordingNavigator::default(),
        StaticConfirm::declining(),
        worknet_testing::test_clock(),
        SequentialIdGenerator::new(),
    );
    let api = env.api.clone();
    let confirm = env.confirm.clone();
    let store = mock_store(env);
    let mut rx = store.subscribe_actions();

    let mut handle = store
        .send(AppAction::Profile(ProfileAction::DeleteAccount))
        .await
        .unwrap();
    handle.wait().await;

    assert_eq!(confirm.prompts(), vec![DELETE_ACCOUNT_PROMPT.to_string()]);
    assert!(api.requests().is_empty());

    // Only the command itself was applied; the declined gate dispatched
    // nothing further.
    let actions = drain(&mut rx);
    assert_eq!(actions.len(), 1);
    assert!(matches!(
        actions[0],
        AppAction::Profile(ProfileAction::DeleteAccount)
    ));
}

#[tokio::test]
async fn confirmed_deletion_clears_profile_and_alerts() {
    let env = test_environment();
    env.api
        .respond(Method::Delete, "/profiles", Ok(json!({"msg": "deleted"})));
    let store = mock_store(env);

    store
        .send(AppAction::Profile(ProfileAction::Loaded(decoded_profile())))
        .await
        .unwrap();

    let mut handle = store
        .send(AppAction::Profile(ProfileAction::DeleteAccount))
        .await
        .unwrap();
    handle.wait().await;

    let state = store.state(std::clone::Clone::clone).await;
    assert_eq!(state.profiles.profile, None);
    assert_eq!(
        state.alerts.alerts.first().map(|a| a.msg.as_str()),
        Some("Your account has been permanently deleted")
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Token synchronization
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn token_changes_invoke_the_adapter_exactly_once_per_change() {
    let env = test_environment();
    let api = env.api.clone();
    let store = mock_store(env);
    attach_token_sync(&store, api.clone(), None);

    store
        .send(AppAction::Users(UserAction::LoggedIn {
            token: "A".to_string(),
        }))
        .await
        .unwrap();
    // Same value again: no adapter call.
    store
        .send(AppAction::Users(UserAction::LoggedIn {
            token: "A".to_string(),
        }))
        .await
        .unwrap();
    store
        .send(AppAction::Users(UserAction::LoggedIn {
            token: "B".to_string(),
        }))
        .await
        .unwrap();

    assert_eq!(
        api.token_calls(),
        vec![Some("A".to_string()), Some("B".to_string())]
    );

    let mut handle = store
        .send(AppAction::Users(UserAction::Logout))
        .await
        .unwrap();
    handle.wait().await;

    assert_eq!(
        api.token_calls(),
        vec![Some("A".to_string()), Some("B".to_string()), None]
    );
    assert_eq!(api.current_token(), None);

    // Logout also clears the loaded profile through the action stream.
    let profile = store.state(|s| s.profiles.profile.clone()).await;
    assert_eq!(profile, None);
}

#[tokio::test]
async fn login_seeds_the_header_before_the_chained_user_load() {
    let env = test_environment();
    env.api
        .respond(Method::Post, "/users/login", Ok(json!({"token": "T"})));
    env.api.respond(
        Method::Get,
        "/users/me",
        Ok(json!({"_id": "u1", "name": "Jo", "email": "jo@example.com"})),
    );
    let api = env.api.clone();
    let store = mock_store(env);
    attach_token_sync(&store, api.clone(), None);

    let mut handle = store
        .send(AppAction::Users(UserAction::Login(
            worknet_client::state::LoginForm {
                email: "jo@example.com".to_string(),
                password: "hunter2".to_string(),
            },
        )))
        .await
        .unwrap();
    handle.wait().await;

    // The adapter saw the token before the chained load was issued.
    assert_eq!(api.token_calls(), vec![Some("T".to_string())]);
    assert_eq!(api.current_token().as_deref(), Some("T"));

    let users = store.state(|s| s.users.clone()).await;
    assert!(users.is_authenticated);
    assert_eq!(users.user.as_ref().map(|u| u.name.as_str()), Some("Jo"));

    let paths: Vec<_> = api.requests().iter().map(|r| r.path.clone()).collect();
    assert_eq!(paths, vec!["/users/login".to_string(), "/users/me".to_string()]);
}

#[tokio::test]
async fn bootstrap_restores_a_persisted_session() {
    let env = test_environment();
    env.api.respond(
        Method::Get,
        "/users/me",
        Ok(json!({"_id": "u1", "name": "Jo", "email": "jo@example.com"})),
    );
    let api = env.api.clone();

    let store = worknet_client::app::bootstrap(env, Some("stored-tok".to_string()))
        .await
        .unwrap();

    // One adapter call from the startup seed; the equal-valued
    // SessionRestored transition triggers no second call.
    assert_eq!(api.token_calls(), vec![Some("stored-tok".to_string())]);

    let users = store.state(|s| s.users.clone()).await;
    assert_eq!(users.token.as_deref(), Some("stored-tok"));
}

// ═══════════════════════════════════════════════════════════════════════
// Alerts lifecycle
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn alerts_self_dismiss_after_the_timeout() {
    let env = test_environment();
    let store = mock_store(env);

    store
        .send(AppAction::Alert(AlertAction::Show {
            message: "Profile Created".to_string(),
            kind: AlertKind::Success,
        }))
        .await
        .unwrap();

    assert_eq!(store.state(|s| s.alerts.alerts.len()).await, 1);

    // Paused time auto-advances past the 5s visibility window.
    tokio::time::sleep(std::time::Duration::from_secs(6)).await;

    assert_eq!(store.state(|s| s.alerts.alerts.len()).await, 0);
}

#[tokio::test(start_paused = true)]
async fn early_dismissal_cancels_the_pending_timer() {
    let env = test_environment();
    let store = mock_store(env);

    store
        .send(AppAction::Alert(AlertAction::Show {
            message: "going".to_string(),
            kind: AlertKind::Error,
        }))
        .await
        .unwrap();
    let id = store
        .state(|s| s.alerts.alerts[0].id)
        .await;

    store
        .send(AppAction::Alert(AlertAction::Dismiss { id }))
        .await
        .unwrap();
    assert_eq!(store.state(|s| s.alerts.alerts.len()).await, 0);

    // Long after the would-be expiry nothing further happens.
    tokio::time::sleep(std::time::Duration::from_secs(30)).await;
    assert_eq!(store.state(|s| s.alerts.alerts.len()).await, 0);
}

#[tokio::test(start_paused = true)]
async fn concurrent_alerts_expire_independently() {
    let env = test_environment();
    let store = mock_store(env);

    store
        .send(AppAction::Alert(AlertAction::Show {
            message: "first".to_string(),
            kind: AlertKind::Success,
        }))
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_secs(3)).await;

    store
        .send(AppAction::Alert(AlertAction::Show {
            message: "second".to_string(),
            kind: AlertKind::Success,
        }))
        .await
        .unwrap();
    assert_eq!(store.state(|s| s.alerts.alerts.len()).await, 2);

    // First expires at t=5s, second at t=8s.
    tokio::time::sleep(std::time::Duration::from_secs(3)).await;
    let remaining = store.state(|s| s.alerts.alerts.clone()).await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].msg, "second");

    tokio::time::sleep(std::time::Duration::from_secs(3)).await;
    assert_eq!(store.state(|s| s.alerts.alerts.len()).await, 0);
}

// ═══════════════════════════════════════════════════════════════════════
// Posts flow
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn adding_a_post_prepends_and_alerts() {
    let env = test_environment();
    env.api.respond(
        Method::Get,
        "/posts",
        Ok(json!([{"_id": "p1", "user": "u1", "text": "old", "name": "Jo"}])),
    );
    env.api.respond(
        Method::Post,
        "/posts",
        Ok(json!({"_id": "p2", "user": "u1", "text": "new", "name": "Jo"})),
    );
    let store = mock_store(env);

    let mut handle = store
        .send(AppAction::Posts(PostAction::FetchAll))
        .await
        .unwrap();
    handle.wait().await;

    let mut handle = store
        .send(AppAction::Posts(PostAction::Add(
            worknet_client::state::PostForm {
                text: "new".to_string(),
            },
        )))
        .await
        .unwrap();
    handle.wait().await;

    let state = store.state(std::clone::Clone::clone).await;
    let ids: Vec<_> = state.posts.posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p2", "p1"]);
    assert_eq!(
        state.alerts.alerts.first().map(|a| a.msg.as_str()),
        Some("Post Created")
    );
}
