//! Store construction and session bootstrap.
//!
//! The store is created once at startup and passed to consumers as an
//! explicit value; no ambient singleton is involved.

use crate::actions::{AppAction, UserAction};
use crate::config::ClientConfig;
use crate::environment::ClientEnvironment;
use crate::providers::{
    ApiClient, ConfirmPrompt, FileTokenStorage, HttpApiClient, LoggingNavigator, Navigator,
    TerminalConfirm, TokenStorage,
};
use crate::reducers::AppReducer;
use crate::state::AppState;
use crate::sync::attach_token_sync;
use anyhow::Context;
use worknet_core::environment::{Clock, IdGenerator, RandomIdGenerator, SystemClock};
use worknet_runtime::{Store, StoreError};

/// Applied-action broadcast capacity for the application store.
const BROADCAST_CAPACITY: usize = 64;

/// The application store type for a given environment.
pub type AppStore<A, N, P, C, I> = Store<
    AppState,
    AppAction,
    ClientEnvironment<A, N, P, C, I>,
    AppReducer<A, N, P, C, I>,
>;

/// The production environment wiring.
pub type ProductionEnvironment = ClientEnvironment<
    HttpApiClient<FileTokenStorage>,
    LoggingNavigator,
    TerminalConfirm,
    SystemClock,
    RandomIdGenerator,
>;

/// Build the production environment and read the persisted session token.
///
/// # Errors
///
/// Fails when no platform data directory is available for token storage or
/// the HTTP client cannot be built.
pub fn production_environment(
    config: &ClientConfig,
) -> anyhow::Result<(ProductionEnvironment, Option<String>)> {
    let path = FileTokenStorage::default_path()
        .context("no data directory available for token storage")?;
    let storage = FileTokenStorage::new(path);
    let initial_token = storage.load();

    let api = HttpApiClient::new(config, storage).context("building HTTP client")?;
    let env = ClientEnvironment::new(
        api,
        LoggingNavigator,
        TerminalConfirm,
        SystemClock,
        RandomIdGenerator,
    );

    Ok((env, initial_token))
}

/// Create the store, install the token-sync subscription, and restore a
/// persisted session.
///
/// Startup order mirrors the application shell: seed the adapter header
/// from the persisted token, then load the user it belongs to. The
/// token-sync subscription is primed with the same token, so restoring a
/// session does not re-invoke the adapter.
///
/// # Errors
///
/// Returns a [`StoreError`] when the session-restore dispatch is rejected.
pub async fn bootstrap<A, N, P, C, I>(
    env: ClientEnvironment<A, N, P, C, I>,
    initial_token: Option<String>,
) -> Result<AppStore<A, N, P, C, I>, StoreError>
where
    A: ApiClient + Clone + Send + Sync + 'static,
    N: Navigator + Clone + Send + Sync + 'static,
    P: ConfirmPrompt + Clone + Send + Sync + 'static,
    C: Clock + Clone + Send + Sync + 'static,
    I: IdGenerator + Clone + Send + Sync + 'static,
{
    if let Some(token) = initial_token.as_deref() {
        env.api.set_auth_token(Some(token));
    }

    let store = Store::with_broadcast_capacity(
        AppState::default(),
        AppReducer::new(),
        env.clone(),
        BROADCAST_CAPACITY,
    );

    attach_token_sync(&store, env.api.clone(), initial_token.clone());

    if let Some(token) = initial_token {
        store
            .send_batch([
                AppAction::Users(UserAction::SessionRestored { token }),
                AppAction::Users(UserAction::LoadCurrent),
            ])
            .await?;
    }

    Ok(store)
}
