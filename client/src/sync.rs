//! Auth-token synchronization.
//!
//! The token lives in three places that must agree: the `users` slice, the
//! HTTP adapter's default header, and the persisted storage. The slice is
//! the source of truth; this module installs the ONE observation that
//! pushes slice changes into the other two, as a store-level subscription
//! rather than reducer logic (reducers stay pure).

use crate::actions::AppAction;
use crate::providers::ApiClient;
use crate::state::AppState;
use std::sync::{Mutex, PoisonError};
use worknet_core::reducer::Reducer;
use worknet_runtime::Store;

/// Install the token-sync subscription on the store.
///
/// After every applied action the subscription compares the previous and
/// current `users.token`; on change it invokes
/// [`ApiClient::set_auth_token`] exactly once, which updates the default
/// header and the persisted value together. An unchanged token triggers
/// nothing.
///
/// `initial_token` seeds the comparison with whatever the adapter was
/// already configured with at startup, so restoring a persisted session
/// does not re-invoke the adapter.
pub fn attach_token_sync<A, E, R>(
    store: &Store<AppState, AppAction, E, R>,
    api: A,
    initial_token: Option<String>,
) where
    A: ApiClient + Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    R: Reducer<State = AppState, Action = AppAction, Environment = E>
        + Clone
        + Send
        + Sync
        + 'static,
{
    let previous = Mutex::new(initial_token);

    store.subscribe(move |state: &AppState| {
        let mut previous = previous.lock().unwrap_or_else(PoisonError::into_inner);
        if *previous != state.users.token {
            tracing::debug!(
                authenticated = state.users.token.is_some(),
                "Auth token changed, syncing adapter and storage"
            );
            api.set_auth_token(state.users.token.as_deref());
            *previous = state.users.token.clone();
        }
    });
}
