//! Headless demo shell: bootstrap the store against the configured server,
//! fetch the profile directory, and report what the state tree holds.

use worknet_client::actions::{AppAction, ProfileAction};
use worknet_client::app::{bootstrap, production_environment};
use worknet_client::config::ClientConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ClientConfig::from_env();
    tracing::info!(server = %config.server_url, "Starting worknet client");

    let (env, token) = production_environment(&config)?;
    let restored = token.is_some();
    let store = bootstrap(env, token).await?;

    if restored {
        tracing::info!("Restored persisted session");
    }

    let mut handle = store
        .send(AppAction::Profile(ProfileAction::FetchAll))
        .await?;
    handle.wait().await;

    store
        .state(|state| {
            if state.profiles.error.msg.is_empty() {
                tracing::info!(
                    profiles = state.profiles.profiles.len(),
                    authenticated = state.users.is_authenticated,
                    "Profile directory loaded"
                );
            } else {
                tracing::warn!(
                    msg = %state.profiles.error.msg,
                    status = ?state.profiles.error.status,
                    "Profile directory fetch failed"
                );
            }
        })
        .await;

    store.shutdown(std::time::Duration::from_secs(5)).await?;
    Ok(())
}
