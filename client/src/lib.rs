//! # Worknet Client
//!
//! Client-side state and API-synchronization layer of the worknet
//! professional-networking application.
//!
//! The layer owns the mechanism by which user interface actions trigger
//! asynchronous requests against the backend REST API, and by which the
//! results (success or failure) are normalized into one consistent,
//! observable state tree that views render from:
//!
//! ```text
//! view ── dispatch ──▶ command action ── reducer ──▶ request effect
//!                                                        │
//! view ◀── snapshot ── state tree ◀── reducer ◀── settled action batch
//! ```
//!
//! - State is a struct of independent **slices** (`users`, `profiles`,
//!   `posts`, `alerts`); each slice has a pure reducer.
//! - Async orchestration lives in **effects** returned by reducers: a
//!   request settles into an ordered batch of dispatches (success event +
//!   outcome alert + optional navigation, or field-error alerts + error
//!   record).
//! - External collaborators (HTTP adapter, token storage, navigator,
//!   confirmation dialog, clock, ids) are injected behind provider traits.
//! - The only cross-slice reaction, mirroring the auth token into the
//!   adapter header and persisted storage, is a store-level subscription
//!   installed by [`sync::attach_token_sync`].
//!
//! ## Example
//!
//! ```ignore
//! use worknet_client::actions::{AppAction, ProfileAction};
//! use worknet_client::app::{bootstrap, production_environment};
//! use worknet_client::config::ClientConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::from_env();
//! let (env, token) = production_environment(&config)?;
//! let store = bootstrap(env, token).await?;
//!
//! let mut handle = store.send(AppAction::Profile(ProfileAction::FetchAll)).await?;
//! handle.wait().await;
//!
//! let count = store.state(|s| s.profiles.profiles.len()).await;
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod app;
pub mod config;
pub mod constants;
pub mod environment;
pub mod error;
pub mod mocks;
pub mod providers;
pub mod reducers;
pub mod state;
pub mod sync;

// Re-export the primary surface
pub use actions::{AlertAction, AppAction, PostAction, ProfileAction, Route, UserAction};
pub use app::{AppStore, ProductionEnvironment, bootstrap, production_environment};
pub use config::ClientConfig;
pub use environment::ClientEnvironment;
pub use error::{ErrorInfo, FieldError, RequestError};
pub use reducers::AppReducer;
pub use state::AppState;
