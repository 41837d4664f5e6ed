//! Client environment.
//!
//! This module defines the environment type for dependency injection in the
//! slice reducers. Reducers receive it by reference and clone the providers
//! they need into their effects.

use crate::providers::{ApiClient, ConfirmPrompt, Navigator};
use worknet_core::environment::{Clock, IdGenerator};

/// Client environment.
///
/// Contains all external collaborators the slice reducers need.
///
/// # Type Parameters
///
/// - `A`: HTTP API client adapter
/// - `N`: Navigator
/// - `P`: Confirmation prompt
/// - `C`: Clock
/// - `I`: Id generator
#[derive(Debug, Clone)]
pub struct ClientEnvironment<A, N, P, C, I>
where
    A: ApiClient + Clone,
    N: Navigator + Clone,
    P: ConfirmPrompt + Clone,
    C: Clock + Clone,
    I: IdGenerator + Clone,
{
    /// HTTP API client adapter.
    pub api: A,

    /// Imperative navigation collaborator.
    pub navigator: N,

    /// Destructive-operation confirmation gate.
    pub confirm: P,

    /// Time source.
    pub clock: C,

    /// Entity id minting.
    pub ids: I,
}

impl<A, N, P, C, I> ClientEnvironment<A, N, P, C, I>
where
    A: ApiClient + Clone,
    N: Navigator + Clone,
    P: ConfirmPrompt + Clone,
    C: Clock + Clone,
    I: IdGenerator + Clone,
{
    /// Create a new client environment.
    #[must_use]
    pub const fn new(api: A, navigator: N, confirm: P, clock: C, ids: I) -> Self {
        Self {
            api,
            navigator,
            confirm,
            clock,
            ids,
        }
    }
}
