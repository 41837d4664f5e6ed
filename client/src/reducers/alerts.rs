//! Alerts side-channel reducer.
//!
//! Alerts are ephemeral, self-expiring notifications, fully decoupled from
//! domain state: any effect can show one, and each alert schedules its own
//! dismissal timer. Timers are registered as cancellable effects keyed by
//! the alert id, so an early manual dismissal reaps the pending timer
//! instead of leaking it.

use crate::actions::{AlertAction, AppAction};
use crate::environment::ClientEnvironment;
use crate::providers::{ApiClient, ConfirmPrompt, Navigator};
use crate::state::{Alert, AlertsState};
use std::marker::PhantomData;
use std::time::Duration;
use worknet_core::effect::{Effect, EffectId};
use worknet_core::environment::{Clock, IdGenerator};
use worknet_core::reducer::Reducer;
use worknet_core::{SmallVec, smallvec};

/// How long an alert stays visible unless dismissed earlier.
pub(crate) const DEFAULT_ALERT_TIMEOUT: Duration = Duration::from_secs(5);

/// Alerts reducer.
///
/// Generic over the environment's provider types; only the clock and id
/// generator are used.
#[derive(Debug, Clone)]
pub struct AlertReducer<A, N, P, C, I> {
    /// Visibility window before self-dismissal.
    timeout: Duration,
    /// Phantom data to hold type parameters.
    _phantom: PhantomData<(A, N, P, C, I)>,
}

impl<A, N, P, C, I> AlertReducer<A, N, P, C, I> {
    /// Create an alerts reducer with the default timeout.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: DEFAULT_ALERT_TIMEOUT,
            _phantom: PhantomData,
        }
    }

    /// Create a reducer with a custom visibility window.
    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            _phantom: PhantomData,
        }
    }
}

impl<A, N, P, C, I> Default for AlertReducer<A, N, P, C, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, N, P, C, I> Reducer for AlertReducer<A, N, P, C, I>
where
    A: ApiClient + Clone + 'static,
    N: Navigator + Clone + 'static,
    P: ConfirmPrompt + Clone + 'static,
    C: Clock + Clone + 'static,
    I: IdGenerator + Clone + 'static,
{
    type State = AlertsState;
    type Action = AppAction;
    type Environment = ClientEnvironment<A, N, P, C, I>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let AppAction::Alert(action) = action else {
            return smallvec![Effect::None];
        };

        match action {
            AlertAction::Show { message, kind } => {
                let id = env.ids.generate();
                tracing::debug!(alert_id = %id, ?kind, "Showing alert");

                state.alerts.push(Alert {
                    id,
                    msg: message,
                    kind,
                    created_at: env.clock.now(),
                });

                // Independent timer per alert, cancellable on early dismissal.
                smallvec![
                    Effect::Delay {
                        duration: self.timeout,
                        action: Box::new(AppAction::Alert(AlertAction::Dismiss { id })),
                    }
                    .cancellable(EffectId::from(id))
                ]
            },
            AlertAction::Dismiss { id } => {
                let before = state.alerts.len();
                state.alerts.retain(|alert| alert.id != id);

                if state.alerts.len() == before {
                    // Unknown id: the timer already fired after a manual
                    // dismissal, or the id never existed. Identity.
                    smallvec![Effect::None]
                } else {
                    smallvec![Effect::Cancel(EffectId::from(id))]
                }
            },
        }
    }
}
