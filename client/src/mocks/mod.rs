//! Mock providers for testing.
//!
//! Mocks capture every interaction so tests can assert on issued requests,
//! recorded navigations, and token-sync invocations. They are shipped by
//! the library so integration tests and downstream hosts can reuse them.

pub mod api;
pub mod confirm;
pub mod navigator;

pub use api::{MockApiClient, RecordedRequest};
pub use confirm::StaticConfirm;
pub use navigator::RecordingNavigator;

use crate::environment::ClientEnvironment;
use worknet_testing::mocks::{FixedClock, SequentialIdGenerator, test_clock};

/// The fully mocked environment used across the test suites.
pub type MockEnvironment =
    ClientEnvironment<MockApiClient, RecordingNavigator, StaticConfirm, FixedClock, SequentialIdGenerator>;

/// A mock environment with an accepting confirmation gate.
///
/// The provider handles inside the environment share state with their
/// clones, so tests keep asserting through `env.api`, `env.navigator`, etc.
#[must_use]
pub fn test_environment() -> MockEnvironment {
    ClientEnvironment::new(
        MockApiClient::new(),
        RecordingNavigator::default(),
        StaticConfirm::accepting(),
        test_clock(),
        SequentialIdGenerator::new(),
    )
}
