//! # Worknet Testing
//!
//! Testing utilities and helpers for the worknet state architecture.
//!
//! This crate provides:
//! - Deterministic implementations of the core environment traits
//!   ([`FixedClock`], [`SequentialIdGenerator`])
//! - A fluent Given-When-Then harness for reducer tests ([`ReducerTest`])
//! - Assertion helpers for effect lists
//!
//! ## Example
//!
//! ```ignore
//! use worknet_testing::{ReducerTest, test_clock};
//!
//! ReducerTest::new(SessionReducer)
//!     .with_env(test_environment())
//!     .given_state(SessionState::default())
//!     .when_action(SessionAction::LoggedOut)
//!     .then_state(|state| assert!(state.token.is_none()))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use worknet_core::environment::{Clock, IdGenerator};


pub use mocks::{FixedClock, SequentialIdGenerator, test_clock};
pub use reducer_test::ReducerTest;

/// Mock implementations of the core environment traits.
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use worknet_testing::mocks::FixedClock;
    /// use worknet_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Sequential id generator for predictable entity ids
    ///
    /// Generates uuids whose low bits count up from 1, so tests can assert
    /// on exact ids (the first alert shown gets id `sequential(1)`, etc.).
    ///
    /// # Example
    ///
    /// ```
    /// use worknet_testing::mocks::SequentialIdGenerator;
    /// use worknet_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIdGenerator::new();
    /// assert_eq!(ids.generate(), SequentialIdGenerator::nth(1));
    /// assert_eq!(ids.generate(), SequentialIdGenerator::nth(2));
    /// ```
    #[derive(Debug, Clone)]
    pub struct SequentialIdGenerator {
        next: Arc<AtomicU64>,
    }

    impl Default for SequentialIdGenerator {
        fn default() -> Self {
            Self::new()
        }
    }

    impl SequentialIdGenerator {
        /// Create a generator starting at 1
        #[must_use]
        pub fn new() -> Self {
            Self {
                next: Arc::new(AtomicU64::new(1)),
            }
        }

        /// The uuid this generator mints on its `n`-th call (1-indexed)
        #[must_use]
        pub const fn nth(n: u64) -> uuid::Uuid {
            uuid::Uuid::from_u128(n as u128)
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn generate(&self) -> uuid::Uuid {
            let n = self.next.fetch_add(1, Ordering::SeqCst);
            Self::nth(n)
        }
    }
}
