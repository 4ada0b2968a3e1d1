//! # Registrar Testing
//!
//! Testing utilities and helpers for the directory registrar.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - Fixtures for lifecycle events and directory ids
//! - Property-based testing strategies
//! - A log capture layer for asserting on emitted log records
//! - Assertion helpers for reducers
//!
//! ## Example
//!
//! ```ignore
//! use registrar_testing::{MockDirectoryRegistry, RecordingResponseSender, test_clock, test_event};
//!
//! #[tokio::test]
//! async fn test_create_registers() {
//!     let registry = MockDirectoryRegistry::new();
//!     let responder = RecordingResponseSender::new();
//!     let handler = RegistrationHandler::new(environment(&registry, &responder));
//!
//!     handler.handle(test_event(RequestType::Create)).await;
//!
//!     assert_eq!(registry.call_count(), 1);
//!     assert_eq!(responder.delivery_count(), 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use registrar_core::environment::Clock;

/// Log capture layer for tracing assertions
pub mod logs;

/// Mock directory registry and response sender
pub mod mocks;

/// Ergonomic reducer testing utilities
pub mod reducer_test;

/// Fixed clock for deterministic tests
///
/// Always returns the same time, making tests reproducible.
///
/// # Example
///
/// ```
/// use registrar_testing::FixedClock;
/// use registrar_core::environment::Clock;
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

/// Fixtures shared across test suites
pub mod helpers {
    use registrar_core::lifecycle::{LifecycleEvent, RequestType};
    use registrar_core::registry::DirectoryId;

    /// Response URL used by [`test_event`]
    pub const TEST_RESPONSE_URL: &str =
        "https://cloudformation-custom-resource-response-useast1.s3.amazonaws.com/signed";

    /// Stack id used by [`test_event`]
    pub const TEST_STACK_ID: &str =
        "arn:aws:cloudformation:us-east-1:123456789012:stack/AWSManagedAD/5b6d3a40-0000-0000-0000-000000000000";

    /// Logical resource id used by [`test_event`]
    pub const TEST_LOGICAL_RESOURCE_ID: &str = "InvokeLambdaFunction";

    /// A lifecycle event with fixed correlation fields
    #[must_use]
    pub fn test_event(request_type: RequestType) -> LifecycleEvent {
        LifecycleEvent::new(
            request_type,
            TEST_RESPONSE_URL,
            TEST_STACK_ID,
            format!("request-{}", request_type.as_str().to_lowercase()),
            TEST_LOGICAL_RESOURCE_ID,
        )
    }

    /// The directory id `d-1234`
    ///
    /// # Panics
    ///
    /// Never in practice; the literal is not blank.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_directory_id() -> DirectoryId {
        DirectoryId::parse("d-1234").expect("literal directory id is not blank")
    }
}

/// Property-based testing utilities
///
/// `proptest` strategies for the domain types.
pub mod properties {
    use proptest::prelude::*;
    use registrar_core::lifecycle::{LifecycleEvent, RequestType};
    use registrar_core::registry::DirectoryId;

    /// Any request type
    pub fn request_type() -> impl Strategy<Value = RequestType> {
        proptest::sample::select(RequestType::ALL.to_vec())
    }

    /// Directory ids shaped like `d-0123456789`
    pub fn directory_id() -> impl Strategy<Value = DirectoryId> {
        "d-[0-9a-f]{10}".prop_filter_map("directory ids are never blank", |id| {
            DirectoryId::parse(&id)
        })
    }

    /// Lifecycle events with arbitrary correlation fields
    pub fn lifecycle_event() -> impl Strategy<Value = LifecycleEvent> {
        (
            request_type(),
            "[a-z0-9]{8}",
            "[a-f0-9]{8}-[a-f0-9]{4}",
            "[A-Z][A-Za-z0-9]{2,20}",
            proptest::option::of("[0-9]{4}/[0-9]{2}/[0-9]{2}/\\[\\$LATEST\\][a-f0-9]{32}"),
        )
            .prop_map(|(request_type, path, request_id, logical_id, physical_id)| {
                let event = LifecycleEvent::new(
                    request_type,
                    format!("https://responses.example.com/{path}"),
                    "arn:aws:cloudformation:us-east-1:123456789012:stack/test/guid",
                    request_id,
                    logical_id,
                );
                match physical_id {
                    Some(id) if request_type != RequestType::Create => {
                        event.with_physical_resource_id(id)
                    },
                    _ => event,
                }
            })
    }
}

// Re-export commonly used items
pub use helpers::{test_directory_id, test_event};
pub use logs::{CapturedLog, LogCapture};
pub use mocks::{MockDirectoryRegistry, RecordingResponseSender, RegistryCall};
pub use reducer_test::ReducerTest;
