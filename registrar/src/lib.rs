//! # Directory Registrar
//!
//! Answers `CloudFormation` custom-resource lifecycle events for a directory:
//! Create and Update register it with Amazon `WorkSpaces`, Delete deregisters
//! it. Every event receives exactly one response, whatever happens to the
//! registry call.
//!
//! ## Architecture
//!
//! - [`config`]: environment variables read at cold start
//! - [`environment`]: registry, responder and clock injected into the reducer
//! - [`reducer`]: the per-invocation state machine
//! - [`handler`]: runs one store per event and reports the outcome
//!
//! The `bootstrap` binary wires the production implementations into the
//! Lambda runtime.

pub mod config;
pub mod environment;
pub mod handler;
pub mod reducer;

pub use config::{ConfigError, RegistrarConfig};
pub use environment::RegistrationEnvironment;
pub use handler::{InvocationOutcome, RegistrationHandler};
pub use reducer::{Phase, RegistrationAction, RegistrationReducer, RegistrationState};

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install the global tracing subscriber.
///
/// Output is plain text without timestamps or colours; the Lambda log
/// pipeline adds its own timestamps.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .without_time(),
        )
        .init();
}
