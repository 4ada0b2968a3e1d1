//! Response delivery to the orchestrator.

use crate::envelope::ResponseEnvelope;
use crate::lifecycle::LifecycleEvent;
use std::future::Future;
use thiserror::Error;

/// Errors that can occur while delivering a response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponseError {
    /// HTTP request failed before a status was received.
    #[error("Response request failed: {0}")]
    RequestFailed(String),

    /// The response endpoint returned a non-success status.
    #[error("Response rejected (status {status}): {body}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        body: String,
    },

    /// The response document could not be serialized.
    #[error("Response serialization failed: {0}")]
    Serialization(String),
}

/// Deliver a [`ResponseEnvelope`] to the address carried by a [`LifecycleEvent`].
///
/// Called exactly once per invocation. Implementations perform a single
/// request and never retry.
pub trait ResponseSender: Send + Sync {
    /// Send `envelope` in reply to `event`.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError`] if the response cannot be serialized or delivered.
    fn send(
        &self,
        event: &LifecycleEvent,
        envelope: &ResponseEnvelope,
    ) -> impl Future<Output = Result<(), ResponseError>> + Send;
}
