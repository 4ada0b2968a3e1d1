//! Per-invocation handler.

use crate::environment::RegistrationEnvironment;
use crate::reducer::{Phase, RegistrationAction, RegistrationReducer, RegistrationState};
use registrar_core::envelope::ResponseEnvelope;
use registrar_core::environment::{Clock, DirectoryRegistry, ResponseSender};
use registrar_core::lifecycle::{LifecycleEvent, RequestType};
use registrar_core::responder::ResponseError;
use registrar_runtime::{Store, StoreError};

/// What happened during one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOutcome {
    /// Request id of the handled event
    pub request_id: String,
    /// Request type of the handled event
    pub request_type: RequestType,
    /// Phase the invocation ended in
    pub phase: Phase,
    /// Envelope handed to the responder
    pub envelope: Option<ResponseEnvelope>,
    /// Delivery failure, if any
    pub response_error: Option<ResponseError>,
    /// Runtime failure, if the store did not run to completion
    pub store_error: Option<StoreError>,
}

impl InvocationOutcome {
    /// Whether the orchestrator accepted the response
    #[must_use]
    pub fn delivered(&self) -> bool {
        self.phase == Phase::Responded
    }

    /// Whether the reported status was `SUCCESS`
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.envelope.as_ref().is_some_and(ResponseEnvelope::is_success)
    }
}

/// Handles lifecycle events, one store per invocation.
///
/// # Example
///
/// ```ignore
/// let handler = RegistrationHandler::new(RegistrationEnvironment::new(
///     WorkSpacesRegistry::from_env().await,
///     CloudFormationResponder::new(log_stream_name),
///     SystemClock,
///     Some(directory_id),
/// ));
///
/// let outcome = handler.handle(event).await;
/// assert!(outcome.delivered());
/// ```
#[derive(Debug, Clone)]
pub struct RegistrationHandler<D, S, C>
where
    D: DirectoryRegistry + Clone,
    S: ResponseSender + Clone,
    C: Clock,
{
    environment: RegistrationEnvironment<D, S, C>,
}

impl<D, S, C> RegistrationHandler<D, S, C>
where
    D: DirectoryRegistry + Clone + 'static,
    S: ResponseSender + Clone + 'static,
    C: Clock + Clone,
{
    /// Create a handler sharing `environment` across invocations
    #[must_use]
    pub const fn new(environment: RegistrationEnvironment<D, S, C>) -> Self {
        Self { environment }
    }

    /// The shared environment
    #[must_use]
    pub const fn environment(&self) -> &RegistrationEnvironment<D, S, C> {
        &self.environment
    }

    /// Answer one lifecycle event.
    ///
    /// Never fails: registry and delivery errors are reported through the
    /// returned outcome and the logs.
    #[tracing::instrument(
        skip(self, event),
        fields(request_id = %event.request_id, request_type = %event.request_type)
    )]
    pub async fn handle(&self, event: LifecycleEvent) -> InvocationOutcome {
        let request_id = event.request_id.clone();
        let request_type = event.request_type;

        let store = Store::new(
            RegistrationState::default(),
            RegistrationReducer::new(),
            self.environment.clone(),
        );

        let store_error = match store.send(RegistrationAction::EventReceived { event }).await {
            Ok(processed) => {
                tracing::debug!(processed, "Invocation ran to completion");
                None
            },
            Err(error) => {
                tracing::error!(%error, "Invocation did not run to completion");
                Some(error)
            },
        };

        let outcome = store
            .state(|state| InvocationOutcome {
                request_id,
                request_type,
                phase: state.phase,
                envelope: state.envelope.clone(),
                response_error: state.response_error.clone(),
                store_error,
            })
            .await;
        let elapsed_ms = store
            .state(|state| match (state.received_at, state.completed_at) {
                (Some(received), Some(completed)) => Some((completed - received).num_milliseconds()),
                _ => None,
            })
            .await;

        tracing::info!(
            phase = ?outcome.phase,
            status = outcome.envelope.as_ref().map_or("none", |e| e.status.as_str()),
            delivered = outcome.delivered(),
            elapsed_ms,
            "Lifecycle event handled"
        );
        outcome
    }
}
