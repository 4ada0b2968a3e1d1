//! Registration reducer.
//!
//! One invocation walks a fixed path:
//!
//! ```text
//! Idle ──EventReceived──▶ Dispatched ──RegistryCompleted──▶ Responding ─┬─▶ Responded
//!   │                                                        ▲          └─▶ ResponseFailed
//!   └──────────── EventReceived (no directory id) ───────────┘
//! ```
//!
//! Every path out of `Dispatched` goes through [`RegistrationAction::RegistryCompleted`],
//! including a panicking registry call, so the response effect is emitted
//! exactly once per invocation.

use crate::config::ConfigError;
use crate::environment::RegistrationEnvironment;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use registrar_core::effect::Effect;
use registrar_core::envelope::ResponseEnvelope;
use registrar_core::environment::{Clock, DirectoryRegistry, ResponseSender};
use registrar_core::lifecycle::LifecycleEvent;
use registrar_core::reducer::Reducer;
use registrar_core::registry::{DirectoryId, RegistryError, RegistryOperation};
use registrar_core::responder::ResponseError;
use registrar_core::{SmallVec, smallvec};
use registrar_runtime::panic_message;
use std::panic::AssertUnwindSafe;

/// `EnableWorkDocs` flag sent on every registration.
pub const ENABLE_WORK_DOCS: bool = false;

/// Where an invocation is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No event received yet
    #[default]
    Idle,
    /// Registry call in flight
    Dispatched,
    /// Response delivery in flight
    Responding,
    /// Response accepted by the orchestrator
    Responded,
    /// Response delivery failed; nothing more can be done
    ResponseFailed,
}

impl Phase {
    /// Whether the invocation has finished
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Responded | Self::ResponseFailed)
    }
}

/// Per-invocation state.
#[derive(Debug, Clone, Default)]
pub struct RegistrationState {
    /// Current phase
    pub phase: Phase,
    /// The event being answered
    pub event: Option<LifecycleEvent>,
    /// Registry operation chosen for the event
    pub operation: Option<RegistryOperation>,
    /// Envelope handed to the responder
    pub envelope: Option<ResponseEnvelope>,
    /// Why delivery failed, in [`Phase::ResponseFailed`]
    pub response_error: Option<ResponseError>,
    /// When the event was received
    pub received_at: Option<DateTime<Utc>>,
    /// When the invocation reached a terminal phase
    pub completed_at: Option<DateTime<Utc>>,
}

/// Inputs to [`RegistrationReducer`].
#[derive(Debug, Clone)]
pub enum RegistrationAction {
    /// A lifecycle event arrived
    EventReceived {
        /// The event to answer
        event: LifecycleEvent,
    },
    /// The registry call finished (successfully, with an error, or by panicking)
    RegistryCompleted {
        /// Operation that was attempted
        operation: RegistryOperation,
        /// Its outcome
        result: Result<(), RegistryError>,
    },
    /// The orchestrator accepted the response
    ResponseDelivered,
    /// The response could not be delivered
    ResponseFailed {
        /// Delivery failure
        error: ResponseError,
    },
}

/// Reducer driving one lifecycle invocation.
#[derive(Debug, Clone)]
pub struct RegistrationReducer<D, S, C> {
    _phantom: std::marker::PhantomData<(D, S, C)>,
}

impl<D, S, C> RegistrationReducer<D, S, C> {
    /// Create a new reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<D, S, C> Default for RegistrationReducer<D, S, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, S, C> Reducer for RegistrationReducer<D, S, C>
where
    D: DirectoryRegistry + Clone + 'static,
    S: ResponseSender + Clone + 'static,
    C: Clock,
{
    type State = RegistrationState;
    type Action = RegistrationAction;
    type Environment = RegistrationEnvironment<D, S, C>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // EventReceived: pick the operation and call the registry
            // ═══════════════════════════════════════════════════════════════
            RegistrationAction::EventReceived { event } => {
                if state.phase != Phase::Idle {
                    tracing::warn!(
                        phase = ?state.phase,
                        request_id = %event.request_id,
                        "Ignoring lifecycle event for an invocation already in progress"
                    );
                    return smallvec![Effect::None];
                }

                let operation = RegistryOperation::for_request(event.request_type);
                tracing::info!(
                    request_type = %event.request_type,
                    request_id = %event.request_id,
                    logical_resource_id = %event.logical_resource_id,
                    %operation,
                    "Lifecycle event received"
                );
                metrics::counter!(
                    "registrar.events.received",
                    "request_type" => event.request_type.as_str()
                )
                .increment(1);

                state.phase = Phase::Dispatched;
                state.operation = Some(operation);
                state.received_at = Some(env.clock.now());

                let Some(directory_id) = env.directory_id.clone() else {
                    let error = ConfigError::MissingDirectoryId;
                    tracing::error!(%error, %operation, "Cannot reach the directory registry");
                    metrics::counter!(
                        "registrar.registry.calls",
                        "operation" => operation.as_str(),
                        "outcome" => "unconfigured"
                    )
                    .increment(1);
                    let envelope = ResponseEnvelope::failed(error.to_string());
                    return smallvec![respond(state, env, event, envelope)];
                };

                state.event = Some(event);
                smallvec![call_registry(env.registry.clone(), directory_id, operation)]
            },

            // ═══════════════════════════════════════════════════════════════
            // RegistryCompleted: translate the outcome into the response
            // ═══════════════════════════════════════════════════════════════
            RegistrationAction::RegistryCompleted { operation, result } => {
                if state.phase != Phase::Dispatched {
                    tracing::warn!(
                        phase = ?state.phase,
                        %operation,
                        "Ignoring registry completion outside of dispatch"
                    );
                    return smallvec![Effect::None];
                }
                let Some(event) = state.event.clone() else {
                    tracing::warn!(%operation, "Registry completed without a lifecycle event");
                    return smallvec![Effect::None];
                };

                let envelope = match result {
                    Ok(()) => {
                        tracing::info!(%operation, "Registry call succeeded");
                        metrics::counter!(
                            "registrar.registry.calls",
                            "operation" => operation.as_str(),
                            "outcome" => "success"
                        )
                        .increment(1);
                        ResponseEnvelope::success(operation.success_message())
                    },
                    Err(error) => {
                        tracing::error!(%operation, %error, "Registry call failed");
                        metrics::counter!(
                            "registrar.registry.calls",
                            "operation" => operation.as_str(),
                            "outcome" => "failure"
                        )
                        .increment(1);
                        ResponseEnvelope::failed(error.to_string())
                    },
                };

                smallvec![respond(state, env, event, envelope)]
            },

            // ═══════════════════════════════════════════════════════════════
            // ResponseDelivered / ResponseFailed: terminal transitions
            // ═══════════════════════════════════════════════════════════════
            RegistrationAction::ResponseDelivered => {
                if state.phase != Phase::Responding {
                    tracing::warn!(phase = ?state.phase, "Ignoring delivery outside of responding");
                    return smallvec![Effect::None];
                }

                state.phase = Phase::Responded;
                state.completed_at = Some(env.clock.now());
                metrics::counter!("registrar.responses.sent", "outcome" => "delivered").increment(1);
                smallvec![Effect::None]
            },

            RegistrationAction::ResponseFailed { error } => {
                if state.phase != Phase::Responding {
                    tracing::warn!(
                        phase = ?state.phase,
                        %error,
                        "Ignoring delivery failure outside of responding"
                    );
                    return smallvec![Effect::None];
                }

                tracing::error!(%error, "Failed to deliver custom resource response");
                metrics::counter!("registrar.responses.sent", "outcome" => "failed").increment(1);
                state.phase = Phase::ResponseFailed;
                state.response_error = Some(error);
                state.completed_at = Some(env.clock.now());
                smallvec![Effect::None]
            },
        }
    }
}

/// Run the registry call, folding a panic into [`RegistryError::Panicked`].
fn call_registry<D>(
    registry: D,
    directory_id: DirectoryId,
    operation: RegistryOperation,
) -> Effect<RegistrationAction>
where
    D: DirectoryRegistry + 'static,
{
    Effect::future(async move {
        let start = std::time::Instant::now();
        let call = async {
            match operation {
                RegistryOperation::Register => {
                    registry.register(&directory_id, ENABLE_WORK_DOCS).await
                },
                RegistryOperation::Deregister => registry.deregister(&directory_id).await,
            }
        };

        let result = match AssertUnwindSafe(call).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => Err(RegistryError::Panicked(panic_message(payload.as_ref()))),
        };
        metrics::histogram!(
            "registrar.registry.duration_seconds",
            "operation" => operation.as_str()
        )
        .record(start.elapsed().as_secs_f64());

        Some(RegistrationAction::RegistryCompleted { operation, result })
    })
}

/// Move to [`Phase::Responding`] and deliver `envelope`.
fn respond<D, S, C>(
    state: &mut RegistrationState,
    env: &RegistrationEnvironment<D, S, C>,
    event: LifecycleEvent,
    envelope: ResponseEnvelope,
) -> Effect<RegistrationAction>
where
    D: DirectoryRegistry + Clone,
    S: ResponseSender + Clone + 'static,
    C: Clock,
{
    state.phase = Phase::Responding;
    state.event = Some(event.clone());
    state.envelope = Some(envelope.clone());

    let responder = env.responder.clone();
    Effect::future(async move {
        let delivery = AssertUnwindSafe(responder.send(&event, &envelope)).catch_unwind();
        let error = match delivery.await {
            Ok(Ok(())) => return Some(RegistrationAction::ResponseDelivered),
            Ok(Err(error)) => error,
            Err(payload) => ResponseError::RequestFailed(format!(
                "response sender panicked: {}",
                panic_message(payload.as_ref())
            )),
        };
        Some(RegistrationAction::ResponseFailed { error })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use registrar_core::envelope::ResponseStatus;
    use registrar_core::lifecycle::RequestType;
    use registrar_testing::reducer_test::assertions;
    use registrar_testing::{
        FixedClock, MockDirectoryRegistry, RecordingResponseSender, ReducerTest,
        test_clock, test_directory_id, test_event,
    };

    type TestEnvironment =
        RegistrationEnvironment<MockDirectoryRegistry, RecordingResponseSender, FixedClock>;
    type TestReducer =
        RegistrationReducer<MockDirectoryRegistry, RecordingResponseSender, FixedClock>;

    fn test_env() -> TestEnvironment {
        RegistrationEnvironment::new(
            MockDirectoryRegistry::new(),
            RecordingResponseSender::new(),
            test_clock(),
            Some(test_directory_id()),
        )
    }

    fn dispatched(request_type: RequestType) -> RegistrationState {
        RegistrationState {
            phase: Phase::Dispatched,
            event: Some(test_event(request_type)),
            operation: Some(RegistryOperation::for_request(request_type)),
            received_at: Some(test_clock().now()),
            ..RegistrationState::default()
        }
    }

    fn responding() -> RegistrationState {
        RegistrationState {
            phase: Phase::Responding,
            envelope: Some(ResponseEnvelope::success("Register Successfully")),
            ..dispatched(RequestType::Create)
        }
    }

    #[test]
    fn test_event_dispatches_registry_call() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(RegistrationState::default())
            .when_action(RegistrationAction::EventReceived {
                event: test_event(RequestType::Create),
            })
            .then_state(|state| {
                assert_eq!(state.phase, Phase::Dispatched);
                assert_eq!(state.operation, Some(RegistryOperation::Register));
                assert_eq!(state.received_at, Some(test_clock().now()));
                assert!(state.envelope.is_none());
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_delete_selects_deregister() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(RegistrationState::default())
            .when_action(RegistrationAction::EventReceived {
                event: test_event(RequestType::Delete),
            })
            .then_state(|state| {
                assert_eq!(state.operation, Some(RegistryOperation::Deregister));
            })
            .run();
    }

    #[test]
    fn test_missing_directory_id_responds_failed() {
        let env = RegistrationEnvironment {
            directory_id: None,
            ..test_env()
        };

        ReducerTest::new(TestReducer::new())
            .with_env(env)
            .given_state(RegistrationState::default())
            .when_action(RegistrationAction::EventReceived {
                event: test_event(RequestType::Create),
            })
            .then_state(|state| {
                assert_eq!(state.phase, Phase::Responding);
                let envelope = state.envelope.as_ref().map(|e| (e.status, e.message()));
                assert_eq!(
                    envelope,
                    Some((
                        ResponseStatus::Failed,
                        Some("DIRECTORY_ID environment variable is not set")
                    ))
                );
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_duplicate_event_is_ignored() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(dispatched(RequestType::Create))
            .when_action(RegistrationAction::EventReceived {
                event: test_event(RequestType::Delete),
            })
            .then_state(|state| {
                assert_eq!(state.phase, Phase::Dispatched);
                assert_eq!(state.operation, Some(RegistryOperation::Register));
            })
            .then_effects(|effects| {
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn test_success_builds_success_envelope() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(dispatched(RequestType::Delete))
            .when_action(RegistrationAction::RegistryCompleted {
                operation: RegistryOperation::Deregister,
                result: Ok(()),
            })
            .then_state(|state| {
                assert_eq!(state.phase, Phase::Responding);
                let envelope = state.envelope.as_ref();
                assert!(envelope.is_some_and(ResponseEnvelope::is_success));
                assert_eq!(
                    envelope.and_then(ResponseEnvelope::message),
                    Some("Deregister Successfully")
                );
            })
            .then_effects(|effects| {
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_failure_carries_error_text() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(dispatched(RequestType::Create))
            .when_action(RegistrationAction::RegistryCompleted {
                operation: RegistryOperation::Register,
                result: Err(RegistryError::service_with_message(
                    "AccessDeniedException",
                    "not authorized",
                )),
            })
            .then_state(|state| {
                let envelope = state.envelope.as_ref();
                assert!(envelope.is_some_and(|e| !e.is_success()));
                assert_eq!(
                    envelope.and_then(ResponseEnvelope::message),
                    Some("AccessDeniedException: not authorized")
                );
            })
            .run();
    }

    #[test]
    fn test_late_completion_is_ignored() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(responding())
            .when_action(RegistrationAction::RegistryCompleted {
                operation: RegistryOperation::Register,
                result: Err(RegistryError::Transport("timeout".into())),
            })
            .then_state(|state| {
                assert_eq!(state.phase, Phase::Responding);
                assert_eq!(
                    state.envelope.as_ref().and_then(ResponseEnvelope::message),
                    Some("Register Successfully")
                );
            })
            .then_effects(|effects| {
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn test_delivery_is_terminal() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(responding())
            .when_action(RegistrationAction::ResponseDelivered)
            .then_state(|state| {
                assert_eq!(state.phase, Phase::Responded);
                assert!(state.phase.is_terminal());
                assert_eq!(state.completed_at, Some(test_clock().now()));
            })
            .then_effects(|effects| {
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn test_delivery_failure_is_recorded() {
        let error = ResponseError::Rejected {
            status: 403,
            body: "AccessDenied".into(),
        };

        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(responding())
            .when_action(RegistrationAction::ResponseFailed {
                error: error.clone(),
            })
            .then_state(move |state| {
                assert_eq!(state.phase, Phase::ResponseFailed);
                assert_eq!(state.response_error.as_ref(), Some(&error));
            })
            .then_effects(|effects| {
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn test_delivery_before_dispatch_is_ignored() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(RegistrationState::default())
            .when_action(RegistrationAction::ResponseDelivered)
            .then_state(|state| {
                assert_eq!(state.phase, Phase::Idle);
                assert!(state.completed_at.is_none());
            })
            .run();
    }
}
