//! Mock implementations of the registrar's environment traits.
//!
//! - [`MockDirectoryRegistry`]: simulates `WorkSpaces` registration state and
//!   records every call
//! - [`RecordingResponseSender`]: captures every delivered response

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning only follows a failed test

use registrar_core::envelope::ResponseEnvelope;
use registrar_core::lifecycle::LifecycleEvent;
use registrar_core::registry::{DirectoryId, DirectoryRegistry, RegistryError};
use registrar_core::responder::{ResponseError, ResponseSender};
use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// A call received by [`MockDirectoryRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCall {
    /// `register(directory_id, enable_work_docs)`
    Register {
        /// Directory passed to the call
        directory_id: DirectoryId,
        /// `EnableWorkDocs` flag passed to the call
        enable_work_docs: bool,
    },
    /// `deregister(directory_id)`
    Deregister {
        /// Directory passed to the call
        directory_id: DirectoryId,
    },
}

#[derive(Debug, Clone, Default)]
enum Script {
    /// Simulate the service's registration state
    #[default]
    Simulate,
    /// Fail every call with this error
    Fail(RegistryError),
    /// Panic inside every call
    Panic(String),
}

/// Mock directory registry.
///
/// By default it behaves like the service: registering an already registered
/// directory or deregistering an unregistered one is rejected with an
/// `InvalidResourceStateException`. Clones share state, so a test can keep a
/// handle while the environment owns another.
///
/// # Example
///
/// ```
/// use registrar_testing::{MockDirectoryRegistry, test_directory_id};
///
/// let registry = MockDirectoryRegistry::new().with_registered(test_directory_id());
/// assert!(registry.is_registered(&test_directory_id()));
/// assert_eq!(registry.call_count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockDirectoryRegistry {
    calls: Arc<Mutex<Vec<RegistryCall>>>,
    registered: Arc<Mutex<HashSet<DirectoryId>>>,
    script: Arc<Mutex<Script>>,
}

impl MockDirectoryRegistry {
    /// Create a registry with no registered directories
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `directory_id` as already registered
    #[must_use]
    pub fn with_registered(self, directory_id: DirectoryId) -> Self {
        self.registered.lock().unwrap().insert(directory_id);
        self
    }

    /// Fail every subsequent call with `error`
    #[must_use]
    pub fn failing_with(self, error: RegistryError) -> Self {
        *self.script.lock().unwrap() = Script::Fail(error);
        self
    }

    /// Panic inside every subsequent call
    #[must_use]
    pub fn panicking(self, message: impl Into<String>) -> Self {
        *self.script.lock().unwrap() = Script::Panic(message.into());
        self
    }

    /// All calls received so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<RegistryCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls received so far
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of `register` calls received so far
    #[must_use]
    pub fn register_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, RegistryCall::Register { .. }))
            .count()
    }

    /// Number of `deregister` calls received so far
    #[must_use]
    pub fn deregister_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, RegistryCall::Deregister { .. }))
            .count()
    }

    /// Whether `directory_id` is currently registered
    #[must_use]
    pub fn is_registered(&self, directory_id: &DirectoryId) -> bool {
        self.registered.lock().unwrap().contains(directory_id)
    }

    fn apply(&self, call: RegistryCall) -> Script {
        self.calls.lock().unwrap().push(call.clone());

        let script = self.script.lock().unwrap().clone();
        if !matches!(script, Script::Simulate) {
            return script;
        }

        let mut registered = self.registered.lock().unwrap();
        let result = match call {
            RegistryCall::Register { directory_id, .. } => {
                if registered.insert(directory_id) {
                    Ok(())
                } else {
                    Err(RegistryError::service_with_message(
                        "InvalidResourceStateException",
                        "The specified directory is already registered.",
                    ))
                }
            },
            RegistryCall::Deregister { directory_id } => {
                if registered.remove(&directory_id) {
                    Ok(())
                } else {
                    Err(RegistryError::service_with_message(
                        "InvalidResourceStateException",
                        "The specified directory is not registered.",
                    ))
                }
            },
        };

        match result {
            Ok(()) => Script::Simulate,
            Err(error) => Script::Fail(error),
        }
    }
}

#[allow(clippy::panic)] // Scripted panics exercise the handler's panic containment
async fn resolve(script: Script) -> Result<(), RegistryError> {
    match script {
        Script::Simulate => Ok(()),
        Script::Fail(error) => Err(error),
        Script::Panic(message) => panic!("{message}"),
    }
}

impl DirectoryRegistry for MockDirectoryRegistry {
    fn register(
        &self,
        directory_id: &DirectoryId,
        enable_work_docs: bool,
    ) -> impl Future<Output = Result<(), RegistryError>> + Send {
        let script = self.apply(RegistryCall::Register {
            directory_id: directory_id.clone(),
            enable_work_docs,
        });
        resolve(script)
    }

    fn deregister(
        &self,
        directory_id: &DirectoryId,
    ) -> impl Future<Output = Result<(), RegistryError>> + Send {
        let script = self.apply(RegistryCall::Deregister {
            directory_id: directory_id.clone(),
        });
        resolve(script)
    }
}

/// Response sender that records deliveries instead of sending them.
///
/// Clones share the recording.
#[derive(Debug, Clone, Default)]
pub struct RecordingResponseSender {
    deliveries: Arc<Mutex<Vec<(LifecycleEvent, ResponseEnvelope)>>>,
    failure: Arc<Mutex<Option<ResponseError>>>,
}

impl RecordingResponseSender {
    /// Create a sender that accepts every response
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record deliveries but report `error` for each of them
    #[must_use]
    pub fn failing_with(self, error: ResponseError) -> Self {
        *self.failure.lock().unwrap() = Some(error);
        self
    }

    /// Every `(event, envelope)` pair passed to `send`, in order
    #[must_use]
    pub fn deliveries(&self) -> Vec<(LifecycleEvent, ResponseEnvelope)> {
        self.deliveries.lock().unwrap().clone()
    }

    /// Number of `send` calls so far
    #[must_use]
    pub fn delivery_count(&self) -> usize {
        self.deliveries.lock().unwrap().len()
    }

    /// Envelope of the most recent `send` call
    #[must_use]
    pub fn last_envelope(&self) -> Option<ResponseEnvelope> {
        self.deliveries
            .lock()
            .unwrap()
            .last()
            .map(|(_, envelope)| envelope.clone())
    }
}

impl ResponseSender for RecordingResponseSender {
    fn send(
        &self,
        event: &LifecycleEvent,
        envelope: &ResponseEnvelope,
    ) -> impl Future<Output = Result<(), ResponseError>> + Send {
        self.deliveries
            .lock()
            .unwrap()
            .push((event.clone(), envelope.clone()));
        let result = self.failure.lock().unwrap().clone().map_or(Ok(()), Err);
        async move { result }
    }
}
