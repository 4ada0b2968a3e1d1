//! Directory registration with the directory-backed desktop service.
//!
//! The [`DirectoryRegistry`] trait abstracts the two calls the registrar makes
//! against Amazon `WorkSpaces`. The service owns registration state and its
//! concurrency control; implementations perform a single request per call and
//! never retry.
//!
//! # Implementations
//!
//! - `WorkSpacesRegistry` (in `registrar-workspaces`): production
//! - `MockDirectoryRegistry` (in `registrar-testing`): records calls, scripted outcomes

use crate::lifecycle::RequestType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use thiserror::Error;

/// Identifier of a directory service directory (e.g. `d-1234567890`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectoryId(String);

impl DirectoryId {
    /// Parse a directory id, trimming whitespace.
    ///
    /// Returns `None` for blank input.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DirectoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Failure of a register or deregister call.
///
/// The orchestrator only ever sees the display text, so every variant renders
/// the underlying detail verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The service rejected the request (access denied, not found, conflict, throttled).
    #[error("{}", service_message(.code, .message.as_deref()))]
    Service {
        /// Service error code, e.g. `AccessDeniedException`.
        code: String,
        /// Service-provided message, if any.
        message: Option<String>,
    },

    /// The request never produced a service response (network, credentials, timeout).
    #[error("{0}")]
    Transport(String),

    /// The call panicked before completing.
    #[error("registry call panicked: {0}")]
    Panicked(String),
}

impl RegistryError {
    /// Service rejection with a code only.
    #[must_use]
    pub fn service(code: impl Into<String>) -> Self {
        Self::Service {
            code: code.into(),
            message: None,
        }
    }

    /// Service rejection with a code and message.
    #[must_use]
    pub fn service_with_message(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service {
            code: code.into(),
            message: Some(message.into()),
        }
    }
}

fn service_message(code: &str, message: Option<&str>) -> String {
    match message {
        Some(message) if !message.is_empty() => format!("{code}: {message}"),
        _ => code.to_string(),
    }
}

/// The registry call a lifecycle event maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryOperation {
    /// Register the directory with the desktop service.
    Register,
    /// Deregister the directory from the desktop service.
    Deregister,
}

impl RegistryOperation {
    /// Map a request type to its operation.
    ///
    /// Create and Update both register; there is no update-specific call.
    #[must_use]
    pub const fn for_request(request_type: RequestType) -> Self {
        match request_type {
            RequestType::Create | RequestType::Update => Self::Register,
            RequestType::Delete => Self::Deregister,
        }
    }

    /// Outcome message reported when the call succeeds.
    #[must_use]
    pub const fn success_message(self) -> &'static str {
        match self {
            Self::Register => "Register Successfully",
            Self::Deregister => "Deregister Successfully",
        }
    }

    /// Short name used in logs and metric labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Deregister => "deregister",
        }
    }
}

impl fmt::Display for RegistryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Register and deregister directories with the desktop service.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; a single instance is created per
/// process and shared by every invocation.
pub trait DirectoryRegistry: Send + Sync {
    /// Register `directory_id` with the desktop service.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the service rejects the request or the
    /// request cannot be delivered.
    fn register(
        &self,
        directory_id: &DirectoryId,
        enable_work_docs: bool,
    ) -> impl Future<Output = Result<(), RegistryError>> + Send;

    /// Deregister `directory_id` from the desktop service.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the service rejects the request (including
    /// when the directory is not registered) or the request cannot be delivered.
    fn deregister(
        &self,
        directory_id: &DirectoryId,
    ) -> impl Future<Output = Result<(), RegistryError>> + Send;
}
