//! The response envelope reported back to `CloudFormation`.
//!
//! Exactly one envelope is produced per lifecycle event. Its `data` map has a
//! single recognised key, [`STATUS_KEY`], whose value is a human-readable
//! outcome message.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The only key recognised in [`ResponseEnvelope::data`].
pub const STATUS_KEY: &str = "Status";

/// Outcome reported to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseStatus {
    /// The registry call completed without error.
    #[serde(rename = "SUCCESS")]
    Success,
    /// The registry call failed, or never ran.
    #[serde(rename = "FAILED")]
    Failed,
}

impl ResponseStatus {
    /// Wire value (`SUCCESS` / `FAILED`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of handling one lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Success or failure.
    pub status: ResponseStatus,
    /// Response data; holds exactly the [`STATUS_KEY`] entry.
    pub data: BTreeMap<String, String>,
    /// Physical id to report. `None` lets the sender pick its default.
    pub physical_resource_id: Option<String>,
}

impl ResponseEnvelope {
    /// Build an envelope with the given status and outcome message.
    #[must_use]
    pub fn new(status: ResponseStatus, message: impl Into<String>) -> Self {
        let mut data = BTreeMap::new();
        data.insert(STATUS_KEY.to_string(), message.into());
        Self {
            status,
            data,
            physical_resource_id: None,
        }
    }

    /// Successful outcome.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ResponseStatus::Success, message)
    }

    /// Failed outcome; `message` is the stringified error.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(ResponseStatus::Failed, message)
    }

    /// The outcome message stored under [`STATUS_KEY`].
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.data.get(STATUS_KEY).map(String::as_str)
    }

    /// Returns `true` when the status is [`ResponseStatus::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}
