//! Configuration loaded from the function's environment variables.

use registrar_core::registry::DirectoryId;
use thiserror::Error;

/// Environment variable holding the directory to register.
pub const DIRECTORY_ID_VAR: &str = "DIRECTORY_ID";

/// Environment variable Lambda sets to the invocation's log stream.
pub const LOG_STREAM_VAR: &str = "AWS_LAMBDA_LOG_STREAM_NAME";

/// Log stream reported when [`LOG_STREAM_VAR`] is unset (local runs).
pub const DEFAULT_LOG_STREAM: &str = "unknown";

/// Configuration errors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `DIRECTORY_ID` is unset or blank.
    #[error("DIRECTORY_ID environment variable is not set")]
    MissingDirectoryId,
}

/// Registrar configuration.
///
/// A missing directory id is not a startup failure: the function must still
/// answer every lifecycle event, so the gap is reported per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrarConfig {
    /// Directory to register or deregister
    pub directory_id: Option<DirectoryId>,
    /// Log stream named in responses
    pub log_stream_name: String,
}

impl RegistrarConfig {
    /// Load configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            directory_id: lookup(DIRECTORY_ID_VAR).and_then(|value| DirectoryId::parse(&value)),
            log_stream_name: lookup(LOG_STREAM_VAR)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_STREAM.to_string()),
        }
    }

    /// The configured directory id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDirectoryId`] when `DIRECTORY_ID` is unset or blank.
    pub const fn require_directory_id(&self) -> Result<&DirectoryId, ConfigError> {
        match &self.directory_id {
            Some(id) => Ok(id),
            None => Err(ConfigError::MissingDirectoryId),
        }
    }

    /// Set the directory id.
    #[must_use]
    pub fn with_directory_id(mut self, directory_id: DirectoryId) -> Self {
        self.directory_id = Some(directory_id);
        self
    }

    /// Set the log stream name
    #[must_use]
    pub fn with_log_stream_name(mut self, log_stream_name: impl Into<String>) -> Self {
        self.log_stream_name = log_stream_name.into();
        self
    }
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            directory_id: None,
            log_stream_name: DEFAULT_LOG_STREAM.to_string(),
        }
    }
}
