//! Conversion of SDK failures into [`RegistryError`].

use aws_sdk_workspaces::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use registrar_core::registry::RegistryError;

/// Classify an SDK error.
///
/// A service response with an error code becomes [`RegistryError::Service`];
/// everything else (dispatch, timeout, credential or parse failures) becomes
/// [`RegistryError::Transport`] with the full error chain.
pub fn classify<E, R>(error: &SdkError<E, R>) -> RegistryError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match error {
        SdkError::ServiceError(context) => from_metadata(
            context.err().code(),
            context.err().message(),
            || DisplayErrorContext(error).to_string(),
        ),
        _ => RegistryError::Transport(DisplayErrorContext(error).to_string()),
    }
}

/// Build a [`RegistryError`] from service error metadata.
///
/// Without a code the service response is unrecognisable, so the error falls
/// back to [`RegistryError::Transport`] using `context`.
pub fn from_metadata(
    code: Option<&str>,
    message: Option<&str>,
    context: impl FnOnce() -> String,
) -> RegistryError {
    match code {
        Some(code) => RegistryError::Service {
            code: code.to_string(),
            message: message.map(ToString::to_string),
        },
        None => RegistryError::Transport(context()),
    }
}
