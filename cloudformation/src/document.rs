//! The JSON document `CloudFormation` expects at the response URL.

use registrar_core::envelope::{ResponseEnvelope, ResponseStatus};
use registrar_core::lifecycle::LifecycleEvent;
use serde::Serialize;
use std::collections::BTreeMap;

/// Response document for a custom-resource request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceResponse {
    /// `SUCCESS` or `FAILED`
    pub status: ResponseStatus,
    /// Pointer to the log stream holding the invocation's logs
    pub reason: String,
    /// Physical id of the custom resource
    pub physical_resource_id: String,
    /// Echoed from the request
    pub stack_id: String,
    /// Echoed from the request
    pub request_id: String,
    /// Echoed from the request
    pub logical_resource_id: String,
    /// Whether `CloudFormation` should mask `data` in stack events
    pub no_echo: bool,
    /// Response data (`Status` → outcome message)
    pub data: BTreeMap<String, String>,
}

impl CustomResourceResponse {
    /// Assemble the document for `event` from `envelope`.
    ///
    /// When the envelope carries no physical id, `log_stream_name` is used.
    #[must_use]
    pub fn build(event: &LifecycleEvent, envelope: &ResponseEnvelope, log_stream_name: &str) -> Self {
        Self {
            status: envelope.status,
            reason: format!("See the details in CloudWatch Log Stream: {log_stream_name}"),
            physical_resource_id: envelope
                .physical_resource_id
                .clone()
                .unwrap_or_else(|| log_stream_name.to_string()),
            stack_id: event.stack_id.clone(),
            request_id: event.request_id.clone(),
            logical_resource_id: event.logical_resource_id.clone(),
            no_echo: false,
            data: envelope.data.clone(),
        }
    }
}
