//! Lifecycle events delivered by `CloudFormation` custom resources.
//!
//! A [`LifecycleEvent`] is the JSON document `CloudFormation` passes to the
//! function backing a custom resource. Only [`RequestType`] drives behaviour;
//! every other field is correlation data echoed back in the response.
//!
//! # Example
//!
//! ```
//! use registrar_core::lifecycle::{LifecycleEvent, RequestType};
//!
//! let event: LifecycleEvent = serde_json::from_str(r#"{
//!     "RequestType": "Create",
//!     "ResponseURL": "https://cloudformation-custom-resource-response.s3.amazonaws.com/signed",
//!     "StackId": "arn:aws:cloudformation:us-east-1:123456789012:stack/AWSManagedAD/guid",
//!     "RequestId": "unique-request-id",
//!     "LogicalResourceId": "InvokeLambdaFunction",
//!     "ResourceType": "AWS::CloudFormation::CustomResource"
//! }"#).unwrap();
//!
//! assert_eq!(event.request_type, RequestType::Create);
//! assert!(event.physical_resource_id.is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle action `CloudFormation` is performing on the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestType {
    /// The resource is being created.
    Create,
    /// The resource properties changed.
    Update,
    /// The resource is being deleted.
    Delete,
}

impl RequestType {
    /// All request types, in declaration order.
    pub const ALL: [Self; 3] = [Self::Create, Self::Update, Self::Delete];

    /// Wire name of the request type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A custom-resource request from `CloudFormation`.
///
/// Created by the orchestrator immediately before the invocation and consumed
/// exactly once. The handler never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleEvent {
    /// Create, Update or Delete.
    pub request_type: RequestType,

    /// Pre-signed URL the response document must be `PUT` to.
    #[serde(rename = "ResponseURL")]
    pub response_url: String,

    /// ARN of the stack that owns the resource.
    pub stack_id: String,

    /// Unique id of this request (the correlation token).
    pub request_id: String,

    /// Template-level name of the custom resource.
    pub logical_resource_id: String,

    /// Physical id reported on a previous response (Update and Delete only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,

    /// Resource type as written in the template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    /// ARN of the function servicing the resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_token: Option<String>,

    /// Properties declared on the resource. Passed through, never inspected.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub resource_properties: serde_json::Value,

    /// Previous properties (Update only). Passed through, never inspected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_resource_properties: Option<serde_json::Value>,
}

impl LifecycleEvent {
    /// Create an event with the required correlation fields.
    #[must_use]
    pub fn new(
        request_type: RequestType,
        response_url: impl Into<String>,
        stack_id: impl Into<String>,
        request_id: impl Into<String>,
        logical_resource_id: impl Into<String>,
    ) -> Self {
        Self {
            request_type,
            response_url: response_url.into(),
            stack_id: stack_id.into(),
            request_id: request_id.into(),
            logical_resource_id: logical_resource_id.into(),
            physical_resource_id: None,
            resource_type: None,
            service_token: None,
            resource_properties: serde_json::Value::Null,
            old_resource_properties: None,
        }
    }

    /// Set the physical resource id carried by the request.
    #[must_use]
    pub fn with_physical_resource_id(mut self, id: impl Into<String>) -> Self {
        self.physical_resource_id = Some(id.into());
        self
    }
}
