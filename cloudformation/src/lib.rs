//! # CloudFormation Custom Resource Responses
//!
//! Delivers the registrar's [`ResponseEnvelope`](registrar_core::envelope::ResponseEnvelope)
//! to the pre-signed `ResponseURL` of a custom-resource request.
//!
//! ## Example
//!
//! ```no_run
//! use registrar_cloudformation::CloudFormationResponder;
//! use registrar_core::envelope::ResponseEnvelope;
//! use registrar_core::lifecycle::LifecycleEvent;
//! use registrar_core::responder::ResponseSender;
//!
//! # async fn example(event: LifecycleEvent) -> Result<(), Box<dyn std::error::Error>> {
//! let responder = CloudFormationResponder::new("2025/01/01/[$LATEST]0123456789abcdef");
//! responder
//!     .send(&event, &ResponseEnvelope::success("Register Successfully"))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Wire Format
//!
//! One `PUT` with an empty `Content-Type` (the pre-signed URL is signed
//! without one) and a JSON body:
//!
//! ```json
//! {
//!   "Status": "SUCCESS",
//!   "Reason": "See the details in CloudWatch Log Stream: <log stream>",
//!   "PhysicalResourceId": "<log stream>",
//!   "StackId": "...",
//!   "RequestId": "...",
//!   "LogicalResourceId": "...",
//!   "NoEcho": false,
//!   "Data": { "Status": "Register Successfully" }
//! }
//! ```

pub mod document;
pub mod responder;

// Re-export main types for convenience
pub use document::CustomResourceResponse;
pub use responder::CloudFormationResponder;
