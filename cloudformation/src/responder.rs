//! HTTP delivery of custom-resource responses.

use crate::document::CustomResourceResponse;
use registrar_core::envelope::ResponseEnvelope;
use registrar_core::lifecycle::LifecycleEvent;
use registrar_core::responder::{ResponseError, ResponseSender};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::future::Future;

/// Sends responses to the pre-signed URL of each request.
///
/// Holds one HTTP client for the lifetime of the process.
#[derive(Clone, Debug)]
pub struct CloudFormationResponder {
    client: Client,
    log_stream_name: String,
}

impl CloudFormationResponder {
    /// Create a responder that names `log_stream_name` in every response
    #[must_use]
    pub fn new(log_stream_name: impl Into<String>) -> Self {
        Self::with_client(Client::new(), log_stream_name)
    }

    /// Create a responder with an explicit HTTP client
    #[must_use]
    pub fn with_client(client: Client, log_stream_name: impl Into<String>) -> Self {
        Self {
            client,
            log_stream_name: log_stream_name.into(),
        }
    }

    /// Log stream reported in `Reason` and used as the default physical id
    #[must_use]
    pub fn log_stream_name(&self) -> &str {
        &self.log_stream_name
    }
}

impl ResponseSender for CloudFormationResponder {
    fn send(
        &self,
        event: &LifecycleEvent,
        envelope: &ResponseEnvelope,
    ) -> impl Future<Output = Result<(), ResponseError>> + Send {
        let document = CustomResourceResponse::build(event, envelope, &self.log_stream_name);
        let body = serde_json::to_vec(&document);
        let request = self.client.put(&event.response_url);
        let request_id = event.request_id.clone();

        async move {
            let body = body.map_err(|e| ResponseError::Serialization(e.to_string()))?;
            tracing::debug!(
                %request_id,
                body = %String::from_utf8_lossy(&body),
                "Sending custom resource response"
            );

            let response = request
                .header(CONTENT_TYPE, "")
                .body(body)
                .send()
                .await
                .map_err(|e| ResponseError::RequestFailed(e.to_string()))?;

            let status = response.status();
            if status.is_success() {
                tracing::info!(%request_id, status = status.as_u16(), "Custom resource response delivered");
                Ok(())
            } else {
                let body = response.text().await.unwrap_or_default();
                Err(ResponseError::Rejected {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}
