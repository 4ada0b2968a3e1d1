//! Integration tests for `CloudFormationResponder` against a mock HTTP server.

#![allow(clippy::unwrap_used)]

use registrar_cloudformation::CloudFormationResponder;
use registrar_core::envelope::ResponseEnvelope;
use registrar_core::lifecycle::RequestType;
use registrar_core::responder::{ResponseError, ResponseSender};
use registrar_testing::test_event;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOG_STREAM: &str = "2025/01/01/[$LATEST]0123456789abcdef";

#[tokio::test]
async fn test_success_response_is_put_to_response_url() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/signed"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut event = test_event(RequestType::Create);
    event.response_url = format!("{}/signed", server.uri());
    let responder = CloudFormationResponder::new(LOG_STREAM);

    responder
        .send(&event, &ResponseEnvelope::success("Register Successfully"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let request = &requests[0];
    assert_eq!(
        request.headers.get(CONTENT_TYPE.as_str()).map(|v| v.as_bytes()),
        Some(&b""[..])
    );

    let body: Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(
        body,
        json!({
            "Status": "SUCCESS",
            "Reason": format!("See the details in CloudWatch Log Stream: {LOG_STREAM}"),
            "PhysicalResourceId": LOG_STREAM,
            "StackId": event.stack_id,
            "RequestId": event.request_id,
            "LogicalResourceId": event.logical_resource_id,
            "NoEcho": false,
            "Data": { "Status": "Register Successfully" }
        })
    );
}

#[tokio::test]
async fn test_failed_envelope_carries_error_text() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut event = test_event(RequestType::Delete);
    event.response_url = format!("{}/signed", server.uri());
    let responder = CloudFormationResponder::new(LOG_STREAM);

    responder
        .send(&event, &ResponseEnvelope::failed("AccessDenied"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["Status"], "FAILED");
    assert_eq!(body["Data"]["Status"], "AccessDenied");
}

#[tokio::test]
async fn test_non_success_status_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(403).set_body_string("SignatureDoesNotMatch"))
        .mount(&server)
        .await;

    let mut event = test_event(RequestType::Create);
    event.response_url = format!("{}/signed", server.uri());
    let responder = CloudFormationResponder::new(LOG_STREAM);

    let result = responder
        .send(&event, &ResponseEnvelope::success("Register Successfully"))
        .await;

    assert_eq!(
        result,
        Err(ResponseError::Rejected {
            status: 403,
            body: "SignatureDoesNotMatch".to_string(),
        })
    );
}

#[tokio::test]
async fn test_unreachable_url_is_request_failure() {
    let mut event = test_event(RequestType::Create);
    event.response_url = "not a url".to_string();
    let responder = CloudFormationResponder::new(LOG_STREAM);

    let result = responder
        .send(&event, &ResponseEnvelope::success("Register Successfully"))
        .await;

    assert!(matches!(result, Err(ResponseError::RequestFailed(_))));
}
