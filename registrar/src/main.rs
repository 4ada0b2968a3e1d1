//! Lambda entry point.
//!
//! Clients are built once per execution environment and borrowed by every
//! invocation. The function always returns success to the Lambda runtime:
//! the outcome is reported to `CloudFormation` through the response URL, and
//! an error here would only trigger a retry that answers the event twice.

use directory_registrar::{RegistrarConfig, RegistrationEnvironment, RegistrationHandler};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use registrar_cloudformation::CloudFormationResponder;
use registrar_core::environment::SystemClock;
use registrar_core::lifecycle::LifecycleEvent;
use registrar_workspaces::WorkSpacesRegistry;

#[tokio::main]
async fn main() -> Result<(), Error> {
    directory_registrar::init_tracing();

    let config = RegistrarConfig::from_env();
    match &config.directory_id {
        Some(directory_id) => tracing::info!(%directory_id, "Directory registrar starting"),
        None => tracing::warn!("DIRECTORY_ID is not set, every lifecycle event will fail"),
    }

    let registry = WorkSpacesRegistry::from_env().await;
    let responder = CloudFormationResponder::new(config.log_stream_name.clone());
    let handler = RegistrationHandler::new(RegistrationEnvironment::new(
        registry,
        responder,
        SystemClock,
        config.directory_id,
    ));

    let handler = &handler;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<LifecycleEvent>| async move {
        handler.handle(event.payload).await;
        Ok::<(), Error>(())
    }))
    .await
}
