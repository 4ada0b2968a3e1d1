//! `WorkSpaces` client implementation of [`DirectoryRegistry`].

use crate::error::classify;
use aws_sdk_workspaces::Client;
use registrar_core::registry::{DirectoryId, DirectoryRegistry, RegistryError};
use std::future::Future;

/// Directory registry backed by Amazon `WorkSpaces`.
///
/// Holds one SDK client for the lifetime of the process. Cloning is cheap;
/// clones share the client's connection pool.
#[derive(Clone, Debug)]
pub struct WorkSpacesRegistry {
    client: Client,
}

impl WorkSpacesRegistry {
    /// Create a registry from an existing SDK client
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a registry using the default AWS configuration chain
    /// (environment, profile, container or instance credentials).
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config))
    }
}

impl DirectoryRegistry for WorkSpacesRegistry {
    fn register(
        &self,
        directory_id: &DirectoryId,
        enable_work_docs: bool,
    ) -> impl Future<Output = Result<(), RegistryError>> + Send {
        let request = self
            .client
            .register_workspace_directory()
            .directory_id(directory_id.as_str())
            .enable_work_docs(enable_work_docs);
        let directory_id = directory_id.clone();

        async move {
            tracing::debug!(%directory_id, enable_work_docs, "Calling RegisterWorkspaceDirectory");
            request.send().await.map(|_| ()).map_err(|error| {
                let error = classify(&error);
                tracing::debug!(%directory_id, %error, "RegisterWorkspaceDirectory failed");
                error
            })
        }
    }

    fn deregister(
        &self,
        directory_id: &DirectoryId,
    ) -> impl Future<Output = Result<(), RegistryError>> + Send {
        let request = self
            .client
            .deregister_workspace_directory()
            .directory_id(directory_id.as_str());
        let directory_id = directory_id.clone();

        async move {
            tracing::debug!(%directory_id, "Calling DeregisterWorkspaceDirectory");
            request.send().await.map(|_| ()).map_err(|error| {
                let error = classify(&error);
                tracing::debug!(%directory_id, %error, "DeregisterWorkspaceDirectory failed");
                error
            })
        }
    }
}
