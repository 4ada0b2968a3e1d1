//! # Amazon WorkSpaces Directory Registry
//!
//! Production [`DirectoryRegistry`](registrar_core::registry::DirectoryRegistry)
//! backed by the `WorkSpaces` `RegisterWorkspaceDirectory` and
//! `DeregisterWorkspaceDirectory` operations.
//!
//! ## Example
//!
//! ```no_run
//! use registrar_core::registry::{DirectoryId, DirectoryRegistry};
//! use registrar_workspaces::WorkSpacesRegistry;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credentials and region come from the standard AWS provider chain
//!     let registry = WorkSpacesRegistry::from_env().await;
//!
//!     let directory_id = DirectoryId::parse("d-1234567890").ok_or("blank id")?;
//!     registry.register(&directory_id, false).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod registry;

// Re-export main types for convenience
pub use registry::WorkSpacesRegistry;
