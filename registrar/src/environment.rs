//! Dependencies injected into the registration reducer.

use registrar_core::environment::{Clock, DirectoryRegistry, ResponseSender};
use registrar_core::registry::DirectoryId;

/// Environment for [`RegistrationReducer`](crate::reducer::RegistrationReducer).
///
/// Built once per process; each invocation's store gets a clone. The
/// registry and responder are cloned into effect futures, so clones must
/// share their underlying clients.
#[derive(Debug, Clone)]
pub struct RegistrationEnvironment<D, S, C>
where
    D: DirectoryRegistry + Clone,
    S: ResponseSender + Clone,
    C: Clock,
{
    /// Desktop-service registration
    pub registry: D,
    /// Acknowledgment delivery
    pub responder: S,
    /// Time source for invocation timestamps
    pub clock: C,
    /// Directory to act on; `None` when unconfigured
    pub directory_id: Option<DirectoryId>,
}

impl<D, S, C> RegistrationEnvironment<D, S, C>
where
    D: DirectoryRegistry + Clone,
    S: ResponseSender + Clone,
    C: Clock,
{
    /// Create a new environment
    #[must_use]
    pub const fn new(
        registry: D,
        responder: S,
        clock: C,
        directory_id: Option<DirectoryId>,
    ) -> Self {
        Self {
            registry,
            responder,
            clock,
            directory_id,
        }
    }
}
