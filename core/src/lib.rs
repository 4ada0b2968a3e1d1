//! # Registrar Core
//!
//! Core traits and domain types for the directory registrar.
//!
//! The registrar answers `CloudFormation` custom-resource lifecycle events by
//! registering (Create, Update) or deregistering (Delete) a directory with
//! Amazon `WorkSpaces`, then reporting the outcome back to `CloudFormation`.
//!
//! ## Core Concepts
//!
//! - **State**: Per-invocation state (which phase the invocation is in)
//! - **Action**: All inputs to a reducer (the lifecycle event, call completions)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Domain Types
//!
//! - [`lifecycle::LifecycleEvent`]: the request sent by `CloudFormation`
//! - [`envelope::ResponseEnvelope`]: the acknowledgment sent back
//! - [`registry::DirectoryRegistry`]: register / deregister a directory
//! - [`responder::ResponseSender`]: deliver the acknowledgment
//!
//! ## Example
//!
//! ```ignore
//! use registrar_core::*;
//!
//! impl Reducer for RegistrationReducer {
//!     type State = RegistrationState;
//!     type Action = RegistrationAction;
//!     type Environment = RegistrationEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut RegistrationState,
//!         action: RegistrationAction,
//!         env: &RegistrationEnvironment,
//!     ) -> SmallVec<[Effect<RegistrationAction>; 4]> {
//!         // Business logic goes here
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Lifecycle events issued by `CloudFormation`
pub mod lifecycle;

/// Response envelope reported back to `CloudFormation`
pub mod envelope;

/// Directory registration with the desktop service
pub mod registry;

/// Response delivery to the orchestrator
pub mod responder;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for RegistrationReducer {
    ///     type State = RegistrationState;
    ///     type Action = RegistrationAction;
    ///     type Environment = RegistrationEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut RegistrationState,
    ///         action: RegistrationAction,
    ///         env: &RegistrationEnvironment,
    ///     ) -> SmallVec<[Effect<RegistrationAction>; 4]> {
    ///         match action {
    ///             RegistrationAction::EventReceived { event } => {
    ///                 // Dispatch the registry call
    ///                 smallvec![Effect::None]
    ///             }
    ///             _ => smallvec![Effect::None],
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action against the current state
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution).
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap an async computation whose result is fed back as an action
        #[must_use]
        pub fn future<F>(fut: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Returns `true` for [`Effect::None`]
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter. The registry and responder traits live in
/// their own modules and are re-exported here.
pub mod environment {
    use chrono::{DateTime, Utc};

    pub use crate::registry::DirectoryRegistry;
    pub use crate::responder::ResponseSender;

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use registrar_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let before = clock.now();
    /// assert!(clock.now() >= before);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
