//! # Registrar Runtime
//!
//! Runtime implementation for the directory registrar.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling for a single lifecycle invocation.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, reducer and environment; executes effects
//! - **Feedback Loop**: Actions produced by effects are fed back to the reducer
//!   until none remain, so `send` returns only once the invocation is finished
//!
//! ## Example
//!
//! ```ignore
//! use registrar_runtime::Store;
//!
//! let store = Store::new(
//!     RegistrationState::default(),
//!     RegistrationReducer::new(),
//!     environment,
//! );
//!
//! // Runs the registry call and the response delivery to completion
//! store.send(RegistrationAction::EventReceived { event }).await?;
//!
//! let phase = store.state(|s| s.phase).await;
//! ```

use registrar_core::{effect::Effect, reducer::Reducer};
use std::any::Any;
use std::sync::Arc;
use tokio::sync::RwLock;

pub use error::StoreError;
pub use store::Store;

/// Upper bound on actions processed by a single `send`, including feedback.
///
/// A reducer that keeps producing actions past this limit is looping.
pub const MAX_FEEDBACK_ACTIONS: usize = 64;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// An effect future panicked while executing
        ///
        /// The panic is contained; the store stays usable.
        #[error("Effect panicked: {0}")]
        EffectPanicked(String),

        /// The feedback loop produced too many actions
        #[error("Feedback loop exceeded {0} actions")]
        FeedbackLimitExceeded(usize),
    }
}

/// Extract a readable message from a panic payload.
///
/// Panics raised with a string literal or a formatted message yield that text;
/// anything else yields a generic placeholder.
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{Arc, Effect, MAX_FEEDBACK_ACTIONS, Reducer, RwLock, StoreError, panic_message};
    use futures::FutureExt;
    use std::collections::VecDeque;
    use std::marker::PhantomData;
    use std::panic::AssertUnwindSafe;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent reads)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// Effects run in the order the reducer returned them. Each `Effect::Future`
    /// is awaited before the next effect starts, and the action it yields is
    /// queued for the reducer.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        _action: PhantomData<fn(A)>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync,
        A: Send + std::fmt::Debug,
        S: Send + Sync,
        E: Send + Sync,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                _action: PhantomData,
            }
        }

        /// Send an action and run every resulting effect to completion
        ///
        /// Returns the number of actions the reducer processed, including the
        /// initial one.
        ///
        /// # Errors
        ///
        /// - [`StoreError::EffectPanicked`]: an effect future panicked; the
        ///   remaining effects of that batch are dropped
        /// - [`StoreError::FeedbackLimitExceeded`]: more than
        ///   [`MAX_FEEDBACK_ACTIONS`] actions were produced
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<usize, StoreError> {
            let mut queue = VecDeque::from([action]);
            let mut processed = 0;

            while let Some(action) = queue.pop_front() {
                if processed >= MAX_FEEDBACK_ACTIONS {
                    tracing::error!(processed, "Feedback loop limit reached");
                    return Err(StoreError::FeedbackLimitExceeded(MAX_FEEDBACK_ACTIONS));
                }
                processed += 1;

                tracing::debug!(?action, "Processing action");
                metrics::counter!("store.actions.total").increment(1);

                let effects = {
                    let mut state = self.state.write().await;

                    let span = tracing::debug_span!("reducer_execution");
                    let _enter = span.enter();

                    let start = std::time::Instant::now();
                    let effects = self.reducer.reduce(&mut state, action, &self.environment);
                    metrics::histogram!("store.reducer.duration_seconds")
                        .record(start.elapsed().as_secs_f64());

                    tracing::trace!("Reducer completed, returned {} effects", effects.len());
                    effects
                };

                for effect in effects {
                    if let Some(next) = Self::execute_effect(effect).await? {
                        queue.push_back(next);
                    }
                }
            }

            tracing::debug!(processed, "Action processing completed");
            Ok(processed)
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let phase = store.state(|s| s.phase).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        async fn execute_effect(effect: Effect<A>) -> Result<Option<A>, StoreError> {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                    Ok(None)
                },
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);

                    match AssertUnwindSafe(fut).catch_unwind().await {
                        Ok(action) => Ok(action),
                        Err(payload) => {
                            let message = panic_message(payload.as_ref());
                            tracing::error!(panic = %message, "Effect::Future panicked");
                            metrics::counter!("store.effects.panicked").increment(1);
                            Err(StoreError::EffectPanicked(message))
                        },
                    }
                },
            }
        }
    }
}
