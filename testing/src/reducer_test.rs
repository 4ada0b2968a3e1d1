//! Given/When/Then harness for reducers.
//!
//! Runs one `reduce` call against a fixed state and environment, then hands
//! the resulting state and effects to assertion closures. Effects are never
//! executed; use the store for end-to-end runs.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use registrar_core::{effect::Effect, reducer::Reducer};

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for effect assertion functions
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// # Example
///
/// ```ignore
/// use registrar_testing::ReducerTest;
///
/// ReducerTest::new(RegistrationReducer::new())
///     .with_env(test_environment())
///     .given_state(RegistrationState::default())
///     .when_action(RegistrationAction::EventReceived { event })
///     .then_state(|state| {
///         assert_eq!(state.phase, Phase::Dispatched);
///     })
///     .then_effects(|effects| {
///         assertions::assert_has_future_effect(effects);
///     })
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    action: Option<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            action: None,
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Set the action to test (When)
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.action = Some(action);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the resulting effects (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if initial state, action, or environment is not set,
    /// or if any assertions fail.
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        let action = self.action.expect("Action must be set with when_action()");

        let env = self
            .environment
            .expect("Environment must be set with with_env()");

        let effects = self.reducer.reduce(&mut state, action, &env);

        for assertion in self.state_assertions {
            assertion(&state);
        }

        for assertion in self.effect_assertions {
            assertion(&effects);
        }
    }
}

/// Helper assertions for effects
pub mod assertions {
    use registrar_core::effect::Effect;

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if effects is not empty.
    pub fn assert_no_effects<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Assert that effects contain at least one Future effect
    ///
    /// # Panics
    ///
    /// Panics if no Future effect is found.
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "Expected at least one Future effect, but none found"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registrar_core::{SmallVec, smallvec};

    /// Minimal acknowledgment flow: a request is dispatched, then acknowledged once.
    #[derive(Clone, Debug, Default)]
    struct AckState {
        dispatched: bool,
        acknowledgments: u32,
    }

    #[derive(Clone, Debug)]
    enum AckAction {
        Dispatch,
        Acknowledged,
    }

    struct AckReducer;

    struct AckEnv {
        directory_id: &'static str,
    }

    impl Reducer for AckReducer {
        type State = AckState;
        type Action = AckAction;
        type Environment = AckEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                AckAction::Dispatch if state.dispatched || env.directory_id.is_empty() => {
                    smallvec![Effect::None]
                },
                AckAction::Dispatch => {
                    state.dispatched = true;
                    smallvec![Effect::future(async { Some(AckAction::Acknowledged) })]
                },
                AckAction::Acknowledged => {
                    state.acknowledgments += 1;
                    smallvec![Effect::None]
                },
            }
        }
    }

    const ENV: AckEnv = AckEnv {
        directory_id: "d-1234",
    };

    #[test]
    fn test_dispatch_schedules_acknowledgment() {
        ReducerTest::new(AckReducer)
            .with_env(ENV)
            .given_state(AckState::default())
            .when_action(AckAction::Dispatch)
            .then_state(|state| {
                assert!(state.dispatched);
                assert_eq!(state.acknowledgments, 0);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_second_dispatch_has_no_effects() {
        ReducerTest::new(AckReducer)
            .with_env(ENV)
            .given_state(AckState {
                dispatched: true,
                acknowledgments: 0,
            })
            .when_action(AckAction::Dispatch)
            .then_effects(|effects| {
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn test_unconfigured_environment_is_respected() {
        ReducerTest::new(AckReducer)
            .with_env(AckEnv { directory_id: "" })
            .given_state(AckState::default())
            .when_action(AckAction::Dispatch)
            .then_state(|state| assert!(!state.dispatched))
            .run();
    }

    #[test]
    fn test_acknowledgment_is_counted() {
        ReducerTest::new(AckReducer)
            .with_env(ENV)
            .given_state(AckState {
                dispatched: true,
                acknowledgments: 0,
            })
            .when_action(AckAction::Acknowledged)
            .then_state(|state| assert_eq!(state.acknowledgments, 1))
            .then_effects(|effects| {
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn test_empty_effects_count_as_none() {
        assertions::assert_no_effects::<AckAction>(&[]);
        assertions::assert_effects_count::<AckAction>(&[Effect::None, Effect::None], 2);
    }
}
