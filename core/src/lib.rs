//! # Widget Core
//!
//! Core traits and types for building UI widgets on the Reducer pattern.
//!
//! A widget is described by four pieces:
//!
//! - **State**: everything the widget renders from
//! - **Action**: every input the widget reacts to (user intents and the facts they produce)
//! - **Reducer**: function `(State, Action, Environment) → State`, applied in place
//! - **Environment**: injected dependencies (clock, id generation)
//!
//! The runtime (`widget-runtime`) owns the state, feeds actions through the
//! reducer one at a time and notifies observers (renderers) after every
//! change.
//!
//! ## Example
//!
//! ```
//! use widget_core::reducer::Reducer;
//!
//! #[derive(Clone, Debug, Default)]
//! struct ToggleState {
//!     on: bool,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum ToggleAction {
//!     Flip,
//! }
//!
//! struct ToggleReducer;
//!
//! impl Reducer for ToggleReducer {
//!     type State = ToggleState;
//!     type Action = ToggleAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut ToggleState, action: ToggleAction, _env: &()) {
//!         match action {
//!             ToggleAction::Flip => state.on = !state.on,
//!         }
//!     }
//! }
//!
//! let mut state = ToggleState::default();
//! ToggleReducer.reduce(&mut state, ToggleAction::Flip, &());
//! assert!(state.on);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};

/// Reducer module - The core trait for widget logic
///
/// Reducers hold every rule about how a widget's state may change. They do
/// no I/O and are deterministic given their environment.
pub mod reducer {
    /// The Reducer trait - core abstraction for widget logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The widget state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Apply an action to state
        ///
        /// Validates the action and updates state in place. An action the
        /// reducer rejects leaves state untouched.
        fn reduce(&self, state: &mut Self::State, action: Self::Action, env: &Self::Environment);
    }
}

/// Environment module - Dependency injection traits
///
/// Everything a reducer needs from the outside world (time, fresh
/// identifiers) comes through these traits so tests can substitute
/// deterministic implementations.
pub mod environment {
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock backed by [`Utc::now`]
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Source of fresh identifiers for newly created entities
    pub trait IdGenerator: Send + Sync {
        /// Produce an identifier not handed out before
        fn next_id(&self) -> Uuid;
    }

    /// Random (v4) UUID generator used in production
    #[derive(Debug, Clone, Copy, Default)]
    pub struct RandomIdGenerator;

    impl IdGenerator for RandomIdGenerator {
        fn next_id(&self) -> Uuid {
            Uuid::new_v4()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::environment::{Clock, IdGenerator, RandomIdGenerator, SystemClock};
    use super::reducer::Reducer;

    struct Append;

    impl Reducer for Append {
        type State = Vec<&'static str>;
        type Action = &'static str;
        type Environment = ();

        fn reduce(&self, state: &mut Self::State, action: Self::Action, _env: &()) {
            if !action.is_empty() {
                state.push(action);
            }
        }
    }

    #[test]
    fn reducer_applies_in_place_and_rejects_without_change() {
        let mut state = Vec::new();
        Append.reduce(&mut state, "Walk the dog", &());
        Append.reduce(&mut state, "", &());
        assert_eq!(state, vec!["Walk the dog"]);
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn random_ids_are_distinct() {
        let ids = RandomIdGenerator;
        assert_ne!(ids.next_id(), ids.next_id());
    }
}
