//! State machine trait for status enums.
//!
//! Provides a consistent interface for validating and performing state
//! transitions on lifecycle statuses such as the conversation status.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for ConversationStatus {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!(
///             (self, target),
///             (Running, Completed) | (Running, Cancelled)
///         )
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Running => vec![Completed, Cancelled],
///             Completed | Cancelled => vec![],
///         }
///     }
/// }
///
/// // Usage:
/// let new_status = current_status.transition_to(ConversationStatus::Completed)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    ///
    /// This is the preferred way to change state, as it ensures
    /// the transition is valid according to the state machine rules.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test enum modeling a connection lifecycle
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum LinkStatus {
        Connecting,
        Online,
        Reconnecting,
        Closed,
    }

    impl StateMachine for LinkStatus {
        fn can_transition_to(&self, target: &Self) -> bool {
            use LinkStatus::*;
            matches!(
                (self, target),
                (Connecting, Online)
                    | (Connecting, Closed)
                    | (Online, Reconnecting)
                    | (Online, Closed)
                    | (Reconnecting, Online)
                    | (Reconnecting, Closed)
            )
        }

        fn valid_transitions(&self) -> Vec<Self> {
            use LinkStatus::*;
            match self {
                Connecting => vec![Online, Closed],
                Online => vec![Reconnecting, Closed],
                Reconnecting => vec![Online, Closed],
                Closed => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_transition() {
        let status = LinkStatus::Connecting;
        let result = status.transition_to(LinkStatus::Online);
        assert_eq!(result, Ok(LinkStatus::Online));
    }

    #[test]
    fn transition_to_fails_for_invalid_transition() {
        let status = LinkStatus::Closed;
        let result = status.transition_to(LinkStatus::Online);
        assert!(result.is_err());
    }

    #[test]
    fn is_terminal_identifies_closed_as_terminal() {
        assert!(LinkStatus::Closed.is_terminal());
        assert!(!LinkStatus::Connecting.is_terminal());
        assert!(!LinkStatus::Online.is_terminal());
        assert!(!LinkStatus::Reconnecting.is_terminal());
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for status in [
            LinkStatus::Connecting,
            LinkStatus::Online,
            LinkStatus::Reconnecting,
            LinkStatus::Closed,
        ] {
            for valid_target in status.valid_transitions() {
                assert!(
                    status.can_transition_to(&valid_target),
                    "can_transition_to should return true for {:?} -> {:?}",
                    status,
                    valid_target
                );
            }
        }
    }
}
