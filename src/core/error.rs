//! Errors raised by state tree mutation and lookup.

use super::id::StateId;
use thiserror::Error;

/// Broad classification of a [`StateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A blank identifier was supplied.
    InvalidIdentifier,
    /// The requested change would break the tree shape.
    StructuralConflict,
    /// A referenced child does not exist, or a transition is degenerate.
    MissingEntity,
    /// The change would break the default-child invariant.
    InvariantViolation,
}

/// Errors that can occur when building or mutating a state tree.
///
/// Every error is raised by the call that violates the contract. Apart from
/// `add_children`, a failing call leaves the tree untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("{what} identifier must not be blank")]
    BlankIdentifier { what: &'static str },

    #[error("state '{id}' cannot be its own child")]
    SelfParenting { id: StateId },

    #[error("state '{child}' is already a child of '{parent}'")]
    AlreadyParented { child: StateId, parent: StateId },

    #[error("adding '{child}' under '{parent}' would create a cycle")]
    Cycle { child: StateId, parent: StateId },

    #[error("state '{parent}' already has a child '{child}'")]
    DuplicateChild { child: StateId, parent: StateId },

    #[error("state '{parent}' has no child '{child}'")]
    ChildNotFound { child: String, parent: StateId },

    #[error("transition from '{id}' to itself is not allowed")]
    SelfTransition { id: StateId },

    #[error("cannot remove default child '{child}' of '{parent}' while siblings remain")]
    DefaultChildRemoval { child: StateId, parent: StateId },
}

impl StateError {
    /// Returns the taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StateError::BlankIdentifier { .. } => ErrorKind::InvalidIdentifier,
            StateError::SelfParenting { .. } => ErrorKind::StructuralConflict,
            StateError::AlreadyParented { .. } => ErrorKind::StructuralConflict,
            StateError::Cycle { .. } => ErrorKind::StructuralConflict,
            StateError::DuplicateChild { .. } => ErrorKind::StructuralConflict,
            StateError::ChildNotFound { .. } => ErrorKind::MissingEntity,
            StateError::SelfTransition { .. } => ErrorKind::MissingEntity,
            StateError::DefaultChildRemoval { .. } => ErrorKind::InvariantViolation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> StateId {
        StateId::new(s).unwrap()
    }

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            StateError::BlankIdentifier { what: "state" }.kind(),
            ErrorKind::InvalidIdentifier
        );
        assert_eq!(
            StateError::Cycle {
                child: id("a"),
                parent: id("b"),
            }
            .kind(),
            ErrorKind::StructuralConflict
        );
        assert_eq!(
            StateError::SelfTransition { id: id("a") }.kind(),
            ErrorKind::MissingEntity
        );
        assert_eq!(
            StateError::DefaultChildRemoval {
                child: id("a"),
                parent: id("root"),
            }
            .kind(),
            ErrorKind::InvariantViolation
        );
    }

    #[test]
    fn messages_name_the_states() {
        let err = StateError::ChildNotFound {
            child: "missing".to_string(),
            parent: id("root"),
        };
        assert_eq!(err.to_string(), "state 'root' has no child 'missing'");
    }
}
