//! Error types for apidiff-core.

use std::fmt;

use thiserror::Error;

/// Result type alias for diff operations.
pub type Result<T> = std::result::Result<T, DiffError>;

/// Which of the two compared versions a problem was found in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Before,
    After,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Before => write!(f, "before"),
            Side::After => write!(f, "after"),
        }
    }
}

/// Broad classification of a [`DiffError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The supplied declaration tree is malformed.
    Input,
    /// A declaration shape the renderer cannot express.
    Rendering,
    /// The symbol index could not produce a declaration tree.
    Collaborator,
    Cancelled,
}

/// Errors raised while diffing a module.
///
/// Every variant except [`DiffError::Cancelled`] is scoped to a single
/// module; the orchestrator records it and carries on with the others.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiffError {
    /// Two siblings in one tree resolve to the same identity key.
    #[error("Duplicate identity {identity} in {side} tree")]
    DuplicateIdentity {
        /// The colliding identity key.
        identity: String,
        /// Tree in which the collision was found.
        side: Side,
    },

    /// A declaration the renderer does not know how to express.
    #[error("Unsupported declaration {identity}: {reason}")]
    Unsupported {
        /// Identity of the offending declaration.
        identity: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The symbol index failed to build a module's declaration tree.
    #[error("Symbol index failed for module {module}: {message}")]
    SymbolIndex {
        /// Module that could not be loaded.
        module: String,
        /// Description of the failure.
        message: String,
    },

    /// The run was cancelled before all modules were diffed.
    #[error("Diff run cancelled")]
    Cancelled,
}

impl DiffError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DiffError::DuplicateIdentity { .. } => ErrorKind::Input,
            DiffError::Unsupported { .. } => ErrorKind::Rendering,
            DiffError::SymbolIndex { .. } => ErrorKind::Collaborator,
            DiffError::Cancelled => ErrorKind::Cancelled,
        }
    }

    pub(crate) fn unsupported(identity: impl fmt::Display, reason: impl Into<String>) -> Self {
        DiffError::Unsupported {
            identity: identity.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DiffError::DuplicateIdentity {
            identity: "T:N.C".to_string(),
            side: Side::After,
        };
        assert_eq!(err.to_string(), "Duplicate identity T:N.C in after tree");

        let err = DiffError::SymbolIndex {
            module: "Broken.dll".to_string(),
            message: "missing reference".to_string(),
        };
        assert!(err.to_string().contains("Broken.dll"));
        assert!(err.to_string().contains("missing reference"));
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            DiffError::unsupported("M:N.C.op_Explicit", "no target").kind(),
            ErrorKind::Rendering
        );
        assert_eq!(DiffError::Cancelled.kind(), ErrorKind::Cancelled);
    }
}
