//! Error types for the comment tree

use thiserror::Error;

use crate::models::CommentId;

/// Errors raised by [`CommentForest`](crate::tree::CommentForest) operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThreadError {
    /// The operation referenced a comment that is not in the forest
    #[error("Comment not found: {0}")]
    NotFound(CommentId),

    /// A comment's declared parent is still missing
    #[error("Parent {parent} of comment {id} is not loaded")]
    OrphanUnresolved {
        /// The orphaned comment
        id: CommentId,
        /// Its declared parent
        parent: CommentId,
    },

    /// Two comments in one batch share an ID
    #[error("Duplicate comment ID: {0}")]
    DuplicateIdentifier(CommentId),
}

/// Result type alias for tree operations
pub type Result<T> = std::result::Result<T, ThreadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ThreadError::NotFound(CommentId(42));
        assert_eq!(err.to_string(), "Comment not found: 42");

        let err = ThreadError::OrphanUnresolved {
            id: CommentId(1),
            parent: CommentId(99),
        };
        assert_eq!(err.to_string(), "Parent 99 of comment 1 is not loaded");
    }

    #[test]
    fn test_into_anyhow() {
        fn fails() -> anyhow::Result<()> {
            let result: Result<()> = Err(ThreadError::DuplicateIdentifier(CommentId(3)));
            result?;
            Ok(())
        }

        let err = fails().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ThreadError>(),
            Some(ThreadError::DuplicateIdentifier(CommentId(3)))
        ));
    }
}
