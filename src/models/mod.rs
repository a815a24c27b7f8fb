//! Data models for Nestling

mod comment;
mod sort;
mod vote;

pub use comment::{Comment, CommentId};
pub use sort::CommentSort;
pub use vote::VoteState;
