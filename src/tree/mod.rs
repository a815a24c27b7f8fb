//! In-memory comment thread model
//!
//! Comments arrive as flat, parent-referencing pages. [`CommentForest`]
//! links them into an arena of [`CommentNode`]s addressed by
//! [`CommentId`](crate::models::CommentId), tracks collapse and vote state,
//! and flattens the result with [`CommentForest::visible_sequence`].

mod forest;
mod node;
mod order;
mod visible;

pub use forest::CommentForest;
pub use node::CommentNode;
pub use order::{controversy_rank, hot_rank};
pub use visible::VisibleIter;
