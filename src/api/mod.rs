//! Collaborators that feed the comment tree and publish votes

pub mod lemmy;

use anyhow::Result;

use crate::models::{Comment, CommentId, CommentSort, VoteState};

/// Supplies flat pages of comments
#[allow(async_fn_in_trait)]
pub trait CommentSource {
    /// Get the comments of a post
    async fn fetch_comments(&self, post_id: i64, sort: CommentSort) -> Result<Vec<Comment>>;

    /// Get the replies below `parent_id` (may include the parent itself)
    async fn fetch_replies(
        &self,
        post_id: i64,
        parent_id: CommentId,
        sort: CommentSort,
    ) -> Result<Vec<Comment>>;
}

/// Publishes the viewer's votes to the server
#[allow(async_fn_in_trait)]
pub trait VoteSubmitter {
    /// Send the vote; an error means the server did not record it
    async fn submit_vote(&self, id: CommentId, vote: VoteState) -> Result<()>;
}

impl<T: CommentSource> CommentSource for &T {
    async fn fetch_comments(&self, post_id: i64, sort: CommentSort) -> Result<Vec<Comment>> {
        (**self).fetch_comments(post_id, sort).await
    }

    async fn fetch_replies(
        &self,
        post_id: i64,
        parent_id: CommentId,
        sort: CommentSort,
    ) -> Result<Vec<Comment>> {
        (**self).fetch_replies(post_id, parent_id, sort).await
    }
}
