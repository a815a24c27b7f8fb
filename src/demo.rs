//! Offline demo thread
//!
//! Serves a fixed thread the way a Lemmy instance would: the first page
//! only reaches two levels deep, deeper replies come from
//! [`CommentSource::fetch_replies`].

use std::collections::HashMap;

use anyhow::Result;
use chrono::{Duration, Utc};

use crate::api::{CommentSource, VoteSubmitter};
use crate::models::{Comment, CommentId, CommentSort, VoteState};

/// Post ID of the demo thread
pub const DEMO_POST_ID: i64 = 1;

/// Depth served by the first page (0 = top level only)
const FIRST_PAGE_DEPTH: usize = 1;

/// In-memory comment source and vote sink
pub struct DemoSource {
    comments: Vec<Comment>,
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoSource {
    /// Create the demo source
    pub fn new() -> Self {
        Self { comments: thread() }
    }

    fn depth_of(&self, id: CommentId) -> usize {
        let parents: HashMap<CommentId, Option<CommentId>> = self
            .comments
            .iter()
            .map(|c| (c.id, c.parent_id))
            .collect();

        let mut depth = 0;
        let mut current = parents.get(&id).copied().flatten();
        while let Some(parent) = current {
            depth += 1;
            current = parents.get(&parent).copied().flatten();
        }
        depth
    }

    fn is_below(&self, id: CommentId, ancestor: CommentId) -> bool {
        let mut current = self
            .comments
            .iter()
            .find(|c| c.id == id)
            .and_then(|c| c.parent_id);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self
                .comments
                .iter()
                .find(|c| c.id == parent)
                .and_then(|c| c.parent_id);
        }
        false
    }
}

impl CommentSource for DemoSource {
    async fn fetch_comments(&self, post_id: i64, _sort: CommentSort) -> Result<Vec<Comment>> {
        if post_id != DEMO_POST_ID {
            anyhow::bail!("Demo only has post {DEMO_POST_ID}");
        }
        Ok(self
            .comments
            .iter()
            .filter(|c| self.depth_of(c.id) <= FIRST_PAGE_DEPTH)
            .cloned()
            .collect())
    }

    async fn fetch_replies(
        &self,
        _post_id: i64,
        parent_id: CommentId,
        _sort: CommentSort,
    ) -> Result<Vec<Comment>> {
        Ok(self
            .comments
            .iter()
            .filter(|c| c.id == parent_id || self.is_below(c.id, parent_id))
            .cloned()
            .collect())
    }
}

impl VoteSubmitter for DemoSource {
    async fn submit_vote(&self, id: CommentId, vote: VoteState) -> Result<()> {
        tracing::info!("Demo vote on {}: {}", id, vote);
        Ok(())
    }
}

/// The demo thread as a flat list
pub fn thread() -> Vec<Comment> {
    let now = Utc::now();
    let ago = |minutes: i64| now - Duration::minutes(minutes);

    let mut comments = vec![
        Comment::new(1, None)
            .with_creator("ferris")
            .with_content("Has anyone tried running their own instance on a Raspberry Pi?")
            .with_published(ago(300))
            .with_votes(42, 3),
        Comment::reply(2, 1)
            .with_creator("bramble")
            .with_content("Yes, a Pi 4 with 4GB handles a small instance fine. Federation traffic is the bottleneck, not CPU.")
            .with_published(ago(280))
            .with_votes(18, 0),
        Comment::reply(3, 2)
            .with_creator("ferris")
            .with_content("How much storage does the pictrs cache eat after a month?")
            .with_published(ago(250))
            .with_votes(6, 0),
        Comment::reply(4, 3)
            .with_creator("bramble")
            .with_content("About 20GB for me, but I purge remote images weekly.")
            .with_published(ago(240))
            .with_votes(9, 1),
        Comment::reply(5, 1)
            .with_creator("wren")
            .with_content("SD cards will die under Postgres write load. Use an SSD over USB.")
            .with_published(ago(200))
            .with_votes(31, 2),
        Comment::new(6, None)
            .with_creator("kestrel")
            .with_content("Unpopular opinion: single-user instances are bad for the fediverse.")
            .with_published(ago(120))
            .with_votes(14, 19),
        Comment::reply(7, 6)
            .with_creator("wren")
            .with_content("They are cheap to federate with, what is the actual harm?")
            .with_published(ago(90))
            .with_votes(11, 2),
        Comment::reply(8, 7)
            .with_creator("kestrel")
            .with_content("Moderation. Nobody reviews reports on a one-person server.")
            .with_published(ago(60))
            .with_votes(4, 4),
    ];

    for comment in &mut comments {
        comment.post_id = DEMO_POST_ID;
    }
    comments[4].my_vote = VoteState::Upvoted;
    comments[1].child_count = 2;
    comments[0].child_count = 4;
    comments[5].child_count = 2;
    comments[6].child_count = 1;
    comments[2].child_count = 1;

    comments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ThreadSession;

    #[test]
    fn test_first_page_is_shallow() {
        let source = DemoSource::new();
        let page = tokio_test::block_on(source.fetch_comments(DEMO_POST_ID, CommentSort::Hot))
            .unwrap();
        let ids: Vec<i64> = page.iter().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![1, 2, 5, 6, 7]);
    }

    #[test]
    fn test_demo_session_loads_everything() {
        tokio_test::block_on(async {
            let source = DemoSource::new();
            let mut session = ThreadSession::open(&source, DEMO_POST_ID, CommentSort::Old)
                .await
                .unwrap();
            assert_eq!(session.forest().len(), 5);
            assert_eq!(session.forest().unloaded_replies(CommentId(2)).unwrap(), 2);

            let orphans = session.load_more(CommentId(2)).await.unwrap();
            assert!(orphans.is_empty());
            session.load_more(CommentId(7)).await.unwrap();

            assert_eq!(session.forest().len(), 8);
            assert_eq!(session.forest().unloaded_replies(CommentId(1)).unwrap(), 0);
            assert_eq!(
                session.forest().find_path(CommentId(4)).unwrap(),
                vec![CommentId(1), CommentId(2), CommentId(3), CommentId(4)]
            );
        });
    }
}
