//! A thread view session: fetch, link, collapse and vote

use anyhow::{Context, Result};

use crate::api::{CommentSource, VoteSubmitter};
use crate::models::{CommentId, CommentSort, VoteState};
use crate::tree::{CommentForest, VisibleIter};

/// Owns the forest of one open thread and the source it is loaded from
pub struct ThreadSession<S> {
    source: S,
    post_id: i64,
    sort: CommentSort,
    forest: CommentForest,
}

impl<S: CommentSource> ThreadSession<S> {
    /// Fetch the first page of a post's comments and build the forest
    pub async fn open(source: S, post_id: i64, sort: CommentSort) -> Result<Self> {
        let comments = source
            .fetch_comments(post_id, sort)
            .await
            .with_context(|| format!("Failed to load comments for post {post_id}"))?;

        let mut forest = CommentForest::build(comments)?;
        forest.sort(sort);

        let orphans = forest.orphans();
        if !orphans.is_empty() {
            tracing::debug!("Post {} opened with orphans {:?}", post_id, orphans);
        }

        Ok(Self {
            source,
            post_id,
            sort,
            forest,
        })
    }

    /// Fetch more replies under `parent_id` and link them in.
    ///
    /// Returns the replies that are still orphaned after retrying every
    /// pending orphan.
    pub async fn load_more(&mut self, parent_id: CommentId) -> Result<Vec<CommentId>> {
        let replies = self
            .source
            .fetch_replies(self.post_id, parent_id, self.sort)
            .await
            .with_context(|| format!("Failed to load replies to comment {parent_id}"))?;

        let orphans = self.forest.insert_replies(parent_id, replies)?;
        let relinked = self.forest.relink_orphans();

        Ok(orphans
            .into_iter()
            .filter(|id| !relinked.contains(id))
            .collect())
    }
}

impl<S> ThreadSession<S> {
    /// Record a vote locally, then submit it. If the submission fails the
    /// previous vote is restored and the error returned.
    pub async fn vote<V: VoteSubmitter>(
        &mut self,
        submitter: &V,
        id: CommentId,
        vote: VoteState,
    ) -> Result<VoteState> {
        let prior = self.forest.set_vote(id, vote)?;

        if let Err(e) = submitter.submit_vote(id, vote).await {
            tracing::warn!("Vote on {} failed, reverting to {}: {}", id, prior, e);
            self.forest.set_vote(id, prior)?;
            return Err(e.context(format!("Failed to vote on comment {id}")));
        }

        Ok(prior)
    }

    /// Press an arrow: applies the same vote again to clear it
    pub async fn press_vote<V: VoteSubmitter>(
        &mut self,
        submitter: &V,
        id: CommentId,
        arrow: VoteState,
    ) -> Result<VoteState> {
        let next = self.forest.node(id)?.vote().toggled(arrow);
        self.vote(submitter, id, next).await
    }

    /// Flip collapse on one comment
    pub fn toggle_collapsed(&mut self, id: CommentId) -> Result<bool> {
        Ok(self.forest.toggle_collapsed(id)?)
    }

    /// Change the sort order of the loaded thread
    pub fn resort(&mut self, sort: CommentSort) {
        self.sort = sort;
        self.forest.sort(sort);
    }

    /// Rows to render
    pub fn visible(&self) -> VisibleIter<'_> {
        self.forest.visible_sequence()
    }

    /// The comment forest
    pub const fn forest(&self) -> &CommentForest {
        &self.forest
    }

    /// Post this session shows
    pub const fn post_id(&self) -> i64 {
        self.post_id
    }

    /// Current sort order
    pub const fn sort(&self) -> CommentSort {
        self.sort
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Comment;
    use std::cell::RefCell;

    struct FakeSource {
        first_page: Vec<Comment>,
        replies: Vec<Comment>,
    }

    impl CommentSource for FakeSource {
        async fn fetch_comments(&self, _post_id: i64, _sort: CommentSort) -> Result<Vec<Comment>> {
            Ok(self.first_page.clone())
        }

        async fn fetch_replies(
            &self,
            _post_id: i64,
            _parent_id: CommentId,
            _sort: CommentSort,
        ) -> Result<Vec<Comment>> {
            Ok(self.replies.clone())
        }
    }

    #[derive(Default)]
    struct FakeSubmitter {
        fail: bool,
        sent: RefCell<Vec<(CommentId, VoteState)>>,
    }

    impl VoteSubmitter for FakeSubmitter {
        async fn submit_vote(&self, id: CommentId, vote: VoteState) -> Result<()> {
            self.sent.borrow_mut().push((id, vote));
            if self.fail {
                anyhow::bail!("server unavailable");
            }
            Ok(())
        }
    }

    fn source() -> FakeSource {
        let t = chrono::Utc::now();
        FakeSource {
            first_page: vec![
                Comment::new(1, None).with_published(t),
                Comment::reply(2, 1).with_published(t),
                Comment::reply(4, 3).with_published(t),
            ],
            replies: vec![
                Comment::reply(2, 1).with_published(t).with_content("edited"),
                Comment::reply(3, 2).with_published(t),
            ],
        }
    }

    fn visible<S>(session: &ThreadSession<S>) -> Vec<(i64, usize)> {
        session
            .visible()
            .map(|(node, depth)| (node.id().0, depth))
            .collect()
    }

    #[test]
    fn test_open_and_load_more_relinks() {
        tokio_test::block_on(async {
            let mut session = ThreadSession::open(source(), 7, CommentSort::Old)
                .await
                .unwrap();
            assert_eq!(session.forest().orphans(), vec![CommentId(4)]);

            let still_orphaned = session.load_more(CommentId(2)).await.unwrap();
            assert!(still_orphaned.is_empty());
            assert!(session.forest().orphans().is_empty());
            assert_eq!(visible(&session), vec![(1, 0), (2, 1), (3, 2), (4, 3)]);
            assert_eq!(
                session.forest().get(CommentId(2)).unwrap().comment().content,
                "edited"
            );
        });
    }

    #[test]
    fn test_vote_success() {
        tokio_test::block_on(async {
            let mut session = ThreadSession::open(source(), 7, CommentSort::Hot)
                .await
                .unwrap();
            let submitter = FakeSubmitter::default();

            let prior = session
                .vote(&submitter, CommentId(1), VoteState::Upvoted)
                .await
                .unwrap();
            assert_eq!(prior, VoteState::NoVote);
            assert_eq!(
                session.forest().get(CommentId(1)).unwrap().vote(),
                VoteState::Upvoted
            );
            assert_eq!(
                *submitter.sent.borrow(),
                vec![(CommentId(1), VoteState::Upvoted)]
            );
        });
    }

    #[test]
    fn test_vote_failure_reverts() {
        tokio_test::block_on(async {
            let mut session = ThreadSession::open(source(), 7, CommentSort::Hot)
                .await
                .unwrap();
            let ok = FakeSubmitter::default();
            session
                .vote(&ok, CommentId(2), VoteState::Downvoted)
                .await
                .unwrap();

            let failing = FakeSubmitter {
                fail: true,
                ..Default::default()
            };
            let result = session
                .vote(&failing, CommentId(2), VoteState::Upvoted)
                .await;
            assert!(result.is_err());
            assert_eq!(
                session.forest().get(CommentId(2)).unwrap().vote(),
                VoteState::Downvoted
            );
        });
    }

    #[test]
    fn test_press_vote_clears() {
        tokio_test::block_on(async {
            let mut session = ThreadSession::open(source(), 7, CommentSort::Hot)
                .await
                .unwrap();
            let submitter = FakeSubmitter::default();

            session
                .press_vote(&submitter, CommentId(1), VoteState::Upvoted)
                .await
                .unwrap();
            session
                .press_vote(&submitter, CommentId(1), VoteState::Upvoted)
                .await
                .unwrap();
            assert_eq!(
                session.forest().get(CommentId(1)).unwrap().vote(),
                VoteState::NoVote
            );
        });
    }

    #[test]
    fn test_vote_unknown_comment() {
        tokio_test::block_on(async {
            let mut session = ThreadSession::open(source(), 7, CommentSort::Hot)
                .await
                .unwrap();
            let submitter = FakeSubmitter::default();
            let result = session
                .vote(&submitter, CommentId(99), VoteState::Upvoted)
                .await;
            assert!(result.is_err());
            assert!(submitter.sent.borrow().is_empty());
        });
    }

    #[test]
    fn test_toggle_collapsed_hides_replies() {
        tokio_test::block_on(async {
            let mut session = ThreadSession::open(source(), 7, CommentSort::Old)
                .await
                .unwrap();
            assert!(session.toggle_collapsed(CommentId(1)).unwrap());
            assert_eq!(visible(&session), vec![(1, 0), (4, 0)]);
        });
    }
}
