//! Comment payload as delivered by the comment source

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::VoteState;

/// Identifier of a comment (Lemmy uses integer ids)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub i64);

impl From<i64> for CommentId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single comment. The tree only reads `id`, `parent_id`, `published`
/// and `my_vote`; everything else is carried for the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment ID
    pub id: CommentId,
    /// Declared parent (None for top-level comments)
    pub parent_id: Option<CommentId>,
    /// Post this comment belongs to
    pub post_id: i64,
    /// Author name
    pub creator_name: String,
    /// Author actor ID (e.g., https://lemmy.ml/u/someone)
    pub creator_actor_id: String,
    /// Comment body (markdown)
    pub content: String,
    /// When the comment was created
    pub published: DateTime<Utc>,
    /// Net score
    pub score: i64,
    /// Upvote count
    pub upvotes: i64,
    /// Downvote count
    pub downvotes: i64,
    /// Number of replies known to the server
    pub child_count: u32,
    /// Deleted by its author
    pub deleted: bool,
    /// Removed by a moderator
    pub removed: bool,
    /// The viewer's vote as reported by the server
    pub my_vote: VoteState,
}

impl Comment {
    /// Create a comment with empty content
    pub fn new(id: i64, parent_id: Option<CommentId>) -> Self {
        Self {
            id: CommentId(id),
            parent_id,
            post_id: 0,
            creator_name: String::new(),
            creator_actor_id: String::new(),
            content: String::new(),
            published: Utc::now(),
            score: 0,
            upvotes: 0,
            downvotes: 0,
            child_count: 0,
            deleted: false,
            removed: false,
            my_vote: VoteState::NoVote,
        }
    }

    /// Create a reply to `parent`
    pub fn reply(id: i64, parent: i64) -> Self {
        Self::new(id, Some(CommentId(parent)))
    }

    /// Set the body
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the author name
    pub fn with_creator(mut self, name: impl Into<String>) -> Self {
        self.creator_name = name.into();
        self
    }

    /// Set the creation time
    pub fn with_published(mut self, published: DateTime<Utc>) -> Self {
        self.published = published;
        self
    }

    /// Set the vote counters; the score is derived from them
    pub fn with_votes(mut self, upvotes: i64, downvotes: i64) -> Self {
        self.upvotes = upvotes;
        self.downvotes = downvotes;
        self.score = upvotes - downvotes;
        self
    }

    /// Derive the parent from a Lemmy materialized path such as `0.12.34`.
    ///
    /// The last segment is the comment itself and the one before it is the
    /// parent. `0` marks the root, so `0.34` is a top-level comment.
    pub fn parent_from_path(path: &str) -> Option<CommentId> {
        let mut segments = path.rsplit('.');
        segments.next()?;
        let parent: i64 = segments.next()?.parse().ok()?;
        (parent != 0).then_some(CommentId(parent))
    }

    /// Whether the body should be hidden from readers
    pub const fn is_gone(&self) -> bool {
        self.deleted || self.removed
    }

    /// Get a short preview of the content (for list display)
    pub fn preview(&self, max_len: usize) -> String {
        let content = self.content.replace('\n', " ");
        if content.chars().count() <= max_len {
            content
        } else {
            let cut: String = content.chars().take(max_len.saturating_sub(3)).collect();
            format!("{cut}...")
        }
    }

    /// Get relative time string (e.g., "5m", "2h", "3d")
    pub fn relative_time(&self) -> String {
        let now = Utc::now();
        let duration = now.signed_duration_since(self.published);

        if duration.num_seconds() < 60 {
            format!("{}s", duration.num_seconds().max(0))
        } else if duration.num_minutes() < 60 {
            format!("{}m", duration.num_minutes())
        } else if duration.num_hours() < 24 {
            format!("{}h", duration.num_hours())
        } else if duration.num_days() < 7 {
            format!("{}d", duration.num_days())
        } else {
            self.published.format("%b %d").to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_from_path() {
        assert_eq!(Comment::parent_from_path("0.34"), None);
        assert_eq!(Comment::parent_from_path("0.12.34"), Some(CommentId(12)));
        assert_eq!(Comment::parent_from_path("0.1.12.34"), Some(CommentId(12)));
        assert_eq!(Comment::parent_from_path("34"), None);
        assert_eq!(Comment::parent_from_path("0.x.34"), None);
    }

    #[test]
    fn test_with_votes_sets_score() {
        let comment = Comment::new(1, None).with_votes(10, 3);
        assert_eq!(comment.score, 7);
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let comment = Comment::new(1, None).with_content("héllo wörld, this is long");
        let preview = comment.preview(10);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 10);
    }
}
