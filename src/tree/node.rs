//! A single node in the comment arena

use crate::models::{Comment, CommentId, VoteState};

/// One comment plus its thread state.
///
/// Children and parent are stored as IDs into the owning
/// [`CommentForest`](super::CommentForest); a node never owns another node.
#[derive(Debug, Clone)]
pub struct CommentNode {
    pub(super) comment: Comment,
    pub(super) parent: Option<CommentId>,
    pub(super) children: Vec<CommentId>,
    pub(super) collapsed: bool,
    pub(super) vote: VoteState,
    pub(super) orphan: bool,
    pub(super) seq: u64,
}

impl CommentNode {
    pub(super) fn new(comment: Comment, seq: u64) -> Self {
        let vote = comment.my_vote;
        Self {
            comment,
            parent: None,
            children: Vec::new(),
            collapsed: false,
            vote,
            orphan: false,
            seq,
        }
    }

    /// Comment ID
    pub const fn id(&self) -> CommentId {
        self.comment.id
    }

    /// The wrapped comment
    pub const fn comment(&self) -> &Comment {
        &self.comment
    }

    /// Parent this node is actually linked under (None at top level)
    pub const fn parent(&self) -> Option<CommentId> {
        self.parent
    }

    /// Children in display order
    pub fn children(&self) -> &[CommentId] {
        &self.children
    }

    /// Whether this node hides its descendants
    pub const fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// The viewer's current vote
    pub const fn vote(&self) -> VoteState {
        self.vote
    }

    /// Whether this node sits at top level only because its parent is missing
    pub const fn is_orphan(&self) -> bool {
        self.orphan
    }

    /// Whether this node has no loaded children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
