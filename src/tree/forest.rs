//! The comment forest: arena of nodes plus the ordered top level

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use super::order::sort_ids;
use super::{CommentNode, VisibleIter};
use crate::error::{Result, ThreadError};
use crate::models::{Comment, CommentId, CommentSort, VoteState};

/// All comments of one thread view.
///
/// Every ID appears exactly once, each child is linked under the node whose
/// ID it declares as parent, and links never form a cycle. Comments whose
/// parent is not loaded yet live at top level flagged as orphans until
/// [`relink_orphans`](Self::relink_orphans) finds their parent.
#[derive(Debug, Clone, Default)]
pub struct CommentForest {
    pub(super) nodes: HashMap<CommentId, CommentNode>,
    pub(super) roots: Vec<CommentId>,
    next_seq: u64,
}

impl CommentForest {
    /// Create an empty forest
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a forest from a flat list of comments in any order.
    ///
    /// Comments are linked in `published` order, ties keeping input order.
    /// A repeated ID fails the whole build.
    pub fn build(comments: impl IntoIterator<Item = Comment>) -> Result<Self> {
        let mut forest = Self::new();
        let ids = forest.index_batch(comments.into_iter().collect())?;

        let mut orphans = 0usize;
        for id in ids {
            if !forest.link(id) {
                orphans += 1;
            }
        }

        tracing::debug!(
            "Built comment forest: {} comments, {} top-level, {} orphans",
            forest.len(),
            forest.roots.len(),
            orphans
        );

        Ok(forest)
    }

    /// Add a page of replies fetched for `parent_id`.
    ///
    /// Each reply links to its declared parent, which may be `parent_id`,
    /// another reply in the batch or any loaded comment. Replies without a
    /// declared parent go under `parent_id`. If `parent_id` itself is not
    /// loaded, every new reply is put at top level as an orphan.
    ///
    /// Replies that are already loaded (including `parent_id` itself, which
    /// Lemmy returns with its subtree) only refresh the stored comment; the
    /// node keeps its place, collapse flag and vote. Returns the IDs of the
    /// replies left as orphans.
    pub fn insert_replies(
        &mut self,
        parent_id: CommentId,
        comments: impl IntoIterator<Item = Comment>,
    ) -> Result<Vec<CommentId>> {
        let batch: Vec<Comment> = comments.into_iter().collect();

        let mut seen = HashSet::with_capacity(batch.len());
        if let Some(dup) = batch.iter().find(|c| !seen.insert(c.id)) {
            return Err(ThreadError::DuplicateIdentifier(dup.id));
        }

        let mut fresh = Vec::with_capacity(batch.len());
        for mut comment in batch {
            match self.nodes.get_mut(&comment.id) {
                Some(node) => {
                    // Links are fixed once loaded, so keep the payload in step
                    comment.parent_id = node.comment.parent_id;
                    node.comment = comment;
                }
                None => {
                    if comment.parent_id.is_none() && comment.id != parent_id {
                        comment.parent_id = Some(parent_id);
                    }
                    fresh.push(comment);
                }
            }
        }

        let parent_known = self.nodes.contains_key(&parent_id);
        let ids = self.index_batch(fresh)?;
        let mut orphans = Vec::new();

        for id in ids {
            let linked = if parent_known {
                self.link(id)
            } else {
                self.push_orphan(id);
                false
            };
            if !linked {
                orphans.push(id);
            }
        }

        if !orphans.is_empty() {
            tracing::debug!(
                "{} replies under {} could not be linked: {:?}",
                orphans.len(),
                parent_id,
                orphans
            );
        }

        Ok(orphans)
    }

    /// Re-link every orphan whose declared parent has been loaded since.
    /// Returns the IDs that moved under a parent.
    pub fn relink_orphans(&mut self) -> Vec<CommentId> {
        let candidates = self.orphans();
        let mut relinked = Vec::new();

        for id in candidates {
            if self.relink_orphan(id).is_ok() && self.nodes.get(&id).is_some_and(|n| !n.orphan) {
                relinked.push(id);
            }
        }

        if !relinked.is_empty() {
            tracing::debug!("Relinked {} orphaned comments", relinked.len());
        }

        relinked
    }

    /// Re-link a single orphan under its declared parent.
    ///
    /// A node that is not an orphan is left alone. Fails with
    /// [`ThreadError::OrphanUnresolved`] while the parent is still missing.
    pub fn relink_orphan(&mut self, id: CommentId) -> Result<()> {
        let node = self.node(id)?;
        if !node.orphan {
            return Ok(());
        }
        let Some(parent) = node.comment.parent_id else {
            // Genuinely top-level
            self.node_mut(id)?.orphan = false;
            return Ok(());
        };

        if !self.nodes.contains_key(&parent) || self.would_cycle(id, parent) {
            return Err(ThreadError::OrphanUnresolved { id, parent });
        }

        self.roots.retain(|root| *root != id);
        self.attach(parent, id);
        Ok(())
    }

    /// Set the collapse flag on exactly one node. Descendants keep their own flags.
    pub fn set_collapsed(&mut self, id: CommentId, collapsed: bool) -> Result<()> {
        self.node_mut(id)?.collapsed = collapsed;
        Ok(())
    }

    /// Flip the collapse flag and return the new value
    pub fn toggle_collapsed(&mut self, id: CommentId) -> Result<bool> {
        let collapsed = !self.node(id)?.collapsed;
        self.set_collapsed(id, collapsed)?;
        Ok(collapsed)
    }

    /// Record the viewer's vote, replacing whatever was there.
    ///
    /// Returns the previous vote so a failed submission can be reverted.
    /// Scores are not touched.
    pub fn set_vote(&mut self, id: CommentId, vote: VoteState) -> Result<VoteState> {
        let node = self.node_mut(id)?;
        Ok(std::mem::replace(&mut node.vote, vote))
    }

    /// Walk the visible comments in display order with their depth
    pub fn visible_sequence(&self) -> VisibleIter<'_> {
        VisibleIter::new(self)
    }

    /// IDs from the top-level ancestor down to `id`
    pub fn find_path(&self, id: CommentId) -> Result<Vec<CommentId>> {
        let mut path = vec![id];
        let mut current = self.node(id)?;

        while let Some(parent) = current.parent {
            path.push(parent);
            current = self.node(parent)?;
        }

        path.reverse();
        Ok(path)
    }

    /// Expand every collapsed ancestor of `id` so it shows up in
    /// [`visible_sequence`](Self::visible_sequence). The node's own flag is
    /// left as is. Returns the ancestors that were expanded.
    pub fn expand_to(&mut self, id: CommentId) -> Result<Vec<CommentId>> {
        let mut path = self.find_path(id)?;
        path.pop();

        let mut expanded = Vec::new();
        for ancestor in path {
            let node = self.node_mut(ancestor)?;
            if node.collapsed {
                node.collapsed = false;
                expanded.push(ancestor);
            }
        }
        Ok(expanded)
    }

    /// Number of loaded comments below `id`
    pub fn descendant_count(&self, id: CommentId) -> Result<usize> {
        let mut stack: Vec<CommentId> = self.node(id)?.children.clone();
        let mut count = 0;

        while let Some(next) = stack.pop() {
            count += 1;
            if let Some(node) = self.nodes.get(&next) {
                stack.extend(node.children.iter().copied());
            }
        }
        Ok(count)
    }

    /// Replies the server reports under `id` that have not been loaded yet
    pub fn unloaded_replies(&self, id: CommentId) -> Result<usize> {
        let expected = self.node(id)?.comment.child_count as usize;
        Ok(expected.saturating_sub(self.descendant_count(id)?))
    }

    /// Reorder the top level and every reply list
    pub fn sort(&mut self, sort: CommentSort) {
        self.sort_at(sort, Utc::now());
    }

    /// Reorder using `now` as the reference time for hot ranking
    pub fn sort_at(&mut self, sort: CommentSort, now: DateTime<Utc>) {
        let mut roots = std::mem::take(&mut self.roots);
        sort_ids(&mut roots, &self.nodes, sort, now);
        self.roots = roots;

        let parents: Vec<CommentId> = self
            .nodes
            .values()
            .filter(|node| node.children.len() > 1)
            .map(CommentNode::id)
            .collect();

        for id in parents {
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };
            let mut children = std::mem::take(&mut node.children);
            sort_ids(&mut children, &self.nodes, sort, now);
            if let Some(node) = self.nodes.get_mut(&id) {
                node.children = children;
            }
        }
    }

    /// Look up a node
    pub fn get(&self, id: CommentId) -> Option<&CommentNode> {
        self.nodes.get(&id)
    }

    /// Look up a node, failing with [`ThreadError::NotFound`]
    pub fn node(&self, id: CommentId) -> Result<&CommentNode> {
        self.nodes.get(&id).ok_or(ThreadError::NotFound(id))
    }

    /// Whether `id` is loaded
    pub fn contains(&self, id: CommentId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Top-level IDs in display order
    pub fn roots(&self) -> &[CommentId] {
        &self.roots
    }

    /// Child IDs of `id` in display order
    pub fn children(&self, id: CommentId) -> Result<&[CommentId]> {
        Ok(self.node(id)?.children())
    }

    /// Top-level nodes that are waiting for their parent, in display order
    pub fn orphans(&self) -> Vec<CommentId> {
        self.roots
            .iter()
            .copied()
            .filter(|id| self.nodes.get(id).is_some_and(|n| n.orphan))
            .collect()
    }

    /// Number of loaded comments
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no comments are loaded
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node_mut(&mut self, id: CommentId) -> Result<&mut CommentNode> {
        self.nodes.get_mut(&id).ok_or(ThreadError::NotFound(id))
    }

    /// Pass 1: create unlinked nodes in link order. Nothing is inserted if the
    /// batch repeats an ID or collides with a loaded comment.
    fn index_batch(&mut self, mut batch: Vec<Comment>) -> Result<Vec<CommentId>> {
        let mut seen = HashSet::with_capacity(batch.len());
        for comment in &batch {
            if self.nodes.contains_key(&comment.id) || !seen.insert(comment.id) {
                return Err(ThreadError::DuplicateIdentifier(comment.id));
            }
        }

        // Stable, so equal timestamps keep input order
        batch.sort_by_key(|c| c.published);

        let mut ids = Vec::with_capacity(batch.len());
        for comment in batch {
            let id = comment.id;
            let node = CommentNode::new(comment, self.next_seq);
            self.next_seq += 1;
            self.nodes.insert(id, node);
            ids.push(id);
        }
        Ok(ids)
    }

    /// Pass 2 for one node. Returns false if it ended up as an orphan.
    fn link(&mut self, id: CommentId) -> bool {
        let Some(declared) = self.nodes.get(&id).map(|n| n.comment.parent_id) else {
            return false;
        };

        match declared {
            None => {
                self.roots.push(id);
                true
            }
            Some(parent) if self.nodes.contains_key(&parent) => {
                if self.would_cycle(id, parent) {
                    tracing::warn!(
                        "Comment {} declares parent {} which would form a cycle",
                        id,
                        parent
                    );
                    self.push_orphan(id);
                    false
                } else {
                    self.attach(parent, id);
                    true
                }
            }
            Some(_) => {
                self.push_orphan(id);
                false
            }
        }
    }

    fn attach(&mut self, parent: CommentId, child: CommentId) {
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
            node.orphan = false;
        }
    }

    fn push_orphan(&mut self, id: CommentId) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.orphan = true;
            node.parent = None;
        }
        self.roots.push(id);
    }

    /// Whether linking `child` under `parent` would make `child` its own ancestor
    fn would_cycle(&self, child: CommentId, parent: CommentId) -> bool {
        let mut current = Some(parent);
        while let Some(id) = current {
            if id == child {
                return true;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }
}
