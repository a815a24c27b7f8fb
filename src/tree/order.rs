//! Sibling ordering for the different comment sorts

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::CommentNode;
use crate::models::{CommentId, CommentSort};

/// Lemmy's hot rank: `log10(max(1, score + 3)) / (hours + 2)^1.8`
pub fn hot_rank(score: i64, published: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let hours = (now - published).num_seconds().max(0) as f64 / 3600.0;
    (score as f64 + 3.0).max(1.0).log10() / (hours + 2.0).powf(1.8)
}

/// Lemmy's controversy rank: `(up + down)^(min / max)`, 0 when one side is empty
pub fn controversy_rank(upvotes: i64, downvotes: i64) -> f64 {
    if upvotes <= 0 || downvotes <= 0 {
        return 0.0;
    }
    let (lo, hi) = if upvotes < downvotes {
        (upvotes, downvotes)
    } else {
        (downvotes, upvotes)
    };
    ((upvotes + downvotes) as f64).powf(lo as f64 / hi as f64)
}

fn compare(a: &CommentNode, b: &CommentNode, sort: CommentSort, now: DateTime<Utc>) -> Ordering {
    let (ca, cb) = (&a.comment, &b.comment);
    let primary = match sort {
        CommentSort::Hot => {
            hot_rank(cb.score, cb.published, now).total_cmp(&hot_rank(ca.score, ca.published, now))
        }
        CommentSort::Top => cb.score.cmp(&ca.score),
        CommentSort::New => cb.published.cmp(&ca.published),
        CommentSort::Old => ca.published.cmp(&cb.published),
        CommentSort::Controversial => controversy_rank(cb.upvotes, cb.downvotes)
            .total_cmp(&controversy_rank(ca.upvotes, ca.downvotes)),
    };
    primary.then_with(|| a.seq.cmp(&b.seq))
}

/// Order `ids` in place; ties keep arrival order
pub(super) fn sort_ids(
    ids: &mut [CommentId],
    nodes: &HashMap<CommentId, CommentNode>,
    sort: CommentSort,
    now: DateTime<Utc>,
) {
    ids.sort_by(|a, b| match (nodes.get(a), nodes.get(b)) {
        (Some(a), Some(b)) => compare(a, b, sort, now),
        _ => Ordering::Equal,
    });
}
