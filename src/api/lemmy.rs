//! Lemmy API client (v3)

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use crate::models::{Comment, CommentId, CommentSort, VoteState};

use super::{CommentSource, VoteSubmitter};

/// Default instance used when none is configured
pub const DEFAULT_INSTANCE: &str = "https://lemmy.ml";

/// Lemmy API client
pub struct LemmyClient {
    client: Client,
    instance: String,
    jwt: Option<String>,
    max_depth: u32,
    limit: u32,
}

impl LemmyClient {
    /// Create a new Lemmy client. Without a JWT only reads are possible.
    pub fn new(instance: &str, jwt: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            instance: instance.trim_end_matches('/').to_string(),
            jwt: jwt.map(str::to_string),
            max_depth: 8,
            limit: 50,
        }
    }

    /// Set how deep and how many comments one request returns
    pub fn with_limits(mut self, max_depth: u32, limit: u32) -> Self {
        self.max_depth = max_depth;
        self.limit = limit;
        self
    }

    /// Instance base URL
    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Build API URL
    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/api/v3{}", self.instance, endpoint)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.jwt {
            Some(jwt) => request.header("Authorization", format!("Bearer {jwt}")),
            None => request,
        }
    }

    fn list_url(&self, post_id: i64, parent_id: Option<CommentId>, sort: CommentSort) -> String {
        let mut endpoint = format!(
            "/comment/list?post_id={post_id}&max_depth={}&limit={}&sort={}&type_=All",
            self.max_depth,
            self.limit,
            sort.api_name()
        );
        if let Some(parent) = parent_id {
            endpoint.push_str(&format!("&parent_id={parent}"));
        }
        self.api_url(&endpoint)
    }

    async fn list(&self, url: &str) -> Result<Vec<Comment>> {
        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .context("Failed to fetch comments")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Lemmy error {status}: {body}");
        }

        let page: GetCommentsResponse = response
            .json()
            .await
            .context("Failed to parse comment list response")?;

        tracing::debug!("Fetched {} comments from {}", page.comments.len(), url);

        Ok(page
            .comments
            .into_iter()
            .map(LemmyCommentView::into_comment)
            .collect())
    }
}

impl CommentSource for LemmyClient {
    async fn fetch_comments(&self, post_id: i64, sort: CommentSort) -> Result<Vec<Comment>> {
        let url = self.list_url(post_id, None, sort);
        self.list(&url).await
    }

    async fn fetch_replies(
        &self,
        post_id: i64,
        parent_id: CommentId,
        sort: CommentSort,
    ) -> Result<Vec<Comment>> {
        let url = self.list_url(post_id, Some(parent_id), sort);
        self.list(&url).await
    }
}

impl VoteSubmitter for LemmyClient {
    async fn submit_vote(&self, id: CommentId, vote: VoteState) -> Result<()> {
        if self.jwt.is_none() {
            anyhow::bail!("Voting requires a logged-in account");
        }

        let url = self.api_url("/comment/like");
        let request = CreateCommentLike {
            comment_id: id.0,
            score: vote.as_score(),
        };

        let response = self
            .authorized(self.client.post(&url))
            .json(&request)
            .send()
            .await
            .context("Failed to submit vote")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Lemmy error {status}: {body}");
        }

        Ok(())
    }
}

/// Parse a Lemmy timestamp. 0.19+ sends RFC 3339, 0.18 sends naive UTC.
fn parse_published(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|n| n.and_utc()))
        .unwrap_or_else(|_| Utc::now())
}

// ==================== API Types ====================

#[derive(Debug, Serialize)]
struct CreateCommentLike {
    comment_id: i64,
    score: i16,
}

#[derive(Debug, Deserialize)]
struct GetCommentsResponse {
    comments: Vec<LemmyCommentView>,
}

#[derive(Debug, Deserialize)]
struct LemmyCommentView {
    comment: LemmyComment,
    creator: LemmyPerson,
    #[serde(default)]
    counts: LemmyCounts,
    my_vote: Option<i16>,
}

#[derive(Debug, Deserialize)]
struct LemmyComment {
    id: i64,
    post_id: i64,
    content: String,
    published: String,
    path: String,
    #[serde(default)]
    deleted: bool,
    #[serde(default)]
    removed: bool,
}

#[derive(Debug, Deserialize)]
struct LemmyPerson {
    name: String,
    #[serde(default, alias = "ap_id")]
    actor_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct LemmyCounts {
    #[serde(default)]
    score: i64,
    #[serde(default)]
    upvotes: i64,
    #[serde(default)]
    downvotes: i64,
    #[serde(default)]
    child_count: u32,
}

impl LemmyCommentView {
    fn into_comment(self) -> Comment {
        Comment {
            id: CommentId(self.comment.id),
            parent_id: Comment::parent_from_path(&self.comment.path),
            post_id: self.comment.post_id,
            creator_name: self.creator.name,
            creator_actor_id: self.creator.actor_id,
            content: self.comment.content,
            published: parse_published(&self.comment.published),
            score: self.counts.score,
            upvotes: self.counts.upvotes,
            downvotes: self.counts.downvotes,
            child_count: self.counts.child_count,
            deleted: self.comment.deleted,
            removed: self.comment.removed,
            my_vote: VoteState::from(self.my_vote),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const PAGE: &str = r#"{
        "comments": [
            {
                "comment": {
                    "id": 12,
                    "post_id": 7,
                    "content": "First!",
                    "published": "2024-03-01T10:00:00.123456Z",
                    "path": "0.12",
                    "deleted": false,
                    "removed": false
                },
                "creator": { "name": "alice", "actor_id": "https://lemmy.ml/u/alice" },
                "counts": { "score": 5, "upvotes": 6, "downvotes": 1, "child_count": 1 },
                "my_vote": 1
            },
            {
                "comment": {
                    "id": 34,
                    "post_id": 7,
                    "content": "Reply",
                    "published": "2023-06-20T12:30:00.5",
                    "path": "0.12.34"
                },
                "creator": { "name": "bob", "ap_id": "https://beehaw.org/u/bob" },
                "counts": { "score": 0, "upvotes": 0, "downvotes": 0, "child_count": 0 }
            }
        ]
    }"#;

    #[test]
    fn test_parse_comment_page() {
        let page: GetCommentsResponse = serde_json::from_str(PAGE).unwrap();
        let comments: Vec<Comment> = page
            .comments
            .into_iter()
            .map(LemmyCommentView::into_comment)
            .collect();

        assert_eq!(comments.len(), 2);

        let first = &comments[0];
        assert_eq!(first.id, CommentId(12));
        assert_eq!(first.parent_id, None);
        assert_eq!(first.creator_name, "alice");
        assert_eq!(first.score, 5);
        assert_eq!(first.my_vote, VoteState::Upvoted);
        assert_eq!(first.published.year(), 2024);

        let second = &comments[1];
        assert_eq!(second.parent_id, Some(CommentId(12)));
        assert_eq!(second.creator_actor_id, "https://beehaw.org/u/bob");
        assert_eq!(second.my_vote, VoteState::NoVote);
        assert_eq!(second.published.hour(), 12);
        assert_eq!(second.published.minute(), 30);
    }

    #[test]
    fn test_list_url() {
        let client = LemmyClient::new("https://lemmy.ml/", None).with_limits(3, 20);
        assert_eq!(
            client.list_url(7, None, CommentSort::Top),
            "https://lemmy.ml/api/v3/comment/list?post_id=7&max_depth=3&limit=20&sort=Top&type_=All"
        );
        assert!(
            client
                .list_url(7, Some(CommentId(12)), CommentSort::Hot)
                .ends_with("&parent_id=12")
        );
    }

    #[test]
    fn test_vote_without_login_fails() {
        let client = LemmyClient::new(DEFAULT_INSTANCE, None);
        let result = tokio_test::block_on(client.submit_vote(CommentId(1), VoteState::Upvoted));
        assert!(result.is_err());
    }
}
