// src/feed/mod.rs
pub mod reddit;

use anyhow::Result;
use thiserror::Error;

/// One submission as returned by a board's "new" listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Provider id, used to fetch the comment tree on demand.
    pub id: String,
    pub title: String,
    pub score: i64,
    pub created_utc: i64, // unix seconds
    /// Short canonical link, e.g. https://redd.it/abc123
    pub permalink: String,
}

/// A page of the newest-first feed plus the cursor for the next one.
#[derive(Debug, Clone, Default)]
pub struct FeedPage {
    pub posts: Vec<Post>,
    pub after: Option<String>,
}

/// Source of board feeds. Implemented by [`reddit::RedditClient`] and by
/// in-memory fakes in tests.
#[async_trait::async_trait]
pub trait FeedProvider {
    /// Fetch up to `limit` newest posts of `board`, continuing after `after`.
    async fn fetch_page(&self, board: &str, after: Option<&str>, limit: u32) -> Result<FeedPage>;

    /// Number of comments on `post`. Expensive: loads the comment tree.
    async fn comment_count(&self, post: &Post) -> Result<u64>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("rate limit exceeded, retry after {retry_after}s")]
    RateLimited { retry_after: u64 },
    #[error("unauthorized: check client id/secret")]
    Unauthorized,
    #[error("forbidden: {resource}")]
    Forbidden { resource: String },
    #[error("not found: {resource}")]
    NotFound { resource: String },
    #[error("server error {status} for {resource}")]
    Server { status: u16, resource: String },
    #[error("unexpected status {status} for {resource}")]
    Status { status: u16, resource: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
