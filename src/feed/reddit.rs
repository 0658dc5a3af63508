// src/feed/reddit.rs
//! Application-only OAuth client for subreddit "new" listings.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{FeedError, FeedPage, FeedProvider, Post};
use crate::config::RedditConfig;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";
const SHORTLINK_BASE: &str = "https://redd.it/";

#[derive(Debug, Deserialize)]
struct Listing<T> {
    data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
struct ListingData<T> {
    children: Vec<T>,
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostChild {
    data: PostData,
}

#[derive(Debug, Deserialize)]
struct PostData {
    id: String,
    title: String,
    score: i64,
    created_utc: f64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl From<PostData> for Post {
    fn from(d: PostData) -> Self {
        Self {
            permalink: format!("{SHORTLINK_BASE}{}", d.id),
            id: d.id,
            title: d.title,
            score: d.score,
            created_utc: d.created_utc as i64,
        }
    }
}

/// Decode a `/r/<board>/new` listing body.
pub fn parse_listing(body: &str) -> Result<FeedPage> {
    let listing: Listing<PostChild> =
        serde_json::from_str(body).context("decoding subreddit listing")?;
    Ok(FeedPage {
        posts: listing
            .data
            .children
            .into_iter()
            .map(|c| c.data.into())
            .collect(),
        after: listing.data.after.filter(|a| !a.is_empty()),
    })
}

/// Count the top-level entries of a `/comments/<id>` body: the second
/// listing holds the forest, "more" stubs included.
pub fn parse_comment_count(body: &str) -> Result<u64> {
    let (_post, forest): (IgnoredAny, Listing<IgnoredAny>) =
        serde_json::from_str(body).context("decoding comment tree")?;
    Ok(forest.data.children.len() as u64)
}

pub struct RedditClient {
    http: Client,
    token: String,
}

impl RedditClient {
    /// Build the HTTP client and obtain an application-only access token.
    /// Tokens live for an hour; one run needs a single token.
    pub async fn connect(cfg: &RedditConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(&cfg.user_agent)
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building reddit http client")?;

        let resp = http
            .post(TOKEN_URL)
            .basic_auth(&cfg.client_id, Some(&cfg.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(FeedError::from)?;
        let resp = check_status(resp, "access_token")?;
        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| FeedError::InvalidResponse(format!("token response: {e}")))?;

        info!(expires_in = ?token.expires_in, "reddit token acquired");
        Ok(Self {
            http,
            token: token.access_token,
        })
    }

    async fn get_text(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<String, FeedError> {
        let url = format!("{API_BASE}{endpoint}");
        debug!(endpoint, "reddit request");
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;
        let resp = check_status(resp, endpoint)?;
        Ok(resp.text().await?)
    }
}

fn check_status(resp: Response, resource: &str) -> Result<Response, FeedError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    warn!(status = status.as_u16(), resource, "reddit request failed");
    let resource = resource.to_string();
    Err(match status {
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            FeedError::RateLimited { retry_after }
        }
        StatusCode::UNAUTHORIZED => FeedError::Unauthorized,
        StatusCode::FORBIDDEN => FeedError::Forbidden { resource },
        StatusCode::NOT_FOUND => FeedError::NotFound { resource },
        s if s.is_server_error() => FeedError::Server {
            status: s.as_u16(),
            resource,
        },
        s => FeedError::Status {
            status: s.as_u16(),
            resource,
        },
    })
}

#[async_trait]
impl FeedProvider for RedditClient {
    async fn fetch_page(&self, board: &str, after: Option<&str>, limit: u32) -> Result<FeedPage> {
        let endpoint = format!("/r/{board}/new");
        let limit_s = limit.to_string();
        let mut query = vec![("limit", limit_s.as_str()), ("raw_json", "1")];
        if let Some(a) = after {
            query.push(("after", a));
        }
        let body = self
            .get_text(&endpoint, &query)
            .await
            .with_context(|| format!("fetching r/{board}/new"))?;
        let page = parse_listing(&body).with_context(|| format!("r/{board}/new"))?;
        debug!(board, posts = page.posts.len(), more = page.after.is_some(), "page fetched");
        Ok(page)
    }

    async fn comment_count(&self, post: &Post) -> Result<u64> {
        let endpoint = format!("/comments/{}", post.id);
        let body = self
            .get_text(&endpoint, &[("raw_json", "1")])
            .await
            .with_context(|| format!("fetching comments of {}", post.id))?;
        parse_comment_count(&body)
    }

    fn name(&self) -> &'static str {
        "Reddit"
    }
}
