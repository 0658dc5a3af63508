// src/scan.rs
use anyhow::Result;
use chrono::{DateTime, Local};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;

use crate::config::BoardKeywordMap;
use crate::feed::{FeedProvider, Post};
use crate::normalize::normalize;
use crate::window::TimeWindow;

/// Reddit caps a single listing request at 100 items.
pub const MAX_PAGE_SIZE: u32 = 100;

/// One matched post, as rendered in the digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub title: String,
    pub score: i64,
    pub comments: u64,
    pub date: DateTime<Local>,
    pub url: String,
}

/// Board → matches in feed order (newest first).
pub type DigestResult = BTreeMap<String, Vec<MatchRecord>>;

/// What to do when a board's feed fails mid-scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanPolicy {
    /// Abort the whole scan with the error.
    #[default]
    FailFast,
    /// Log, keep what was collected for the board, move on.
    SkipFailedBoards,
}

impl ScanPolicy {
    pub fn from_skip_flag(skip_failed_boards: bool) -> Self {
        if skip_failed_boards {
            Self::SkipFailedBoards
        } else {
            Self::FailFast
        }
    }
}

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("digest_posts_seen_total", "Posts read from board feeds.");
        describe_counter!(
            "digest_posts_matched_total",
            "Posts in window matching a keyword."
        );
        describe_counter!("digest_board_errors_total", "Board scans that failed.");
    });
}

/// First keyword contained in the already-normalized title.
pub fn first_match<'k>(normalized_title: &str, keywords: &'k [String]) -> Option<&'k str> {
    keywords
        .iter()
        .map(String::as_str)
        .find(|k| normalized_title.contains(k))
}

/// Scan every board. `boards` must hold normalized keywords.
pub async fn scan<P>(
    provider: &P,
    boards: &BoardKeywordMap,
    window: &TimeWindow,
    limit: u32,
    policy: ScanPolicy,
) -> Result<DigestResult>
where
    P: FeedProvider + ?Sized,
{
    ensure_metrics_described();

    let mut result = DigestResult::new();
    for (board, keywords) in boards {
        let mut matches = Vec::new();
        let outcome = scan_board(provider, board, keywords, window, limit, &mut matches).await;
        if let Err(e) = outcome {
            counter!("digest_board_errors_total").increment(1);
            match policy {
                ScanPolicy::FailFast => return Err(e),
                ScanPolicy::SkipFailedBoards => {
                    tracing::warn!(
                        error = ?e,
                        board = %board,
                        provider = provider.name(),
                        kept = matches.len(),
                        "board scan failed, skipping"
                    );
                }
            }
        }
        tracing::info!(board = %board, matches = matches.len(), "board scanned");
        result.insert(board.clone(), matches);
    }
    Ok(result)
}

/// Walk the board's feed page by page until `limit` posts were seen or the
/// feed ends. Out-of-window posts are skipped, not treated as the end: the
/// feed is not trusted to be strictly ordered by creation time.
async fn scan_board<P>(
    provider: &P,
    board: &str,
    keywords: &[String],
    window: &TimeWindow,
    limit: u32,
    out: &mut Vec<MatchRecord>,
) -> Result<()>
where
    P: FeedProvider + ?Sized,
{
    let mut seen: u32 = 0;
    let mut after: Option<String> = None;

    while seen < limit {
        let page_size = (limit - seen).min(MAX_PAGE_SIZE);
        let page = provider.fetch_page(board, after.as_deref(), page_size).await?;
        if page.posts.is_empty() {
            break;
        }

        for post in page.posts.iter().take((limit - seen) as usize) {
            seen += 1;
            counter!("digest_posts_seen_total").increment(1);
            if let Some(record) = check_post(provider, post, keywords, window).await? {
                out.push(record);
            }
        }

        match page.after {
            Some(next) => after = Some(next),
            None => break,
        }
    }

    tracing::debug!(board, seen, "feed exhausted");
    Ok(())
}

async fn check_post<P>(
    provider: &P,
    post: &Post,
    keywords: &[String],
    window: &TimeWindow,
) -> Result<Option<MatchRecord>>
where
    P: FeedProvider + ?Sized,
{
    if !window.contains_unix(post.created_utc) {
        return Ok(None);
    }
    let title = normalize(&post.title);
    let Some(keyword) = first_match(&title, keywords) else {
        return Ok(None);
    };
    let Some(date) = DateTime::from_timestamp(post.created_utc, 0) else {
        tracing::warn!(
            id = %post.id,
            created_utc = post.created_utc,
            "matched post has an out-of-range timestamp, dropped"
        );
        return Ok(None);
    };

    // Only matched posts pay for the comment tree.
    let comments = provider.comment_count(post).await?;
    counter!("digest_posts_matched_total").increment(1);
    tracing::debug!(id = %post.id, keyword, "post matched");

    Ok(Some(MatchRecord {
        title: post.title.clone(),
        score: post.score,
        comments,
        date: date.with_timezone(&Local),
        url: post.permalink.clone(),
    }))
}
