// tests/common/mod.rs
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reddit_digest::feed::{FeedPage, FeedProvider, Post};
use reddit_digest::notify::Notifier;
use std::collections::HashMap;
use std::sync::Mutex;

pub fn utc_ts(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> i64 {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap().timestamp()
}

pub fn post(id: &str, title: &str, created_utc: i64, score: i64) -> Post {
    Post {
        id: id.to_string(),
        title: title.to_string(),
        score,
        created_utc,
        permalink: format!("https://redd.it/{id}"),
    }
}

/// In-memory feed. Pages are served in `page_size` chunks with numeric cursors.
#[derive(Default)]
pub struct FakeFeed {
    pub boards: HashMap<String, Vec<Post>>,
    pub comments: HashMap<String, u64>,
    pub failing_boards: Vec<String>,
    /// Board → number of pages served before every further request fails.
    pub fail_after_pages: HashMap<String, usize>,
    pub page_requests: Mutex<Vec<(String, Option<String>, u32)>>,
    pub comment_requests: Mutex<Vec<String>>,
}

impl FakeFeed {
    pub fn with_board(mut self, board: &str, posts: Vec<Post>) -> Self {
        self.boards.insert(board.to_string(), posts);
        self
    }

    pub fn with_comments(mut self, id: &str, n: u64) -> Self {
        self.comments.insert(id.to_string(), n);
        self
    }

    pub fn failing(mut self, board: &str) -> Self {
        self.failing_boards.push(board.to_string());
        self
    }

    pub fn failing_after(mut self, board: &str, pages: usize) -> Self {
        self.fail_after_pages.insert(board.to_string(), pages);
        self
    }

    pub fn comment_requests(&self) -> Vec<String> {
        self.comment_requests.lock().unwrap().clone()
    }

    pub fn page_requests(&self) -> Vec<(String, Option<String>, u32)> {
        self.page_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedProvider for FakeFeed {
    async fn fetch_page(&self, board: &str, after: Option<&str>, limit: u32) -> Result<FeedPage> {
        let earlier_pages = {
            let mut reqs = self.page_requests.lock().unwrap();
            let n = reqs.iter().filter(|(b, _, _)| b == board).count();
            reqs.push((board.to_string(), after.map(str::to_string), limit));
            n
        };
        if self.failing_boards.iter().any(|b| b == board) {
            return Err(anyhow!("simulated feed outage for {board}"));
        }
        if let Some(&pages) = self.fail_after_pages.get(board) {
            if earlier_pages >= pages {
                return Err(anyhow!("simulated feed outage for {board} on page {}", earlier_pages + 1));
            }
        }
        let all = self.boards.get(board).cloned().unwrap_or_default();
        let start: usize = after.map(|a| a.parse().unwrap()).unwrap_or(0);
        let end = (start + limit as usize).min(all.len());
        let posts = all.get(start..end).map(<[Post]>::to_vec).unwrap_or_default();
        let after = (end < all.len()).then(|| end.to_string());
        Ok(FeedPage { posts, after })
    }

    async fn comment_count(&self, post: &Post) -> Result<u64> {
        self.comment_requests.lock().unwrap().push(post.id.clone());
        Ok(self.comments.get(&post.id).copied().unwrap_or(0))
    }

    fn name(&self) -> &'static str {
        "Fake"
    }
}

/// Records sent messages; fails every send when `fail` is set.
#[derive(Default)]
pub struct RecordingNotifier {
    pub fail: bool,
    pub sent: Mutex<Vec<Vec<u8>>>,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &[u8]) -> Result<()> {
        if self.fail {
            return Err(anyhow!("535 5.7.8 Username and Password not accepted"));
        }
        self.sent.lock().unwrap().push(message.to_vec());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
