// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod digest;
pub mod feed;
pub mod normalize;
pub mod notify;
pub mod pipeline;
pub mod scan;
pub mod window;

// ---- Re-exports for stable public API ----
pub use crate::config::{AppConfig, BoardKeywordMap};
pub use crate::digest::format_digest;
pub use crate::feed::{FeedPage, FeedProvider, Post};
pub use crate::normalize::normalize;
pub use crate::notify::{deliver, ErrorLog, Notifier};
pub use crate::pipeline::{record_failure, run_and_record, run_once, RunReport};
pub use crate::scan::{scan, DigestResult, MatchRecord, ScanPolicy};
pub use crate::window::{current_window, TimeWindow};
