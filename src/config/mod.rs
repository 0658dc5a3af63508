// src/config/mod.rs
//! Static run configuration: Reddit credentials, mail settings and the
//! board → keyword map. Loaded once at startup (see [`load`]) and passed
//! down explicitly.

pub mod load;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub use load::{load_config_default, load_config_from};

/// Board name → raw keywords. Sorted by board name.
pub type BoardKeywordMap = BTreeMap<String, Vec<String>>;

fn default_limit() -> u32 {
    1000
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}
fn default_smtp_port() -> u16 {
    465
}
fn default_error_log() -> PathBuf {
    PathBuf::from("errorlog.txt")
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub reddit: RedditConfig,
    pub mail: MailConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    /// Append-only file receiving mail delivery failures.
    #[serde(default = "default_error_log")]
    pub error_log: PathBuf,
    pub boards: BoardKeywordMap,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditConfig {
    /// "ENV" means: read from REDDIT_CLIENT_ID
    pub client_id: String,
    /// "ENV" means: read from REDDIT_CLIENT_SECRET
    pub client_secret: String,
    pub user_agent: String,
    /// Max posts requested per board.
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// "ENV" means: read from SMTP_USER
    pub login: String,
    /// "ENV" means: read from SMTP_PASS
    pub password: String,
    pub from: String,
    pub to: String,
    #[serde(default = "default_smtp_host")]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanConfig {
    /// Log and skip a board whose feed fails instead of aborting the run.
    #[serde(default)]
    pub skip_failed_boards: bool,
}

/// Subreddit names go into the request path unescaped.
pub fn is_valid_board_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl AppConfig {
    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.boards.is_empty() {
            bail!("no boards configured");
        }
        if let Some(bad) = self.boards.keys().find(|b| !is_valid_board_name(b)) {
            bail!("invalid board name {bad:?}: only letters, digits and '_' allowed");
        }
        if self.reddit.limit == 0 {
            bail!("reddit.limit must be positive");
        }
        let required = [
            ("reddit.client_id", &self.reddit.client_id),
            ("reddit.client_secret", &self.reddit.client_secret),
            ("reddit.user_agent", &self.reddit.user_agent),
            ("mail.login", &self.mail.login),
            ("mail.password", &self.mail.password),
            ("mail.host", &self.mail.host),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                bail!("{name} is empty");
            }
        }
        self.mail
            .from
            .parse::<lettre::Address>()
            .with_context(|| format!("invalid mail.from {:?}", self.mail.from))?;
        self.mail
            .to
            .parse::<lettre::Address>()
            .with_context(|| format!("invalid mail.to {:?}", self.mail.to))?;
        Ok(())
    }
}
