//! Reddit digest: one run per invocation.
//! Scans the configured subreddits, mails the matches, exits.
//!
//! Schedule it with cron or a systemd timer.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reddit_digest::config::load_config_default;
use reddit_digest::feed::reddit::RedditClient;
use reddit_digest::notify::{ErrorLog, SmtpNotifier};
use reddit_digest::{current_window, record_failure, run_and_record};

/// Compact logs by default; JSON lines when DIGEST_LOG_JSON=1.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("reddit_digest=info,warn"));
    let json = std::env::var("DIGEST_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env when present; secrets marked "ENV" in the config read from it.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = load_config_default()?;
    let log = ErrorLog::new(&cfg.error_log);

    let setup = async {
        let client = RedditClient::connect(&cfg.reddit).await?;
        let notifier = SmtpNotifier::from_config(&cfg.mail)?;
        Ok::<_, anyhow::Error>((client, notifier))
    };
    let (client, notifier) = record_failure(&log, setup.await)?;

    run_and_record(&cfg, &client, &notifier, &current_window(), &log).await?;
    Ok(())
}
