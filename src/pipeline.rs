// src/pipeline.rs
use anyhow::Result;

use crate::config::AppConfig;
use crate::digest::format_digest;
use crate::feed::FeedProvider;
use crate::normalize::normalize_keywords;
use crate::notify::{deliver, ErrorLog, Notifier};
use crate::scan::{scan, DigestResult, ScanPolicy};
use crate::window::TimeWindow;

/// Summary of one run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub result: DigestResult,
    pub delivered: bool,
}

impl RunReport {
    pub fn total_matches(&self) -> usize {
        self.result.values().map(Vec::len).sum()
    }
}

/// One full pass: normalize keywords, scan, format, deliver.
///
/// Feed errors propagate (unless the config asks to skip failed boards);
/// mail errors end up in the error log and only flip `delivered`.
pub async fn run_once<P, N>(
    cfg: &AppConfig,
    provider: &P,
    notifier: &N,
    window: &TimeWindow,
) -> Result<RunReport>
where
    P: FeedProvider + ?Sized,
    N: Notifier + ?Sized,
{
    let boards = normalize_keywords(&cfg.boards);
    let policy = ScanPolicy::from_skip_flag(cfg.scan.skip_failed_boards);

    tracing::info!(
        boards = boards.len(),
        cutoff = %window.cutoff,
        provider = provider.name(),
        "scan started"
    );
    let result = scan(provider, &boards, window, cfg.reddit.limit, policy).await?;

    let message = format_digest(&result, window.today);
    let log = ErrorLog::new(&cfg.error_log);
    let delivered = deliver(notifier, &message, &log).await;

    let report = RunReport { result, delivered };
    tracing::info!(matches = report.total_matches(), delivered, "run finished");
    Ok(report)
}

/// [`run_once`], plus a `Digest run aborted!` block in `log` when the run
/// fails. The error is still returned so the process exits non-zero.
pub async fn run_and_record<P, N>(
    cfg: &AppConfig,
    provider: &P,
    notifier: &N,
    window: &TimeWindow,
    log: &ErrorLog,
) -> Result<RunReport>
where
    P: FeedProvider + ?Sized,
    N: Notifier + ?Sized,
{
    let outcome = run_once(cfg, provider, notifier, window).await;
    if let Ok(report) = &outcome {
        if !report.delivered {
            tracing::warn!(path = %log.path().display(), "digest not delivered, see error log");
        }
    }
    record_failure(log, outcome)
}

/// Pass `outcome` through, appending its error (if any) to `log`.
pub fn record_failure<T>(log: &ErrorLog, outcome: Result<T>) -> Result<T> {
    if let Err(e) = &outcome {
        tracing::error!(error = ?e, "digest run failed");
        if let Err(log_err) = log.append_run_failure(e) {
            tracing::error!(error = ?log_err, path = %log.path().display(), "error log write failed");
        }
    }
    outcome
}
