// src/notify/mod.rs
pub mod email;
pub mod error_log;

use anyhow::Result;

pub use email::SmtpNotifier;
pub use error_log::ErrorLog;

/// Delivery channel for the rendered digest.
#[async_trait::async_trait]
pub trait Notifier {
    /// Submit the raw message. Errors are returned, not logged.
    async fn send(&self, message: &[u8]) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Send the digest; on failure append to `log` instead of propagating.
/// Returns whether the message went out.
pub async fn deliver<N>(notifier: &N, message: &[u8], log: &ErrorLog) -> bool
where
    N: Notifier + ?Sized,
{
    match notifier.send(message).await {
        Ok(()) => {
            tracing::info!(channel = notifier.name(), bytes = message.len(), "digest sent");
            true
        }
        Err(e) => {
            tracing::error!(error = ?e, channel = notifier.name(), "digest delivery failed");
            if let Err(log_err) = log.append_mail_failure(&e) {
                tracing::error!(error = ?log_err, path = %log.path().display(), "error log write failed");
            }
            false
        }
    }
}
