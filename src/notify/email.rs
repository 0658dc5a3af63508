use anyhow::{Context, Result};
use lettre::address::{Address, Envelope};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};
use std::time::Duration;

use super::Notifier;
use crate::config::MailConfig;

/// SMTP over implicit TLS (SMTPS), submitting pre-rendered raw messages.
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    envelope: Envelope,
}

impl SmtpNotifier {
    pub fn from_config(cfg: &MailConfig) -> Result<Self> {
        let creds = Credentials::new(cfg.login.clone(), cfg.password.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.host)
            .with_context(|| format!("invalid SMTP host {}", cfg.host))?
            .port(cfg.port)
            .credentials(creds)
            .timeout(Some(Duration::from_secs(cfg.timeout_secs)))
            .build();

        let from: Address = cfg.from.parse().context("invalid mail.from")?;
        let to: Address = cfg.to.parse().context("invalid mail.to")?;
        let envelope = Envelope::new(Some(from), vec![to]).context("build envelope")?;

        Ok(Self { mailer, envelope })
    }
}

/// Normalize line endings to CRLF as SMTP DATA expects.
pub fn to_crlf(message: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(message.len() + message.len() / 16);
    let mut prev = 0u8;
    for &b in message {
        if b == b'\n' && prev != b'\r' {
            out.push(b'\r');
        }
        out.push(b);
        prev = b;
    }
    out
}

#[async_trait::async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, message: &[u8]) -> Result<()> {
        let raw = to_crlf(message);
        self.mailer
            .send_raw(&self.envelope, &raw)
            .await
            .context("send email")?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}
