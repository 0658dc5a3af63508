// src/notify/error_log.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const MAIL_FAILURE_LINE: &str = "Could not send mail to one or more recipients!";
pub const RUN_FAILURE_LINE: &str = "Digest run aborted!";

const TS_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Append-only text log for failures that must leave a trace on disk.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append_mail_failure<E: Display>(&self, err: &E) -> Result<()> {
        self.append_at(Local::now(), MAIL_FAILURE_LINE, err)
    }

    pub fn append_run_failure<E: Display>(&self, err: &E) -> Result<()> {
        self.append_at(Local::now(), RUN_FAILURE_LINE, err)
    }

    /// Write one block: timestamp, headline, error text (with its causes).
    pub fn append_at<E: Display>(&self, now: DateTime<Local>, headline: &str, err: &E) -> Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        let block = format!("\n{}\n{}\n{:#}", now.format(TS_FORMAT), headline, err);
        f.write_all(block.as_bytes())
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}
