// src/digest.rs
use chrono::NaiveDate;

use crate::scan::DigestResult;

pub const SUBJECT_LINE: &str = "Subject: Reddit Daily Digest";
pub const GREETING: &str = "Hello there,";
/// Substitute for characters outside ASCII.
pub const PLACEHOLDER: u8 = b'?';

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Board header line, e.g. `----------rust----------`.
pub fn board_separator(board: &str) -> String {
    format!("----------{board}----------")
}

/// Render the digest as text. The first line is the `Subject:` header so the
/// result can be submitted as a raw message.
pub fn render_text(result: &DigestResult, today: NaiveDate) -> String {
    let mut lines: Vec<String> = vec![
        SUBJECT_LINE.to_string(),
        GREETING.to_string(),
        format!("This is your reddit daily digest for {today}."),
    ];
    for (board, items) in result {
        lines.push(board_separator(board));
        for item in items {
            lines.push(item.title.clone());
            lines.push(format!("Score: {}", item.score));
            lines.push(format!("Comments: {}", item.comments));
            lines.push(format!("Date: {}", item.date.format(DATE_FORMAT)));
            lines.push(format!("URL: {}", item.url));
            lines.push("\n".to_string());
        }
    }
    lines.join("\n")
}

/// ASCII-encode, replacing every non-ASCII char with [`PLACEHOLDER`].
pub fn to_ascii_lossy(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if c.is_ascii() { c as u8 } else { PLACEHOLDER })
        .collect()
}

/// Render and encode the digest. Never fails.
pub fn format_digest(result: &DigestResult, today: NaiveDate) -> Vec<u8> {
    to_ascii_lossy(&render_text(result, today))
}
