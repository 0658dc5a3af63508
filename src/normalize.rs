// src/normalize.rs
use crate::config::BoardKeywordMap;

/// Characters deleted before keyword matching. Deletion, not replacement:
/// "Don't" becomes "dont".
pub const IRRITANTS: [char; 15] = [
    '.', ',', '?', '&', '"', '\'', '!', ')', '(', '[', ']', '{', '}', ';', ':',
];

/// Strip irritant punctuation and lowercase.
///
/// Applied to both configured keywords and post titles; matching only works
/// when both sides went through this function.
pub fn normalize(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !IRRITANTS.contains(c)).collect();
    stripped.to_lowercase()
}

/// Normalize every keyword of every board. Keywords that end up empty are
/// dropped, an empty needle would match every title.
pub fn normalize_keywords(boards: &BoardKeywordMap) -> BoardKeywordMap {
    boards
        .iter()
        .map(|(board, keywords)| {
            let kws = keywords
                .iter()
                .map(|k| normalize(k))
                .filter(|k| !k.is_empty())
                .collect::<Vec<_>>();
            if kws.len() < keywords.len() {
                tracing::warn!(
                    board = %board,
                    dropped = keywords.len() - kws.len(),
                    "keywords empty after normalization"
                );
            }
            (board.clone(), kws)
        })
        .collect()
}
