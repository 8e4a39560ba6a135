//! Bounded textual history of executed steps.
//!
//! The history feeds every planning prompt, so its word ceiling bounds the
//! size of any downstream prompt. Overflow drops the oldest words and keeps
//! the newest content contiguous and intact from the tail.

/// Keeps the last `max_words` whitespace-separated words of `text`,
/// rejoined with single spaces. Word-preserving when under the limit, and
/// idempotent: truncating an already-truncated history is a no-op.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let start = words.len().saturating_sub(max_words);
    words[start..].join(" ")
}

/// Ordered textual log of executed steps, one entry per step. The word
/// ceiling is re-applied on every append.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    text: String,
    max_words: usize,
}

impl HistoryBuffer {
    pub fn new(max_words: usize) -> Self {
        Self {
            text: String::new(),
            max_words,
        }
    }

    /// Appends one step record and re-applies the word ceiling.
    pub fn append(&mut self, entry: &str) {
        self.text.push('\n');
        self.text.push_str(entry);
        self.text = truncate_words(&self.text, self.max_words);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Consumes the buffer, yielding the final history text.
    pub fn into_text(self) -> String {
        self.text
    }
}
