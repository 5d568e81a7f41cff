//! Request-scoped diagnostic text
//!
//! Every pipeline stage reports progress into a [`Diagnostics`] value owned by the request
//! being served. Nothing process-wide is redirected, so concurrent requests each see only
//! their own lines. Each line is mirrored to `tracing` for the server log.

use std::sync::{Mutex, MutexGuard};

/// Line-break marker substituted for every newline when rendering to HTML
pub const LINE_BREAK: &str = "<br>";

/// Collector for the textual trace of one request
#[derive(Debug, Default)]
pub struct Diagnostics {
    lines: Mutex<Vec<String>>,
}

impl Diagnostics {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line of diagnostic text
    pub fn line(&self, text: impl Into<String>) {
        let text = text.into();
        tracing::info!(target: "playlist_dl::diagnostics", "{}", text);
        self.guard().push(text);
    }

    /// Append one line and log it at warn level
    pub fn warn(&self, text: impl Into<String>) {
        let text = text.into();
        tracing::warn!(target: "playlist_dl::diagnostics", "{}", text);
        self.guard().push(text);
    }

    /// Snapshot of the collected lines
    pub fn lines(&self) -> Vec<String> {
        self.guard().clone()
    }

    /// Collected lines joined with `'\n'`
    pub fn text(&self) -> String {
        self.guard().join("\n")
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    /// Render the collected lines as an HTML fragment
    ///
    /// Each line is escaped with [`escape_html`], then the joined text goes through
    /// [`newlines_to_br`].
    pub fn to_html(&self) -> String {
        let escaped = self
            .guard()
            .iter()
            .map(|line| escape_html(line))
            .collect::<Vec<_>>()
            .join("\n");
        newlines_to_br(&escaped)
    }

    // A panic while holding the lock cannot leave the Vec half-written
    fn guard(&self) -> MutexGuard<'_, Vec<String>> {
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Replace every `'\n'` with [`LINE_BREAK`], leaving all other characters untouched
pub fn newlines_to_br(text: &str) -> String {
    text.replace('\n', LINE_BREAK)
}

/// Escape the five HTML-significant characters
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
