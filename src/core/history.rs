//! Command history with an up/down cursor.

/// Previously submitted lines.
///
/// The cursor sits one past the newest entry after every push, so the first
/// [`previous`](Self::previous) returns the newest line.
#[derive(Debug, Clone, Default)]
pub struct TerminalHistory {
    entries: Vec<String>,
    position: usize,
}

impl TerminalHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line and reset the cursor. Empty lines are ignored.
    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        if line.is_empty() {
            return;
        }
        self.entries.push(line);
        self.position = self.entries.len();
    }

    /// Move the cursor back and return the entry under it.
    ///
    /// Stays on the oldest entry once reached. Returns `""` when empty.
    pub fn previous(&mut self) -> &str {
        if self.entries.is_empty() {
            return "";
        }
        self.position = self.position.saturating_sub(1);
        &self.entries[self.position]
    }

    /// Move the cursor forward and return the entry under it.
    ///
    /// Returns `""` once the cursor moves past the newest entry.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> &str {
        self.position += 1;
        if self.position >= self.entries.len() {
            self.position = self.entries.len();
            return "";
        }
        &self.entries[self.position]
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.position = 0;
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.position
    }
}
