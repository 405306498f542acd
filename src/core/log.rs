//! Bounded log buffer shown by the terminal.

use std::collections::VecDeque;
use std::fmt;

/// Default number of entries retained by [`TerminalLog`].
pub const DEFAULT_BUFFER_SIZE: usize = 512;

/// Kind of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalLogType {
    Error,
    Assert,
    Warning,
    Message,
    Exception,
    /// Echo of a submitted line.
    Input,
    /// Output written by a command.
    ShellMessage,
}

impl fmt::Display for TerminalLogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "Error",
            Self::Assert => "Assert",
            Self::Warning => "Warning",
            Self::Message => "Message",
            Self::Exception => "Exception",
            Self::Input => "Input",
            Self::ShellMessage => "ShellMessage",
        };
        f.write_str(name)
    }
}

/// One entry of the log buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogItem {
    pub kind: TerminalLogType,
    pub message: String,
    /// Stack trace or source context, empty when there is none.
    pub stack_trace: String,
}

/// Ring buffer of [`LogItem`]s.
///
/// Once more than `capacity` entries have been appended the oldest one is
/// evicted.
#[derive(Debug, Clone)]
pub struct TerminalLog {
    items: VecDeque<LogItem>,
    capacity: usize,
    appended: u64,
}

impl Default for TerminalLog {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE)
    }
}

impl TerminalLog {
    /// Create an empty buffer retaining at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity.min(DEFAULT_BUFFER_SIZE)),
            capacity,
            appended: 0,
        }
    }

    /// Append an entry with a stack trace.
    pub fn handle_log(
        &mut self,
        message: impl Into<String>,
        stack_trace: impl Into<String>,
        kind: TerminalLogType,
    ) {
        self.items.push_back(LogItem {
            kind,
            message: message.into(),
            stack_trace: stack_trace.into(),
        });
        self.appended += 1;

        if self.items.len() > self.capacity {
            self.items.pop_front();
        }
    }

    /// Append an entry without a stack trace.
    pub fn log(&mut self, message: impl Into<String>, kind: TerminalLogType) {
        self.handle_log(message, String::new(), kind);
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Retained entries, oldest first.
    pub fn logs(&self) -> &VecDeque<LogItem> {
        &self.items
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if no entry is retained.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum number of retained entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries appended since creation, including evicted and
    /// cleared ones.
    pub fn appended(&self) -> u64 {
        self.appended
    }

    /// Retained entries appended after `seen` entries had been observed.
    ///
    /// Pass the previous value of [`appended`](Self::appended) to stream new
    /// output.
    pub fn since(&self, seen: u64) -> impl Iterator<Item = &LogItem> {
        let new = self.appended.saturating_sub(seen);
        let skip = (self.items.len() as u64).saturating_sub(new) as usize;
        self.items.iter().skip(skip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_retains_newest() {
        let mut log = TerminalLog::new(3);
        for i in 1..=5 {
            log.log(format!("m{i}"), TerminalLogType::Message);
        }

        let messages: Vec<_> = log.logs().iter().map(|item| item.message.as_str()).collect();
        assert_eq!(messages, vec!["m3", "m4", "m5"]);
        assert_eq!(log.appended(), 5);
    }

    #[test]
    fn test_log_trace_and_kind() {
        let mut log = TerminalLog::default();
        log.handle_log("boom", "at main.rs:1", TerminalLogType::Exception);
        log.log("plain", TerminalLogType::Warning);

        assert_eq!(log.logs()[0].stack_trace, "at main.rs:1");
        assert_eq!(log.logs()[0].kind, TerminalLogType::Exception);
        assert_eq!(log.logs()[1].stack_trace, "");
        assert_eq!(log.capacity(), DEFAULT_BUFFER_SIZE);
    }

    #[test]
    fn test_log_clear() {
        let mut log = TerminalLog::new(4);
        log.log("a", TerminalLogType::Input);
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.appended(), 1);
    }

    #[test]
    fn test_log_since() {
        let mut log = TerminalLog::new(3);
        log.log("a", TerminalLogType::Message);
        log.log("b", TerminalLogType::Message);
        let seen = log.appended();

        log.log("c", TerminalLogType::Message);
        log.log("d", TerminalLogType::Message);
        let fresh: Vec<_> = log.since(seen).map(|item| item.message.as_str()).collect();
        assert_eq!(fresh, vec!["c", "d"]);

        // More new entries than capacity: only the retained ones come back
        let seen = log.appended();
        for m in ["e", "f", "g", "h"] {
            log.log(m, TerminalLogType::Message);
        }
        let fresh: Vec<_> = log.since(seen).map(|item| item.message.as_str()).collect();
        assert_eq!(fresh, vec!["f", "g", "h"]);

        assert_eq!(log.since(log.appended()).count(), 0);
    }
}
