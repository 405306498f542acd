//! Command lines queued to run after a delay.

/// Clock a scheduled command counts down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleClock {
    /// Virtual time, affected by the time scale and pausing.
    #[default]
    Scaled,
    /// Real time.
    Unscaled,
}

/// A queued command line.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledCommand {
    pub line: String,
    /// Seconds left before the line runs.
    pub remaining: f32,
    pub clock: ScheduleClock,
}

/// Queue of delayed command lines.
///
/// Entries cannot be cancelled once scheduled.
#[derive(Debug, Clone, Default)]
pub struct ScheduledCommands {
    queue: Vec<ScheduledCommand>,
}

impl ScheduledCommands {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `line` to run after `delay` seconds on `clock`.
    pub fn schedule(&mut self, delay: f32, line: impl Into<String>, clock: ScheduleClock) {
        self.queue.push(ScheduledCommand {
            line: line.into(),
            remaining: delay,
            clock,
        });
    }

    /// Advance every entry and return the lines that became due, in the order
    /// they were scheduled.
    pub fn advance(&mut self, scaled_delta: f32, real_delta: f32) -> Vec<String> {
        let mut due = Vec::new();
        self.queue.retain_mut(|entry| {
            entry.remaining -= match entry.clock {
                ScheduleClock::Scaled => scaled_delta,
                ScheduleClock::Unscaled => real_delta,
            };
            if entry.remaining <= 0.0 {
                due.push(std::mem::take(&mut entry.line));
                false
            } else {
                true
            }
        });
        due
    }

    /// Pending entries.
    pub fn pending(&self) -> &[ScheduledCommand] {
        &self.queue
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Check if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
