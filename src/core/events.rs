//! Messages between a host UI and the terminal.

use bevy::prelude::*;

/// A raw line submitted to the terminal.
///
/// Lines are executed in the next `Update`, in the order they were written.
///
/// # Examples
///
/// ```ignore
/// fn submit(mut input: MessageWriter<TerminalInputEvent>) {
///     input.write(TerminalInputEvent::new("Set TimeScale 0.5"));
/// }
/// ```
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct TerminalInputEvent {
    /// The line to execute.
    pub command: String,
}

impl TerminalInputEvent {
    /// Create a new input event.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

/// Registers the terminal messages.
pub struct TerminalEventsPlugin;

impl Plugin for TerminalEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<TerminalInputEvent>();
    }
}
