//! Engine log capture for the terminal buffer.
//!
//! Plug [`terminal_log_layer`] into
//! [`LogPlugin::custom_layer`](bevy::log::LogPlugin::custom_layer) and every
//! `tracing` event from other crates is appended to the [`Terminal`] buffer
//! while its `HandleLog` variable is on.

use std::sync::mpsc;

use bevy::log::{BoxedLayer, Level};
use bevy::prelude::*;
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::field::Visit;

use crate::core::{Terminal, TerminalLogType};

/// Build the capture layer and install the system draining it.
///
/// ```ignore
/// App::new()
///     .add_plugins(DefaultPlugins.set(LogPlugin {
///         custom_layer: terminal_log_layer,
///         ..default()
///     }))
///     .add_plugins(TerminalPlugin::default());
/// ```
pub fn terminal_log_layer(app: &mut App) -> Option<BoxedLayer> {
    let (sender, receiver) = mpsc::channel();
    app.insert_non_send_resource(CapturedLogs(receiver));
    app.add_systems(PostUpdate, forward_captured_logs);

    Some(Box::new(TerminalCaptureLayer { sender }))
}

/// A log event waiting to be copied into the terminal.
#[derive(Debug, Clone)]
struct CapturedLog {
    kind: TerminalLogType,
    message: String,
    context: String,
}

struct CapturedLogs(mpsc::Receiver<CapturedLog>);

fn forward_captured_logs(captured: NonSend<CapturedLogs>, terminal: Option<ResMut<Terminal>>) {
    let Some(mut terminal) = terminal else {
        // Nothing to forward into yet
        captured.0.try_iter().for_each(drop);
        return;
    };

    for log in captured.0.try_iter() {
        if terminal.log_engine_messages() {
            terminal.log_with_trace(log.kind, log.message, log.context);
        }
    }
}

fn log_type(level: Level) -> TerminalLogType {
    if level == Level::ERROR {
        TerminalLogType::Error
    } else if level == Level::WARN {
        TerminalLogType::Warning
    } else {
        TerminalLogType::Message
    }
}

struct TerminalCaptureLayer {
    sender: mpsc::Sender<CapturedLog>,
}

impl<S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>> Layer<S>
    for TerminalCaptureLayer
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        // The terminal's own diagnostics already reach the buffer
        if metadata.target().starts_with(env!("CARGO_CRATE_NAME")) {
            return;
        }

        let mut message = None;
        event.record(&mut MessageVisitor(&mut message));
        let Some(message) = message else {
            return;
        };

        let context = match (metadata.file(), metadata.line()) {
            (Some(file), Some(line)) => format!("{} ({}:{})", metadata.target(), file, line),
            _ => metadata.target().to_string(),
        };

        let _ = self.sender.send(CapturedLog {
            kind: log_type(*metadata.level()),
            message,
            context,
        });
    }
}

struct MessageVisitor<'a>(&'a mut Option<String>);

impl Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = Some(format!("{value:?}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_type_mapping() {
        assert_eq!(log_type(Level::ERROR), TerminalLogType::Error);
        assert_eq!(log_type(Level::WARN), TerminalLogType::Warning);
        assert_eq!(log_type(Level::INFO), TerminalLogType::Message);
        assert_eq!(log_type(Level::TRACE), TerminalLogType::Message);
    }

    fn app_with_capture() -> (App, mpsc::Sender<CapturedLog>) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(Terminal::default());
        let (sender, receiver) = mpsc::channel();
        app.insert_non_send_resource(CapturedLogs(receiver));
        app.add_systems(PostUpdate, forward_captured_logs);
        (app, sender)
    }

    fn captured(message: &str) -> CapturedLog {
        CapturedLog {
            kind: TerminalLogType::Warning,
            message: message.to_string(),
            context: "my_game (src/main.rs:10)".to_string(),
        }
    }

    #[test]
    fn test_forwarded_into_buffer() {
        let (mut app, sender) = app_with_capture();
        sender.send(captured("low on memory")).unwrap();
        app.update();

        let terminal = app.world().resource::<Terminal>();
        let item = terminal.buffer().logs().back().unwrap();
        assert_eq!(item.message, "low on memory");
        assert_eq!(item.kind, TerminalLogType::Warning);
        assert_eq!(item.stack_trace, "my_game (src/main.rs:10)");
    }

    #[test]
    fn test_forwarding_disabled() {
        let (mut app, sender) = app_with_capture();
        app.world_mut()
            .resource_mut::<Terminal>()
            .set_log_engine_messages(false);

        sender.send(captured("dropped")).unwrap();
        app.update();
        assert!(app.world().resource::<Terminal>().buffer().is_empty());

        // Dropped entries do not reappear when re-enabled
        app.world_mut()
            .resource_mut::<Terminal>()
            .set_log_engine_messages(true);
        app.update();
        assert!(app.world().resource::<Terminal>().buffer().is_empty());
    }
}
