//! Stdin/stdout host for headless builds.
//!
//! Lines read from stdin are submitted as [`TerminalInputEvent`]s and new
//! terminal log entries are printed to stdout.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use bevy::prelude::*;

use crate::core::{Terminal, TerminalInputEvent, TerminalLogType};

/// Plugin that connects the terminal to stdin and stdout.
#[derive(Default)]
pub struct StdioPlugin {
    pub config: StdioConfig,
}

impl Plugin for StdioPlugin {
    fn build(&self, app: &mut App) {
        let (sender, receiver) = mpsc::channel();
        let _handle = spawn_stdin_reader(sender);

        app.insert_resource(StdinReceiver(Mutex::new(receiver)))
            .insert_resource(self.config.clone())
            .add_systems(PreUpdate, read_stdin)
            .add_systems(Last, write_stdout);
    }
}

/// Output options for the stdio host.
#[derive(Resource, Debug, Clone, Default)]
pub struct StdioConfig {
    /// Color entries by kind with ANSI escape codes.
    pub colored: bool,
}

#[derive(Resource)]
struct StdinReceiver(Mutex<Receiver<String>>);

fn spawn_stdin_reader(sender: Sender<String>) -> JoinHandle<()> {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines().map_while(|line| line.ok()) {
            let text = line.trim_end_matches(['\r', '\n']).to_string();
            if text.trim().is_empty() {
                continue;
            }
            if sender.send(text).is_err() {
                break;
            }
        }
    })
}

fn read_stdin(receiver: Res<StdinReceiver>, mut input: MessageWriter<TerminalInputEvent>) {
    let Ok(rx) = receiver.0.lock() else {
        return;
    };
    while let Ok(line) = rx.try_recv() {
        input.write(TerminalInputEvent::new(line));
    }
}

fn write_stdout(terminal: Option<Res<Terminal>>, config: Res<StdioConfig>, mut seen: Local<u64>) {
    let Some(terminal) = terminal else {
        return;
    };
    let buffer = terminal.buffer();
    if buffer.appended() == *seen {
        return;
    }

    let mut stdout = io::stdout().lock();
    for item in buffer.since(*seen) {
        // Typed lines are already on screen
        if item.kind == TerminalLogType::Input {
            continue;
        }
        let _ = if config.colored {
            writeln!(stdout, "{}{}\x1b[0m", color(item.kind), item.message)
        } else {
            writeln!(stdout, "{}", item.message)
        };
    }
    let _ = stdout.flush();
    *seen = buffer.appended();
}

fn color(kind: TerminalLogType) -> &'static str {
    match kind {
        TerminalLogType::Error | TerminalLogType::Exception | TerminalLogType::Assert => "\x1b[31m",
        TerminalLogType::Warning => "\x1b[33m",
        TerminalLogType::Message => "\x1b[0m",
        TerminalLogType::Input => "\x1b[36m",
        TerminalLogType::ShellMessage => "\x1b[32m",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::message::Messages;

    #[test]
    fn test_colors() {
        assert_eq!(color(TerminalLogType::Exception), color(TerminalLogType::Error));
        assert_ne!(color(TerminalLogType::Warning), color(TerminalLogType::ShellMessage));
    }

    #[test]
    fn test_stdin_lines_become_input() {
        let mut app = App::new();
        let (sender, receiver) = mpsc::channel();
        app.add_message::<TerminalInputEvent>()
            .insert_resource(StdinReceiver(Mutex::new(receiver)))
            .add_systems(Update, read_stdin);

        sender.send("Print hi".to_string()).unwrap();
        app.update();

        let messages = app.world().resource::<Messages<TerminalInputEvent>>();
        let mut cursor = messages.get_cursor();
        let lines: Vec<_> = cursor.read(messages).map(|e| e.command.clone()).collect();
        assert_eq!(lines, vec!["Print hi"]);
    }
}
