//! The terminal controller resource.

use std::fs;
use std::io;
use std::path::Path;

use bevy::prelude::*;

use super::{
    CommandManifest, CommandShell, Completions, KeyBindings, RegistrationError,
    RegistrationReport, ScheduleClock, ScheduledCommands, TerminalAutocomplete, TerminalCommand,
    TerminalHistory, TerminalLog, TerminalLogType, TerminalVariable, script_commands,
};
use crate::settings::TerminalSettings;

/// Written to a missing startup script.
pub const STARTUP_SCRIPT_TEMPLATE: &str = "# each line of this file that doesn't begin with # will be run as a command when the game starts.\n# If you are the developer and you include important stuff here, make sure to include it with your builds. It is not automatically added.";

/// Everything the terminal owns: the shell, its log, history, autocomplete
/// index, key bindings and scheduled commands.
///
/// Handlers reach it through `world.resource_mut::<Terminal>()`.
///
/// # Examples
///
/// ```ignore
/// fn debug_overlay(terminal: Res<Terminal>) {
///     for item in terminal.buffer().logs() {
///         println!("[{}] {}", item.kind, item.message);
///     }
/// }
/// ```
#[derive(Resource, Debug)]
pub struct Terminal {
    shell: CommandShell,
    buffer: TerminalLog,
    history: TerminalHistory,
    autocomplete: TerminalAutocomplete,
    bindings: KeyBindings,
    scheduled: ScheduledCommands,
    log_engine_messages: bool,
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new(&TerminalSettings::default())
    }
}

impl Terminal {
    /// Create a terminal with no commands registered.
    pub fn new(settings: &TerminalSettings) -> Self {
        Self {
            shell: CommandShell::new(),
            buffer: TerminalLog::new(settings.buffer_size),
            history: TerminalHistory::new(),
            autocomplete: TerminalAutocomplete::new(),
            bindings: KeyBindings::new(),
            scheduled: ScheduledCommands::new(),
            log_engine_messages: settings.log_engine_messages,
        }
    }

    #[inline]
    pub fn shell(&self) -> &CommandShell {
        &self.shell
    }

    #[inline]
    pub fn shell_mut(&mut self) -> &mut CommandShell {
        &mut self.shell
    }

    #[inline]
    pub fn buffer(&self) -> &TerminalLog {
        &self.buffer
    }

    #[inline]
    pub fn buffer_mut(&mut self) -> &mut TerminalLog {
        &mut self.buffer
    }

    #[inline]
    pub fn history(&self) -> &TerminalHistory {
        &self.history
    }

    #[inline]
    pub fn history_mut(&mut self) -> &mut TerminalHistory {
        &mut self.history
    }

    #[inline]
    pub fn autocomplete(&self) -> &TerminalAutocomplete {
        &self.autocomplete
    }

    #[inline]
    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    #[inline]
    pub fn scheduled(&self) -> &ScheduledCommands {
        &self.scheduled
    }

    #[inline]
    pub fn scheduled_mut(&mut self) -> &mut ScheduledCommands {
        &mut self.scheduled
    }

    /// Whether engine log events are forwarded into the buffer.
    #[inline]
    pub fn log_engine_messages(&self) -> bool {
        self.log_engine_messages
    }

    pub fn set_log_engine_messages(&mut self, enabled: bool) {
        self.log_engine_messages = enabled;
    }

    /// Append a log entry. Input entries are also pushed to the history.
    pub fn log(&mut self, kind: TerminalLogType, message: impl Into<String>) {
        self.log_with_trace(kind, message, String::new());
    }

    /// Append a log entry with a stack trace or source context.
    pub fn log_with_trace(
        &mut self,
        kind: TerminalLogType,
        message: impl Into<String>,
        stack_trace: impl Into<String>,
    ) {
        let message = message.into();
        if kind == TerminalLogType::Input {
            self.history.push(message.as_str());
        }
        self.buffer.handle_log(message, stack_trace, kind);
    }

    /// Write command output.
    pub fn print(&mut self, message: impl Into<String>) {
        self.log(TerminalLogType::ShellMessage, message);
    }

    /// Write an error entry.
    pub fn log_error(&mut self, message: impl Into<String>) {
        self.log(TerminalLogType::Error, message);
    }

    /// Register a manifest and index the visible command names.
    ///
    /// Registration errors are logged and returned in the report.
    pub fn register(&mut self, manifest: CommandManifest) -> RegistrationReport {
        let report = self.shell.register(manifest);
        for name in &report.added {
            self.autocomplete.register(name);
        }
        for err in &report.errors {
            self.report_registration_error(err);
        }
        report
    }

    /// Register a single command.
    pub fn add_command(&mut self, command: TerminalCommand) -> Result<(), RegistrationError> {
        let (name, info) = command.into_parts();
        let secret = info.secret;
        match self.shell.add_command(&name, info) {
            Ok(()) => {
                if !secret {
                    self.autocomplete.register(&name);
                }
                Ok(())
            }
            Err(err) => {
                self.report_registration_error(&err);
                Err(err)
            }
        }
    }

    /// Register a single variable.
    pub fn add_variable(&mut self, variable: TerminalVariable) -> Result<(), RegistrationError> {
        self.shell.add_variable(variable).inspect_err(|err| {
            self.report_registration_error(err);
        })
    }

    fn report_registration_error(&mut self, err: &RegistrationError) {
        warn!("Terminal registration: {}", err);
        self.log_error(format!("Error: {err}"));
    }

    /// Bind a command line to a key.
    pub fn bind(&mut self, key: KeyCode, line: impl Into<String>) {
        self.bindings.add(key, line);
    }

    /// Remove every line bound to a key.
    pub fn unbind(&mut self, key: KeyCode) -> bool {
        self.bindings.reset(key)
    }

    /// Queue a command line to run after `delay` seconds.
    pub fn schedule(&mut self, delay: f32, line: impl Into<String>, clock: ScheduleClock) {
        self.scheduled.schedule(delay, line, clock);
    }

    /// The error issued by the last dispatch, if any.
    pub fn issued_error(&self) -> Option<&str> {
        self.shell.issued_error()
    }

    /// Complete the last word of `text` against registered command names.
    ///
    /// When several names match, they are written to the log on one line.
    pub fn complete_command(&mut self, text: &mut String) -> Completions {
        let completions = self.autocomplete.complete(text);
        if completions.matches.len() > 1 {
            let width = completions.format_width + 4;
            let line: String = completions
                .matches
                .iter()
                .map(|word| format!("{word:<width$}"))
                .collect();
            self.print(line);
        }
        completions
    }

    /// Run one line and log its issued error.
    pub fn submit(world: &mut World, line: &str) {
        CommandShell::run_command(world, line);

        if let Some(mut terminal) = world.get_resource_mut::<Terminal>()
            && let Some(error) = terminal.issued_error().map(str::to_string)
        {
            terminal.log_error(format!("Error: {error}"));
        }
    }

    /// Run every command of a startup script.
    ///
    /// A missing script is created from [`STARTUP_SCRIPT_TEMPLATE`] and runs
    /// nothing. Returns the number of lines submitted.
    pub fn run_startup_script(world: &mut World, path: &Path) -> io::Result<usize> {
        if !path.exists() {
            fs::write(path, STARTUP_SCRIPT_TEMPLATE)?;
            info!("Terminal: created startup script at {}", path.display());
            return Ok(0);
        }

        let contents = fs::read_to_string(path)?;
        let mut count = 0;
        for line in script_commands(&contents) {
            Self::submit(world, line);
            count += 1;
        }
        debug!("Terminal: ran {} startup commands from {}", count, path.display());
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Resource, Default)]
    struct Counter(i32);

    fn counter_manifest() -> CommandManifest {
        CommandManifest::new()
            .command(
                TerminalCommand::new("CommandAdd", |args, world| {
                    let n = args[0].try_int()?;
                    world.resource_mut::<Counter>().0 += n;
                    Ok(())
                })
                .min_args(1)
                .max_args(1)
                .usage("Add [n]"),
            )
            .command(TerminalCommand::new("CommandAddAll", |_args, _world| Ok(())))
            .command(TerminalCommand::new("CommandHidden", |_args, _world| Ok(())).secret())
    }

    fn world() -> World {
        let mut world = World::new();
        world.init_resource::<Counter>();
        let mut terminal = Terminal::default();
        terminal.register(counter_manifest());
        world.insert_resource(terminal);
        world
    }

    #[test]
    fn test_submit_logs_errors() {
        let mut world = world();
        Terminal::submit(&mut world, "Add 2");
        Terminal::submit(&mut world, "Add x");
        assert_eq!(world.resource::<Counter>().0, 2);

        let terminal = world.resource::<Terminal>();
        let last = terminal.buffer().logs().back().unwrap();
        assert_eq!(last.kind, TerminalLogType::Error);
        assert_eq!(
            last.message,
            "Error: Incorrect type for x, expected <int>\n    -> Usage: Add [n]"
        );
        assert_eq!(terminal.history().entries(), ["Add 2".to_string(), "Add x".to_string()]);
    }

    #[test]
    fn test_registration_errors_logged() {
        let mut terminal = Terminal::default();
        terminal.register(counter_manifest());
        let report = terminal.register(counter_manifest());

        assert_eq!(report.errors.len(), 3);
        assert!(report.added.is_empty());
        let first = &terminal.buffer().logs()[0];
        assert_eq!(first.kind, TerminalLogType::Error);
        assert_eq!(first.message, "Error: Command ADD is already defined.");
    }

    #[test]
    fn test_add_command_indexes_name() {
        let mut terminal = Terminal::default();
        terminal
            .add_command(TerminalCommand::new("CommandWarp", |_args, _world| Ok(())))
            .unwrap();
        assert!(terminal.add_command(TerminalCommand::new("warp", |_args, _world| Ok(()))).is_err());

        let mut text = String::from("wa");
        terminal.complete_command(&mut text);
        assert_eq!(text, "warp");
    }

    #[test]
    fn test_complete_command_lists_matches() {
        let mut terminal = Terminal::default();
        terminal.register(counter_manifest());

        let mut text = String::from("ad");
        let completions = terminal.complete_command(&mut text);
        assert_eq!(text, "add");
        assert_eq!(completions.matches, vec!["add", "addall"]);

        let listing = &terminal.buffer().logs().back().unwrap().message;
        assert_eq!(listing, "add       addall    ");

        // Hidden commands are not indexed
        let mut text = String::from("hid");
        assert!(terminal.complete_command(&mut text).is_empty());
    }

    #[test]
    fn test_log_input_feeds_history() {
        let mut terminal = Terminal::default();
        terminal.print("output");
        terminal.log(TerminalLogType::Input, "Help");
        assert_eq!(terminal.history().entries(), ["Help".to_string()]);
        assert_eq!(terminal.buffer().len(), 2);
    }

    #[test]
    fn test_traced_input_feeds_history() {
        let mut terminal = Terminal::default();
        terminal.log_with_trace(TerminalLogType::Input, "Print hi", "startup script");
        terminal.log_with_trace(TerminalLogType::Warning, "low on memory", "my_game");
        assert_eq!(terminal.history().entries(), ["Print hi".to_string()]);
        assert_eq!(terminal.buffer().logs()[0].stack_trace, "startup script");
    }

    #[test]
    fn test_startup_script_created_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("StartupCommands.txt");
        let mut world = world();

        assert_eq!(Terminal::run_startup_script(&mut world, &path).unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), STARTUP_SCRIPT_TEMPLATE);

        // Template is all comments
        assert_eq!(Terminal::run_startup_script(&mut world, &path).unwrap(), 0);
    }

    #[test]
    fn test_startup_script_runs_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("startup.txt");
        fs::write(&path, "# setup\nAdd 3\n\nAdd 4\n#Add 100\n").unwrap();
        let mut world = world();

        assert_eq!(Terminal::run_startup_script(&mut world, &path).unwrap(), 2);
        assert_eq!(world.resource::<Counter>().0, 7);
    }

    #[test]
    fn test_settings_applied() {
        let settings = TerminalSettings {
            buffer_size: 2,
            log_engine_messages: false,
            ..default()
        };
        let mut terminal = Terminal::new(&settings);
        for m in ["a", "b", "c"] {
            terminal.print(m);
        }
        assert_eq!(terminal.buffer().len(), 2);
        assert!(!terminal.log_engine_messages());
    }
}
