//! Command and variable tables, and line dispatch.
//!
//! The [`CommandShell`] lives inside the [`Terminal`] resource. Dispatch goes
//! through associated functions taking the whole `World`, so handlers can
//! reach any resource, including the terminal itself.

use std::collections::BTreeMap;

use bevy::prelude::*;
use thiserror::Error;

use super::{
    CommandArg, CommandInfo, ErrorSlot, Terminal, TerminalCommand, TerminalLogType,
    TerminalVariable, TypedCommand, VariableError, VariableValue, tokenize,
};

/// Problem found while registering commands or variables.
///
/// Registration errors are collected, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("Command {0} is already defined.")]
    DuplicateCommand(String),
    #[error("there is already a variable called {0}")]
    DuplicateVariable(String),
    #[error("{0} is missing a front command.")]
    MissingFrontCommand(String),
}

/// One entry of a [`CommandManifest`].
#[derive(Debug)]
pub enum Registration {
    Command(TerminalCommand),
    Typed(TypedCommand),
    Variable(TerminalVariable),
}

/// Ordered list of commands and variables to register.
///
/// # Examples
///
/// ```ignore
/// let manifest = CommandManifest::new()
///     .command(TerminalCommand::new("FrontCommandSpawn", spawn).usage("Spawn [kind] [count]"))
///     .typed(TypedCommand::new("CommandSpawn", 2, 1).help("Spawn entities"))
///     .variable(TerminalVariable::new("Gravity", get_gravity, set_gravity));
/// ```
#[derive(Debug, Default)]
pub struct CommandManifest {
    entries: Vec<Registration>,
}

impl CommandManifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command.
    pub fn command(mut self, command: TerminalCommand) -> Self {
        self.entries.push(Registration::Command(command));
        self
    }

    /// Add a typed command description.
    pub fn typed(mut self, typed: TypedCommand) -> Self {
        self.entries.push(Registration::Typed(typed));
        self
    }

    /// Add a variable.
    pub fn variable(mut self, variable: TerminalVariable) -> Self {
        self.entries.push(Registration::Variable(variable));
        self
    }

    /// Append every entry of `other`.
    pub fn merge(mut self, other: CommandManifest) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the manifest is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for CommandManifest {
    type Item = Registration;
    type IntoIter = std::vec::IntoIter<Registration>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Outcome of [`CommandShell::register`].
#[derive(Debug, Default)]
pub struct RegistrationReport {
    /// Names of the visible commands that were added.
    pub added: Vec<String>,
    pub errors: Vec<RegistrationError>,
}

/// Registry of commands and variables.
///
/// Names are case-insensitive and stored upper-cased.
#[derive(Debug, Default)]
pub struct CommandShell {
    commands: BTreeMap<String, CommandInfo>,
    variables: BTreeMap<String, TerminalVariable>,
    issued_error: Option<String>,
}

impl CommandShell {
    /// Create an empty shell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every entry of `manifest`.
    ///
    /// Typed commands are merged into their front handler after all other
    /// entries have been added, so the order inside the manifest does not
    /// matter.
    pub fn register(&mut self, manifest: CommandManifest) -> RegistrationReport {
        let mut report = RegistrationReport::default();
        let mut typed = Vec::new();

        for entry in manifest {
            match entry {
                Registration::Command(command) => {
                    let (name, info) = command.into_parts();
                    let secret = info.secret;
                    match self.add_command(&name, info) {
                        Ok(()) if !secret => report.added.push(name),
                        Ok(()) => {}
                        Err(err) => report.errors.push(err),
                    }
                }
                Registration::Typed(command) => typed.push(command),
                Registration::Variable(variable) => {
                    if let Err(err) = self.add_variable(variable) {
                        report.errors.push(err);
                    }
                }
            }
        }

        for command in typed {
            let key = command.resolved_name().to_uppercase();
            match self.commands.get_mut(&key) {
                Some(front) => {
                    front.min_args = command.min_args();
                    front.max_args = Some(command.max_args());
                    front.help = command.help_text();
                }
                None => report.errors.push(RegistrationError::MissingFrontCommand(key)),
            }
        }

        report
    }

    /// Add a command. The first command registered under a name wins.
    pub fn add_command(&mut self, name: &str, info: CommandInfo) -> Result<(), RegistrationError> {
        let key = name.to_uppercase();
        if self.commands.contains_key(&key) {
            let err = RegistrationError::DuplicateCommand(key);
            self.issue_error(err.to_string());
            return Err(err);
        }
        self.commands.insert(key, info);
        Ok(())
    }

    /// Add a variable. The first variable registered under a name wins.
    pub fn add_variable(&mut self, variable: TerminalVariable) -> Result<(), RegistrationError> {
        let key = variable.name().to_uppercase();
        if self.variables.contains_key(&key) {
            return Err(RegistrationError::DuplicateVariable(key));
        }
        self.variables.insert(key, variable);
        Ok(())
    }

    /// All commands by upper-cased name.
    pub fn commands(&self) -> &BTreeMap<String, CommandInfo> {
        &self.commands
    }

    /// Look up a command, ignoring case.
    pub fn command(&self, name: &str) -> Option<&CommandInfo> {
        self.commands.get(&name.to_uppercase())
    }

    /// All variables by upper-cased name.
    pub fn variables(&self) -> &BTreeMap<String, TerminalVariable> {
        &self.variables
    }

    /// Look up a variable, ignoring case.
    pub fn variable(&self, name: &str) -> Option<&TerminalVariable> {
        self.variables.get(&name.to_uppercase())
    }

    /// Upper-cased names of all variables, sorted.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// The error issued by the last dispatch, if any.
    pub fn issued_error(&self) -> Option<&str> {
        self.issued_error.as_deref()
    }

    /// Record an error. Later errors are ignored until the slot is cleared.
    pub fn issue_error(&mut self, message: impl Into<String>) {
        if self.issued_error.is_none() {
            self.issued_error = Some(message.into());
        }
    }

    /// Clear the issued error.
    pub fn clear_error(&mut self) {
        self.issued_error = None;
    }

    fn append_usage(&mut self, usage: Option<&str>) {
        if let (Some(error), Some(usage)) = (self.issued_error.as_mut(), usage) {
            error.push_str("\n    -> Usage: ");
            error.push_str(usage);
        }
    }

    /// Validate an argument count against a command's bounds.
    ///
    /// ```
    /// use bevy_command_terminal::core::CommandShell;
    ///
    /// assert_eq!(
    ///     CommandShell::check_arity("CLEAR", 0, Some(0), 1).unwrap_err(),
    ///     "CLEAR requires exactly 0 arguments"
    /// );
    /// assert!(CommandShell::check_arity("HELP", 0, Some(1), 1).is_ok());
    /// ```
    pub fn check_arity(
        name: &str,
        min_args: usize,
        max_args: Option<usize>,
        count: usize,
    ) -> Result<(), String> {
        let exact = max_args == Some(min_args);
        if count < min_args {
            let bound = if exact { "exactly" } else { "at least" };
            return Err(arity_message(name, bound, min_args));
        }
        if let Some(max) = max_args.filter(|&max| count > max) {
            let bound = if exact { "exactly" } else { "at most" };
            return Err(arity_message(name, bound, max));
        }
        Ok(())
    }

    /// Parse and execute one line.
    ///
    /// The line is echoed into the log as an input entry. Failures are
    /// recorded as the issued error, never returned.
    pub fn run_command(world: &mut World, line: &str) {
        let (name, info, args) = {
            let Some(mut terminal) = world.get_resource_mut::<Terminal>() else {
                warn!("Terminal resource missing, dropping command: {}", line);
                return;
            };
            terminal.log(TerminalLogType::Input, line);

            let shell = terminal.shell_mut();
            shell.clear_error();

            let tokens = tokenize(line);
            let Some((first, rest)) = tokens.split_first() else {
                return;
            };
            let name = first.to_uppercase();

            let Some(info) = shell.commands.get(&name).cloned() else {
                shell.issue_error(format!("Command {name} could not be found"));
                return;
            };

            if let Err(message) =
                Self::check_arity(&name, info.min_args, info.max_args, rest.len())
            {
                shell.issue_error(message);
                shell.append_usage(info.usage);
                return;
            }

            (name, info, rest.to_vec())
        };

        let errors = ErrorSlot::new();
        let args: Vec<CommandArg<'_>> = args
            .iter()
            .map(|token| CommandArg::with_errors(token, &errors))
            .collect();

        debug!("Terminal: running {}", name);
        let result = (info.proc)(&args, world);

        let Some(mut terminal) = world.get_resource_mut::<Terminal>() else {
            return;
        };
        let shell = terminal.shell_mut();
        if let Some(message) = errors.take() {
            shell.issue_error(message);
        }
        if let Err(err) = result {
            shell.issue_error(err.0);
        }
        if shell.issued_error.is_some() {
            shell.append_usage(info.usage);
        }
    }

    /// Coerce `raw` to the variable's kind and write it.
    pub fn set_variable(world: &mut World, name: &str, raw: &str) -> Result<(), VariableError> {
        Self::set_variable_arg(world, name, &CommandArg::new(raw))
    }

    /// Coerce `arg` to the variable's kind and write it.
    pub fn set_variable_arg(
        world: &mut World,
        name: &str,
        arg: &CommandArg<'_>,
    ) -> Result<(), VariableError> {
        let variable = world
            .get_resource::<Terminal>()
            .and_then(|terminal| terminal.shell().variable(name).cloned())
            .ok_or_else(|| VariableError::Unknown(name.to_uppercase()))?;
        variable.set(arg, world)
    }

    /// Read a variable.
    pub fn get_variable(world: &World, name: &str) -> Result<VariableValue, VariableError> {
        let variable = world
            .get_resource::<Terminal>()
            .and_then(|terminal| terminal.shell().variable(name))
            .ok_or_else(|| VariableError::Unknown(name.to_uppercase()))?;
        Ok(variable.get(world))
    }
}

fn arity_message(name: &str, bound: &str, count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("{name} requires {bound} {count} argument{plural}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CommandError, TypedCommand};

    #[derive(Resource, Default)]
    struct Calls(Vec<String>);

    #[derive(Resource, Default)]
    struct Speed(f32);

    fn world_with(manifest: CommandManifest) -> (World, RegistrationReport) {
        let mut world = World::new();
        world.init_resource::<Calls>();
        world.init_resource::<Speed>();
        let mut terminal = Terminal::default();
        let report = terminal.shell_mut().register(manifest);
        world.insert_resource(terminal);
        (world, report)
    }

    fn record(args: &[CommandArg<'_>], world: &mut World) -> Result<(), CommandError> {
        let line = args.iter().map(CommandArg::as_str).collect::<Vec<_>>().join(",");
        world.resource_mut::<Calls>().0.push(line);
        Ok(())
    }

    fn issued(world: &World) -> Option<String> {
        world.resource::<Terminal>().shell().issued_error().map(str::to_string)
    }

    fn calls(world: &World) -> Vec<String> {
        world.resource::<Calls>().0.clone()
    }

    #[test]
    fn test_dispatch_case_insensitive() {
        let (mut world, report) =
            world_with(CommandManifest::new().command(TerminalCommand::new("CommandEcho", record)));
        assert_eq!(report.added, vec!["Echo"]);

        CommandShell::run_command(&mut world, "echo a b");
        CommandShell::run_command(&mut world, "ECHO c");

        assert_eq!(calls(&world), vec!["a,b", "c"]);
        assert_eq!(issued(&world), None);
    }

    #[test]
    fn test_unknown_command() {
        let (mut world, _) = world_with(CommandManifest::new());
        CommandShell::run_command(&mut world, "bogus 1");
        assert_eq!(issued(&world).as_deref(), Some("Command BOGUS could not be found"));

        // Input is still echoed
        let terminal = world.resource::<Terminal>();
        let last = terminal.buffer().logs().back().unwrap();
        assert_eq!(last.kind, TerminalLogType::Input);
        assert_eq!(last.message, "bogus 1");
    }

    #[test]
    fn test_empty_line_is_noop() {
        let (mut world, _) = world_with(CommandManifest::new());
        CommandShell::run_command(&mut world, "   ");
        assert_eq!(issued(&world), None);
    }

    #[test]
    fn test_arity_exactly_with_usage() {
        let (mut world, _) = world_with(CommandManifest::new().command(
            TerminalCommand::new("CommandUnbind", record)
                .min_args(1)
                .max_args(1)
                .usage("Unbind [key]"),
        ));

        CommandShell::run_command(&mut world, "Unbind");
        assert_eq!(
            issued(&world).as_deref(),
            Some("UNBIND requires exactly 1 argument\n    -> Usage: Unbind [key]")
        );

        CommandShell::run_command(&mut world, "Unbind a b");
        assert_eq!(
            issued(&world).as_deref(),
            Some("UNBIND requires exactly 1 argument\n    -> Usage: Unbind [key]")
        );
        assert!(calls(&world).is_empty());
    }

    #[test]
    fn test_arity_bounds() {
        assert_eq!(
            CommandShell::check_arity("BIND", 2, None, 1).unwrap_err(),
            "BIND requires at least 2 arguments"
        );
        assert_eq!(
            CommandShell::check_arity("HELP", 0, Some(1), 3).unwrap_err(),
            "HELP requires at most 1 argument"
        );
        assert!(CommandShell::check_arity("PRINT", 0, None, 40).is_ok());
    }

    #[test]
    fn test_soft_arg_error_appends_usage() {
        let (mut world, _) = world_with(CommandManifest::new().command(
            TerminalCommand::new("CommandCount", |args, world| {
                let n = args[0].as_int();
                world.resource_mut::<Calls>().0.push(n.to_string());
                Ok(())
            })
            .min_args(1)
            .usage("Count [n]"),
        ));

        CommandShell::run_command(&mut world, "Count many");

        // The handler still ran with the default value
        assert_eq!(calls(&world), vec!["0"]);
        assert_eq!(
            issued(&world).as_deref(),
            Some("Incorrect type for many, expected <int>\n    -> Usage: Count [n]")
        );
    }

    #[test]
    fn test_handler_error_issued() {
        let (mut world, _) = world_with(CommandManifest::new().command(TerminalCommand::new(
            "CommandFail",
            |_args, _world| Err("nope".into()),
        )));

        CommandShell::run_command(&mut world, "Fail");
        assert_eq!(issued(&world).as_deref(), Some("nope"));

        // Next dispatch clears the slot
        CommandShell::run_command(&mut world, "");
        assert_eq!(issued(&world), None);
    }

    #[test]
    fn test_duplicate_command_first_wins() {
        let (mut world, report) = world_with(
            CommandManifest::new()
                .command(TerminalCommand::new("CommandEcho", record))
                .command(TerminalCommand::new("echo", |_args, _world| Err("second".into()))),
        );

        assert_eq!(report.errors, vec![RegistrationError::DuplicateCommand("ECHO".into())]);
        assert_eq!(issued(&world).as_deref(), Some("Command ECHO is already defined."));

        CommandShell::run_command(&mut world, "echo x");
        assert_eq!(calls(&world), vec!["x"]);
    }

    #[test]
    fn test_secret_not_reported() {
        let (world, report) = world_with(
            CommandManifest::new()
                .command(TerminalCommand::new("CommandQuit", record).secret())
                .command(TerminalCommand::new("CommandExit", record)),
        );
        assert_eq!(report.added, vec!["Exit"]);
        assert_eq!(world.resource::<Terminal>().shell().commands().len(), 2);
    }

    #[test]
    fn test_typed_command_merges_into_front() {
        let (mut world, report) = world_with(
            CommandManifest::new()
                .typed(TypedCommand::new("CommandSpawn", 3, 1).help("Spawns things"))
                .command(TerminalCommand::new("FrontCommandSpawn", record).usage("Spawn a b [c]")),
        );
        assert!(report.errors.is_empty());

        let info = world.resource::<Terminal>().shell().command("spawn").cloned().unwrap();
        assert_eq!(info.min_args, 2);
        assert_eq!(info.max_args, Some(3));
        assert_eq!(info.help, Some("Spawns things"));
        assert_eq!(info.usage, Some("Spawn a b [c]"));

        CommandShell::run_command(&mut world, "Spawn a");
        assert_eq!(
            issued(&world).as_deref(),
            Some("SPAWN requires at least 2 arguments\n    -> Usage: Spawn a b [c]")
        );
    }

    #[test]
    fn test_typed_command_missing_front() {
        let (_, report) =
            world_with(CommandManifest::new().typed(TypedCommand::new("CommandWarp", 1, 0)));
        assert_eq!(report.errors, vec![RegistrationError::MissingFrontCommand("WARP".into())]);
        assert_eq!(report.errors[0].to_string(), "WARP is missing a front command.");
    }

    fn speed_variable() -> TerminalVariable {
        TerminalVariable::new(
            "Speed",
            |world: &World| world.resource::<Speed>().0,
            |value: f32, world: &mut World| {
                world.resource_mut::<Speed>().0 = value;
                Ok(())
            },
        )
    }

    #[test]
    fn test_variables() {
        let (mut world, report) = world_with(
            CommandManifest::new()
                .variable(speed_variable())
                .variable(speed_variable()),
        );
        assert_eq!(report.errors, vec![RegistrationError::DuplicateVariable("SPEED".into())]);

        CommandShell::set_variable(&mut world, "speed", "2.5").unwrap();
        assert_eq!(
            CommandShell::get_variable(&world, "SPEED"),
            Ok(VariableValue::Float(2.5))
        );

        assert!(matches!(
            CommandShell::set_variable(&mut world, "speed", "fast"),
            Err(VariableError::Coercion(_))
        ));
        assert_eq!(
            CommandShell::set_variable(&mut world, "gravity", "1"),
            Err(VariableError::Unknown("GRAVITY".into()))
        );
        assert_eq!(
            world.resource::<Terminal>().shell().variable_names().collect::<Vec<_>>(),
            vec!["SPEED"]
        );
    }
}
