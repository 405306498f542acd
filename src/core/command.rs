//! Terminal command definitions.
//!
//! Commands are described with [`TerminalCommand`] and registered through a
//! [`CommandManifest`](super::CommandManifest). Handlers receive the
//! arguments following the command name and the whole `World`.

use std::fmt;
use std::sync::Arc;

use bevy::prelude::*;
use thiserror::Error;

use super::{ArgError, CommandArg};

/// Failure reported by a command handler.
///
/// The message is surfaced as the terminal's issued error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CommandError(pub String);

impl CommandError {
    /// Create an error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<String> for CommandError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for CommandError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

impl From<ArgError> for CommandError {
    fn from(err: ArgError) -> Self {
        Self(err.to_string())
    }
}

/// Result returned by command handlers and variable setters.
pub type CommandResult = Result<(), CommandError>;

/// Shared command handler.
///
/// Handlers are cloned out of the command table before they run, so a handler
/// may dispatch other commands through the same terminal.
pub type CommandHandler =
    Arc<dyn Fn(&[CommandArg<'_>], &mut World) -> CommandResult + Send + Sync>;

/// A registered command.
#[derive(Clone)]
pub struct CommandInfo {
    pub proc: CommandHandler,
    pub min_args: usize,
    /// Upper bound on arguments, `None` for unbounded.
    pub max_args: Option<usize>,
    pub help: Option<&'static str>,
    pub usage: Option<&'static str>,
    /// Hidden from listings and autocomplete.
    pub secret: bool,
}

impl fmt::Debug for CommandInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandInfo")
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .field("help", &self.help)
            .field("usage", &self.usage)
            .field("secret", &self.secret)
            .finish_non_exhaustive()
    }
}

/// Builder for a command with the standard handler shape.
///
/// Without an explicit [`name`](Self::name) the command name is inferred from
/// the host identifier by removing an embedded `FRONT` marker and then an
/// embedded `COMMAND` marker, ignoring case.
///
/// # Examples
///
/// ```ignore
/// let clear = TerminalCommand::new("CommandClear", |_args, world| {
///     world.resource_mut::<Terminal>().buffer_mut().clear();
///     Ok(())
/// })
/// .max_args(0)
/// .help("Clears the Command Console");
///
/// assert_eq!(clear.resolved_name(), "Clear");
/// ```
pub struct TerminalCommand {
    host_name: &'static str,
    name: Option<&'static str>,
    proc: CommandHandler,
    min_args: usize,
    max_args: Option<usize>,
    help: Option<&'static str>,
    usage: Option<&'static str>,
    secret: bool,
}

impl TerminalCommand {
    /// Create a command bound to the host identifier `host_name`.
    pub fn new<F>(host_name: &'static str, handler: F) -> Self
    where
        F: Fn(&[CommandArg<'_>], &mut World) -> CommandResult + Send + Sync + 'static,
    {
        Self {
            host_name,
            name: None,
            proc: Arc::new(handler),
            min_args: 0,
            max_args: None,
            help: None,
            usage: None,
            secret: false,
        }
    }

    /// Set the command name explicitly.
    pub fn name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Set the minimum number of arguments.
    pub fn min_args(mut self, min: usize) -> Self {
        self.min_args = min;
        self
    }

    /// Set the maximum number of arguments.
    pub fn max_args(mut self, max: usize) -> Self {
        self.max_args = Some(max);
        self
    }

    /// Set the help text.
    pub fn help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    /// Set the usage text.
    pub fn usage(mut self, usage: &'static str) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Hide the command from listings and autocomplete.
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// The host identifier this command was created from.
    #[inline]
    pub fn host_name(&self) -> &'static str {
        self.host_name
    }

    /// The name the command is registered under, before upper-casing.
    pub fn resolved_name(&self) -> String {
        match self.name {
            Some(name) => name.to_string(),
            None => infer_command_name(self.host_name),
        }
    }

    /// Split into the registered name and the command entry.
    pub fn into_parts(self) -> (String, CommandInfo) {
        let name = self.resolved_name();
        (
            name,
            CommandInfo {
                proc: self.proc,
                min_args: self.min_args,
                max_args: self.max_args,
                help: self.help,
                usage: self.usage,
                secret: self.secret,
            },
        )
    }
}

impl fmt::Debug for TerminalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalCommand")
            .field("host_name", &self.host_name)
            .field("name", &self.name)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .finish_non_exhaustive()
    }
}

/// A command whose host signature does not take an argument slice.
///
/// It only describes the real parameter list. On registration it is merged
/// into the front handler registered under the same name, which receives the
/// arity and help described here.
#[derive(Debug, Clone)]
pub struct TypedCommand {
    host_name: &'static str,
    name: Option<&'static str>,
    params: usize,
    optional: usize,
    help: Option<&'static str>,
}

impl TypedCommand {
    /// Describe a command with `params` parameters, `optional` of which may be
    /// omitted.
    pub fn new(host_name: &'static str, params: usize, optional: usize) -> Self {
        Self {
            host_name,
            name: None,
            params,
            optional: optional.min(params),
            help: None,
        }
    }

    /// Set the command name explicitly.
    pub fn name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Set the help text given to the front handler.
    pub fn help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    /// The name of the front handler this command merges into.
    pub fn resolved_name(&self) -> String {
        match self.name {
            Some(name) => name.to_string(),
            None => infer_command_name(self.host_name),
        }
    }

    /// Number of required parameters.
    pub fn min_args(&self) -> usize {
        self.params - self.optional
    }

    /// Total number of parameters.
    pub fn max_args(&self) -> usize {
        self.params
    }

    /// Help text, if any.
    pub fn help_text(&self) -> Option<&'static str> {
        self.help
    }
}

/// Infer a command name from a host identifier.
///
/// ```
/// use bevy_command_terminal::core::infer_command_name;
///
/// assert_eq!(infer_command_name("CommandClear"), "Clear");
/// assert_eq!(infer_command_name("FrontCommandSpawn"), "Spawn");
/// assert_eq!(infer_command_name("command_help"), "help");
/// ```
pub fn infer_command_name(host_name: &str) -> String {
    let name = strip_marker(host_name, "FRONT");
    let name = strip_marker(&name, "COMMAND");
    name.trim_matches('_').to_string()
}

/// Remove the first case-insensitive occurrence of an ASCII `marker`.
fn strip_marker(name: &str, marker: &str) -> String {
    let found = name
        .as_bytes()
        .windows(marker.len())
        .position(|window| window.eq_ignore_ascii_case(marker.as_bytes()));

    match found {
        Some(start) => format!("{}{}", &name[..start], &name[start + marker.len()..]),
        None => name.to_string(),
    }
}
