//! Terminal interpreter.
//!
//! - [`Terminal`] - Resource owning everything below
//! - [`CommandShell`] - Command and variable tables, dispatch
//! - [`TerminalCommand`] / [`TypedCommand`] / [`TerminalVariable`] - Registration
//! - [`CommandArg`] - One token with typed coercions
//! - [`TerminalLog`] / [`TerminalHistory`] / [`TerminalAutocomplete`] - Terminal state
//! - [`KeyBindings`] / [`ScheduledCommands`] - Per-frame triggers
//! - [`tokenize`] - Single-space tokenizer

mod arg;
mod autocomplete;
mod bindings;
mod command;
mod events;
mod history;
mod log;
mod schedule;
mod shell;
mod terminal;
mod tokenizer;
mod trie;
mod variable;

pub use arg::{ArgError, CommandArg, EnumValue, ErrorSlot};
pub use autocomplete::{Completions, TerminalAutocomplete};
pub use bindings::KeyBindings;
pub use command::{
    CommandError, CommandHandler, CommandInfo, CommandResult, TerminalCommand, TypedCommand,
    infer_command_name,
};
pub use events::{TerminalEventsPlugin, TerminalInputEvent};
pub use history::TerminalHistory;
pub use log::{DEFAULT_BUFFER_SIZE, LogItem, TerminalLog, TerminalLogType};
pub use schedule::{ScheduleClock, ScheduledCommand, ScheduledCommands};
pub use shell::{CommandManifest, CommandShell, Registration, RegistrationError, RegistrationReport};
pub use terminal::{STARTUP_SCRIPT_TEMPLATE, Terminal};
pub use tokenizer::{join_args, script_commands, tokenize};
pub use trie::{PrefixIter, Trie};
pub use variable::{TerminalVariable, VariableError, VariableKind, VariableType, VariableValue};
