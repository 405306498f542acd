//! An in-game command terminal for Bevy.
//!
//! bevy_command_terminal provides:
//!
//! - **Commands**: named handlers with argument bounds, help and usage text
//! - **Variables**: named values bound to getter and setter endpoints
//! - **Key bindings** and **scheduled commands** driven by the frame loop
//! - **Autocomplete** and **history** for whatever UI draws the terminal
//!
//! The terminal does no rendering. A host UI writes lines as
//! [`TerminalInputEvent`]s and draws [`Terminal::buffer`].
//!
//! # Features
//!
//! - `log-capture` (default): forward engine log events into the terminal buffer
//! - `stdio`: stdin/stdout host for headless builds
//! - `persist`: RON settings file
//! - `full`: Enable log-capture + persist
//!
//! # Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_command_terminal::prelude::*;
//!
//! #[derive(Resource)]
//! struct Gravity(f32);
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(TerminalPlugin::default())
//!         .insert_resource(Gravity(9.8))
//!         .add_systems(Startup, setup_terminal)
//!         .run();
//! }
//!
//! fn setup_terminal(mut terminal: ResMut<Terminal>) {
//!     terminal.register(
//!         CommandManifest::new()
//!             .command(
//!                 TerminalCommand::new("CommandGreet", |args, world| {
//!                     let name = args[0].as_str().to_string();
//!                     world.resource_mut::<Terminal>().print(format!("Hello, {name}!"));
//!                     Ok(())
//!                 })
//!                 .min_args(1)
//!                 .max_args(1)
//!                 .usage("Greet [name]"),
//!             )
//!             .variable(TerminalVariable::new(
//!                 "Gravity",
//!                 |world: &World| world.resource::<Gravity>().0,
//!                 |value: f32, world: &mut World| {
//!                     world.resource_mut::<Gravity>().0 = value;
//!                     Ok(())
//!                 },
//!             )),
//!     );
//! }
//! ```

use bevy::prelude::*;

// Core interpreter (always available)
pub mod core;

pub mod builtins;
pub mod settings;

// Re-export core types at crate root for convenience
pub use crate::core::{
    ArgError, CommandArg, CommandError, CommandHandler, CommandInfo, CommandManifest,
    CommandResult, CommandShell, Completions, EnumValue, KeyBindings, LogItem, Registration,
    RegistrationError, RegistrationReport, ScheduleClock, ScheduledCommands, Terminal,
    TerminalAutocomplete, TerminalCommand, TerminalEventsPlugin, TerminalHistory,
    TerminalInputEvent, TerminalLog, TerminalLogType, TerminalVariable, Trie, TypedCommand,
    VariableError, VariableKind, VariableValue, tokenize,
};
pub use settings::TerminalSettings;

// Engine log capture (feature-gated)
#[cfg(feature = "log-capture")]
pub mod logging;

// Stdin/stdout host (feature-gated)
#[cfg(feature = "stdio")]
pub mod stdio;

// Persistence module (feature-gated)
#[cfg(feature = "persist")]
pub mod persist;

#[cfg(feature = "log-capture")]
pub use logging::terminal_log_layer;

#[cfg(feature = "persist")]
pub use persist::SettingsError;

#[cfg(feature = "stdio")]
pub use stdio::{StdioConfig, StdioPlugin};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::TerminalPlugin;
    pub use crate::core::{
        CommandArg, CommandError, CommandManifest, CommandResult, CommandShell, EnumValue,
        ScheduleClock, Terminal, TerminalCommand, TerminalInputEvent, TerminalLogType,
        TerminalVariable, TypedCommand,
    };
    pub use crate::settings::TerminalSettings;
}

/// Main terminal plugin.
///
/// Inserts the [`Terminal`] resource with the built-in commands registered,
/// runs the startup script and executes submitted, key-bound and scheduled
/// lines every `Update`.
///
/// # Configuration
///
/// ```ignore
/// TerminalPlugin::new(TerminalSettings::without_startup_script().buffer_size(1024))
/// ```
#[derive(Default)]
pub struct TerminalPlugin {
    pub settings: TerminalSettings,
}

impl TerminalPlugin {
    pub fn new(settings: TerminalSettings) -> Self {
        Self { settings }
    }

    /// Load settings from a RON file, using defaults if it is missing or
    /// invalid.
    #[cfg(feature = "persist")]
    pub fn from_settings_file(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(TerminalSettings::load_or_default(path))
    }
}

impl Plugin for TerminalPlugin {
    fn build(&self, app: &mut App) {
        let mut terminal = Terminal::new(&self.settings);
        terminal.register(builtins::builtin_manifest());

        app.insert_resource(terminal)
            .insert_resource(self.settings.clone())
            .init_resource::<PendingCommands>()
            .add_plugins(TerminalEventsPlugin);

        // Lines are executed in the order they were collected:
        // 1. submitted input  2. key bindings  3. scheduled commands
        app.add_systems(
            Update,
            (
                collect_terminal_input,
                collect_bound_commands,
                collect_scheduled_commands,
                execute_pending_commands,
            )
                .chain(),
        );

        #[cfg(not(target_arch = "wasm32"))]
        app.add_systems(PostStartup, run_startup_commands);
    }
}

/// Lines waiting for exclusive `World` access.
#[derive(Resource, Default)]
struct PendingCommands {
    queue: Vec<String>,
}

fn collect_terminal_input(
    mut input: MessageReader<TerminalInputEvent>,
    mut pending: ResMut<PendingCommands>,
) {
    for event in input.read() {
        pending.queue.push(event.command.clone());
    }
}

fn collect_bound_commands(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    terminal: Res<Terminal>,
    mut pending: ResMut<PendingCommands>,
) {
    let Some(keys) = keys else {
        return;
    };
    if terminal.bindings().is_empty() {
        return;
    }
    pending.queue.extend(terminal.bindings().triggered(&keys));
}

fn collect_scheduled_commands(
    virtual_time: Option<Res<Time<Virtual>>>,
    real_time: Option<Res<Time<Real>>>,
    mut terminal: ResMut<Terminal>,
    mut pending: ResMut<PendingCommands>,
) {
    if terminal.scheduled().is_empty() {
        return;
    }
    let scaled = virtual_time.map_or(0.0, |time| time.delta_secs());
    let real = real_time.map_or(0.0, |time| time.delta_secs());
    pending.queue.extend(terminal.scheduled_mut().advance(scaled, real));
}

/// Exclusive system that submits queued lines with full World access.
fn execute_pending_commands(world: &mut World) {
    let queue = std::mem::take(&mut world.resource_mut::<PendingCommands>().queue);
    for line in queue {
        Terminal::submit(world, &line);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run_startup_commands(world: &mut World) {
    let Some(path) = world
        .get_resource::<TerminalSettings>()
        .and_then(|settings| settings.startup_script.clone())
    else {
        return;
    };

    if let Err(e) = Terminal::run_startup_script(world, &path) {
        warn!("Failed to run startup script '{}': {}", path.display(), e);
    }
}
