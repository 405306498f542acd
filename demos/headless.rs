//! Headless terminal example.
//!
//! Drives the terminal from stdin/stdout, the way a dedicated server would.
//!
//! Run with: `cargo run --example headless --features stdio`
//!
//! Commands:
//! - `Help` - List available commands
//! - `Set` - List variables, `Set Hostname My Server` to change one
//! - `Spawn crate 3` - Spawn entities
//! - `Status` - Show server status
//! - `Schedule 2 Print two seconds later` - Delay a command
//! - `Exit` - Exit the application

use std::io::Write;
use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use bevy_command_terminal::prelude::*;
use bevy_command_terminal::{StdioConfig, StdioPlugin};

#[derive(Resource)]
struct ServerState {
    hostname: String,
    max_players: i32,
    difficulty: Difficulty,
    spawned: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl EnumValue for Difficulty {
    const TYPE_NAME: &'static str = "Difficulty";
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("Easy", Difficulty::Easy),
        ("Normal", Difficulty::Normal),
        ("Hard", Difficulty::Hard),
    ];
}

fn main() {
    println!("=== Headless Terminal Example ===");
    println!("Type commands and press Enter. Type 'Exit' to quit.");
    println!();
    let _ = std::io::stdout().flush();

    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 30.0))),
        )
        .add_plugins(TerminalPlugin::new(TerminalSettings::without_startup_script()))
        .add_plugins(StdioPlugin {
            config: StdioConfig { colored: true },
        })
        .insert_resource(ServerState {
            hostname: "My Server".to_string(),
            max_players: 32,
            difficulty: Difficulty::Normal,
            spawned: Vec::new(),
        })
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut terminal: ResMut<Terminal>) {
    terminal.register(
        CommandManifest::new()
            .command(
                TerminalCommand::new("CommandStatus", |_args, world| {
                    let state = world.resource::<ServerState>();
                    let lines = [
                        "=== Status ===".to_string(),
                        format!("Hostname: {}", state.hostname),
                        format!("Max Players: {}", state.max_players),
                        format!("Difficulty: {:?}", state.difficulty),
                        format!("Spawned: {}", state.spawned.len()),
                    ];
                    let mut terminal = world.resource_mut::<Terminal>();
                    for line in lines {
                        terminal.print(line);
                    }
                    Ok(())
                })
                .max_args(0)
                .help("Show server status"),
            )
            // Real parameters are described by the typed entry below
            .command(
                TerminalCommand::new("FrontCommandSpawn", |args, world| {
                    let kind = args[0].as_str().to_string();
                    let count = args.get(1).map_or(1, CommandArg::as_int);
                    if count < 0 {
                        return Err(CommandError::new("count must not be negative"));
                    }
                    world
                        .resource_mut::<ServerState>()
                        .spawned
                        .extend((0..count).map(|_| kind.clone()));
                    world
                        .resource_mut::<Terminal>()
                        .print(format!("Spawned {count} {kind}"));
                    Ok(())
                })
                .usage("Spawn [kind] [count]"),
            )
            .typed(TypedCommand::new("CommandSpawn", 2, 1).help("Spawn entities of a kind"))
            .variable(TerminalVariable::new(
                "Hostname",
                |world: &World| world.resource::<ServerState>().hostname.clone(),
                |value: String, world: &mut World| {
                    world.resource_mut::<ServerState>().hostname = value;
                    Ok(())
                },
            ))
            .variable(TerminalVariable::new(
                "MaxPlayers",
                |world: &World| world.resource::<ServerState>().max_players,
                |value: i32, world: &mut World| {
                    if !(1..=64).contains(&value) {
                        return Err("MaxPlayers must be between 1 and 64".into());
                    }
                    world.resource_mut::<ServerState>().max_players = value;
                    Ok(())
                },
            ))
            .variable(TerminalVariable::enumeration(
                "Difficulty",
                |world: &World| world.resource::<ServerState>().difficulty,
                |value: Difficulty, world: &mut World| {
                    world.resource_mut::<ServerState>().difficulty = value;
                    Ok(())
                },
            )),
    );
}
