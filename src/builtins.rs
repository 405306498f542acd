//! Commands and variables every terminal starts with.

use std::time::Instant;

use bevy::prelude::*;

use crate::core::{
    CommandArg, CommandManifest, CommandResult, CommandShell, ScheduleClock, Terminal,
    TerminalCommand, TerminalVariable, join_args,
};

/// Width names are padded to in listings.
const LISTING_WIDTH: usize = 16;

/// Manifest of the built-in commands and variables.
pub fn builtin_manifest() -> CommandManifest {
    let manifest = CommandManifest::new()
        .command(
            TerminalCommand::new("CommandClear", command_clear)
                .max_args(0)
                .help("Clears the Command Console"),
        )
        .command(
            TerminalCommand::new("CommandHelp", command_help)
                .max_args(1)
                .help("Lists all Commands or displays help documentation of a Command")
                .usage("Help [command]"),
        )
        .command(
            TerminalCommand::new("CommandTime", command_time)
                .min_args(1)
                .help("Measures the time taken by a command")
                .usage("Time [command]"),
        )
        .command(
            TerminalCommand::new("CommandSchedule", command_schedule)
                .min_args(2)
                .help("Executes a command after a delay in scaled time")
                .usage("schedule [delay] [command] - delay is in seconds"),
        )
        .command(
            TerminalCommand::new("CommandScheduleUnscaled", command_schedule_unscaled)
                .min_args(2)
                .help("Executes a command after a delay in real time")
                .usage("scheduleunscaled [delay] [command] - delay is in seconds"),
        )
        .command(
            TerminalCommand::new("CommandPrint", command_print).help("Prints text to the console"),
        );

    #[cfg(debug_assertions)]
    let manifest = manifest.command(
        TerminalCommand::new("CommandTrace", command_trace)
            .max_args(0)
            .help("Prints the stack trace of the last message"),
    );

    manifest
        .command(
            TerminalCommand::new("CommandSet", command_set)
                .help("Lists all variables or sets the value of one")
                .usage("Set [variable] [value]"),
        )
        .command(
            TerminalCommand::new("CommandBind", command_bind)
                .min_args(2)
                .help("Binds a key to a command")
                .usage("Bind [key] [command]"),
        )
        .command(
            TerminalCommand::new("CommandUnbind", command_unbind)
                .min_args(1)
                .max_args(1)
                .help("Removes every command bound to a key")
                .usage("Unbind [key]"),
        )
        .command(TerminalCommand::new("CommandNoop", command_noop).help("Does nothing"))
        .command(TerminalCommand::new("CommandQuit", command_exit).max_args(0).secret())
        .command(
            TerminalCommand::new("CommandExit", command_exit)
                .max_args(0)
                .help("Quits the application"),
        )
        .variable(TerminalVariable::new(
            "HandleLog",
            |world: &World| {
                world
                    .get_resource::<Terminal>()
                    .is_some_and(Terminal::log_engine_messages)
            },
            |enabled: bool, world: &mut World| {
                terminal_mut(world)?.set_log_engine_messages(enabled);
                Ok(())
            },
        ))
        .variable(TerminalVariable::new("TimeScale", time_scale, set_time_scale))
}

fn terminal_mut(world: &mut World) -> Result<Mut<'_, Terminal>, &'static str> {
    world
        .get_resource_mut::<Terminal>()
        .ok_or("terminal resource missing")
}

fn command_clear(_args: &[CommandArg<'_>], world: &mut World) -> CommandResult {
    terminal_mut(world)?.buffer_mut().clear();
    Ok(())
}

fn command_help(args: &[CommandArg<'_>], world: &mut World) -> CommandResult {
    let mut terminal = terminal_mut(world)?;

    let Some(arg) = args.first() else {
        let listing: Vec<String> = terminal
            .shell()
            .commands()
            .iter()
            .filter(|(_, info)| !info.secret)
            .map(|(name, info)| {
                format!("{name:<LISTING_WIDTH$}: {}", info.help.unwrap_or_default())
            })
            .collect();
        for line in listing {
            terminal.print(line);
        }
        return Ok(());
    };

    let name = arg.as_str().to_uppercase();
    let Some(info) = terminal.shell().command(&name).cloned() else {
        return Err(format!("Command {name} could not be found.").into());
    };

    match info.help {
        None => terminal.print(format!("{name} does not provide any help documentation.")),
        Some(help) => match info.usage {
            Some(usage) => terminal.print(format!("{help}\nUsage: {usage}")),
            None => terminal.print(help),
        },
    }
    Ok(())
}

fn command_time(args: &[CommandArg<'_>], world: &mut World) -> CommandResult {
    let line = join_args(args, 0);
    let start = Instant::now();
    CommandShell::run_command(world, &line);
    let elapsed = start.elapsed().as_secs_f64() * 1000.0;

    terminal_mut(world)?.print(format!("Time: {elapsed:.4}ms"));
    Ok(())
}

fn schedule(args: &[CommandArg<'_>], world: &mut World, clock: ScheduleClock) -> CommandResult {
    let delay = args[0].try_float()?;
    if !delay.is_finite() {
        return Err(format!("Invalid delay {}", args[0]).into());
    }
    terminal_mut(world)?.schedule(delay, join_args(args, 1), clock);
    Ok(())
}

fn command_schedule(args: &[CommandArg<'_>], world: &mut World) -> CommandResult {
    schedule(args, world, ScheduleClock::Scaled)
}

fn command_schedule_unscaled(args: &[CommandArg<'_>], world: &mut World) -> CommandResult {
    schedule(args, world, ScheduleClock::Unscaled)
}

fn command_print(args: &[CommandArg<'_>], world: &mut World) -> CommandResult {
    terminal_mut(world)?.print(join_args(args, 0));
    Ok(())
}

#[cfg(debug_assertions)]
fn command_trace(_args: &[CommandArg<'_>], world: &mut World) -> CommandResult {
    let mut terminal = terminal_mut(world)?;
    let logs = terminal.buffer().logs();

    // The last entry is the echo of this command
    let output = match logs.len().checked_sub(2).and_then(|i| logs.get(i)) {
        None => "Nothing to trace.".to_string(),
        Some(item) if item.stack_trace.is_empty() => format!("{} (no trace)", item.message),
        Some(item) => item.stack_trace.clone(),
    };
    terminal.print(output);
    Ok(())
}

fn command_set(args: &[CommandArg<'_>], world: &mut World) -> CommandResult {
    let Some(name) = args.first() else {
        let names: Vec<String> = world
            .get_resource::<Terminal>()
            .map(|terminal| terminal.shell().variable_names().map(str::to_string).collect())
            .unwrap_or_default();

        let reader: &World = world;
        let listing: Vec<String> = names
            .iter()
            .filter_map(|name| {
                let value = CommandShell::get_variable(reader, name).ok()?;
                Some(format!("{name:<LISTING_WIDTH$}: {value}"))
            })
            .collect();

        let mut terminal = terminal_mut(world)?;
        for line in listing {
            terminal.print(line);
        }
        return Ok(());
    };

    CommandShell::set_variable(world, name.as_str(), &join_args(args, 1))?;
    Ok(())
}

fn command_bind(args: &[CommandArg<'_>], world: &mut World) -> CommandResult {
    let Some(key) = args[0].as_enum::<KeyCode>() else {
        return Ok(());
    };
    terminal_mut(world)?.bind(key, join_args(args, 1));
    Ok(())
}

fn command_unbind(args: &[CommandArg<'_>], world: &mut World) -> CommandResult {
    let Some(key) = args[0].as_enum::<KeyCode>() else {
        return Ok(());
    };
    terminal_mut(world)?.unbind(key);
    Ok(())
}

fn command_noop(_args: &[CommandArg<'_>], _world: &mut World) -> CommandResult {
    Ok(())
}

fn command_exit(_args: &[CommandArg<'_>], world: &mut World) -> CommandResult {
    world.write_message(AppExit::Success);
    Ok(())
}

fn time_scale(world: &World) -> f32 {
    world
        .get_resource::<Time<Virtual>>()
        .map_or(1.0, Time::<Virtual>::relative_speed)
}

fn set_time_scale(scale: f32, world: &mut World) -> CommandResult {
    if !scale.is_finite() || scale < 0.0 {
        return Err(format!("TimeScale must be a non-negative number, got {scale}").into());
    }
    let mut time = world
        .get_resource_mut::<Time<Virtual>>()
        .ok_or("virtual time is not available")?;
    time.set_relative_speed(scale);
    Ok(())
}
