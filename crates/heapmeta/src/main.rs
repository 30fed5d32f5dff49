use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use heapmeta_core::debugger::{BacktraceSource, StandaloneDebugger};
use heapmeta_core::Address;
use heapmeta_utils::{info, init_logging, Settings};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

mod command;
mod shell;

use shell::{Flow, Shell};

/// Attach tags, colors and backtraces to heap chunk addresses.
#[derive(Parser, Debug)]
#[command(name = "heapmeta")]
#[command(version)]
#[command(about = "Attach tags, colors and backtraces to heap chunk addresses", long_about = None)]
struct Cli
{
    /// Snapshot file used by `ptmeta -S` / `ptmeta -L`
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,

    /// File holding gdb `backtrace` output used for backtrace captures
    #[arg(long, value_name = "PATH")]
    backtrace_file: Option<PathBuf>,

    /// Define a variable usable in address expressions (e.g. `--var mem=0xdead0000`)
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_variable)]
    variables: Vec<(String, Address)>,

    /// Disable colored output
    #[arg(long, default_value_t = false)]
    no_color: bool,

    /// Run a command and exit instead of starting the prompt (repeatable)
    #[arg(short = 'x', long = "execute", value_name = "COMMAND")]
    commands: Vec<String>,
}

fn main()
{
    // Reads RUST_LOG; defaults to WARN so the prompt stays quiet
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {e}");
        process::exit(1);
    }

    let cli = Cli::parse();

    let mut settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    if let Some(path) = cli.snapshot {
        settings.snapshot_path = path;
    }
    if let Some(path) = cli.backtrace_file {
        settings.backtrace_file = Some(path);
    }
    if cli.no_color {
        settings.color = false;
    }

    let source = settings
        .backtrace_file
        .clone()
        .map_or(BacktraceSource::None, BacktraceSource::File);
    let mut debugger = StandaloneDebugger::new().with_backtrace_source(source);
    for (name, value) in cli.variables {
        debugger.set_variable(name, value);
    }

    let mut shell = Shell::new(debugger, settings);
    info!("heapmeta session started");

    let result = if cli.commands.is_empty() {
        run_repl(&mut shell)
    } else {
        run_script(&mut shell, &cli.commands)
    };
    info!(records = shell.session().store().len(), "heapmeta session ended");

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Run each `-x` command in order, stopping at the first failure.
fn run_script(shell: &mut Shell<StandaloneDebugger>, commands: &[String]) -> Result<(), Box<dyn std::error::Error>>
{
    let mut stdout = io::stdout().lock();
    for line in commands {
        if shell.run_line(line, &mut stdout)? == Flow::Quit {
            break;
        }
    }
    stdout.flush()?;
    Ok(())
}

fn run_repl(shell: &mut Shell<StandaloneDebugger>) -> Result<(), Box<dyn std::error::Error>>
{
    println!("Type 'help' for available commands, 'quit' to exit.");
    println!();

    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline("(heapmeta) ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                let mut stdout = io::stdout().lock();
                match shell.run_line(line, &mut stdout) {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => eprintln!("Error: {e}"),
                }
                stdout.flush()?;
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn parse_variable(definition: &str) -> Result<(String, Address), String>
{
    let (name, value) = definition
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{definition}'"))?;
    let name = name.trim().trim_start_matches('$');
    if name.is_empty() {
        return Err(format!("missing variable name in '{definition}'"));
    }

    let value = value.trim();
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse::<u64>(),
    };
    parsed
        .map(|raw| (name.to_string(), Address::from(raw)))
        .map_err(|e| format!("invalid value for '{name}': {e}"))
}
