//! cellgraph - Run spreadsheet commands against an in-memory sheet

mod command;
mod config;
mod error;

use anyhow::Context;
use cellgraph_core::Sheet;
use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use command::Command;
use config::Config;

fn print_usage() {
    eprintln!("Usage: cellgraph [OPTIONS] [SCRIPT]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [SCRIPT]                  File of commands to run (default: stdin)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -e, --exec <CMD>          Run a command before the script (can be repeated)");
    eprintln!("  --config <path>           Load settings from TOML file");
    eprintln!("  --no-config               Ignore the user config file");
    eprintln!("  -h, --help                Print help");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  set <CELL> <TEXT>         Set a cell (TEXT may be empty, '=' starts a formula)");
    eprintln!("  get <CELL>                Print a cell's value");
    eprintln!("  text <CELL>               Print a cell's raw text");
    eprintln!("  clear <CELL>              Clear a cell");
    eprintln!("  size                      Print the printable size (rows cols)");
    eprintln!("  values | texts            Print the sheet, tab separated");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut script_path: Option<PathBuf> = None;
    let mut exec: Vec<String> = Vec::new();
    let mut config_file: Option<PathBuf> = None;
    let mut no_config = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-e" | "--exec" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --exec requires a command");
                    std::process::exit(1);
                }
                exec.push(args[i].clone());
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
                config_file = Some(PathBuf::from(&args[i]));
            }
            "--no-config" => {
                no_config = true;
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if script_path.is_none() {
                    script_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    // --no-config only skips the default location; an explicit --config is always read.
    let (config, warnings) = if no_config && config_file.is_none() {
        (Config::default(), Vec::new())
    } else {
        config::load_config(config_file.as_ref())
    };
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    match run(&config, exec, script_path) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Run all commands. Returns whether every command succeeded.
fn run(config: &Config, exec: Vec<String>, script_path: Option<PathBuf>) -> anyhow::Result<bool> {
    let input: Box<dyn BufRead> = match script_path {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None if exec.is_empty() => Box::new(io::stdin().lock()),
        None => Box::new(io::empty()),
    };

    let mut sheet = Sheet::new();
    let mut stdout = io::stdout().lock();
    let mut all_ok = true;

    for (idx, line) in exec.into_iter().map(Ok).chain(input.lines()).enumerate() {
        let line = line.context("Failed to read input")?;
        let line_no = idx + 1;

        let result = Command::parse(&line, line_no).and_then(|command| {
            let Some(command) = command else {
                return Ok(());
            };
            if config.script.echo {
                writeln!(stdout, "> {}", line.trim())?;
            }
            let mut out = String::new();
            let result = command.execute(&mut sheet, &mut out);
            stdout.write_all(out.as_bytes())?;
            result
        });

        if let Err(e) = result {
            stdout.flush()?;
            eprintln!("Error: {}", e);
            all_ok = false;
            if config.script.stop_on_error {
                break;
            }
        }
    }

    stdout.flush()?;
    Ok(all_ok)
}
