//! The `sim` CLI: parses a program, runs it to completion (or timeout),
//! and prints a JSON report.
//!
//! Grounded on the teacher's `crates/cli` binary for the `clap` derive
//! shape and `tracing-subscriber` init-once-in-main pattern.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use coresim::config::Config;
use coresim::isa::parser::parse_program;
use coresim::simulator::Simulator;

#[derive(Parser)]
#[command(name = "sim", version, about = "Cycle-accurate multi-core pipeline simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a program to completion and print a JSON report.
    Run {
        /// Path to the program text file.
        #[arg(long)]
        program: PathBuf,
        /// Path to a JSON config file; omit to use every default.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Enable operand forwarding.
        #[arg(long)]
        forwarding: bool,
        /// Print the sectioned human-readable report instead of JSON.
        #[arg(long)]
        human: bool,
    },
}

fn run(program: PathBuf, config: Option<PathBuf>, forwarding: bool, human: bool) -> coresim::SimResult<()> {
    let text = fs::read_to_string(&program).map_err(|e| {
        coresim::SimError::Config(format!("reading {}: {e}", program.display()))
    })?;
    let parsed = parse_program(&text)?;

    let config = match config {
        Some(path) => {
            let raw = fs::read_to_string(&path).map_err(|e| {
                coresim::SimError::Config(format!("reading {}: {e}", path.display()))
            })?;
            serde_json::from_str::<Config>(&raw)
                .map_err(|e| coresim::SimError::Config(format!("parsing {}: {e}", path.display())))?
        }
        None => Config::default(),
    };

    let mut sim = Simulator::new(parsed, config, forwarding)?;
    let report = sim.run()?;

    if human {
        report.print();
    } else {
        println!("{}", serde_json::to_string_pretty(&report).expect("report is always serializable"));
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let Command::Run { program, config, forwarding, human } = cli.command;

    match run(program, config, forwarding, human) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "simulation failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
