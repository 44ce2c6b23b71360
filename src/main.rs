use anyhow::Result;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use minigit::areas::repository::Repository;
use minigit::artifacts::core::{PagerWriter, should_page};
use minigit::commands::Command;
use minus::Pager;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser)]
#[command(
    name = "minigit",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A small local version-control core",
    long_about = "This is a small local version-control system, written in Rust. \
    It stores file snapshots as commits, keeps named branches, merges them with a \
    three-way file merge and shows line diffs between commits.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

COMMANDS:
{subcommands}

OPTIONS:
{options}
",
)]
struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "The repository root, defaults to the current directory"
    )]
    repo: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Core(Command),
    #[command(
        name = "repl",
        about = "Start an interactive session",
        long_about = "This command reads commands line by line from standard input, \
        printing errors and carrying on, until 'exit', 'quit' or the end of the input."
    )]
    Repl,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let stdout_is_terminal = std::io::stdout().is_terminal();
    if !stdout_is_terminal {
        colored::control::set_override(false);
    }

    let path = match cli.repo {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    match &cli.command {
        Commands::Repl => {
            let repository = Repository::new(&path, Box::new(std::io::stdout()))?;
            repository.repl(std::io::stdin().lock())?;
        }
        Commands::Core(command) if command.is_pageable() && should_page(stdout_is_terminal) => {
            let pager = Pager::new();
            let repository = Repository::new(&path, Box::new(PagerWriter::new(pager.clone())))?;

            repository.execute(command)?;
            minus::page_all(pager)?;
        }
        Commands::Core(command) => {
            let repository = Repository::new(&path, Box::new(std::io::stdout()))?;

            repository.execute(command)?;
        }
    }

    Ok(())
}
