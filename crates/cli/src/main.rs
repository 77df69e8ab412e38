// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! spalloc: allocate SpiNNaker boards and inspect a spalloc server.

mod color;
mod commands;
mod env;
mod exit_error;
mod output;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{alloc, job, machine, ps, where_is};
use exit_error::ExitError;
use spalloc_client::{Config, SearchPath};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "spalloc",
    version = env::VERSION,
    about = "Request and manage SpiNNaker boards from a spalloc server",
    styles = color::styles()
)]
pub(crate) struct Cli {
    /// Log debugging output to stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Allocate boards and hold them while a command runs
    Alloc(alloc::AllocArgs),
    /// Inspect or control a running job
    Job(job::JobArgs),
    /// List the jobs running on the server
    Ps(ps::PsArgs),
    /// List machines, or show the jobs on one machine
    Machine(machine::MachineArgs),
    /// Find a board or chip by its coordinates
    WhereIs(where_is::WhereIsArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = run(cli).await {
        if let Some(exit) = e.downcast_ref::<ExitError>() {
            if !exit.message.is_empty() {
                eprintln!("{}", exit.message);
            }
            std::process::exit(exit.code);
        }
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let search = match env::config_path() {
        Some(path) => SearchPath::single(path),
        None => SearchPath::standard(),
    };
    let config = Config::load(&search).map_err(|e| ExitError::new(1, format!("Error: {e}")))?;

    match cli.command {
        Commands::Alloc(args) => alloc::handle(args, &config).await,
        Commands::Job(args) => job::handle(args, &config).await,
        Commands::Ps(args) => ps::handle(args, &config).await,
        Commands::Machine(args) => machine::handle(args, &config).await,
        Commands::WhereIs(args) => where_is::handle(args, &config).await,
    }
}

fn init_logging(debug: bool) {
    let filter = match env::log_filter() {
        Some(directives) => EnvFilter::new(directives),
        None if debug => EnvFilter::new("debug"),
        None => EnvFilter::new("warn"),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
