// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `spalloc alloc` - request boards, wait for them, then run a command or
//! hold them until Enter is pressed.
//!
//! The job is always destroyed on the way out, whatever happened.

use super::until_interrupted;
use crate::color;
use crate::exit_error::ExitError;
use crate::output::render_definitions;
use crate::server::ServerArgs;
use anyhow::{Context, Result};
use clap::Args;
use spalloc_client::{ClientError, Config, Job, JobOptions};
use spalloc_core::secs::duration_from_secs;
use spalloc_core::{Geometry, JobId, JobState, MachineInfo};
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[derive(Debug, Default, Args)]
pub struct AllocArgs {
    /// What to allocate: nothing or 1 for one board, NUM for at least NUM
    /// boards, WIDTH HEIGHT for triads, X Y Z for one specific board
    #[arg(value_name = "WHAT", num_args = 0..=3)]
    pub what: Vec<u32>,

    /// Attach to an existing job instead of creating one
    #[arg(long, value_name = "JOB_ID", conflicts_with = "what")]
    pub resume: Option<u64>,

    /// Suppress progress messages
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Only allocate boards from this machine
    #[arg(long, short = 'm', help_heading = "Allocation")]
    pub machine: Option<String>,

    /// Only allocate boards carrying all of these tags
    #[arg(long, short = 't', value_name = "TAG", num_args = 1.., help_heading = "Allocation")]
    pub tags: Option<Vec<String>>,

    /// Least square allocation acceptable when asking for a board count
    #[arg(long, value_name = "RATIO", help_heading = "Allocation")]
    pub min_ratio: Option<f64>,

    /// Dead boards allowed in the allocation, or -1 for any number
    #[arg(long, value_name = "NUM", allow_negative_numbers = true, help_heading = "Allocation")]
    pub max_dead_boards: Option<i64>,

    /// Dead inter-board links allowed, or -1 for any number
    #[arg(long, value_name = "NUM", allow_negative_numbers = true, help_heading = "Allocation")]
    pub max_dead_links: Option<i64>,

    /// Require wrap-around links
    #[arg(long, short = 'w', overrides_with = "no_require_torus", help_heading = "Allocation")]
    pub require_torus: bool,

    /// Do not require wrap-around links
    #[arg(long, short = 'W', help_heading = "Allocation")]
    pub no_require_torus: bool,

    /// Job owner, by convention an email address
    #[arg(long, help_heading = "Server")]
    pub owner: Option<String>,

    /// Seconds the server waits for a keepalive, or -1 to never expire
    #[arg(long, value_name = "SECONDS", allow_negative_numbers = true, help_heading = "Server")]
    pub keepalive: Option<f64>,

    /// Seconds between reconnection attempts
    #[arg(long, value_name = "SECONDS", help_heading = "Server")]
    pub reconnect_delay: Option<f64>,

    #[command(flatten)]
    pub server: ServerArgs,

    /// Run this shell command once the boards are ready, destroying the job
    /// when it exits. {hostname}, {w}, {h} and {ethernet_ips} are substituted
    #[arg(
        long,
        short = 'c',
        value_name = "COMMAND",
        num_args = 1..,
        allow_hyphen_values = true,
        help_heading = "Command"
    )]
    pub command: Option<Vec<String>>,
}

impl AllocArgs {
    /// Job options from the command line. Anything unset falls back to
    /// `config` when resolved.
    pub fn job_options(&self, config: &Config) -> Result<JobOptions, ExitError> {
        let mut options = match self.resume {
            Some(id) => JobOptions::resume(JobId(id)),
            None => {
                let geometry = Geometry::try_from(self.what.as_slice()).map_err(|_| {
                    ExitError::new(
                        2,
                        "expected either no arguments, one argument, NUM, two arguments, \
                         WIDTH HEIGHT, or three arguments X Y Z",
                    )
                })?;
                JobOptions::create(geometry)
            }
        };

        options.hostname = self.server.hostname.clone();
        options.port = self.server.port;
        options.timeout = self.server.timeout_override();
        options.owner = self.owner.clone();
        options.keepalive = self.keepalive.map(duration_from_secs);
        options.reconnect_delay = self.reconnect_delay.and_then(duration_from_secs);
        options.min_ratio = self.min_ratio;
        options.max_dead_boards = self.max_dead_boards.map(|n| u32::try_from(n).ok());
        options.max_dead_links = self.max_dead_links.map(|n| u32::try_from(n).ok());
        if self.require_torus {
            options.require_torus = Some(true);
        } else if self.no_require_torus {
            options.require_torus = Some(false);
        }

        // A named machine replaces tag matching; with neither, ask for the
        // default pool.
        if let Some(machine) = &self.machine {
            options.machine = Some(Some(machine.clone()));
            options.tags = Some(None);
        } else if let Some(tags) = &self.tags {
            options.tags = Some(Some(tags.clone()));
        } else if config.machine.is_none() && config.tags.is_none() {
            options.tags = Some(Some(vec!["default".to_string()]));
        }
        Ok(options)
    }
}

/// Progress messages on stderr, unless `--quiet`.
struct Progress {
    quiet: bool,
}

impl Progress {
    fn show(&self, message: String) {
        if !self.quiet {
            eprintln!("{message}");
        }
    }
}

pub async fn handle(args: AllocArgs, config: &Config) -> Result<()> {
    let settings = args
        .job_options(config)?
        .resolve(config)
        .map_err(|e| ExitError::new(2, format!("Error: {e}")))?;
    let progress = Progress { quiet: args.quiet };

    let mut job = match Job::create(settings).await {
        Ok(job) => job,
        Err(e) if e.is_transport() => {
            progress.show(color::bad(&format!("Could not connect to server: {e}")));
            return Err(ExitError::silent(6).into());
        }
        Err(e @ ClientError::IncompatibleVersion { .. }) => {
            return Err(ExitError::new(2, format!("Error: {e}")).into());
        }
        Err(e) => return Err(ExitError::new(1, format!("Error: {e}")).into()),
    };

    let result = run(&job, &args, &progress).await;
    if let Err(e) = job.destroy(None).await {
        warn!("could not destroy job {}: {}", job.id(), e);
    }
    result
}

async fn run(job: &Job, args: &AllocArgs, progress: &Progress) -> Result<()> {
    wait_for_ready(job, progress).await?;

    let Some(machine) = job.machine_info().await? else {
        anyhow::bail!("job {} is ready but the server did not describe its boards", job.id());
    };
    let mut ip_file = tempfile::Builder::new()
        .prefix("spinnaker_ips_")
        .suffix(".csv")
        .tempfile()
        .context("creating ethernet IP list")?;
    write!(ip_file, "x,y,hostname\n{}", machine.ethernet_csv())?;
    ip_file.flush()?;

    progress.show(color::good(&format!("Job {}: Ready!", job.id())));

    match &args.command {
        Some(command) => run_command(command, &machine, ip_file.path()).await,
        None => {
            println!("{}", render_machine_info(&machine, ip_file.path()));
            hold_until_enter().await
        }
    }
}

/// Report progress until the job is ready; any other ending is an error
/// carrying the exit code for that ending.
async fn wait_for_ready(job: &Job, progress: &Progress) -> Result<()> {
    let id = job.id();
    let mut state = job.state().await?;
    loop {
        match state {
            JobState::Ready => return Ok(()),
            JobState::Queued => {
                progress.show(color::pending(&format!("Job {id}: Waiting in queue...")));
            }
            JobState::Power => {
                progress.show(color::pending(&format!("Job {id}: Waiting for power on...")));
            }
            JobState::Destroyed => {
                let message = match job.last_state().and_then(|s| s.reason) {
                    Some(reason) => format!("Job {id}: Destroyed: {reason}"),
                    None => format!("Job {id}: Destroyed."),
                };
                progress.show(color::bad(&message));
                return Err(ExitError::silent(1).into());
            }
            JobState::Unknown => {
                progress.show(color::bad(&format!("Job {id}: Job not recognised by server.")));
                return Err(ExitError::silent(2).into());
            }
        }

        match until_interrupted(job.wait_for_state_change(state, None)).await {
            Some(next) => state = next?,
            None => {
                progress.show(color::bad(&format!("Job {id}: Destroyed by keyboard interrupt.")));
                return Err(ExitError::silent(4).into());
            }
        }
    }
}

/// Substitute board details into one command argument.
pub fn substitute(arg: &str, machine: &MachineInfo, ip_file: &Path) -> String {
    let hostname = machine.hostname().unwrap_or_default();
    let width = machine.width.to_string();
    let height = machine.height.to_string();
    let ip_file = ip_file.display().to_string();
    [
        ("{}", hostname),
        ("{hostname}", hostname),
        ("{w}", width.as_str()),
        ("{width}", width.as_str()),
        ("{h}", height.as_str()),
        ("{height}", height.as_str()),
        ("{ethernet_ips}", ip_file.as_str()),
    ]
    .iter()
    .fold(arg.to_string(), |acc, (pattern, value)| acc.replace(pattern, value))
}

async fn run_command(command: &[String], machine: &MachineInfo, ip_file: &Path) -> Result<()> {
    info!(
        "allocated {} x {} chip machine in '{}'",
        machine.width, machine.height, machine.machine_name
    );
    info!("chip (0, 0) IP: {}", machine.hostname().unwrap_or("-"));
    info!("all board IPs listed in: {}", ip_file.display());

    let line =
        command.iter().map(|arg| substitute(arg, machine, ip_file)).collect::<Vec<_>>().join(" ");
    let mut child = tokio::process::Command::new("sh")
        .arg("-c")
        .arg(&line)
        .spawn()
        .with_context(|| format!("running {line}"))?;

    let status = loop {
        match until_interrupted(child.wait()).await {
            Some(status) => break status?,
            // Pass the interrupt on and keep waiting for the command to exit.
            None => child.start_kill()?,
        }
    };
    match status.code() {
        Some(0) => Ok(()),
        Some(code) => Err(ExitError::silent(code).into()),
        None => Err(ExitError::silent(1).into()),
    }
}

/// Definition list shown when no command is given.
pub fn render_machine_info(machine: &MachineInfo, ip_file: &Path) -> String {
    let mut info = vec![
        ("Hostname", machine.hostname().unwrap_or("-").to_string()),
        ("Width", machine.width.to_string()),
        ("Height", machine.height.to_string()),
    ];
    if machine.connections.len() > 1 {
        info.push(("Num boards", machine.connections.len().to_string()));
        info.push(("All hostnames", ip_file.display().to_string()));
    }
    info.push(("Running on", machine.machine_name.clone()));
    render_definitions(&info)
}

async fn hold_until_enter() -> Result<()> {
    eprint!("{}", color::muted("<Press enter to destroy job>"));
    let mut line = String::new();
    let mut stdin = BufReader::new(tokio::io::stdin());
    match until_interrupted(stdin.read_line(&mut line)).await {
        Some(read) => {
            read?;
        }
        None => eprintln!(),
    }
    Ok(())
}

#[cfg(test)]
#[path = "alloc_tests.rs"]
mod tests;
