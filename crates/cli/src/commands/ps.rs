// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `spalloc ps` - list live jobs.

use super::until_interrupted;
use crate::color;
use crate::exit_error::ExitError;
use crate::output::{format_secs, format_timestamp, header_row, render_table, Cell};
use crate::server::ServerArgs;
use anyhow::Result;
use clap::Args;
use spalloc_client::Config;
use spalloc_core::{JobState, JobSummary};

#[derive(Debug, Args)]
pub struct PsArgs {
    /// Keep the list up to date as jobs change
    #[arg(long, short = 'w')]
    pub watch: bool,

    /// List only jobs on this machine
    #[arg(long, short = 'm')]
    pub machine: Option<String>,

    /// List only jobs belonging to this owner
    #[arg(long, short = 'o')]
    pub owner: Option<String>,

    #[command(flatten)]
    pub server: ServerArgs,
}

pub async fn handle(args: PsArgs, config: &Config) -> Result<()> {
    let server = args.server.resolve(config)?;
    let mut client = server.connect().await?;

    if args.watch {
        client.notify_job(None, server.timeout).await.map_err(ExitError::communication)?;
    }
    loop {
        let jobs = client.list_jobs(server.timeout).await.map_err(ExitError::communication)?;
        print!("{}", color::clear_screen());
        println!("{}", render_job_list(&jobs, args.machine.as_deref(), args.owner.as_deref()));
        if !args.watch {
            break;
        }

        match until_interrupted(client.wait_for_notification(None)).await {
            Some(result) => {
                result.map_err(ExitError::communication)?;
                println!();
            }
            None => {
                println!();
                break;
            }
        }
    }
    client.close();
    Ok(())
}

/// The job table, filtered by allocated machine and owner.
pub fn render_job_list(jobs: &[JobSummary], machine: Option<&str>, owner: Option<&str>) -> String {
    let mut rows = vec![header_row(&[
        "ID",
        "State",
        "Power",
        "Boards",
        "Machine",
        "Created at",
        "Keepalive",
        "Owner (Host)",
    ])];

    let shown = jobs.iter().filter(|job| {
        matches(machine, job.allocated_machine_name.as_deref())
            && matches(owner, job.owner.as_deref())
    });
    for job in shown {
        let state = job.job_state();
        let state_cell = match state {
            Some(JobState::Queued) => Cell::new("queue").painted(color::pending),
            Some(JobState::Power) => Cell::new("power").painted(color::pending),
            Some(JobState::Ready) => Cell::new("ready").painted(color::good),
            _ => Cell::new(job.state_label()),
        };

        let power_cell = match job.power {
            Some(on) => {
                let paint = if state == Some(JobState::Power) {
                    color::pending
                } else if on {
                    color::good
                } else {
                    color::bad
                };
                Cell::new(if on { "on" } else { "off" }).painted(paint)
            }
            None => Cell::new(""),
        };

        let boards = match &job.boards {
            Some(boards) => Cell::number(boards.len()),
            None => Cell::new(""),
        };

        let mut owner_host = job.owner.clone().unwrap_or_default();
        if let Some(host) = &job.keepalivehost {
            owner_host.push_str(&format!(" ({host})"));
        }

        rows.push(vec![
            Cell::number(job.job_id),
            state_cell,
            power_cell,
            boards,
            Cell::new(job.allocated_machine_name.clone().unwrap_or_default()),
            Cell::new(format_timestamp(job.start_time)),
            Cell::new(format_secs(job.keepalive)),
            Cell::new(owner_host),
        ]);
    }
    render_table(&rows)
}

/// An absent filter matches everything.
fn matches(filter: Option<&str>, value: Option<&str>) -> bool {
    filter.is_none() || filter == value
}

#[cfg(test)]
#[path = "ps_tests.rs"]
mod tests;
