// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `spalloc job` - inspect and control one running job.

use super::until_interrupted;
use crate::color;
use crate::exit_error::ExitError;
use crate::output::{format_secs, format_timestamp, render_definitions};
use crate::server::{Server, ServerArgs};
use anyhow::Result;
use clap::Args;
use spalloc_client::{Config, ProtocolClient};
use spalloc_core::{JobId, JobMachineInfo, JobState, JobStateSnapshot};

#[derive(Debug, Args)]
pub struct JobArgs {
    /// Job of interest; optional if the owner has exactly one job
    pub job_id: Option<u64>,

    /// Owner whose only job is meant when no ID is given
    #[arg(long, short = 'o')]
    pub owner: Option<String>,

    #[command(flatten)]
    pub action: JobAction,

    #[command(flatten)]
    pub server: ServerArgs,
}

#[derive(Debug, Default, Args)]
#[group(multiple = false)]
pub struct JobAction {
    /// Show basic job information (the default)
    #[arg(long, short = 'i')]
    pub info: bool,

    /// Watch the job for state changes
    #[arg(long, short = 'w')]
    pub watch: bool,

    /// Power on or reset the job's boards
    #[arg(long, short = 'p', visible_alias = "reset", visible_short_alias = 'r')]
    pub power_on: bool,

    /// Power off the job's boards
    #[arg(long)]
    pub power_off: bool,

    /// Print the IPs of all Ethernet connected chips as a CSV
    #[arg(long, short = 'e')]
    pub ethernet_ips: bool,

    /// Destroy a queued or running job
    #[arg(long, short = 'D', value_name = "REASON", num_args = 0..=1, default_missing_value = "")]
    pub destroy: Option<String>,
}

pub async fn handle(args: JobArgs, config: &Config) -> Result<()> {
    let server = args.server.resolve(config)?;
    let owner = args.owner.clone().or_else(|| config.owner.clone());
    if args.job_id.is_none() && owner.is_none() {
        return Err(ExitError::new(2, "job ID (or --owner) not specified").into());
    }

    let mut client = server.connect().await?;
    let result = run(&mut client, &server, &args, owner.as_deref()).await;
    client.close();
    result
}

async fn run(
    client: &mut ProtocolClient,
    server: &Server,
    args: &JobArgs,
    owner: Option<&str>,
) -> Result<()> {
    let id = match args.job_id {
        Some(id) => JobId(id),
        None => discover(client, server, owner.unwrap_or_default()).await?,
    };

    let action = &args.action;
    if action.watch {
        watch(client, server, id).await
    } else if action.power_on {
        power(client, server, id, true).await
    } else if action.power_off {
        power(client, server, id, false).await
    } else if action.ethernet_ips {
        ethernet_ips(client, server, id).await
    } else if let Some(reason) = &action.destroy {
        let reason = match (reason.as_str(), owner) {
            ("", Some(owner)) => Some(format!("Destroyed by {owner}")),
            ("", None) => None,
            (given, _) => Some(given.to_string()),
        };
        client
            .destroy_job(id, reason.as_deref(), server.timeout)
            .await
            .map_err(ExitError::communication)?;
        Ok(())
    } else {
        println!("{}", job_info(client, server, id).await?);
        Ok(())
    }
}

/// The owner's only live job.
async fn discover(client: &mut ProtocolClient, server: &Server, owner: &str) -> Result<JobId> {
    let jobs = client.list_jobs(server.timeout).await.map_err(ExitError::communication)?;
    let ids: Vec<JobId> =
        jobs.iter().filter(|job| job.owner.as_deref() == Some(owner)).map(|job| job.job_id).collect();
    match ids.as_slice() {
        [id] => Ok(*id),
        [] => Err(ExitError::new(3, format!("Owner {owner} has no live jobs.")).into()),
        many => {
            let list = many.iter().map(JobId::to_string).collect::<Vec<_>>().join(", ");
            Err(ExitError::new(3, format!("Ambiguous: {owner} has {} live jobs: {list}", many.len()))
                .into())
        }
    }
}

async fn job_info(client: &mut ProtocolClient, server: &Server, id: JobId) -> Result<String> {
    let snapshot = client.get_job_state(id, server.timeout).await.map_err(ExitError::communication)?;
    let machine = if snapshot.state.has_boards() {
        Some(client.get_job_machine_info(id, server.timeout).await.map_err(ExitError::communication)?)
    } else {
        None
    };
    Ok(render_job_info(id, &snapshot, machine.as_ref()))
}

/// Definition list describing a job, with machine details once allocated.
pub fn render_job_info(
    id: JobId,
    snapshot: &JobStateSnapshot,
    machine: Option<&JobMachineInfo>,
) -> String {
    let mut info = vec![("Job ID", id.to_string())];
    if snapshot.start_time.is_some() {
        info.push(("Start time", format_timestamp(snapshot.start_time)));
    }
    info.push(("State", snapshot.state.to_string()));

    match snapshot.state {
        JobState::Queued | JobState::Power | JobState::Ready => {
            info.push(("Keepalive", format_secs(snapshot.keepalive)));
        }
        JobState::Destroyed => {
            info.push(("Reason", snapshot.reason.clone().unwrap_or_else(|| "-".to_string())));
        }
        JobState::Unknown => {}
    }

    if snapshot.state.has_boards() {
        let power = if snapshot.power == Some(true) { "on" } else { "off" };
        info.push(("Board power", power.to_string()));
    }
    if let Some(machine) = machine {
        if let Some(connections) = &machine.connections {
            let mut sorted = connections.clone();
            sorted.sort();
            if let Some((_, hostname)) = sorted.first() {
                info.push(("Hostname", hostname.clone()));
            }
            info.push(("Num boards", sorted.len().to_string()));
        }
        if let Some(width) = machine.width {
            info.push(("Width", width.to_string()));
        }
        if let Some(height) = machine.height {
            info.push(("Height", height.to_string()));
        }
        if let Some(name) = &machine.machine_name {
            info.push(("Running on", name.clone()));
        }
    }
    render_definitions(&info)
}

async fn watch(client: &mut ProtocolClient, server: &Server, id: JobId) -> Result<()> {
    client.notify_job(Some(id), server.timeout).await.map_err(ExitError::communication)?;
    loop {
        print!("{}", color::clear_screen());
        println!("{}", job_info(client, server, id).await?);

        let notified = until_interrupted(client.wait_for_notification(None)).await;
        println!();
        match notified {
            Some(result) => {
                result.map_err(ExitError::communication)?;
            }
            None => return Ok(()),
        }
    }
}

/// Switch power and wait for the boards to settle back to `ready`.
async fn power(client: &mut ProtocolClient, server: &Server, id: JobId, on: bool) -> Result<()> {
    let sent = if on {
        client.power_on_job_boards(id, server.timeout).await
    } else {
        client.power_off_job_boards(id, server.timeout).await
    };
    sent.map_err(ExitError::communication)?;

    loop {
        client.notify_job(Some(id), server.timeout).await.map_err(ExitError::communication)?;
        let state =
            client.get_job_state(id, server.timeout).await.map_err(ExitError::communication)?.state;
        match state {
            JobState::Ready => return Ok(()),
            JobState::Power => match until_interrupted(client.wait_for_notification(None)).await {
                Some(result) => {
                    result.map_err(ExitError::communication)?;
                }
                None => return Err(ExitError::silent(7).into()),
            },
            other => {
                let verb = if on { "on" } else { "off" };
                return Err(ExitError::new(
                    8,
                    format!("Error: Cannot power {verb} job {id} in state {other}."),
                )
                .into());
            }
        }
    }
}

async fn ethernet_ips(client: &mut ProtocolClient, server: &Server, id: JobId) -> Result<()> {
    let info = client.get_job_machine_info(id, server.timeout).await.map_err(ExitError::communication)?;
    let Some(connections) = info.connections else {
        return Err(ExitError::new(9, format!("Job {id} does not exist or is still queued.")).into());
    };
    let mut sorted = connections;
    sorted.sort();
    println!("x,y,hostname");
    for ((x, y), hostname) in sorted {
        println!("{x},{y},{hostname}");
    }
    Ok(())
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
