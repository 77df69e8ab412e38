// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `spalloc machine` - machine summaries and the jobs running on them.

use super::until_interrupted;
use crate::color;
use crate::exit_error::ExitError;
use crate::output::{header_row, render_definitions, render_table, Cell};
use crate::server::ServerArgs;
use anyhow::Result;
use clap::Args;
use spalloc_client::Config;
use spalloc_core::{JobSummary, MachineSummary};

#[derive(Debug, Args)]
pub struct MachineArgs {
    /// Machine to inspect; lists every machine when omitted
    pub machine: Option<String>,

    /// Update the output when things change
    #[arg(long, short = 'w')]
    pub watch: bool,

    /// List the machine's jobs as compact KEY:ID cells
    #[arg(long, short = 'c', requires = "machine")]
    pub compact: bool,

    #[command(flatten)]
    pub server: ServerArgs,
}

pub async fn handle(args: MachineArgs, config: &Config) -> Result<()> {
    let server = args.server.resolve(config)?;
    let mut client = server.connect().await?;

    if args.watch {
        client
            .notify_machine(args.machine.as_deref(), server.timeout)
            .await
            .map_err(ExitError::communication)?;
    }
    loop {
        let machines = client.list_machines(server.timeout).await.map_err(ExitError::communication)?;
        let jobs = client.list_jobs(server.timeout).await.map_err(ExitError::communication)?;

        print!("{}", color::clear_screen());
        let rendered = match &args.machine {
            None => render_machine_list(&machines, &jobs),
            Some(name) => render_machine(&machines, &jobs, name, args.compact)
                .ok_or_else(|| ExitError::new(6, format!("No machine '{name}' was found.")))?,
        };
        println!("{rendered}");
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

fn jobs_on<'a>(jobs: &'a [JobSummary], machine: &'a str) -> impl Iterator<Item = &'a JobSummary> {
    jobs.iter().filter(move |job| job.allocated_machine_name.as_deref() == Some(machine))
}

/// One row per machine with board usage.
pub fn render_machine_list(machines: &[MachineSummary], jobs: &[JobSummary]) -> String {
    let mut rows = vec![header_row(&["Name", "Num boards", "In-use", "Jobs", "Tags"])];
    for machine in machines {
        let in_use: usize = jobs_on(jobs, &machine.name).map(JobSummary::num_boards).sum();
        let count = jobs_on(jobs, &machine.name).count();
        rows.push(vec![
            Cell::new(machine.name.clone()),
            Cell::number(machine.num_boards()),
            Cell::number(in_use),
            Cell::number(count),
            Cell::new(machine.tags.join(", ")),
        ]);
    }
    render_table(&rows)
}

/// Summary of one machine followed by its jobs, or `None` if there is no
/// machine called `name`.
pub fn render_machine(
    machines: &[MachineSummary],
    jobs: &[JobSummary],
    name: &str,
    compact: bool,
) -> Option<String> {
    let machine = machines.iter().find(|m| m.name == name)?;
    let shown: Vec<&JobSummary> = jobs_on(jobs, name).collect();
    let in_use: usize = shown.iter().map(|job| job.num_boards()).sum();

    let summary = render_definitions(&[
        ("Name", machine.name.clone()),
        ("Tags", machine.tags.join(", ")),
        ("In-use", format!("{} of {}", in_use, machine.num_boards())),
        ("Jobs", shown.len().to_string()),
    ]);

    let palette: [fn(&str) -> String; 5] =
        [color::good, color::header, color::pending, color::literal, color::context];
    let keyed = shown.iter().enumerate().map(|(i, job)| (job_key(i), palette[i % palette.len()], job));

    let listing = if compact {
        keyed
            .map(|(key, paint, job)| format!("{}:{}", paint(&key), job.job_id))
            .collect::<Vec<_>>()
            .join("  ")
    } else {
        let mut rows = vec![header_row(&["Key", "Job ID", "Num boards", "Owner"])];
        rows.extend(keyed.map(|(key, paint, job)| {
            vec![
                Cell::new(key).painted(paint),
                Cell::number(job.job_id),
                Cell::number(job.num_boards()),
                Cell::new(job.owner.clone().unwrap_or_default()),
            ]
        }));
        render_table(&rows)
    };

    Some(format!("{summary}\n\n{listing}"))
}

/// Spreadsheet-style column names: A, B, ..., Z, AA, AB, ...
pub fn job_key(index: usize) -> String {
    let mut n = index + 1;
    let mut key = Vec::new();
    while n > 0 {
        n -= 1;
        key.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    key.iter().rev().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
#[path = "machine_tests.rs"]
mod tests;
