// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `spalloc where-is` - find a board or chip by any of its coordinates.

use crate::exit_error::ExitError;
use crate::output::{format_coords, render_definitions};
use crate::server::ServerArgs;
use anyhow::Result;
use clap::{ArgGroup, Args};
use spalloc_client::Config;
use spalloc_core::{BoardLocation, JobId, WhereIs};

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("query").required(true)))]
pub struct WhereIsArgs {
    /// Logical board coordinate
    #[arg(
        long,
        short = 'b',
        visible_alias = "logical",
        num_args = 4,
        value_names = ["MACHINE", "X", "Y", "Z"],
        group = "query"
    )]
    pub board: Option<Vec<String>>,

    /// Physical board location
    #[arg(
        long,
        short = 'p',
        num_args = 4,
        value_names = ["MACHINE", "CABINET", "FRAME", "BOARD"],
        group = "query"
    )]
    pub physical: Option<Vec<String>>,

    /// Chip coordinate, as if the whole machine were one system
    #[arg(long, short = 'c', num_args = 3, value_names = ["MACHINE", "X", "Y"], group = "query")]
    pub chip: Option<Vec<String>>,

    /// Chip coordinate within a job's boards
    #[arg(long, short = 'j', num_args = 3, value_names = ["JOB_ID", "X", "Y"], group = "query")]
    pub job_chip: Option<Vec<String>>,

    #[command(flatten)]
    pub server: ServerArgs,
}

impl WhereIsArgs {
    /// The query to send, and whether the answer should include the chip's
    /// position within its board.
    pub fn query(&self) -> Result<(WhereIs, bool), ExitError> {
        if let Some(values) = &self.board {
            let [machine, x, y, z] = values.as_slice() else {
                return Err(arity("--board", 4));
            };
            let query =
                WhereIs::Board { machine: machine.clone(), x: num(x)?, y: num(y)?, z: num(z)? };
            return Ok((query, false));
        }
        if let Some(values) = &self.physical {
            let [machine, cabinet, frame, board] = values.as_slice() else {
                return Err(arity("--physical", 4));
            };
            let query = WhereIs::Physical {
                machine: machine.clone(),
                cabinet: num(cabinet)?,
                frame: num(frame)?,
                board: num(board)?,
            };
            return Ok((query, false));
        }
        if let Some(values) = &self.chip {
            let [machine, x, y] = values.as_slice() else {
                return Err(arity("--chip", 3));
            };
            let query = WhereIs::Chip { machine: machine.clone(), chip_x: num(x)?, chip_y: num(y)? };
            return Ok((query, true));
        }
        if let Some(values) = &self.job_chip {
            let [job_id, x, y] = values.as_slice() else {
                return Err(arity("--job-chip", 3));
            };
            let job_id = job_id
                .parse::<JobId>()
                .map_err(|_| ExitError::new(2, format!("Error: invalid job ID '{job_id}'")))?;
            let query = WhereIs::JobChip { job_id, chip_x: num(x)?, chip_y: num(y)? };
            return Ok((query, true));
        }
        Err(ExitError::new(2, "one of --board, --physical, --chip or --job-chip is required"))
    }
}

fn num(value: &str) -> Result<u32, ExitError> {
    value
        .trim()
        .parse()
        .map_err(|_| ExitError::new(2, format!("Error: invalid coordinate '{value}'")))
}

fn arity(flag: &str, count: usize) -> ExitError {
    ExitError::new(2, format!("{flag} takes {count} values"))
}

pub async fn handle(args: WhereIsArgs, config: &Config) -> Result<()> {
    let (query, show_board_chip) = args.query()?;
    let server = args.server.resolve(config)?;
    let mut client = server.connect().await?;

    let location = client.where_is(&query, server.timeout).await;
    client.close();
    match location.map_err(ExitError::communication)? {
        Some(location) => {
            println!("{}", render_location(&location, show_board_chip));
            Ok(())
        }
        None => Err(ExitError::new(4, "No boards at the specified location").into()),
    }
}

pub fn render_location(location: &BoardLocation, show_board_chip: bool) -> String {
    let (cabinet, frame, board) = location.physical;
    let (x, y, z) = location.logical;
    let (chip_x, chip_y) = location.chip;

    let mut entries = vec![
        ("Machine", location.machine.clone()),
        ("Physical location", format!("Cabinet {cabinet}, Frame {frame}, Board {board}")),
        ("Board coordinate", format_coords(&[x, y, z])),
        ("Machine chip coordinates", format_coords(&[chip_x, chip_y])),
    ];
    if show_board_chip {
        let (bx, by) = location.board_chip;
        entries.push(("Coordinates within board", format_coords(&[bx, by])));
    }
    match location.job_id {
        Some(job_id) => {
            entries.push(("Job using board", job_id.to_string()));
            if let Some((jx, jy)) = location.job_chip {
                entries.push(("Coordinates within job", format_coords(&[jx, jy])));
            }
        }
        None => entries.push(("Job using board", "-".to_string())),
    }
    render_definitions(&entries)
}

#[cfg(test)]
#[path = "where_is_tests.rs"]
mod tests;
