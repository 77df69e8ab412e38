// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::{Cli, Commands};
use clap::Parser;

fn parse(argv: &[&str]) -> WhereIsArgs {
    let cli = Cli::try_parse_from(["spalloc", "where-is"].iter().chain(argv)).unwrap();
    match cli.command {
        Commands::WhereIs(args) => args,
        other => panic!("unexpected command: {other:?}"),
    }
}

fn location(job_id: Option<u64>) -> BoardLocation {
    BoardLocation {
        machine: "my-machine".into(),
        logical: (3, 4, 0),
        physical: (2, 4, 7),
        chip: (38, 51),
        board_chip: (2, 3),
        job_chip: job_id.map(|_| (14, 3)),
        job_id: job_id.map(JobId),
    }
}

#[yare::parameterized(
    board    = { &["--board", "m", "1", "2", "0"], WhereIs::Board { machine: "m".into(), x: 1, y: 2, z: 0 }, false },
    logical  = { &["--logical", "m", "1", "2", "0"], WhereIs::Board { machine: "m".into(), x: 1, y: 2, z: 0 }, false },
    physical = { &["-p", "m", "2", "4", "7"], WhereIs::Physical { machine: "m".into(), cabinet: 2, frame: 4, board: 7 }, false },
    chip     = { &["--chip", "m", "38", "51"], WhereIs::Chip { machine: "m".into(), chip_x: 38, chip_y: 51 }, true },
    job_chip = { &["--job-chip", "24", "14", "3"], WhereIs::JobChip { job_id: JobId(24), chip_x: 14, chip_y: 3 }, true },
)]
fn arguments_build_queries(argv: &[&str], expected: WhereIs, show_board_chip: bool) {
    assert_eq!(parse(argv).query().unwrap(), (expected, show_board_chip));
}

#[test]
fn non_numeric_coordinate_is_usage_error() {
    let err = parse(&["--board", "m", "one", "2", "0"]).query().unwrap_err();
    assert_eq!(err.code, 2);
}

#[test]
fn a_query_is_required() {
    assert!(Cli::try_parse_from(["spalloc", "where-is"]).is_err());
}

#[test]
fn queries_are_exclusive() {
    let argv = ["spalloc", "where-is", "--chip", "m", "1", "1", "--board", "m", "0", "0", "0"];
    assert!(Cli::try_parse_from(argv).is_err());
}

#[test]
fn job_chip_answer_shows_everything() {
    let rendered = render_location(&location(Some(24)), true);
    assert_eq!(
        rendered,
        [
            "                 Machine: my-machine",
            "       Physical location: Cabinet 2, Frame 4, Board 7",
            "        Board coordinate: (3, 4, 0)",
            "Machine chip coordinates: (38, 51)",
            "Coordinates within board: (2, 3)",
            "         Job using board: 24",
            "  Coordinates within job: (14, 3)",
        ]
        .join("\n")
    );
}

#[test]
fn board_answer_without_job() {
    let rendered = render_location(&location(None), false);
    assert!(!rendered.contains("Coordinates within board"));
    assert!(!rendered.contains("Coordinates within job"));
    assert!(rendered.ends_with("Job using board: -"));
}
