// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use serial_test::serial;

fn machines() -> Vec<MachineSummary> {
    serde_json::from_value(json!([
        {"name": "m1", "tags": ["default", "big"], "width": 2, "height": 1,
         "dead_boards": [[0, 0, 2]], "dead_links": []},
        {"name": "m2", "tags": [], "width": 1, "height": 1,
         "dead_boards": [], "dead_links": [[0, 0, 0, 1]]},
    ]))
    .unwrap()
}

fn jobs() -> Vec<JobSummary> {
    serde_json::from_value(json!([
        {"job_id": 10, "owner": "alice", "state": 3, "allocated_machine_name": "m1",
         "boards": [[0, 0, 0], [0, 0, 1]]},
        {"job_id": 11, "owner": "bob", "state": 3, "allocated_machine_name": "m1",
         "boards": [[1, 0, 0]]},
        {"job_id": 12, "owner": "carol", "state": 1, "allocated_machine_name": null, "boards": null},
    ]))
    .unwrap()
}

#[yare::parameterized(
    first       = { 0, "A" },
    last_single = { 25, "Z" },
    first_pair  = { 26, "AA" },
    second_pair = { 27, "AB" },
    wrap_pair   = { 52, "BA" },
    first_three = { 702, "AAA" },
)]
fn job_keys_count_like_spreadsheet_columns(index: usize, expected: &str) {
    assert_eq!(job_key(index), expected);
}

#[test]
#[serial]
fn machine_list_counts_boards_and_jobs() {
    std::env::set_var("NO_COLOR", "1");

    let table = render_machine_list(&machines(), &jobs());
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "m1             5       3     2  default, big");
    assert_eq!(lines[2], "m2             3       0     0  ");
}

#[test]
#[serial]
fn single_machine_shows_summary_and_jobs() {
    std::env::set_var("NO_COLOR", "1");

    let rendered = render_machine(&machines(), &jobs(), "m1", false).unwrap();
    assert!(rendered.contains("In-use: 3 of 5"));
    assert!(rendered.contains("  Jobs: 2"));
    let last_lines: Vec<&str> = rendered.lines().rev().take(2).collect();
    assert_eq!(last_lines, ["B        11           1  bob", "A        10           2  alice"]);
}

#[test]
#[serial]
fn compact_listing_uses_key_id_cells() {
    std::env::set_var("NO_COLOR", "1");

    let rendered = render_machine(&machines(), &jobs(), "m1", true).unwrap();
    assert!(rendered.ends_with("A:10  B:11"));
}

#[test]
fn unknown_machine_is_none() {
    assert_eq!(render_machine(&machines(), &jobs(), "nope", false), None);
}
