// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn allocated() -> JobMachineInfo {
    serde_json::from_value(json!({
        "width": 8,
        "height": 8,
        "connections": [[[4, 8], "board48"], [[0, 0], "board00"]],
        "machine_name": "m",
        "boards": [[0, 0, 0]],
    }))
    .unwrap()
}

#[test]
fn unallocated_reply_is_incomplete() {
    let raw: JobMachineInfo = serde_json::from_value(json!({
        "width": null,
        "height": null,
        "connections": null,
        "machine_name": null,
    }))
    .unwrap();
    assert_eq!(raw, JobMachineInfo::default());
    assert!(raw.complete().is_none());
}

#[test]
fn complete_reply_builds_machine_info() {
    let info = allocated().complete().unwrap();
    assert_eq!(info.width, 8);
    assert_eq!(info.height, 8);
    assert_eq!(info.machine_name, "m");
    assert_eq!(info.connections.len(), 2);
    assert_eq!(info.hostname(), Some("board00"));
}

#[test]
fn partially_populated_is_incomplete() {
    let mut raw = allocated();
    raw.machine_name = None;
    assert!(raw.complete().is_none());
}

#[test]
fn hostname_absent_without_origin_chip() {
    let mut raw = allocated();
    raw.connections = Some(vec![((4, 8), "board48".to_string())]);
    assert_eq!(raw.complete().unwrap().hostname(), None);
}

#[test]
fn ethernet_csv_is_sorted_by_chip() {
    let info = allocated().complete().unwrap();
    assert_eq!(info.ethernet_csv(), "0,0,board00\n4,8,board48\n");
}
