// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Help, version and argument errors that never reach a server.

use crate::prelude::*;

#[test]
fn help_lists_every_tool() {
    let run = cli().args(&["--help"]).passes();
    for tool in ["alloc", "job", "ps", "machine", "where-is"] {
        assert!(run.stdout().contains(tool), "missing {tool}");
    }
}

#[test]
fn version_shows_package_version() {
    cli().args(&["--version"]).passes().stdout_has("0.3");
}

#[test]
fn missing_hostname_is_a_usage_error() {
    cli()
        .args(&["ps"])
        .run_offline()
        .exits(2)
        .stderr_has("--hostname of spalloc server must be specified");
}

#[test]
fn job_needs_an_id_or_owner() {
    cli().args(&["job", "--hostname", "localhost"]).run_offline().exits(2);
}

#[test]
fn unreadable_config_fails() {
    cli().args(&["ps"]).config("[spalloc\n").run_offline().exits(1).stderr_has("Error");
}

#[test]
fn hostname_can_come_from_config() {
    // Nothing listens on port 1, so the command gets as far as connecting.
    cli()
        .args(&["ps", "--timeout", "1"])
        .config("[spalloc]\nhostname = \"127.0.0.1\"\nport = 1\n")
        .run_offline()
        .exits(1)
        .stderr_has("Error communicating with server");
}
