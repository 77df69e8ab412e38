// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;

/// CLI version with the commit it was built from.
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("SPALLOC_BUILD_HASH"));

/// A single config file replacing the standard search path.
pub fn config_path() -> Option<PathBuf> {
    std::env::var("SPALLOC_CONFIG").ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// Log filter directives, e.g. `spalloc_client=debug`.
pub fn log_filter() -> Option<String> {
    std::env::var("SPALLOC_LOG").ok().filter(|s| !s.is_empty())
}
