// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod alloc;
pub mod job;
pub mod machine;
pub mod ps;
pub mod where_is;

use std::future::Future;

/// Run `fut` unless Ctrl-C arrives first.
pub(crate) async fn until_interrupted<F: Future>(fut: F) -> Option<F::Output> {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    tokio::select! {
        output = fut => Some(output),
        _ = &mut ctrl_c => None,
    }
}
