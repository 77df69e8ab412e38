// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// A line from the server could not be understood. Never retried.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object, got: {0}")]
    NotAnObject(String),

    #[error("unexpected reply shape: {0}")]
    UnexpectedReply(String),

    #[error("line of {0} bytes exceeds the length limit")]
    LineTooLong(usize),
}
