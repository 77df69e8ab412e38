// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use spalloc_wire::ProtocolError;
use std::io;
use thiserror::Error;

/// Everything that can go wrong talking to the server or managing a job.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("connection closed by server")]
    ConnectionClosed,

    #[error("not connected")]
    NotConnected,

    #[error("timed out waiting for the server")]
    Timeout,

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("server error: {0}")]
    Server(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("incompatible server version ({version})")]
    IncompatibleVersion { version: String },

    #[error("job destroyed{}", reason_suffix(.reason))]
    JobDestroyed { reason: Option<String> },

    #[error("timed out waiting for the job to become ready")]
    StateChangeTimeout,
}

/// Coarse classification for callers that only care about the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Timeout,
    Protocol,
    Server,
    Validation,
    IncompatibleVersion,
    JobDestroyed,
    StateChangeTimeout,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Io(_) | ClientError::ConnectionClosed | ClientError::NotConnected => {
                ErrorKind::Transport
            }
            ClientError::Timeout => ErrorKind::Timeout,
            ClientError::Protocol(_) => ErrorKind::Protocol,
            ClientError::Server(_) => ErrorKind::Server,
            ClientError::InvalidArguments(_) => ErrorKind::Validation,
            ClientError::IncompatibleVersion { .. } => ErrorKind::IncompatibleVersion,
            ClientError::JobDestroyed { .. } => ErrorKind::JobDestroyed,
            ClientError::StateChangeTimeout => ErrorKind::StateChangeTimeout,
        }
    }

    /// Whether closing the connection and reconnecting may help.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport | ErrorKind::Timeout)
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ClientError::InvalidArguments(message.into())
    }
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default()
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
