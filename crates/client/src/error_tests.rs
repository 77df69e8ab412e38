// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    io        = { ClientError::Io(io::Error::from(io::ErrorKind::ConnectionReset)), true },
    closed    = { ClientError::ConnectionClosed, true },
    detached  = { ClientError::NotConnected, true },
    timeout   = { ClientError::Timeout, true },
    server    = { ClientError::Server("nope".into()), false },
    invalid   = { ClientError::invalid("bad"), false },
    version   = { ClientError::IncompatibleVersion { version: "9.0.0".into() }, false },
    destroyed = { ClientError::JobDestroyed { reason: None }, false },
    waited    = { ClientError::StateChangeTimeout, false },
)]
fn transport_errors_are_retryable(err: ClientError, retryable: bool) {
    assert_eq!(err.is_transport(), retryable);
}

#[test]
fn timeout_has_its_own_kind() {
    assert_eq!(ClientError::Timeout.kind(), ErrorKind::Timeout);
    assert_eq!(ClientError::ConnectionClosed.kind(), ErrorKind::Transport);
}

#[test]
fn destroyed_message_includes_reason() {
    let err = ClientError::JobDestroyed { reason: Some("out of boards".into()) };
    assert_eq!(err.to_string(), "job destroyed: out of boards");
    assert_eq!(ClientError::JobDestroyed { reason: None }.to_string(), "job destroyed");
}
