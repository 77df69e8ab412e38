// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Newline-delimited JSON framing.

use crate::ProtocolError;
use serde::Serialize;
use serde_json::Value;

/// Encode a value as one line: compact JSON followed by `\n`.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    let mut bytes = serde_json::to_vec(value)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Longest line accepted by default. Machine descriptions are the largest
/// replies and stay well under this.
pub const DEFAULT_MAX_LINE: usize = 16 * 1024 * 1024;

/// Incremental line decoder.
///
/// Bytes are pushed as they arrive from the socket. Each complete line is
/// decoded on demand; a trailing partial line stays buffered. Bytes already
/// searched for a newline are not searched again.
#[derive(Debug)]
pub struct LineDecoder {
    buf: Vec<u8>,
    /// Prefix of `buf` known to hold no newline.
    scanned: usize,
    max_line: usize,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::with_max_line(DEFAULT_MAX_LINE)
    }
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A decoder that refuses lines longer than `max_line` bytes.
    pub fn with_max_line(max_line: usize) -> Self {
        Self { buf: Vec::new(), scanned: 0, max_line }
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Decode the next complete line, if any.
    ///
    /// Blank lines are skipped. A malformed line is consumed before the error
    /// is returned, so the decoder stays aligned on line boundaries. A partial
    /// line over the length limit is discarded with an error.
    pub fn next_value(&mut self) -> Result<Option<Value>, ProtocolError> {
        loop {
            let Some(offset) = self.buf[self.scanned..].iter().position(|&b| b == b'\n') else {
                self.scanned = self.buf.len();
                if self.buf.len() > self.max_line {
                    let len = self.buf.len();
                    self.clear();
                    return Err(ProtocolError::LineTooLong(len));
                }
                return Ok(None);
            };
            let end = self.scanned + offset;
            self.scanned = 0;
            let line: Vec<u8> = self.buf.drain(..=end).collect();
            let line = &line[..end];
            if line.len() > self.max_line {
                return Err(ProtocolError::LineTooLong(line.len()));
            }
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            return Ok(Some(serde_json::from_slice(line)?));
        }
    }

    /// Bytes received but not yet forming a complete line.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.scanned = 0;
    }
}
