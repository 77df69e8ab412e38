// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol for talking to a spalloc server.
//!
//! Wire format: one compact JSON value per line, terminated by `\n`.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod codec;
mod error;
mod message;

pub use codec::{encode, LineDecoder, DEFAULT_MAX_LINE};
pub use error::ProtocolError;
pub use message::{Message, Request};


#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
