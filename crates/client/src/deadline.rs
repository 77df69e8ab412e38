// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Optional deadlines shared across several blocking steps.

use std::time::Duration;
use tokio::time::Instant;

/// A point in time after which an operation gives up, or never.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// `None` never expires.
    pub fn after(timeout: Option<Duration>) -> Self {
        Self(timeout.map(|t| Instant::now() + t))
    }

    /// Time left, zero once passed. `None` means unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.0.map(|at| at.saturating_duration_since(Instant::now()))
    }

    pub fn expired(&self) -> bool {
        self.remaining().is_some_and(|left| left.is_zero())
    }

    /// Shorten `wait` so it does not run past the deadline.
    pub fn clamp(&self, wait: Duration) -> Duration {
        match self.remaining() {
            Some(left) => wait.min(left),
            None => wait,
        }
    }

    /// Shorten an optional wait; an unbounded wait takes the time left.
    pub fn clamp_opt(&self, wait: Option<Duration>) -> Option<Duration> {
        match (wait, self.remaining()) {
            (Some(w), Some(left)) => Some(w.min(left)),
            (Some(w), None) => Some(w),
            (None, left) => left,
        }
    }
}

#[cfg(test)]
#[path = "deadline_tests.rs"]
mod tests;
