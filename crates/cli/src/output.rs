// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plain-text tables and definition lists shared by the tool commands.

use chrono::{DateTime, Local};
use std::fmt::Display;
use std::time::Duration;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

/// One table cell. Numbers are right-aligned, everything else left-aligned.
#[derive(Debug, Clone)]
pub struct Cell {
    text: String,
    paint: Option<fn(&str) -> String>,
    numeric: bool,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), paint: None, numeric: false }
    }

    pub fn number(value: impl Display) -> Self {
        Self { text: value.to_string(), paint: None, numeric: true }
    }

    /// Style the cell when rendered. Width is measured on the plain text.
    pub fn painted(mut self, paint: fn(&str) -> String) -> Self {
        self.paint = Some(paint);
        self
    }

    fn width(&self) -> usize {
        self.text.chars().count()
    }

    fn render(&self) -> String {
        match self.paint {
            Some(paint) => paint(&self.text),
            None => self.text.clone(),
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::new(text)
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::new(text)
    }
}

/// A row of column headings.
pub fn header_row(names: &[&str]) -> Vec<Cell> {
    names.iter().map(|name| Cell::new(*name).painted(crate::color::header)).collect()
}

/// Render rows as columns separated by two spaces.
///
/// The last column is not padded unless it is numeric.
pub fn render_table(rows: &[Vec<Cell>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let mut lines = Vec::with_capacity(rows.len());
    for row in rows {
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            let pad = " ".repeat(widths[i] - cell.width());
            let last = i + 1 == row.len();
            if cell.numeric {
                line.push_str(&pad);
                line.push_str(&cell.render());
            } else {
                line.push_str(&cell.render());
                if !last {
                    line.push_str(&pad);
                }
            }
            if !last {
                line.push_str("  ");
            }
        }
        lines.push(line);
    }
    lines.join("\n")
}

/// Render `name: value` lines with the names right-aligned.
pub fn render_definitions(entries: &[(&str, String)]) -> String {
    let width = entries.iter().map(|(name, _)| name.chars().count()).max().unwrap_or(0);
    entries
        .iter()
        .map(|(name, value)| format!("{name:>width$}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Local time for a server timestamp in seconds since the epoch.
pub fn format_timestamp(secs: Option<f64>) -> String {
    let Some(secs) = secs.filter(|s| s.is_finite()) else {
        return "-".to_string();
    };
    let nanos = (secs.fract() * 1e9) as u32;
    match DateTime::from_timestamp(secs.trunc() as i64, nanos) {
        Some(at) => at.with_timezone(&Local).format("%d/%m/%Y %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

/// A period in seconds with one decimal, or `-` for none.
pub fn format_secs(period: Option<Duration>) -> String {
    period.map_or_else(|| "-".to_string(), |d| format!("{:.1}", d.as_secs_f64()))
}

/// `(a, b, c)` for a coordinate tuple.
pub fn format_coords(parts: &[u32]) -> String {
    let inner = parts.iter().map(u32::to_string).collect::<Vec<_>>().join(", ");
    format!("({inner})")
}
