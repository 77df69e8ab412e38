// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[yare::parameterized(
    any    = { &[], Geometry::Any },
    boards = { &[4], Geometry::Boards(4) },
    triads = { &[2, 3], Geometry::Triads { width: 2, height: 3 } },
    board  = { &[1, 2, 0], Geometry::Board { x: 1, y: 2, z: 0 } },
)]
fn from_values(values: &[u32], expected: Geometry) {
    assert_eq!(Geometry::try_from(values).unwrap(), expected);
}

#[test]
fn too_many_values() {
    assert_eq!(Geometry::try_from(&[1, 2, 3, 4][..]), Err(GeometryError(4)));
}

#[test]
fn args_follow_shape() {
    assert!(Geometry::Any.args().is_empty());
    assert_eq!(Geometry::Triads { width: 2, height: 3 }.args(), vec![json!(2), json!(3)]);
    assert_eq!(Geometry::Board { x: 1, y: 2, z: 0 }.args(), vec![json!(1), json!(2), json!(0)]);
}

#[yare::parameterized(
    any    = { Geometry::Any, "1 board" },
    four   = { Geometry::Boards(4), "4 boards" },
    triads = { Geometry::Triads { width: 2, height: 3 }, "2x3 triads" },
)]
fn display(geometry: Geometry, expected: &str) {
    assert_eq!(geometry.to_string(), expected);
}
