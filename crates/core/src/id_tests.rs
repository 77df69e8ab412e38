// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_with_surrounding_whitespace() {
    assert_eq!(" 42\n".parse::<JobId>().unwrap(), JobId(42));
}

#[test]
fn rejects_non_numeric() {
    assert!("job-1".parse::<JobId>().is_err());
    assert!("-1".parse::<JobId>().is_err());
}

#[test]
fn serialises_as_bare_integer() {
    assert_eq!(serde_json::to_string(&JobId(42)).unwrap(), "42");
    assert_eq!(serde_json::from_str::<JobId>("7").unwrap(), JobId(7));
}

#[test]
fn compares_with_raw_id() {
    assert_eq!(JobId(3), 3);
    assert_eq!(JobId::from(3).get(), 3);
    assert_eq!(JobId(3).to_string(), "3");
}
