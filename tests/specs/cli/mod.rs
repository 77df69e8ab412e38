// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod alloc;
mod help;
mod job;
mod machine;
mod ps;
mod where_is;
