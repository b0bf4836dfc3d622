// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! CSE supervisor library - exposes testable components
//!
//! - `supervisor`: the supervisor process and its HTTP client
//! - `commands`: CLI subcommands

pub mod commands;
pub mod supervisor;
