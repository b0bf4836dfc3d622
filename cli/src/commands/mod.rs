// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the CSE CLI

pub mod components;
pub mod config;
pub mod exec;

pub use self::components::ComponentsCommand;
pub use self::config::ConfigCommand;
pub use self::exec::ExecCommand;
