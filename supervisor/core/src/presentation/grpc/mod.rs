// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod discovery;

pub use discovery::{serve_discovery, DiscoveryService};
