// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! CSE supervisor core
//!
//! Process lifecycle and discovery registry for locally supervised components.
//!
//! # Architecture
//!
//! - **domain**: component configuration, metadata, error taxonomy, RPC seams
//! - **infrastructure**: registry, OS process handles, config loading, gRPC
//! - **application**: launcher, registration, shutdown, watchdog, gateway
//! - **presentation**: discovery gRPC endpoint and HTTP API

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
