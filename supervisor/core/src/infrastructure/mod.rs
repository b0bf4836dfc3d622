// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Infrastructure adapters: registry storage, OS processes, config files and gRPC.

pub mod config_loader;
pub mod grpc_client;
pub mod process;
pub mod proto;
pub mod registry;

pub use registry::{ComponentRecord, ComponentRegistry};
