// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain types shared by every layer of the supervisor.

pub mod component;
pub mod errors;
pub mod rpc;
pub mod supervisor_config;

pub use component::{
    CommandInfo, CommandReply, ComponentConfig, ComponentMetadata, ComponentState,
    ComponentStatus, ShutdownAck,
};
pub use errors::{ConfigError, GatewayError, LaunchError, RegistrationError};
pub use rpc::{ComponentConnector, ComponentRpc, RpcError};
pub use supervisor_config::SupervisorConfig;
