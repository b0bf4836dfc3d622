// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Transport seam between the supervisor and its components.
//!
//! The gRPC implementation lives in `crate::infrastructure::grpc_client`.
//! Clients must be safe for concurrent use: the gateway shares one client
//! between all in-flight requests for a component.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::component::{CommandReply, ComponentMetadata, ComponentStatus, ShutdownAck};

#[derive(Debug, Clone, Error)]
pub enum RpcError {
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("rpc status {code}: {message}")]
    Status { code: String, message: String },
}

/// Client half of the component RPC surface.
#[async_trait]
pub trait ComponentRpc: Send + Sync {
    async fn get_metadata(&self) -> Result<ComponentMetadata, RpcError>;

    async fn execute_command(
        &self,
        command_name: &str,
        json_params: String,
    ) -> Result<CommandReply, RpcError>;

    async fn get_status(&self) -> Result<ComponentStatus, RpcError>;

    async fn shutdown(&self) -> Result<ShutdownAck, RpcError>;
}

/// Dials a component at the address it reported during registration.
#[async_trait]
pub trait ComponentConnector: Send + Sync {
    async fn connect(&self, address: &str) -> Result<Arc<dyn ComponentRpc>, RpcError>;
}
