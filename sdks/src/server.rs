// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Component-side gRPC service.

use cse_core::domain::{ComponentMetadata, ComponentState};
use cse_core::infrastructure::proto::component_v1::{
    self,
    component_service_server::{ComponentService, ComponentServiceServer},
    CommandResult, ExecuteCommandRequest, ExecuteCommandResponse, GetMetadataRequest,
    GetStatusRequest, GetStatusResponse, ShutdownRequest, ShutdownResponse,
};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tonic::{Request, Response, Status};
use tracing::info;

use crate::command::CommandRegistry;

/// Delay between acknowledging `Shutdown` and stopping the server, so the
/// acknowledgement reaches the supervisor first.
pub const SHUTDOWN_DELAY: Duration = Duration::from_millis(100);

/// Static description of a component. The name is assigned by the
/// supervisor through `--component-name`.
#[derive(Debug, Clone, Default)]
pub struct ComponentInfo {
    pub version: String,
    pub description: String,
    pub author: String,
}

impl ComponentInfo {
    pub fn new(version: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            description: description.into(),
            author: String::new(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }
}

#[derive(Clone)]
pub struct ComponentServer {
    name: String,
    info: ComponentInfo,
    commands: Arc<CommandRegistry>,
    state: Arc<RwLock<ComponentState>>,
    shutdown: CancellationToken,
    shutdown_delay: Duration,
}

impl ComponentServer {
    pub fn new(name: impl Into<String>, info: ComponentInfo, commands: CommandRegistry) -> Self {
        Self {
            name: name.into(),
            info,
            commands: Arc::new(commands),
            state: Arc::new(RwLock::new(ComponentState::Starting)),
            shutdown: CancellationToken::new(),
            shutdown_delay: SHUTDOWN_DELAY,
        }
    }

    pub fn with_shutdown_delay(mut self, delay: Duration) -> Self {
        self.shutdown_delay = delay;
        self
    }

    /// Cancelled once a `Shutdown` request has been acknowledged.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn state(&self) -> ComponentState {
        *self.state.read()
    }

    pub fn set_state(&self, state: ComponentState) {
        *self.state.write() = state;
    }

    pub fn metadata(&self) -> ComponentMetadata {
        ComponentMetadata {
            name: self.name.clone(),
            version: self.info.version.clone(),
            description: self.info.description.clone(),
            author: self.info.author.clone(),
            commands: self.commands.infos(),
        }
    }

    pub fn into_service(self) -> ComponentServiceServer<Self> {
        ComponentServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl ComponentService for ComponentServer {
    async fn get_metadata(
        &self,
        _request: Request<GetMetadataRequest>,
    ) -> Result<Response<component_v1::ComponentMetadata>, Status> {
        info!(component = %self.name, "Metadata requested");
        Ok(Response::new(self.metadata().into()))
    }

    async fn execute_command(
        &self,
        request: Request<ExecuteCommandRequest>,
    ) -> Result<Response<ExecuteCommandResponse>, Status> {
        let req = request.into_inner();
        let params = req.params.map(|p| p.json_payload).unwrap_or_default();
        info!(component = %self.name, command = %req.command_name, "Command requested");

        let reply = self.commands.dispatch(&req.command_name, &params).await;
        Ok(Response::new(ExecuteCommandResponse {
            success: reply.success,
            result: reply.success.then(|| CommandResult {
                json_payload: reply.json_result,
            }),
            error_message: reply.error_message,
        }))
    }

    async fn get_status(
        &self,
        _request: Request<GetStatusRequest>,
    ) -> Result<Response<GetStatusResponse>, Status> {
        let state = self.state();
        Ok(Response::new(GetStatusResponse {
            current_state: component_v1::ComponentState::from(state) as i32,
            message: format!("{} is {}", self.name, state),
        }))
    }

    async fn shutdown(
        &self,
        _request: Request<ShutdownRequest>,
    ) -> Result<Response<ShutdownResponse>, Status> {
        info!(component = %self.name, "Shutdown requested");
        self.set_state(ComponentState::Stopping);

        let token = self.shutdown.clone();
        let delay = self.shutdown_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            token.cancel();
        });

        Ok(Response::new(ShutdownResponse {
            acknowledged: true,
            message: "Shutdown request received".to_string(),
        }))
    }
}
