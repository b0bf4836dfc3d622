// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Shared fixtures: an in-process component server and a discovery endpoint,
//! both bound on ephemeral loopback ports.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cse_core::application::registration::RegistrationService;
use cse_core::domain::{
    CommandInfo, CommandReply, ComponentMetadata, ComponentRpc, ComponentState, ComponentStatus,
    RpcError, ShutdownAck,
};
use cse_core::infrastructure::grpc_client::GrpcConnector;
use cse_core::infrastructure::proto::component_v1::{
    self, component_service_server::{ComponentService, ComponentServiceServer},
    CommandResult, ExecuteCommandRequest, ExecuteCommandResponse, GetMetadataRequest,
    GetStatusRequest, GetStatusResponse, ShutdownRequest, ShutdownResponse,
};
use cse_core::infrastructure::ComponentRegistry;
use cse_core::presentation::grpc::{serve_discovery, DiscoveryService};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::{Request, Response, Status};

pub fn echo_metadata(name: &str) -> ComponentMetadata {
    ComponentMetadata {
        name: name.to_string(),
        version: "1.0.0".to_string(),
        description: "Echo component".to_string(),
        author: "cse".to_string(),
        commands: vec![
            CommandInfo::new(format!("{}.ping", name), "Reply with pong"),
            CommandInfo::new(format!("{}.reverse", name), "Reverse a string"),
        ],
    }
}

/// Component server answering `<name>.ping` and counting shutdown requests.
#[derive(Clone)]
pub struct TestComponent {
    name: String,
    shutdowns: Arc<AtomicUsize>,
}

#[tonic::async_trait]
impl ComponentService for TestComponent {
    async fn get_metadata(
        &self,
        _request: Request<GetMetadataRequest>,
    ) -> Result<Response<component_v1::ComponentMetadata>, Status> {
        Ok(Response::new(echo_metadata(&self.name).into()))
    }

    async fn execute_command(
        &self,
        request: Request<ExecuteCommandRequest>,
    ) -> Result<Response<ExecuteCommandResponse>, Status> {
        let req = request.into_inner();
        let params = req.params.map(|p| p.json_payload).unwrap_or_default();

        let response = if req.command_name == format!("{}.ping", self.name) {
            ExecuteCommandResponse {
                success: true,
                result: Some(CommandResult {
                    json_payload: format!(r#"{{"reply":"pong","params":{}}}"#, params),
                }),
                error_message: String::new(),
            }
        } else {
            ExecuteCommandResponse {
                success: false,
                result: None,
                error_message: format!("command '{}' not supported", req.command_name),
            }
        };
        Ok(Response::new(response))
    }

    async fn get_status(
        &self,
        _request: Request<GetStatusRequest>,
    ) -> Result<Response<GetStatusResponse>, Status> {
        Ok(Response::new(GetStatusResponse {
            current_state: component_v1::ComponentState::Running as i32,
            message: "ok".to_string(),
        }))
    }

    async fn shutdown(
        &self,
        _request: Request<ShutdownRequest>,
    ) -> Result<Response<ShutdownResponse>, Status> {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(Response::new(ShutdownResponse {
            acknowledged: true,
            message: "stopping".to_string(),
        }))
    }
}

pub struct RunningComponent {
    pub address: SocketAddr,
    pub shutdowns: Arc<AtomicUsize>,
    pub stop: CancellationToken,
}

pub async fn spawn_component(name: &str) -> RunningComponent {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let shutdowns = Arc::new(AtomicUsize::new(0));
    let stop = CancellationToken::new();

    let service = TestComponent {
        name: name.to_string(),
        shutdowns: shutdowns.clone(),
    };
    let token = stop.clone();
    tokio::spawn(async move {
        tonic::transport::Server::builder()
            .add_service(ComponentServiceServer::new(service))
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), token.cancelled_owned())
            .await
            .unwrap();
    });

    RunningComponent {
        address,
        shutdowns,
        stop,
    }
}

pub struct RunningDiscovery {
    pub address: SocketAddr,
    pub stop: CancellationToken,
}

pub async fn spawn_discovery(registry: ComponentRegistry) -> RunningDiscovery {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let stop = CancellationToken::new();

    let registration = RegistrationService::new(
        registry,
        Arc::new(GrpcConnector::new(Duration::from_secs(2))),
        Duration::from_secs(2),
    );
    let service = DiscoveryService::new(Arc::new(registration));
    tokio::spawn(serve_discovery(listener, service, stop.clone()));

    RunningDiscovery { address, stop }
}

/// In-memory client with the same behavior as `TestComponent`.
pub struct EchoRpc {
    pub name: String,
}

#[async_trait]
impl ComponentRpc for EchoRpc {
    async fn get_metadata(&self) -> Result<ComponentMetadata, RpcError> {
        Ok(echo_metadata(&self.name))
    }

    async fn execute_command(
        &self,
        command_name: &str,
        json_params: String,
    ) -> Result<CommandReply, RpcError> {
        if command_name == format!("{}.ping", self.name) {
            Ok(CommandReply {
                success: true,
                json_result: format!(r#"{{"reply":"pong","params":{}}}"#, json_params),
                error_message: String::new(),
            })
        } else {
            Ok(CommandReply {
                success: false,
                json_result: String::new(),
                error_message: format!("command '{}' not supported", command_name),
            })
        }
    }

    async fn get_status(&self) -> Result<ComponentStatus, RpcError> {
        Ok(ComponentStatus {
            state: ComponentState::Running,
            message: "ok".to_string(),
        })
    }

    async fn shutdown(&self) -> Result<ShutdownAck, RpcError> {
        Ok(ShutdownAck {
            acknowledged: true,
            message: "stopping".to_string(),
        })
    }
}
