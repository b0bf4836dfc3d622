// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Discovery endpoint
//!
//! gRPC server bound at the fixed discovery address. Spawned components call
//! `RegisterComponent` once they are serving their own endpoint.

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::{Request, Response, Status};
use tracing::{info, warn};

use crate::application::registration::{RegistrationRequest, RegistrationService};
use crate::infrastructure::proto::component_v1::component_discovery_service_server::{
    ComponentDiscoveryService, ComponentDiscoveryServiceServer,
};
use crate::infrastructure::proto::component_v1::{
    RegisterComponentRequest, RegisterComponentResponse,
};

pub struct DiscoveryService {
    registration: Arc<RegistrationService>,
}

impl DiscoveryService {
    pub fn new(registration: Arc<RegistrationService>) -> Self {
        Self { registration }
    }

    pub fn into_server(self) -> ComponentDiscoveryServiceServer<Self> {
        ComponentDiscoveryServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl ComponentDiscoveryService for DiscoveryService {
    async fn register_component(
        &self,
        request: Request<RegisterComponentRequest>,
    ) -> Result<Response<RegisterComponentResponse>, Status> {
        let req = request.into_inner();

        if req.name.is_empty() {
            return Err(Status::invalid_argument("name must not be empty"));
        }
        if req.grpc_address.is_empty() {
            return Err(Status::invalid_argument("grpc_address must not be empty"));
        }
        let pid = u32::try_from(req.pid)
            .map_err(|_| Status::invalid_argument(format!("invalid pid {}", req.pid)))?;

        let name = req.name.clone();
        let response = match self
            .registration
            .register(RegistrationRequest {
                name: req.name,
                address: req.grpc_address,
                pid,
            })
            .await
        {
            Ok(metadata) => RegisterComponentResponse {
                success: true,
                message: format!(
                    "Component '{}' registered with {} command(s)",
                    name,
                    metadata.commands.len()
                ),
            },
            Err(e) => {
                warn!(component = %name, pid, "Registration rejected: {}", e);
                RegisterComponentResponse {
                    success: false,
                    message: e.to_string(),
                }
            }
        };

        Ok(Response::new(response))
    }
}

/// Serve the discovery endpoint on `listener` until `shutdown` is cancelled.
pub async fn serve_discovery(
    listener: TcpListener,
    service: DiscoveryService,
    shutdown: CancellationToken,
) -> Result<(), tonic::transport::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!("Discovery endpoint listening on {}", addr);
    }

    tonic::transport::Server::builder()
        .add_service(service.into_server())
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown.cancelled_owned())
        .await?;

    info!("Discovery endpoint stopped");
    Ok(())
}
