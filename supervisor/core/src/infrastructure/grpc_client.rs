// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! tonic implementation of the component RPC seam.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};

use crate::domain::component::{CommandReply, ComponentMetadata, ComponentStatus, ShutdownAck};
use crate::domain::rpc::{ComponentConnector, ComponentRpc, RpcError};
use crate::infrastructure::proto::component_v1::{
    component_service_client::ComponentServiceClient, CommandParams, ExecuteCommandRequest,
    GetMetadataRequest, GetStatusRequest, ShutdownRequest,
};

impl From<tonic::Status> for RpcError {
    fn from(status: tonic::Status) -> Self {
        RpcError::Status {
            code: format!("{:?}", status.code()),
            message: status.message().to_string(),
        }
    }
}

/// Normalize a reported address into an `http://` URI.
pub fn endpoint_uri(address: &str) -> String {
    if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else {
        format!("http://{}", address)
    }
}

/// Opens tonic channels to components.
#[derive(Debug, Clone)]
pub struct GrpcConnector {
    connect_timeout: Duration,
}

impl GrpcConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

#[async_trait]
impl ComponentConnector for GrpcConnector {
    async fn connect(&self, address: &str) -> Result<Arc<dyn ComponentRpc>, RpcError> {
        let endpoint = Endpoint::from_shared(endpoint_uri(address))
            .map_err(|_| RpcError::InvalidAddress(address.to_string()))?
            .connect_timeout(self.connect_timeout);

        let channel = endpoint
            .connect()
            .await
            .map_err(|e| RpcError::Connect(e.to_string()))?;

        Ok(Arc::new(GrpcComponentClient::new(channel)))
    }
}

/// Client for one component. Owns the connection; dropping the last clone
/// closes it.
#[derive(Debug, Clone)]
pub struct GrpcComponentClient {
    inner: ComponentServiceClient<Channel>,
}

impl GrpcComponentClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: ComponentServiceClient::new(channel),
        }
    }
}

#[async_trait]
impl ComponentRpc for GrpcComponentClient {
    async fn get_metadata(&self) -> Result<ComponentMetadata, RpcError> {
        let response = self
            .inner
            .clone()
            .get_metadata(GetMetadataRequest {})
            .await?;
        Ok(response.into_inner().into())
    }

    async fn execute_command(
        &self,
        command_name: &str,
        json_params: String,
    ) -> Result<CommandReply, RpcError> {
        let request = ExecuteCommandRequest {
            command_name: command_name.to_string(),
            params: Some(CommandParams {
                json_payload: json_params,
            }),
        };
        let response = self.inner.clone().execute_command(request).await?.into_inner();
        Ok(CommandReply {
            success: response.success,
            json_result: response.result.map(|r| r.json_payload).unwrap_or_default(),
            error_message: response.error_message,
        })
    }

    async fn get_status(&self) -> Result<ComponentStatus, RpcError> {
        let response = self.inner.clone().get_status(GetStatusRequest {}).await?;
        Ok(response.into_inner().into())
    }

    async fn shutdown(&self) -> Result<ShutdownAck, RpcError> {
        let response = self.inner.clone().shutdown(ShutdownRequest {}).await?.into_inner();
        Ok(ShutdownAck {
            acknowledged: response.acknowledged,
            message: response.message,
        })
    }
}
