// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use cse_core::infrastructure::grpc_client::endpoint_uri;
use cse_core::infrastructure::proto::component_v1::{
    component_discovery_service_client::ComponentDiscoveryServiceClient, RegisterComponentRequest,
};
use std::net::SocketAddr;
use std::time::Duration;
use tonic::transport::Endpoint;
use tracing::info;

use crate::error::SdkError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Announce `address` to the supervisor's discovery endpoint under `name`.
/// Returns the supervisor's confirmation message.
pub async fn register_with_supervisor(
    discovery_addr: &str,
    name: &str,
    address: SocketAddr,
) -> Result<String, SdkError> {
    let discovery_error = |source| SdkError::Discovery {
        address: discovery_addr.to_string(),
        source,
    };

    let channel = Endpoint::from_shared(endpoint_uri(discovery_addr))
        .map_err(discovery_error)?
        .connect_timeout(CONNECT_TIMEOUT)
        .connect()
        .await
        .map_err(discovery_error)?;

    info!(component = %name, %address, "Registering with supervisor at {}", discovery_addr);

    let response = ComponentDiscoveryServiceClient::new(channel)
        .register_component(RegisterComponentRequest {
            name: name.to_string(),
            grpc_address: address.to_string(),
            pid: std::process::id() as i32,
        })
        .await?
        .into_inner();

    if response.success {
        info!(component = %name, "Registered: {}", response.message);
        Ok(response.message)
    } else {
        Err(SdkError::Rejected(response.message))
    }
}
