// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Registration Handler
//!
//! Binds a spawned process to its declared identity. The handshake runs in
//! three steps so that a slow or unreachable component never blocks other
//! registrations:
//!
//! 1. validate the request against the placeholder (short read lock)
//! 2. dial back and fetch metadata (no lock held, bounded by `dial_timeout`)
//! 3. commit the live fields (short write lock, re-validated)

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::domain::component::ComponentMetadata;
use crate::domain::errors::RegistrationError;
use crate::domain::rpc::ComponentConnector;
use crate::infrastructure::registry::{ComponentRegistry, Promotion, Registration};

/// Inbound self-registration call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub name: String,
    pub address: String,
    pub pid: u32,
}

pub struct RegistrationService {
    registry: ComponentRegistry,
    connector: Arc<dyn ComponentConnector>,
    dial_timeout: Duration,
}

impl RegistrationService {
    pub fn new(
        registry: ComponentRegistry,
        connector: Arc<dyn ComponentConnector>,
        dial_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            connector,
            dial_timeout,
        }
    }

    pub async fn register(
        &self,
        request: RegistrationRequest,
    ) -> Result<ComponentMetadata, RegistrationError> {
        let RegistrationRequest { name, address, pid } = request;
        info!(component = %name, pid, %address, "Registration request received");

        let launch_id = self.registry.check_registration(&name, pid)?;

        let client = tokio::time::timeout(self.dial_timeout, self.connector.connect(&address))
            .await
            .map_err(|_| RegistrationError::Timeout {
                name: name.clone(),
                timeout: self.dial_timeout,
            })?
            .map_err(|source| RegistrationError::DialBack {
                name: name.clone(),
                address: address.clone(),
                source,
            })?;

        let metadata = tokio::time::timeout(self.dial_timeout, client.get_metadata())
            .await
            .map_err(|_| RegistrationError::Timeout {
                name: name.clone(),
                timeout: self.dial_timeout,
            })?
            .map_err(|source| RegistrationError::Metadata {
                name: name.clone(),
                source,
            })?;

        if metadata.name != name {
            warn!(
                component = %name,
                reported = %metadata.name,
                "Component reports a different name in its metadata"
            );
        }

        let promotion = self.registry.promote(
            launch_id,
            Registration {
                name: name.clone(),
                endpoint: address,
                pid,
                client,
                metadata: metadata.clone(),
            },
        )?;

        match promotion {
            Promotion::Registered => info!(
                component = %name,
                version = %metadata.version,
                commands = metadata.commands.len(),
                "Component registered"
            ),
            Promotion::Reconnected => info!(
                component = %name,
                "Component re-registered, previous connection replaced"
            ),
        }

        Ok(metadata)
    }
}
