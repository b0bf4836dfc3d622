// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command Gateway
//!
//! Forwards external command requests to live components. Only records that
//! completed registration are reachable; everything else is `NotReady`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::component::{CommandInfo, ComponentStatus};
use crate::domain::errors::GatewayError;
use crate::infrastructure::registry::ComponentRegistry;

/// Listing entry for one live component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSummary {
    pub name: String,
    pub version: String,
    pub description: String,
    pub commands: Vec<CommandInfo>,
}

#[derive(Clone)]
pub struct CommandGateway {
    registry: ComponentRegistry,
    command_timeout: Duration,
}

impl CommandGateway {
    pub fn new(registry: ComponentRegistry, command_timeout: Duration) -> Self {
        Self {
            registry,
            command_timeout,
        }
    }

    /// Live components sorted by name.
    pub fn list_components(&self) -> Vec<ComponentSummary> {
        self.registry
            .live()
            .into_iter()
            .filter_map(|record| record.metadata)
            .map(|metadata| ComponentSummary {
                name: metadata.name,
                version: metadata.version,
                description: metadata.description,
                commands: metadata.commands,
            })
            .collect()
    }

    pub async fn execute(
        &self,
        component: &str,
        command: &str,
        params: Value,
    ) -> Result<Value, GatewayError> {
        let (client, metadata) = self
            .registry
            .live_client(component)
            .ok_or_else(|| GatewayError::NotReady(component.to_string()))?;

        if metadata.command(command).is_none() {
            return Err(GatewayError::CommandNotFound {
                component: component.to_string(),
                command: command.to_string(),
            });
        }

        info!(component, command, "Executing command");
        let reply = tokio::time::timeout(
            self.command_timeout,
            client.execute_command(command, params.to_string()),
        )
        .await
        .map_err(|_| GatewayError::Timeout {
            component: component.to_string(),
            timeout: self.command_timeout,
        })?
        .map_err(|source| GatewayError::Rpc {
            component: component.to_string(),
            source,
        })?;

        if !reply.success {
            warn!(component, command, "Command failed: {}", reply.error_message);
            return Err(GatewayError::CommandFailed(reply.error_message));
        }

        debug!(component, command, "Command succeeded");
        serde_json::from_str(&reply.json_result).map_err(|e| GatewayError::InvalidResult {
            component: component.to_string(),
            reason: e.to_string(),
        })
    }

    pub async fn status(&self, component: &str) -> Result<ComponentStatus, GatewayError> {
        let (client, _) = self
            .registry
            .live_client(component)
            .ok_or_else(|| GatewayError::NotReady(component.to_string()))?;

        tokio::time::timeout(self.command_timeout, client.get_status())
            .await
            .map_err(|_| GatewayError::Timeout {
                component: component.to_string(),
                timeout: self.command_timeout,
            })?
            .map_err(|source| GatewayError::Rpc {
                component: component.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::component::{
        CommandReply, ComponentConfig, ComponentMetadata, ComponentState, ShutdownAck,
    };
    use crate::domain::rpc::{ComponentRpc, RpcError};
    use crate::infrastructure::registry::Registration;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    /// Answers `echo.ping` and `echo.fail`; `echo.garbage` returns non-JSON.
    struct EchoRpc;

    #[async_trait]
    impl ComponentRpc for EchoRpc {
        async fn get_metadata(&self) -> Result<ComponentMetadata, RpcError> {
            Ok(echo_metadata())
        }

        async fn execute_command(
            &self,
            command_name: &str,
            json_params: String,
        ) -> Result<CommandReply, RpcError> {
            let reply = match command_name {
                "echo.ping" => CommandReply {
                    success: true,
                    json_result: format!(r#"{{"reply":"pong","params":{}}}"#, json_params),
                    error_message: String::new(),
                },
                "echo.fail" => CommandReply {
                    success: false,
                    json_result: String::new(),
                    error_message: "printer on fire".to_string(),
                },
                "echo.garbage" => CommandReply {
                    success: true,
                    json_result: "not json".to_string(),
                    error_message: String::new(),
                },
                "echo.slow" => {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    return Err(RpcError::Connect("too late".to_string()));
                }
                _ => return Err(RpcError::Connect("unexpected".to_string())),
            };
            Ok(reply)
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
                message: String::new(),
            })
        }
    }

    fn echo_metadata() -> ComponentMetadata {
        ComponentMetadata {
            name: "echo".to_string(),
            version: "1.0.0".to_string(),
            description: "Echo component".to_string(),
            author: String::new(),
            commands: ["echo.ping", "echo.fail", "echo.garbage", "echo.slow"]
                .into_iter()
                .map(|name| CommandInfo::new(name, name))
                .collect(),
        }
    }

    fn gateway_with_echo(timeout: Duration) -> (CommandGateway, ComponentRegistry) {
        let registry = ComponentRegistry::new();
        let (launch_id, _) = registry.insert_placeholder(ComponentConfig::new("echo", "echo-worker"));
        registry
            .promote(
                launch_id,
                Registration {
                    name: "echo".to_string(),
                    endpoint: "127.0.0.1:9001".to_string(),
                    pid: 1,
                    client: Arc::new(EchoRpc),
                    metadata: echo_metadata(),
                },
            )
            .unwrap();
        (CommandGateway::new(registry.clone(), timeout), registry)
    }

    #[tokio::test]
    async fn test_execute_returns_decoded_result() {
        let (gateway, _) = gateway_with_echo(Duration::from_secs(1));
        let result = gateway
            .execute("echo", "echo.ping", json!({"n": 1}))
            .await
            .unwrap();
        assert_eq!(result, json!({"reply": "pong", "params": {"n": 1}}));
    }

    #[tokio::test]
    async fn test_execute_error_mapping() {
        let (gateway, registry) = gateway_with_echo(Duration::from_millis(100));
        registry.insert_placeholder(ComponentConfig::new("pending", "bin"));

        assert!(matches!(
            gateway.execute("missing", "x", Value::Null).await,
            Err(GatewayError::NotReady(_))
        ));
        assert!(matches!(
            gateway.execute("pending", "x", Value::Null).await,
            Err(GatewayError::NotReady(_))
        ));
        assert!(matches!(
            gateway.execute("echo", "echo.unknown", Value::Null).await,
            Err(GatewayError::CommandNotFound { .. })
        ));
        assert!(matches!(
            gateway.execute("echo", "echo.fail", Value::Null).await,
            Err(GatewayError::CommandFailed(message)) if message == "printer on fire"
        ));
        assert!(matches!(
            gateway.execute("echo", "echo.garbage", Value::Null).await,
            Err(GatewayError::InvalidResult { .. })
        ));
        assert!(matches!(
            gateway.execute("echo", "echo.slow", Value::Null).await,
            Err(GatewayError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_components_only_includes_live() {
        let (gateway, registry) = gateway_with_echo(Duration::from_secs(1));
        registry.insert_placeholder(ComponentConfig::new("pending", "bin"));

        let components = gateway.list_components();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].name, "echo");
        assert_eq!(components[0].commands.len(), 4);
    }

    #[tokio::test]
    async fn test_status() {
        let (gateway, registry) = gateway_with_echo(Duration::from_secs(1));
        let status = gateway.status("echo").await.unwrap();
        assert_eq!(status.state, ComponentState::Running);

        registry.disconnect("echo");
        assert!(matches!(
            gateway.status("echo").await,
            Err(GatewayError::NotReady(_))
        ));
    }
}
