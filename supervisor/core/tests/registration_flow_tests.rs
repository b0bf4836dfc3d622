// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! End-to-end registration over real gRPC: a component server on an ephemeral
//! port registers with the discovery endpoint, becomes live, takes commands
//! through the gateway and is shut down by the coordinator.

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use cse_core::application::{CommandGateway, ShutdownCoordinator, ShutdownOutcome};
use cse_core::domain::ComponentConfig;
use cse_core::infrastructure::proto::component_v1::{
    component_discovery_service_client::ComponentDiscoveryServiceClient, RegisterComponentRequest,
};
use cse_core::infrastructure::ComponentRegistry;
use serde_json::json;

use common::{spawn_component, spawn_discovery};

async fn register(
    discovery: std::net::SocketAddr,
    name: &str,
    address: std::net::SocketAddr,
    pid: i32,
) -> (bool, String) {
    let mut client = ComponentDiscoveryServiceClient::connect(format!("http://{}", discovery))
        .await
        .unwrap();
    let response = client
        .register_component(RegisterComponentRequest {
            name: name.to_string(),
            grpc_address: address.to_string(),
            pid,
        })
        .await
        .unwrap()
        .into_inner();
    (response.success, response.message)
}

#[tokio::test]
async fn test_component_registers_and_executes_commands() {
    let registry = ComponentRegistry::new();
    let discovery = spawn_discovery(registry.clone()).await;
    let component = spawn_component("echo").await;

    registry.insert_placeholder(ComponentConfig::new("echo", "echo-worker"));
    let (success, message) = register(discovery.address, "echo", component.address, 4242).await;
    assert!(success, "registration failed: {}", message);

    let record = registry.get("echo").unwrap();
    assert!(record.is_live());
    assert_eq!(record.registered_pid, Some(4242));
    assert_eq!(record.endpoint, Some(component.address.to_string()));
    assert_eq!(
        record.metadata.unwrap().command_names(),
        vec!["echo.ping", "echo.reverse"]
    );

    let gateway = CommandGateway::new(registry.clone(), Duration::from_secs(5));
    let result = gateway
        .execute("echo", "echo.ping", json!({"text": "hi"}))
        .await
        .unwrap();
    assert_eq!(result, json!({"reply": "pong", "params": {"text": "hi"}}));

    let coordinator = ShutdownCoordinator::new(registry.clone(), Duration::from_secs(2));
    let report = coordinator.shutdown_all().await;
    assert_eq!(report.outcome("echo"), Some(&ShutdownOutcome::Graceful));
    assert_eq!(component.shutdowns.load(Ordering::SeqCst), 1);
    assert!(registry.live().is_empty());

    component.stop.cancel();
    discovery.stop.cancel();
}

#[tokio::test]
async fn test_ghost_registration_is_rejected() {
    let registry = ComponentRegistry::new();
    let discovery = spawn_discovery(registry.clone()).await;
    let component = spawn_component("ghost").await;

    let (success, message) = register(discovery.address, "ghost", component.address, 1).await;
    assert!(!success);
    assert!(message.contains("ghost"));
    assert!(registry.is_empty());

    component.stop.cancel();
    discovery.stop.cancel();
}

#[tokio::test]
async fn test_unreachable_component_stays_placeholder() {
    let registry = ComponentRegistry::new();
    let discovery = spawn_discovery(registry.clone()).await;

    let closed = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_address = closed.local_addr().unwrap();
    drop(closed);

    registry.insert_placeholder(ComponentConfig::new("echo", "echo-worker"));
    let (success, _) = register(discovery.address, "echo", dead_address, 7).await;
    assert!(!success);

    let record = registry.get("echo").unwrap();
    assert!(!record.is_live());
    assert!(record.endpoint.is_none());

    discovery.stop.cancel();
}

#[tokio::test]
async fn test_concurrent_registrations_are_all_committed() {
    const COUNT: usize = 8;

    let registry = ComponentRegistry::new();
    let discovery = spawn_discovery(registry.clone()).await;

    let mut components = Vec::new();
    for i in 0..COUNT {
        let name = format!("worker{}", i);
        registry.insert_placeholder(ComponentConfig::new(&name, "worker"));
        components.push((name.clone(), spawn_component(&name).await));
    }

    let calls = components.iter().enumerate().map(|(i, (name, component))| {
        register(discovery.address, name, component.address, 1000 + i as i32)
    });
    let results = futures::future::join_all(calls).await;
    assert!(results.iter().all(|(success, _)| *success));

    let live = registry.live();
    assert_eq!(live.len(), COUNT);
    for (i, (name, component)) in components.iter().enumerate() {
        let record = registry.get(name).unwrap();
        assert_eq!(record.registered_pid, Some(1000 + i as u32));
        assert_eq!(record.endpoint, Some(component.address.to_string()));
        assert_eq!(record.metadata.as_ref().unwrap().name, *name);
    }

    for (_, component) in components {
        component.stop.cancel();
    }
    discovery.stop.cancel();
}

#[tokio::test]
async fn test_same_process_re_registration_reconnects() {
    let registry = ComponentRegistry::new();
    let discovery = spawn_discovery(registry.clone()).await;
    let first = spawn_component("echo").await;
    let second = spawn_component("echo").await;

    registry.insert_placeholder(ComponentConfig::new("echo", "echo-worker"));
    assert!(register(discovery.address, "echo", first.address, 55).await.0);
    assert!(register(discovery.address, "echo", second.address, 55).await.0);

    let record = registry.get("echo").unwrap();
    assert!(record.is_live());
    assert_eq!(record.endpoint, Some(second.address.to_string()));
    assert_eq!(registry.len(), 1);

    first.stop.cancel();
    second.stop.cancel();
    discovery.stop.cancel();
}

#[tokio::test]
async fn test_negative_pid_is_invalid_argument() {
    let registry = ComponentRegistry::new();
    let discovery = spawn_discovery(registry.clone()).await;

    let mut client =
        ComponentDiscoveryServiceClient::connect(format!("http://{}", discovery.address))
            .await
            .unwrap();
    let status = client
        .register_component(RegisterComponentRequest {
            name: "echo".to_string(),
            grpc_address: "127.0.0.1:1".to_string(),
            pid: -1,
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), tonic::Code::InvalidArgument);

    discovery.stop.cancel();
}
