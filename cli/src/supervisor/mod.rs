// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Supervisor process and the client used to talk to a running one

pub mod client;
pub mod server;

pub use client::GatewayClient;
pub use server::{run_supervisor, run_supervisor_until};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorStatus {
    Running {
        uptime: Option<u64>,
        components: u64,
        live: u64,
    },
    Unreachable {
        error: String,
    },
}

/// Probe a supervisor through its `/health` endpoint.
pub async fn check_supervisor(client: &GatewayClient) -> SupervisorStatus {
    match client.health().await {
        Ok(health) => SupervisorStatus::Running {
            uptime: health["uptime_seconds"].as_u64(),
            components: health["components"].as_u64().unwrap_or(0),
            live: health["live"].as_u64().unwrap_or(0),
        },
        Err(e) => SupervisorStatus::Unreachable {
            error: format!("{:#}", e),
        },
    }
}
