// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Component entry point: bind, register, serve until shut down.

use anyhow::Context;
use clap::Parser;
use cse_core::domain::ComponentState;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tracing::{error, info};

use crate::command::CommandRegistry;
use crate::error::SdkError;
use crate::registration::register_with_supervisor;
use crate::server::{ComponentInfo, ComponentServer};

/// Flags the supervisor appends to every component's command line.
#[derive(Debug, Clone, Parser)]
pub struct ComponentArgs {
    /// Address of the supervisor's discovery endpoint
    #[arg(long)]
    pub discovery_addr: String,

    /// Name this component is registered under
    #[arg(long)]
    pub component_name: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CSE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Bind an ephemeral loopback port, register with the supervisor and serve
/// until a `Shutdown` request (or Ctrl+C) stops the server.
pub async fn run_component(
    args: ComponentArgs,
    info: ComponentInfo,
    commands: CommandRegistry,
) -> Result<(), SdkError> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(SdkError::Bind)?;
    let address = listener.local_addr().map_err(SdkError::Bind)?;

    let server = ComponentServer::new(&args.component_name, info, commands);
    let shutdown = server.shutdown_token();
    info!(
        component = %args.component_name,
        %address,
        "Component endpoint listening"
    );

    let serve = tokio::spawn(
        tonic::transport::Server::builder()
            .add_service(server.clone().into_service())
            .serve_with_incoming_shutdown(
                TcpListenerStream::new(listener),
                shutdown.clone().cancelled_owned(),
            ),
    );

    if let Err(e) =
        register_with_supervisor(&args.discovery_addr, &args.component_name, address).await
    {
        error!(component = %args.component_name, "Registration failed: {}", e);
        server.set_state(ComponentState::Failed);
        shutdown.cancel();
        let _ = serve.await;
        return Err(e);
    }
    server.set_state(ComponentState::Running);

    let interrupt = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C signal");
            interrupt.cancel();
        }
    });

    match serve.await {
        Ok(result) => result.map_err(SdkError::Serve)?,
        Err(e) => error!("Component server task failed: {}", e),
    }

    info!(component = %args.component_name, "Component stopped");
    Ok(())
}

/// Initialize tracing subscriber for logging
pub fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    Ok(())
}
