// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Supervisor process
//!
//! Startup order: discovery endpoint, component launch, watchdog, HTTP
//! gateway. On Ctrl+C/SIGTERM the gateway stops accepting requests, every
//! component is shut down, then the discovery endpoint closes.

use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use cse_core::application::{
    CommandGateway, Launcher, RegistrationService, RegistrationWatchdog, ShutdownCoordinator,
    ShutdownOutcome, ShutdownReport,
};
use cse_core::domain::SupervisorConfig;
use cse_core::infrastructure::config_loader::load_component_configs;
use cse_core::infrastructure::grpc_client::GrpcConnector;
use cse_core::infrastructure::ComponentRegistry;
use cse_core::presentation::api;
use cse_core::presentation::grpc::{serve_discovery, DiscoveryService};

pub async fn run_supervisor(config: SupervisorConfig) -> Result<()> {
    run_supervisor_until(config, shutdown_signal()).await.map(|_| ())
}

/// Run until `shutdown` resolves, then stop every component.
pub async fn run_supervisor_until(
    config: SupervisorConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<ShutdownReport> {
    config.validate().context("Configuration validation failed")?;
    info!("CSE supervisor starting (PID: {})", std::process::id());

    let registry = ComponentRegistry::new();

    // Discovery must be listening before any child is spawned
    let discovery_listener = TcpListener::bind(config.discovery_address)
        .await
        .with_context(|| {
            format!("Failed to bind discovery endpoint to {}", config.discovery_address)
        })?;
    let discovery_addr = discovery_listener
        .local_addr()
        .context("Failed to read discovery address")?;

    let registration = RegistrationService::new(
        registry.clone(),
        Arc::new(GrpcConnector::new(config.dial_timeout)),
        config.dial_timeout,
    );
    let discovery_token = CancellationToken::new();
    // Stops discovery if startup bails out below
    let _discovery_guard = discovery_token.clone().drop_guard();
    let discovery_task = tokio::spawn(serve_discovery(
        discovery_listener,
        DiscoveryService::new(Arc::new(registration)),
        discovery_token.clone(),
    ));

    let http_listener = TcpListener::bind(config.http_address)
        .await
        .with_context(|| format!("Failed to bind HTTP gateway to {}", config.http_address))?;

    let loaded = match load_component_configs(&config.components_dir) {
        Ok(loaded) => loaded,
        Err(e) => {
            warn!("No components loaded: {}", e);
            Default::default()
        }
    };

    let launcher = Launcher::new(registry.clone(), discovery_addr, config.resolve_bin_dir());
    let report = launcher.launch_all(loaded.configs).await;
    for failure in &report.failed {
        error!("{}", failure);
    }

    let watchdog = config.registration_deadline.map(|deadline| {
        let watchdog = Arc::new(RegistrationWatchdog::new(registry.clone(), deadline));
        let token = watchdog.shutdown_token();
        (token, watchdog.start())
    });

    let gateway = CommandGateway::new(registry.clone(), config.command_timeout);
    let app = api::app(gateway, registry.clone());

    info!("HTTP gateway listening on {}", config.http_address);
    let serve_result = axum::serve(http_listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed");

    info!("Supervisor shutting down");
    // A reap cycle in flight must finish before the coordinator looks at the registry
    if let Some((token, task)) = watchdog {
        token.cancel();
        if let Err(e) = task.await {
            error!("Watchdog task failed: {}", e);
        }
    }

    let coordinator = ShutdownCoordinator::new(registry, config.shutdown_timeout);
    let report = coordinator.shutdown_all().await;
    log_shutdown_report(&report);

    discovery_token.cancel();
    match discovery_task.await {
        Ok(Err(e)) => error!("Discovery endpoint failed: {}", e),
        Err(e) => error!("Discovery task failed: {}", e),
        Ok(Ok(())) => {}
    }

    serve_result?;
    info!("Supervisor stopped");
    Ok(report)
}

fn log_shutdown_report(report: &ShutdownReport) {
    for (name, outcome) in &report.outcomes {
        match outcome {
            ShutdownOutcome::Graceful => info!(component = %name, "Stopped gracefully"),
            ShutdownOutcome::KilledAfterAck => {
                warn!(component = %name, "Acknowledged shutdown but had to be killed")
            }
            ShutdownOutcome::Killed { reason } => {
                warn!(component = %name, "Killed: {}", reason)
            }
            ShutdownOutcome::OrphanKilled => {
                warn!(component = %name, "Never registered, process killed")
            }
            ShutdownOutcome::KillFailed { reason } => {
                error!(component = %name, "Could not be stopped: {}", reason)
            }
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
