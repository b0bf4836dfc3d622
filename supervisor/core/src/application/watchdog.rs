// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Registration Watchdog - Background task reaping components that never register
//!
//! A placeholder older than the registration deadline is removed from the
//! registry and its process is killed. Records that became live are never
//! touched.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::infrastructure::registry::ComponentRegistry;

const MAX_CHECK_INTERVAL: Duration = Duration::from_secs(1);

pub struct RegistrationWatchdog {
    registry: ComponentRegistry,
    deadline: Duration,
    shutdown_token: CancellationToken,
}

impl RegistrationWatchdog {
    pub fn new(registry: ComponentRegistry, deadline: Duration) -> Self {
        Self {
            registry,
            deadline,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Get a handle to stop the background task
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Half the deadline, capped at one second.
    pub fn check_interval(&self) -> Duration {
        (self.deadline / 2).clamp(Duration::from_millis(1), MAX_CHECK_INTERVAL)
    }

    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(&self) {
        info!(
            deadline = ?self.deadline,
            interval = ?self.check_interval(),
            "Starting registration watchdog"
        );

        let mut tick = interval(self.check_interval());
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let reaped = self.reap_cycle().await;
                    if !reaped.is_empty() {
                        debug!(count = reaped.len(), "Watchdog cycle reaped placeholders");
                    }
                }
                _ = self.shutdown_token.cancelled() => {
                    info!("Shutdown signal received, stopping registration watchdog");
                    break;
                }
            }
        }
    }

    /// Remove and kill every expired placeholder. Returns the reaped names.
    pub async fn reap_cycle(&self) -> Vec<String> {
        let mut reaped = Vec::new();

        for record in self.registry.expired_placeholders(self.deadline) {
            let name = record.name().to_string();
            let Some(removed) = self.registry.remove_unregistered(&name, record.launch_id) else {
                // Registered or relaunched since the snapshot
                continue;
            };

            warn!(
                component = %name,
                deadline = ?self.deadline,
                "Component did not register before the deadline, removing it"
            );

            if let Some(process) = removed.process {
                if !process.has_exited() {
                    process.kill().await;
                }
            }
            reaped.push(name);
        }

        reaped
    }
}
