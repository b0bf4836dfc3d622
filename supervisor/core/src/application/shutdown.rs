// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Shutdown Coordinator
//!
//! Fans a `Shutdown` RPC out to every live component, escalates to a kill
//! for anything that fails or times out, and waits for all attempts before
//! returning. After the barrier, processes of components that never
//! registered are killed as well.

use futures::future::join_all;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{info, warn};

use crate::infrastructure::registry::{ComponentRecord, ComponentRegistry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Acknowledged and exited on its own
    Graceful,
    /// Acknowledged but still running after the timeout
    KilledAfterAck,
    /// RPC failed, timed out or was refused
    Killed { reason: String },
    /// Never registered; process killed after the fan-out
    OrphanKilled,
    /// Escalation was needed but the process could not be killed
    KillFailed { reason: String },
}

#[derive(Debug, Default)]
pub struct ShutdownReport {
    pub outcomes: Vec<(String, ShutdownOutcome)>,
}

impl ShutdownReport {
    pub fn outcome(&self, name: &str) -> Option<&ShutdownOutcome> {
        self.outcomes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, outcome)| outcome)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

pub struct ShutdownCoordinator {
    registry: ComponentRegistry,
    timeout: Duration,
    started: AtomicBool,
}

impl ShutdownCoordinator {
    pub fn new(registry: ComponentRegistry, timeout: Duration) -> Self {
        Self {
            registry,
            timeout,
            started: AtomicBool::new(false),
        }
    }

    /// Shut every component down. Only the first call does any work.
    pub async fn shutdown_all(&self) -> ShutdownReport {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("Shutdown already performed, ignoring repeated request");
            return ShutdownReport::default();
        }

        let mut outcomes = Vec::new();
        let mut attempted: HashSet<String> = HashSet::new();

        // Components that register while earlier ones are stopping still get
        // a Shutdown RPC rather than a kill.
        loop {
            let live: Vec<ComponentRecord> = self
                .registry
                .live()
                .into_iter()
                .filter(|r| !attempted.contains(r.name()))
                .collect();
            if live.is_empty() {
                break;
            }
            info!("Sending shutdown to {} live component(s)", live.len());

            let batch = join_all(live.into_iter().map(|record| self.shutdown_one(record))).await;
            attempted.extend(batch.iter().map(|(name, _)| name.clone()));
            outcomes.extend(batch);
        }

        let orphans: Vec<ComponentRecord> = self
            .registry
            .list()
            .into_iter()
            .filter(|r| !attempted.contains(r.name()))
            .filter(|r| r.process.as_ref().is_some_and(|p| !p.has_exited()))
            .collect();

        if !orphans.is_empty() {
            warn!("Killing {} component(s) that never registered", orphans.len());
            outcomes.extend(join_all(orphans.into_iter().map(|record| self.kill_orphan(record))).await);
        }

        info!("All components shut down");
        ShutdownReport { outcomes }
    }

    async fn shutdown_one(&self, record: ComponentRecord) -> (String, ShutdownOutcome) {
        let name = record.name().to_string();
        info!(component = %name, "Shutting down component");

        let outcome = match &record.client {
            Some(client) => match tokio::time::timeout(self.timeout, client.shutdown()).await {
                Ok(Ok(ack)) if ack.acknowledged => self.await_exit(&record).await,
                Ok(Ok(ack)) => {
                    self.force_kill(&record, format!("shutdown refused: {}", ack.message))
                        .await
                }
                Ok(Err(e)) => {
                    self.force_kill(&record, format!("shutdown rpc failed: {}", e))
                        .await
                }
                Err(_) => {
                    self.force_kill(&record, format!("shutdown timed out after {:?}", self.timeout))
                        .await
                }
            },
            None => self.force_kill(&record, "no rpc client".to_string()).await,
        };

        // Closes the connection once the snapshot's clone is gone too
        self.registry.disconnect(&name);
        (name, outcome)
    }

    async fn await_exit(&self, record: &ComponentRecord) -> ShutdownOutcome {
        let Some(process) = &record.process else {
            return ShutdownOutcome::Graceful;
        };

        match tokio::time::timeout(self.timeout, process.wait()).await {
            Ok(_) => {
                info!(component = %record.name(), "Component exited gracefully");
                ShutdownOutcome::Graceful
            }
            Err(_) => {
                warn!(
                    component = %record.name(),
                    pid = process.pid(),
                    "Component acknowledged shutdown but is still running, killing"
                );
                match self.kill(record).await {
                    Ok(()) => ShutdownOutcome::KilledAfterAck,
                    Err(reason) => ShutdownOutcome::KillFailed { reason },
                }
            }
        }
    }

    async fn force_kill(&self, record: &ComponentRecord, reason: String) -> ShutdownOutcome {
        warn!(component = %record.name(), "Forcing termination: {}", reason);
        match self.kill(record).await {
            Ok(()) => ShutdownOutcome::Killed { reason },
            Err(kill_error) => ShutdownOutcome::KillFailed {
                reason: format!("{}; {}", reason, kill_error),
            },
        }
    }

    async fn kill_orphan(&self, record: ComponentRecord) -> (String, ShutdownOutcome) {
        let name = record.name().to_string();
        let outcome = match self.kill(&record).await {
            Ok(()) => ShutdownOutcome::OrphanKilled,
            Err(reason) => ShutdownOutcome::KillFailed { reason },
        };
        (name, outcome)
    }

    async fn kill(&self, record: &ComponentRecord) -> Result<(), String> {
        let process = record
            .process
            .as_ref()
            .ok_or_else(|| "no process handle".to_string())?;

        match tokio::time::timeout(self.timeout, process.kill()).await {
            Ok(_) => Ok(()),
            Err(_) => Err(format!("process {} did not die after kill", process.pid())),
        }
    }
}
