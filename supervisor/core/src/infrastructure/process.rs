// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! OS process lifecycle for component children.
//!
//! A monitor task owns the `tokio::process::Child` and waits for either its
//! exit or a kill request. `ProcessHandle` is the cloneable view of that task:
//! pid, kill request, exit observation. Killing is crate-private so only the
//! launcher, the shutdown coordinator and the watchdog can do it.

use std::fmt;
use tokio::process::Command;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// How a component process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    /// Exit code, `None` when terminated by a signal or when waiting failed
    pub code: Option<i32>,
    /// Whether the supervisor requested the termination
    pub killed: bool,
}

#[derive(Clone)]
pub struct ProcessHandle {
    pid: u32,
    kill_tx: mpsc::Sender<()>,
    exit_rx: watch::Receiver<Option<ProcessExit>>,
}

impl fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .field("exit", &*self.exit_rx.borrow())
            .finish()
    }
}

impl ProcessHandle {
    /// Spawn `command` and start its monitor task.
    pub fn spawn(mut command: Command, name: &str) -> std::io::Result<Self> {
        let mut child = command.spawn()?;
        let pid = child.id().unwrap_or(0);

        let (kill_tx, mut kill_rx) = mpsc::channel::<()>(1);
        let (exit_tx, exit_rx) = watch::channel(None);
        let name = name.to_string();

        tokio::spawn(async move {
            let mut killed = false;
            let status = tokio::select! {
                status = child.wait() => status,
                Some(()) = kill_rx.recv() => {
                    killed = true;
                    debug!(component = %name, pid, "Killing component process");
                    if let Err(e) = child.start_kill() {
                        warn!(component = %name, pid, "Failed to signal process: {}", e);
                    }
                    child.wait().await
                }
            };

            let code = match status {
                Ok(status) => status.code(),
                Err(e) => {
                    warn!(component = %name, pid, "Failed to wait for process: {}", e);
                    None
                }
            };

            if killed {
                info!(component = %name, pid, "Component process killed");
            } else {
                info!(component = %name, pid, ?code, "Component process exited");
            }

            let _ = exit_tx.send(Some(ProcessExit { code, killed }));
        });

        Ok(Self {
            pid,
            kill_tx,
            exit_rx,
        })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn exit(&self) -> Option<ProcessExit> {
        *self.exit_rx.borrow()
    }

    pub fn has_exited(&self) -> bool {
        self.exit().is_some()
    }

    /// Wait for the process to exit.
    pub async fn wait(&self) -> Option<ProcessExit> {
        let mut rx = self.exit_rx.clone();
        let exit = match rx.wait_for(Option::is_some).await {
            Ok(exit) => *exit,
            // Monitor task is gone without reporting; treat as unknown exit
            Err(_) => None,
        };
        exit
    }

    /// Request a kill and wait until the process is gone.
    pub(crate) async fn kill(&self) -> Option<ProcessExit> {
        if let Some(exit) = self.exit() {
            return Some(exit);
        }
        // A closed channel means the monitor already finished
        let _ = self.kill_tx.try_send(());
        self.wait().await
    }
}
