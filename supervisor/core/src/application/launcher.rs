// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Process Launcher
//!
//! Turns `ComponentConfig`s into running children. The placeholder record is
//! inserted strictly before the spawn, so a child can never reach the
//! discovery endpoint ahead of its own record.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{error, info, warn};

use crate::domain::component::ComponentConfig;
use crate::domain::errors::LaunchError;
use crate::infrastructure::process::ProcessHandle;
use crate::infrastructure::registry::ComponentRegistry;

/// Names launched and errors collected by `Launcher::launch_all`.
#[derive(Debug, Default)]
pub struct LaunchReport {
    pub launched: Vec<String>,
    pub failed: Vec<LaunchError>,
}

pub struct Launcher {
    registry: ComponentRegistry,
    discovery_address: SocketAddr,
    bin_dir: PathBuf,
}

impl Launcher {
    pub fn new(registry: ComponentRegistry, discovery_address: SocketAddr, bin_dir: PathBuf) -> Self {
        Self {
            registry,
            discovery_address,
            bin_dir,
        }
    }

    /// Absolute `cmd`s are used as-is, relative ones are joined onto the bin dir.
    pub fn resolve_executable(&self, cmd: &str) -> PathBuf {
        let path = Path::new(cmd);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.bin_dir.join(path)
        }
    }

    /// Full argument list for a child: declared args, then discovery flags.
    pub fn child_args(&self, config: &ComponentConfig) -> Vec<String> {
        let mut args = config.cmd_args.clone();
        args.push(format!("--discovery-addr={}", self.discovery_address));
        args.push(format!("--component-name={}", config.name));
        args
    }

    pub async fn launch(&self, config: ComponentConfig) -> Result<ProcessHandle, LaunchError> {
        let name = config.name.clone();
        let executable = self.resolve_executable(&config.cmd);

        let mut command = Command::new(&executable);
        command
            .args(self.child_args(&config))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // The old instance must be gone before its name accepts registrations again
        if let Some(process) = self.registry.get(&name).and_then(|r| r.process) {
            warn!(component = %name, pid = process.pid(), "Relaunching component, stopping previous process");
            if !process.has_exited() {
                process.kill().await;
            }
        }

        let (launch_id, previous) = self.registry.insert_placeholder(config);
        if let Some(process) = previous.and_then(|r| r.process) {
            // Attached by a concurrent launch after the check above
            if !process.has_exited() {
                process.kill().await;
            }
        }

        let process = match ProcessHandle::spawn(command, &name) {
            Ok(process) => process,
            Err(source) => {
                error!(component = %name, "Failed to start {:?}: {}", executable, source);
                self.registry.remove_launch(&name, launch_id);
                return Err(LaunchError { name, source });
            }
        };

        if !self.registry.attach_process(&name, launch_id, process.clone()) {
            // Replaced by a concurrent relaunch before the handle was attached
            warn!(component = %name, pid = process.pid(), "Record replaced during launch, killing orphan");
            process.kill().await;
            return Err(LaunchError {
                name,
                source: std::io::Error::other("record replaced during launch"),
            });
        }

        info!(
            component = %name,
            pid = process.pid(),
            "Component process started, waiting for registration"
        );
        Ok(process)
    }

    /// Launch every config in order. One failure never stops the rest.
    pub async fn launch_all(&self, configs: Vec<ComponentConfig>) -> LaunchReport {
        let mut report = LaunchReport::default();
        for config in configs {
            let name = config.name.clone();
            match self.launch(config).await {
                Ok(_) => report.launched.push(name),
                Err(e) => report.failed.push(e),
            }
        }
        info!(
            "Launched {} component(s), {} failed",
            report.launched.len(),
            report.failed.len()
        );
        report
    }
}
