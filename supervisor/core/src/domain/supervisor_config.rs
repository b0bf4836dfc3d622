// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Supervisor Configuration
//
// Defines the runtime settings of the supervisor process:
// - Fixed discovery address components register against
// - HTTP gateway address
// - Component config directory and binary directory
// - Timeouts for the registration handshake, commands and shutdown
// - Registration deadline enforced by the watchdog

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupervisorConfig {
    /// Well-known address of the discovery endpoint
    #[serde(default = "default_discovery_address")]
    pub discovery_address: SocketAddr,

    /// Address of the HTTP command gateway
    #[serde(default = "default_http_address")]
    pub http_address: SocketAddr,

    /// Directory scanned for component config files
    #[serde(default = "default_components_dir")]
    pub components_dir: PathBuf,

    /// Base directory for relative component `cmd` paths.
    /// Defaults to the directory of the supervisor executable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_bin_dir: Option<PathBuf>,

    /// Per-component bound on the shutdown RPC and on the post-ack exit wait
    #[serde(default = "default_shutdown_timeout", with = "humantime_serde")]
    pub shutdown_timeout: Duration,

    /// Bound on dial-back and metadata fetch during registration
    #[serde(default = "default_dial_timeout", with = "humantime_serde")]
    pub dial_timeout: Duration,

    /// Bound on a single gateway command execution
    #[serde(default = "default_command_timeout", with = "humantime_serde")]
    pub command_timeout: Duration,

    /// Placeholders not live after this long are reaped. `None` disables the watchdog.
    #[serde(default = "default_registration_deadline", with = "humantime_serde")]
    pub registration_deadline: Option<Duration>,
}

fn default_discovery_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 50050))
}

fn default_http_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn default_components_dir() -> PathBuf {
    PathBuf::from("./configs")
}

fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_dial_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_command_timeout() -> Duration {
    Duration::from_secs(15)
}

fn default_registration_deadline() -> Option<Duration> {
    Some(Duration::from_secs(30))
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            discovery_address: default_discovery_address(),
            http_address: default_http_address(),
            components_dir: default_components_dir(),
            component_bin_dir: None,
            shutdown_timeout: default_shutdown_timeout(),
            dial_timeout: default_dial_timeout(),
            command_timeout: default_command_timeout(),
            registration_deadline: default_registration_deadline(),
        }
    }
}

impl SupervisorConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Discover configuration file using precedence order
    /// 1. CSE_CONFIG_PATH environment variable
    /// 2. ./cse.yaml (working directory)
    /// 3. ~/.cse/config.yaml (user home)
    /// 4. /etc/cse/config.yaml (system, Unix) or C:\ProgramData\cse\config.yaml (Windows)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("CSE_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./cse.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".cse").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        let system_config = PathBuf::from("/etc/cse/config.yaml");
        #[cfg(windows)]
        let system_config = PathBuf::from("C:\\ProgramData\\cse\\config.yaml");

        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // An explicit path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::info!("No configuration file found, using defaults");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CSE_DISCOVERY_ADDR") {
            match val.parse() {
                Ok(addr) => {
                    tracing::info!("Environment override: CSE_DISCOVERY_ADDR={}", val);
                    self.discovery_address = addr;
                }
                Err(_) => tracing::warn!("Invalid value for CSE_DISCOVERY_ADDR: '{}'. Ignoring.", val),
            }
        }

        if let Ok(val) = std::env::var("CSE_HTTP_ADDR") {
            match val.parse() {
                Ok(addr) => {
                    tracing::info!("Environment override: CSE_HTTP_ADDR={}", val);
                    self.http_address = addr;
                }
                Err(_) => tracing::warn!("Invalid value for CSE_HTTP_ADDR: '{}'. Ignoring.", val),
            }
        }

        if let Ok(val) = std::env::var("CSE_COMPONENTS_DIR") {
            tracing::info!("Environment override: CSE_COMPONENTS_DIR={}", val);
            self.components_dir = PathBuf::from(val);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.discovery_address == self.http_address {
            anyhow::bail!(
                "discovery_address and http_address must differ (both {})",
                self.discovery_address
            );
        }

        if self.discovery_address.port() == 0 {
            anyhow::bail!("discovery_address needs a fixed port, components cannot find an ephemeral one");
        }

        for (field, value) in [
            ("shutdown_timeout", self.shutdown_timeout),
            ("dial_timeout", self.dial_timeout),
            ("command_timeout", self.command_timeout),
        ] {
            if value.is_zero() {
                anyhow::bail!("{} must be greater than zero", field);
            }
        }

        if let Some(deadline) = self.registration_deadline {
            if deadline <= self.dial_timeout {
                anyhow::bail!(
                    "registration_deadline ({:?}) must exceed dial_timeout ({:?})",
                    deadline,
                    self.dial_timeout
                );
            }
        }

        Ok(())
    }

    /// Directory relative component executables are resolved against
    pub fn resolve_bin_dir(&self) -> PathBuf {
        if let Some(dir) = &self.component_bin_dir {
            return dir.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
