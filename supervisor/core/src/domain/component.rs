// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Component descriptors
//!
//! `ComponentConfig` is what the operator declares on disk; `ComponentMetadata`
//! is what a running component reports about itself over `GetMetadata`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::errors::ConfigError;

/// Declarative launch record for one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentConfig {
    /// Unique registry key; also passed to the child as `--component-name`
    pub name: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub description: String,

    /// Executable path, absolute or relative to the component binary directory
    pub cmd: String,

    /// Arguments placed before the supervisor-provided discovery flags
    #[serde(default)]
    pub cmd_args: Vec<String>,
}

impl ComponentConfig {
    pub fn new(name: impl Into<String>, cmd: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: String::new(),
            description: String::new(),
            cmd: cmd.into(),
            cmd_args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cmd_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::Invalid("component name cannot be empty".to_string()));
        }
        if self.name.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(format!(
                "component name '{}' must not contain whitespace",
                self.name
            )));
        }
        if self.cmd.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "component '{}' has an empty cmd",
                self.name
            )));
        }
        Ok(())
    }
}

/// One command a component can execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters_schema: String,
    #[serde(default)]
    pub result_schema: String,
}

impl CommandInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters_schema: "{}".to_string(),
            result_schema: "{}".to_string(),
        }
    }

    pub fn with_schemas(
        mut self,
        parameters_schema: impl Into<String>,
        result_schema: impl Into<String>,
    ) -> Self {
        self.parameters_schema = parameters_schema.into();
        self.result_schema = result_schema.into();
        self
    }
}

/// Capability description reported by a registered component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentMetadata {
    pub name: String,
    pub version: String,
    pub description: String,
    #[serde(default)]
    pub author: String,
    pub commands: Vec<CommandInfo>,
}

impl ComponentMetadata {
    pub fn command(&self, name: &str) -> Option<&CommandInfo> {
        self.commands.iter().find(|c| c.name == name)
    }

    pub fn command_names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentState {
    Unspecified,
    Starting,
    Running,
    Stopping,
    Failed,
}

impl fmt::Display for ComponentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComponentState::Unspecified => "unspecified",
            ComponentState::Starting => "starting",
            ComponentState::Running => "running",
            ComponentState::Stopping => "stopping",
            ComponentState::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub state: ComponentState,
    pub message: String,
}

/// Raw outcome of an `ExecuteCommand` call, before JSON decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    pub success: bool,
    pub json_result: String,
    pub error_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShutdownAck {
    pub acknowledged: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_from_json() {
        let config: ComponentConfig =
            serde_json::from_str(r#"{"name": "echo", "cmd": "echo-worker"}"#).unwrap();
        assert_eq!(config.name, "echo");
        assert_eq!(config.cmd, "echo-worker");
        assert!(config.version.is_empty());
        assert!(config.cmd_args.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(ComponentConfig::new("", "bin").validate().is_err());
        assert!(ComponentConfig::new("has space", "bin").validate().is_err());
        assert!(ComponentConfig::new("echo", "").validate().is_err());
        assert!(ComponentConfig::new("echo", "bin").validate().is_ok());
    }

    #[test]
    fn test_metadata_command_lookup() {
        let metadata = ComponentMetadata {
            name: "echo".to_string(),
            version: "1.0.0".to_string(),
            description: String::new(),
            author: String::new(),
            commands: vec![CommandInfo::new("echo.ping", "Reply with pong")],
        };
        assert!(metadata.command("echo.ping").is_some());
        assert!(metadata.command("echo.missing").is_none());
        assert_eq!(metadata.command_names(), vec!["echo.ping"]);
    }
}
