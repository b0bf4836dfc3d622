// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command dispatch
//!
//! Each command a component offers is a `Command` trait object stored under
//! its name in a `CommandRegistry`.

use async_trait::async_trait;
use cse_core::domain::{CommandInfo, CommandReply};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid params: {0}")]
    InvalidParams(String),

    #[error("{0}")]
    Failed(String),
}

#[async_trait]
pub trait Command: Send + Sync {
    /// Name the command is dispatched under, e.g. `echo.ping`
    fn name(&self) -> &str;

    fn info(&self) -> CommandInfo;

    async fn execute(&self, params: Value) -> Result<Value, CommandError>;
}

#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. An existing command with the same name is replaced.
    pub fn register(&mut self, command: impl Command + 'static) {
        let name = command.name().to_string();
        if self.commands.contains_key(&name) {
            warn!(command = %name, "Command already registered, overwriting");
        }
        self.commands.insert(name, Arc::new(command));
    }

    pub fn with(mut self, command: impl Command + 'static) -> Self {
        self.register(command);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).cloned()
    }

    /// Descriptors of every command, sorted by name.
    pub fn infos(&self) -> Vec<CommandInfo> {
        let mut infos: Vec<_> = self.commands.values().map(|c| c.info()).collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Decode params, run the command and encode the reply. Failures never
    /// escape as errors; they become a non-success reply.
    pub async fn dispatch(&self, name: &str, json_params: &str) -> CommandReply {
        let Some(command) = self.get(name) else {
            return failure(format!("Command '{}' not found or not supported", name));
        };

        let params = if json_params.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(json_params) {
                Ok(params) => params,
                Err(e) => return failure(CommandError::InvalidParams(e.to_string()).to_string()),
            }
        };

        debug!(command = %name, "Dispatching command");
        match command.execute(params).await {
            Ok(result) => CommandReply {
                success: true,
                json_result: result.to_string(),
                error_message: String::new(),
            },
            Err(e) => {
                warn!(command = %name, "Command failed: {}", e);
                failure(e.to_string())
            }
        }
    }
}

fn failure(message: String) -> CommandReply {
    CommandReply {
        success: false,
        json_result: String::new(),
        error_message: message,
    }
}
