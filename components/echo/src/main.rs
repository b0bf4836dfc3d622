// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # echo-worker
//!
//! Reference component. Launched by the supervisor with
//! `--discovery-addr=<addr> --component-name=<name>`.
//!
//! - `echo.ping` replies `{"reply": "pong", "params": <params>}`
//! - `echo.reverse` replies `{"text": <reversed text>}`

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use cse_sdk::{Command, CommandError, CommandInfo, CommandRegistry, ComponentArgs, ComponentInfo};
use serde_json::{json, Value};
use tracing::info;

struct Ping;

#[async_trait]
impl Command for Ping {
    fn name(&self) -> &str {
        "echo.ping"
    }

    fn info(&self) -> CommandInfo {
        CommandInfo::new("echo.ping", "Reply with pong and the received params").with_schemas(
            r#"{"type": "object"}"#,
            r#"{"type": "object", "properties": {"reply": {"type": "string"}, "params": {}}}"#,
        )
    }

    async fn execute(&self, params: Value) -> Result<Value, CommandError> {
        Ok(json!({ "reply": "pong", "params": params }))
    }
}

struct Reverse;

#[async_trait]
impl Command for Reverse {
    fn name(&self) -> &str {
        "echo.reverse"
    }

    fn info(&self) -> CommandInfo {
        CommandInfo::new("echo.reverse", "Reverse the characters of a string").with_schemas(
            r#"{"type": "object", "required": ["text"], "properties": {"text": {"type": "string"}}}"#,
            r#"{"type": "object", "properties": {"text": {"type": "string"}}}"#,
        )
    }

    async fn execute(&self, params: Value) -> Result<Value, CommandError> {
        let text = params
            .get("text")
            .and_then(Value::as_str)
            .ok_or_else(|| CommandError::InvalidParams("'text' must be a string".to_string()))?;
        Ok(json!({ "text": text.chars().rev().collect::<String>() }))
    }
}

fn commands() -> CommandRegistry {
    CommandRegistry::new().with(Ping).with(Reverse)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ComponentArgs::parse();
    cse_sdk::init_logging(&args.log_level)?;

    info!(component = %args.component_name, "Starting echo worker");
    let info = ComponentInfo::new(env!("CARGO_PKG_VERSION"), "Echoes and reverses its input")
        .with_author("CSE Team");

    cse_sdk::run_component(args, info, commands())
        .await
        .context("Echo worker failed")
}
