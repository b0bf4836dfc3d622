// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `cse exec <component> <command>` through the HTTP gateway

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde_json::Value;

use crate::supervisor::GatewayClient;

#[derive(Args)]
pub struct ExecCommand {
    /// Component name
    pub component: String,

    /// Fully qualified command name, e.g. echo.ping
    pub command: String,

    /// JSON parameters
    #[arg(short, long, value_name = "JSON")]
    pub params: Option<String>,
}

pub fn parse_params(raw: Option<&str>) -> Result<Value> {
    match raw {
        None => Ok(Value::Object(Default::default())),
        Some(raw) => serde_json::from_str(raw).context("--params is not valid JSON"),
    }
}

pub async fn execute(command: ExecCommand, client: &GatewayClient) -> Result<()> {
    let params = parse_params(command.params.as_deref())?;
    let response = client
        .execute(&command.component, &command.command, params)
        .await?;

    if !response.success {
        let error = response.error.unwrap_or_default();
        eprintln!("{} {}", "✗".red(), error);
        anyhow::bail!("Command '{}' failed", command.command);
    }

    let data = response.data.unwrap_or(Value::Null);
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}
