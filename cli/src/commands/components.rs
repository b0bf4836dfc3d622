// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Component inspection commands
//!
//! Commands: list, status, health

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use crate::supervisor::{check_supervisor, GatewayClient, SupervisorStatus};

#[derive(Subcommand)]
pub enum ComponentsCommand {
    /// List live components and their commands
    List {
        /// Print the raw JSON returned by the gateway
        #[arg(long)]
        json: bool,
    },

    /// Show the lifecycle state of one component
    Status {
        /// Component name
        name: String,
    },

    /// Check that the supervisor is reachable
    Health,
}

pub async fn handle_command(command: ComponentsCommand, client: &GatewayClient) -> Result<()> {
    match command {
        ComponentsCommand::List { json } => list(client, json).await,
        ComponentsCommand::Status { name } => status(client, &name).await,
        ComponentsCommand::Health => health(client).await,
    }
}

async fn list(client: &GatewayClient, json: bool) -> Result<()> {
    let components = client.list_components().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&components)?);
        return Ok(());
    }

    if components.is_empty() {
        println!("{}", "No live components".yellow());
        return Ok(());
    }

    for component in components {
        println!(
            "{} {} - {}",
            component.name.bold(),
            component.version.dimmed(),
            component.description
        );
        for command in component.commands {
            println!("  {} {}", command.name.cyan(), command.description);
        }
    }

    Ok(())
}

async fn status(client: &GatewayClient, name: &str) -> Result<()> {
    let status = client.component_status(name).await?;

    let state = match status.state.as_str() {
        "running" => status.state.green(),
        "failed" => status.state.red(),
        _ => status.state.yellow(),
    };
    println!("{}: {}", status.name.bold(), state);
    if !status.message.is_empty() {
        println!("  {}", status.message);
    }

    Ok(())
}

async fn health(client: &GatewayClient) -> Result<()> {
    match check_supervisor(client).await {
        SupervisorStatus::Running {
            uptime,
            components,
            live,
        } => {
            println!("{}", "✓ Supervisor is running".green());
            if let Some(uptime) = uptime {
                println!("  Uptime: {}s", uptime);
            }
            println!("  Components: {} ({} live)", components, live);
            Ok(())
        }
        SupervisorStatus::Unreachable { error } => {
            println!("{}", "✗ Supervisor is not reachable".red());
            anyhow::bail!("{}: {}", client.base_url(), error)
        }
    }
}
