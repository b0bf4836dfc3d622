// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # CSE supervisor
//!
//! The `cse` binary runs the component supervisor and talks to a running one.
//!
//! ## Commands
//!
//! - `cse run` (default) - Launch components and serve discovery and HTTP
//! - `cse components list|status|health` - Inspect a running supervisor
//! - `cse exec <component> <command> --params JSON` - Execute a command
//! - `cse config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

use cse_core::domain::SupervisorConfig;
use cse_supervisor::commands::{self, ComponentsCommand, ConfigCommand, ExecCommand};
use cse_supervisor::supervisor::{self, GatewayClient};

/// CSE supervisor - launch, discover and drive local components
#[derive(Parser)]
#[command(name = "cse")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "CSE_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Base URL of a running supervisor's HTTP gateway
    #[arg(
        long,
        global = true,
        env = "CSE_GATEWAY_URL",
        default_value = "http://127.0.0.1:8080"
    )]
    gateway: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "CSE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the supervisor in the foreground
    #[command(name = "run")]
    Run(RunArgs),

    /// Inspect components of a running supervisor
    #[command(name = "components")]
    Components {
        #[command(subcommand)]
        command: ComponentsCommand,
    },

    /// Execute a component command through the gateway
    #[command(name = "exec")]
    Exec(ExecCommand),

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Overrides applied on top of the loaded configuration
#[derive(Args, Default)]
struct RunArgs {
    /// Discovery endpoint address
    #[arg(long, value_name = "ADDR")]
    discovery_addr: Option<SocketAddr>,

    /// HTTP gateway address
    #[arg(long, value_name = "ADDR")]
    http_addr: Option<SocketAddr>,

    /// Directory of component config files
    #[arg(long, value_name = "DIR")]
    components_dir: Option<PathBuf>,
}

impl RunArgs {
    fn apply(self, config: &mut SupervisorConfig) {
        if let Some(addr) = self.discovery_addr {
            config.discovery_address = addr;
        }
        if let Some(addr) = self.http_addr {
            config.http_address = addr;
        }
        if let Some(dir) = self.components_dir {
            config.components_dir = dir;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    match cli.command.unwrap_or(Commands::Run(RunArgs::default())) {
        Commands::Run(args) => {
            info!("Starting CSE supervisor");
            let mut config = SupervisorConfig::load_or_default(cli.config)
                .context("Failed to load configuration")?;
            args.apply(&mut config);
            supervisor::run_supervisor(config).await
        }
        Commands::Components { command } => {
            let client = GatewayClient::new(cli.gateway)?;
            commands::components::handle_command(command, &client).await
        }
        Commands::Exec(command) => {
            let client = GatewayClient::new(cli.gateway)?;
            commands::exec::execute(command, &client).await
        }
        Commands::Config { command } => {
            commands::config::handle_command(command, cli.config).await
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
