// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};

use cse_core::domain::SupervisorConfig;
use cse_core::infrastructure::config_loader::load_component_configs;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate the supervisor configuration and every component config
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path
        #[arg(short, long, default_value = "./cse.yaml")]
        output: PathBuf,

        /// Include examples and comments
        #[arg(long)]
        examples: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output, examples } => generate(&output, examples).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = SupervisorConfig::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. CSE_CONFIG_PATH: {}",
            std::env::var("CSE_CONFIG_PATH")
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./cse.yaml");
        println!("  4. ~/.cse/config.yaml");
        println!("  5. /etc/cse/config.yaml");
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();

    println!("{}", "Endpoints:".bold());
    println!("  Discovery: {}", config.discovery_address);
    println!("  HTTP gateway: {}", config.http_address);
    println!();

    println!("{}", "Components:".bold());
    println!("  Config directory: {}", config.components_dir.display());
    println!("  Binary directory: {}", config.resolve_bin_dir().display());
    println!();

    println!("{}", "Timeouts:".bold());
    println!("  Dial: {:?}", config.dial_timeout);
    println!("  Command: {:?}", config.command_timeout);
    println!("  Shutdown: {:?}", config.shutdown_timeout);
    match config.registration_deadline {
        Some(deadline) => println!("  Registration deadline: {:?}", deadline),
        None => println!("  Registration deadline: {}", "(disabled)".dimmed()),
    }
    println!();

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = SupervisorConfig::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    let loaded = load_component_configs(&config.components_dir).with_context(|| {
        format!(
            "Failed to read components directory {}",
            config.components_dir.display()
        )
    })?;

    for component in &loaded.configs {
        println!("  {} {}", "✓".green(), component.name);
    }
    for rejected in &loaded.rejected {
        println!("  {} {}", "✗".red(), rejected);
    }

    if !loaded.rejected.is_empty() {
        anyhow::bail!(
            "{} component config(s) in {} are invalid",
            loaded.rejected.len(),
            config.components_dir.display()
        );
    }

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

async fn generate(output: &Path, with_examples: bool) -> Result<()> {
    let sample = if with_examples {
        include_str!("../../templates/cse-with-examples.yaml")
    } else {
        include_str!("../../templates/cse-minimal.yaml")
    };

    std::fs::write(output, sample)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}
