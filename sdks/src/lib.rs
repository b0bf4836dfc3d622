// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! CSE Component SDK
//!
//! Build components that the CSE supervisor can launch, discover and drive.
//! A component binds its own gRPC endpoint on an ephemeral loopback port,
//! registers with the supervisor's discovery endpoint and then serves
//! commands until it is told to shut down.
//!
//! ```no_run
//! use cse_sdk::{ComponentArgs, ComponentInfo, CommandRegistry};
//! use clap::Parser;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let args = ComponentArgs::parse();
//! let commands = CommandRegistry::new();
//! cse_sdk::run_component(args, ComponentInfo::new("1.0.0", "Does things"), commands).await?;
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod error;
pub mod registration;
pub mod runtime;
pub mod server;

pub use command::{Command, CommandError, CommandRegistry};
pub use cse_core::domain::CommandInfo;
pub use error::SdkError;
pub use registration::register_with_supervisor;
pub use runtime::{init_logging, run_component, ComponentArgs};
pub use server::{ComponentInfo, ComponentServer};
