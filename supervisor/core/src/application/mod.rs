// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Use cases of the supervisor: launching, registration, gateway, shutdown and reaping.

pub mod gateway;
pub mod launcher;
pub mod registration;
pub mod shutdown;
pub mod watchdog;

pub use gateway::{CommandGateway, ComponentSummary};
pub use launcher::{LaunchReport, Launcher};
pub use registration::{RegistrationRequest, RegistrationService};
pub use shutdown::{ShutdownCoordinator, ShutdownOutcome, ShutdownReport};
pub use watchdog::RegistrationWatchdog;
