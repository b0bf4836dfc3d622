// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Error taxonomy
//!
//! Every error here is local to one component: the supervisor logs it and
//! reports it to whoever started the action, and never retries.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::domain::rpc::RpcError;

/// The component process could not be started.
#[derive(Debug, Error)]
#[error("Failed to launch component '{name}': {source}")]
pub struct LaunchError {
    pub name: String,
    #[source]
    pub source: std::io::Error,
}

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Unknown component '{0}': no placeholder was created for it")]
    UnknownComponent(String),

    #[error("Stale registration for '{name}': expected pid {expected}, got {reported}")]
    StaleRegistration {
        name: String,
        expected: u32,
        reported: u32,
    },

    #[error("Failed to connect back to component '{name}' at {address}: {source}")]
    DialBack {
        name: String,
        address: String,
        #[source]
        source: RpcError,
    },

    #[error("Failed to fetch metadata from component '{name}': {source}")]
    Metadata {
        name: String,
        #[source]
        source: RpcError,
    },

    #[error("Registration handshake with '{name}' timed out after {timeout:?}")]
    Timeout { name: String, timeout: Duration },
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Component '{0}' not found or not ready")]
    NotReady(String),

    #[error("Command '{command}' not found on component '{component}'")]
    CommandNotFound { component: String, command: String },

    #[error("{0}")]
    CommandFailed(String),

    #[error("RPC to component '{component}' failed: {source}")]
    Rpc {
        component: String,
        #[source]
        source: RpcError,
    },

    #[error("Component '{component}' did not answer within {timeout:?}")]
    Timeout { component: String, timeout: Duration },

    #[error("Component '{component}' returned an invalid result: {reason}")]
    InvalidResult { component: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path:?}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Duplicate component name '{name}' in {path:?}")]
    Duplicate { name: String, path: PathBuf },
}
