// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Failed to bind component endpoint: {0}")]
    Bind(#[source] std::io::Error),

    #[error("Failed to reach discovery endpoint at {address}: {source}")]
    Discovery {
        address: String,
        #[source]
        source: tonic::transport::Error,
    },

    #[error("Registration call failed: {0}")]
    Rpc(#[from] tonic::Status),

    #[error("Registration rejected by supervisor: {0}")]
    Rejected(String),

    #[error("Component server failed: {0}")]
    Serve(#[source] tonic::transport::Error),
}
