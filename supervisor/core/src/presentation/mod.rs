// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Inbound surfaces: the discovery gRPC endpoint and the HTTP command gateway.

pub mod api;
pub mod grpc;
