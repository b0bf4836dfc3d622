// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Build Script for cse-core
//!
//! Compiles the component protocol (`proto/cse_component.proto`) into tonic
//! client and server stubs. Both halves are generated: the supervisor serves
//! `ComponentDiscoveryService` and dials `ComponentService`, while components
//! (through the SDK) do the opposite.
//!
//! Generated code is placed in `OUT_DIR` and included via `tonic::include_proto!`
//! in `src/infrastructure/proto.rs`.
//!
//! # Dependencies
//!
//! - **protoc**: Protocol buffer compiler (vendored via `protoc-bin-vendored`)
//! - **tonic-prost-build**: Code generator for Rust gRPC stubs

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Point prost at the vendored protoc binary
    let protoc = protoc_bin_vendored::protoc_bin_path()?;
    std::env::set_var("PROTOC", protoc);

    tonic_prost_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["../../proto/cse_component.proto"], &["../../proto"])?;

    println!("cargo:rerun-if-changed=../../proto/cse_component.proto");

    Ok(())
}
