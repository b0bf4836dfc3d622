// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP command gateway
//!
//! | Route | Method |
//! |---|---|
//! | `/health` | GET |
//! | `/api/v1/components` | GET |
//! | `/api/v1/components/{name}/status` | GET |
//! | `/api/v1/execute` | POST |

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::application::gateway::{CommandGateway, ComponentSummary};
use crate::domain::errors::GatewayError;
use crate::infrastructure::registry::ComponentRegistry;

pub struct AppState {
    pub gateway: CommandGateway,
    pub registry: ComponentRegistry,
    pub start_time: Instant,
}

pub fn app(gateway: CommandGateway, registry: ComponentRegistry) -> Router {
    let state = Arc::new(AppState {
        gateway,
        registry,
        start_time: Instant::now(),
    });

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/components", get(list_components_handler))
        .route("/api/v1/components/{name}/status", get(component_status_handler))
        .route("/api/v1/execute", post(execute_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    pub component_name: String,
    pub command_name: String,
    #[serde(default)]
    pub params: Value,
}

/// HTTP status for a gateway failure.
pub fn error_status(error: &GatewayError) -> StatusCode {
    match error {
        GatewayError::NotReady(_) => StatusCode::NOT_FOUND,
        GatewayError::CommandNotFound { .. } | GatewayError::CommandFailed(_) => StatusCode::OK,
        GatewayError::Rpc { .. } | GatewayError::InvalidResult { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        GatewayError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
    }
}

fn failure(status: StatusCode, error: impl ToString) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "error": error.to_string(),
        })),
    )
        .into_response()
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "uptime_seconds": state.start_time.elapsed().as_secs(),
        "components": state.registry.len(),
        "live": state.registry.live().len(),
    }))
}

async fn list_components_handler(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<ComponentSummary>> {
    Json(state.gateway.list_components())
}

async fn component_status_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    match state.gateway.status(&name).await {
        Ok(status) => Json(json!({
            "name": name,
            "state": status.state,
            "message": status.message,
        }))
        .into_response(),
        Err(e) => {
            warn!(component = %name, "Status request failed: {}", e);
            failure(error_status(&e), e)
        }
    }
}

async fn execute_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExecuteRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return failure(
                StatusCode::BAD_REQUEST,
                format!("Invalid request body: {}", rejection.body_text()),
            )
        }
    };

    match state
        .gateway
        .execute(&request.component_name, &request.command_name, request.params)
        .await
    {
        Ok(data) => Json(json!({
            "success": true,
            "data": data,
        }))
        .into_response(),
        Err(e) => failure(error_status(&e), e),
    }
}
