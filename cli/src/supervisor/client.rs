// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP client for the supervisor's command gateway

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use cse_core::application::ComponentSummary;

#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentStatusInfo {
    pub name: String,
    pub state: String,
    pub message: String,
}

/// Body of `POST /api/v1/execute` responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = base_url.into();
        let base_url = if base_url.starts_with("http://") || base_url.starts_with("https://") {
            base_url
        } else {
            format!("http://{}", base_url)
        };

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<Value> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .context("Failed to reach supervisor")?;

        if !response.status().is_success() {
            anyhow::bail!("Supervisor unhealthy: HTTP {}", response.status());
        }

        response
            .json()
            .await
            .context("Failed to parse health response")
    }

    pub async fn list_components(&self) -> Result<Vec<ComponentSummary>> {
        let response = self
            .client
            .get(format!("{}/api/v1/components", self.base_url))
            .send()
            .await
            .context("Failed to list components")?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to list components: {}", error_text);
        }

        response
            .json()
            .await
            .context("Failed to parse component list")
    }

    pub async fn component_status(&self, name: &str) -> Result<ComponentStatusInfo> {
        let response = self
            .client
            .get(format!("{}/api/v1/components/{}/status", self.base_url, name))
            .send()
            .await
            .context("Failed to get component status")?;

        if !response.status().is_success() {
            let error = error_message(response).await;
            anyhow::bail!("Failed to get status of '{}': {}", name, error);
        }

        response
            .json()
            .await
            .context("Failed to parse status response")
    }

    /// Execute a command. A command-level failure is returned as
    /// `ExecuteResponse { success: false, .. }`, transport and gateway
    /// failures as errors.
    pub async fn execute(
        &self,
        component: &str,
        command: &str,
        params: Value,
    ) -> Result<ExecuteResponse> {
        #[derive(Serialize)]
        struct ExecuteRequest<'a> {
            component_name: &'a str,
            command_name: &'a str,
            params: Value,
        }

        let response = self
            .client
            .post(format!("{}/api/v1/execute", self.base_url))
            .json(&ExecuteRequest {
                component_name: component,
                command_name: command,
                params,
            })
            .send()
            .await
            .context("Failed to execute command")?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let error = error_message(response).await;
            anyhow::bail!("Execution failed (HTTP {}): {}", status, error);
        }

        response
            .json()
            .await
            .context("Failed to parse execute response")
    }
}

/// Prefer the gateway's JSON `error` field, fall back to the raw body.
async fn error_message(response: reqwest::Response) -> String {
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v["error"].as_str().map(str::to_string))
        .unwrap_or(text)
}
