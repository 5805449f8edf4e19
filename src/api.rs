//! API client for the PlanLine REST API.
//!
//! This module provides an async HTTP client for the backend's timeline
//! read endpoint. It is owned by a dedicated worker task; the UI thread
//! talks to it through the ApiCommand / ApiMessage channel protocol.

use anyhow::{Context, Result};
use reqwest::Client;

use crate::models::{Granularity, TimelineData};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// API client for the PlanLine backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client with the specified base URL and optional
    /// bearer token.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token,
        })
    }

    /// Fetch the timeline payload for one project and view.
    pub async fn fetch_timeline(
        &self,
        project_id: i64,
        view: Granularity,
    ) -> Result<TimelineData> {
        let url = format!(
            "{}/api/projects/{}/timeline?view={}",
            self.base_url,
            project_id,
            view.as_query()
        );

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .context("Failed to send request to timeline endpoint")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "API error: {} - {}",
                response.status(),
                response.text().await.unwrap_or_default()
            );
        }

        response
            .json()
            .await
            .context("Failed to parse timeline response")
    }
}

/// Messages sent from the API worker to the main TUI thread
#[derive(Debug, Clone)]
pub enum ApiMessage {
    /// Timeline payload has been loaded
    TimelineLoaded(TimelineData),
    /// An error occurred during API communication
    Error(String),
}

/// Commands sent from the TUI to the API worker
#[derive(Debug, Clone)]
pub enum ApiCommand {
    /// Fetch the timeline for a project at the given granularity
    LoadTimeline {
        project_id: i64,
        view: Granularity,
    },
    /// Shutdown the API worker
    Shutdown,
}
