// src/core/service_client.rs
//! HTTP client for the job board backend

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::cookie::Jar;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace};

use crate::core::config_manager::AppConfig;
use crate::types::{AccountDetails, HttpReply, JobListing};

/// Backend calls made by the flows. Every call returns the raw reply; the
/// flows decide what counts as success.
#[async_trait]
pub trait JobBoardApi: Send + Sync {
    async fn post_job(&self, listing: &JobListing) -> Result<HttpReply>;

    async fn create_business_account(&self, details: &AccountDetails) -> Result<HttpReply>;

    async fn update_business_account(&self, details: &AccountDetails) -> Result<HttpReply>;

    /// Exchange an identity-provider token for a server session cookie.
    async fn session_login(&self, id_token: &str, csrf_token: &str) -> Result<HttpReply>;
}

pub struct ServiceClient {
    client: reqwest::Client,
    config: AppConfig,
}

impl ServiceClient {
    /// Create a client that sends (and stores) cookies through `jar`.
    pub fn new(config: AppConfig, jar: Arc<Jar>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_seconds))
            .cookie_provider(jar)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    async fn post_json<T>(&self, endpoint: &str, payload: &T) -> Result<HttpReply>
    where
        T: serde::Serialize + Sync,
    {
        let url = self.config.endpoint_url(endpoint);
        trace!("POST {} (json)", url);

        // `.json()` sets `Content-Type: application/json`
        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("Failed to POST to {}", url))?;

        Self::into_reply(response, &url).await
    }

    async fn into_reply(response: reqwest::Response, url: &str) -> Result<HttpReply> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;

        debug!("{} answered {} ({} bytes)", url, status, body.len());
        Ok(HttpReply { status, body })
    }
}

#[async_trait]
impl JobBoardApi for ServiceClient {
    async fn post_job(&self, listing: &JobListing) -> Result<HttpReply> {
        info!("Posting job '{}'", listing.job_name);
        self.post_json(&self.config.api.jobs_endpoint, listing).await
    }

    async fn create_business_account(&self, details: &AccountDetails) -> Result<HttpReply> {
        info!("Creating {} account", details.user_type);
        self.post_json(&self.config.api.create_business_account_endpoint, details)
            .await
    }

    async fn update_business_account(&self, details: &AccountDetails) -> Result<HttpReply> {
        info!("Updating {} account details", details.user_type);
        self.post_json(&self.config.api.update_business_account_endpoint, details)
            .await
    }

    async fn session_login(&self, id_token: &str, csrf_token: &str) -> Result<HttpReply> {
        let url = self
            .config
            .endpoint_url(&self.config.api.business_log_in_endpoint);
        trace!("POST {} (form)", url);

        let response = self
            .client
            .post(&url)
            .form(&[("idToken", id_token), ("csrfToken", csrf_token)])
            .send()
            .await
            .with_context(|| format!("Failed to POST session login to {}", url))?;

        Self::into_reply(response, &url).await
    }
}
