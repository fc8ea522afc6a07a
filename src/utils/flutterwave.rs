use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use std::{env, time::Duration};
use thiserror::Error;
use tracing::{info, instrument};

use crate::dto::virtual_accounts::VirtualAccountPayload;
use crate::utils::config::EnvConfig;

pub const FLUTTERWAVE_SECRET_KEY: &str = "FLUTTERWAVE_SECRET_KEY";

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider request timed out after {0:?}")]
    Timeout(Duration),

    // Fails before sending instead of forwarding an empty credential and
    // relaying the provider's 401 as if the caller had erred.
    #[error("FLUTTERWAVE_SECRET_KEY is not set")]
    MissingSecret,

    #[error("Failed to make API request")]
    HttpRequestError(#[from] reqwest::Error),
}

/// Status and JSON body exactly as the provider returned them.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub status: StatusCode,
    pub body: Value,
}

#[async_trait]
pub trait VirtualAccountProvider: Send + Sync {
    async fn create_virtual_account(
        &self,
        payload: &VirtualAccountPayload,
    ) -> Result<ProviderResponse, ProviderError>;
}

#[derive(Clone, Debug)]
pub struct FlutterwaveClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl FlutterwaveClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        FlutterwaveClient {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn from_env(env: &EnvConfig) -> Self {
        Self::new(env.flutterwave_base_url.clone(), env.flutterwave_timeout)
    }

    pub fn secret_is_configured() -> bool {
        env::var(FLUTTERWAVE_SECRET_KEY).is_ok()
    }
}

#[async_trait]
impl VirtualAccountProvider for FlutterwaveClient {
    #[instrument(skip(self, payload), fields(tx_ref = %payload.tx_ref))]
    async fn create_virtual_account(
        &self,
        payload: &VirtualAccountPayload,
    ) -> Result<ProviderResponse, ProviderError> {
        let secret = env::var(FLUTTERWAVE_SECRET_KEY).map_err(|_| ProviderError::MissingSecret)?;
        let url = format!("{}/virtual-account-numbers", self.base_url);

        let request = self
            .client
            .post(&url)
            .json(payload)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", secret))
            .send();

        // Only the send is bounded; the body is read once headers have arrived.
        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout))??;

        let status = response.status();
        info!("Flutterwave responded with status {}", status);

        let body = response.json::<Value>().await?;
        Ok(ProviderResponse { status, body })
    }
}
