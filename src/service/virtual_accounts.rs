use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::dto::virtual_accounts::{
    missing_required_fields, CreateVirtualAccountBody, ValidationFailure, VirtualAccountPayload,
};
use crate::utils::flutterwave::{ProviderError, ProviderResponse, VirtualAccountProvider};
use crate::utils::helpers::generate_tx_ref;

#[derive(Error, Debug)]
pub enum VirtualAccountError {
    #[error("Request body is not valid JSON")]
    InvalidBody(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error("Virtual account provider error")]
    Provider(#[from] ProviderError),
}

impl VirtualAccountError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, VirtualAccountError::Provider(ProviderError::Timeout(_)))
    }
}

/// Validates a raw request body and converts it into the provider payload.
pub fn build_payload(raw: &[u8]) -> Result<VirtualAccountPayload, VirtualAccountError> {
    let body: Value = serde_json::from_slice(raw)?;

    // a literal `null` body has no fields to look up
    if body.is_null() {
        return Err(VirtualAccountError::InvalidBody(serde::de::Error::custom(
            "request body is null",
        )));
    }

    let missing = missing_required_fields(&body);
    if !missing.is_empty() {
        return Err(ValidationFailure::MissingFields(missing).into());
    }

    let body: CreateVirtualAccountBody = serde_json::from_value(body)?;
    body.check_format()?;

    Ok(VirtualAccountPayload::new(body, generate_tx_ref()))
}

/// One validated request, one provider call. No retries.
pub async fn create_virtual_account(
    raw: &[u8],
    provider: &dyn VirtualAccountProvider,
) -> Result<ProviderResponse, VirtualAccountError> {
    let payload = build_payload(raw)?;
    info!(tx_ref = %payload.tx_ref, "Creating virtual account");

    Ok(provider.create_virtual_account(&payload).await?)
}
