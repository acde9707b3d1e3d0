//! reqwest implementation of [`PosBackend`].

use std::time::Duration;

use async_trait::async_trait;
use botika_core::{CatalogItem, CheckoutSettings, Discount, TransactionReceipt};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::backend::PosBackend;
use crate::config::ApiConfig;
use crate::dto::{
    convert_all, CatalogItemDto, DiscountDto, Envelope, SettingsDto, TransactionRequest,
    TransactionResultDto,
};
use crate::error::{ClientError, ClientResult};

/// HTTP client for the catalog/transaction API.
#[derive(Debug, Clone)]
pub struct HttpPosBackend {
    client: Client,
    config: ApiConfig,
}

impl HttpPosBackend {
    /// Creates a client from validated configuration.
    pub fn new(config: ApiConfig) -> ClientResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn auth_header(&self) -> Option<String> {
        self.config.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    /// Make a GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.config.endpoint(path);
        debug!(%url, "GET");

        let mut request = self.client.get(&url);
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        let url = self.config.endpoint(path);
        debug!(%url, "POST");

        let mut request = self.client.post(&url).json(body);
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "API request failed");
            return Err(ClientError::from_response(status, &text));
        }

        let envelope: Envelope<T> = serde_json::from_str(&text)?;
        Ok(envelope.into_inner())
    }
}

#[async_trait]
impl PosBackend for HttpPosBackend {
    async fn fetch_catalog(&self) -> ClientResult<Vec<CatalogItem>> {
        let dtos: Vec<CatalogItemDto> = self.get("items").await?;
        let items: Vec<CatalogItem> = convert_all(dtos)?;
        debug!(count = items.len(), "Catalog fetched");
        Ok(items)
    }

    async fn fetch_discounts(&self) -> ClientResult<Vec<Discount>> {
        let dtos: Vec<DiscountDto> = self.get("discounts").await?;
        convert_all(dtos)
    }

    async fn fetch_settings(&self) -> ClientResult<CheckoutSettings> {
        let dto: SettingsDto = self.get("settings").await?;
        CheckoutSettings::try_from(dto)
    }

    async fn submit_transaction(&self, request: &TransactionRequest) -> ClientResult<TransactionReceipt> {
        debug!(
            client_transaction_id = %request.client_transaction_id,
            total = %request.total_amount,
            method = %request.payment_method,
            "Submitting transaction"
        );
        let dto: TransactionResultDto = self.post("transactions", request).await?;
        TransactionReceipt::try_from(dto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_config() {
        let config = ApiConfig {
            base_url: "ftp://nope".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(HttpPosBackend::new(config), Err(ClientError::Config(_))));
    }

    #[test]
    fn test_auth_header() {
        let backend = HttpPosBackend::new(ApiConfig::default()).unwrap();
        assert!(backend.auth_header().is_none());

        let backend = HttpPosBackend::new(ApiConfig {
            token: Some("abc".to_string()),
            ..ApiConfig::default()
        })
        .unwrap();
        assert_eq!(backend.auth_header().as_deref(), Some("Bearer abc"));
    }
}
