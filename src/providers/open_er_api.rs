use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::currency::{BASE_CURRENCY, CurrencyRateProvider};

pub const DEFAULT_BASE_URL: &str = "https://open.er-api.com";

/// Latest USD-based rates from the open.er-api.com public endpoint.
///
/// Every lookup is a single unauthenticated request for the full rates table;
/// caching is left to the caller.
pub struct OpenErApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl OpenErApiProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("spendlog/0.1")
            .build()?;
        Ok(OpenErApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: HashMap<String, f64>,
}

#[async_trait]
impl CurrencyRateProvider for OpenErApiProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self), fields(currency = %currency))]
    async fn get_rate(&self, currency: &str) -> Result<f64> {
        let url = format!("{}/v6/latest/{}", self.base_url, BASE_CURRENCY);
        debug!("Requesting exchange rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for currency: {}",
                response.status(),
                currency
            ));
        }

        let text = response.text().await?;
        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", currency, e))?;

        data.rates
            .get(currency)
            .copied()
            .ok_or_else(|| anyhow!("No rate data found for currency: {}", currency))
    }
}
