use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use tracing::{debug, warn};

use crate::{
    models::RawRow,
    providers::{
        ProviderError, ProviderInitError, SheetSource,
        google_sheets::{
            auth::{DEFAULT_TOKEN_URL, ServiceAccountCredentials, build_assertion, fetch_access_token},
            params::{ReadParams, construct_params, values_url},
            response::{ValueRange, error_message},
        },
    },
};

const BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Reads spreadsheet ranges through the Google Sheets v4 REST API.
///
/// Credentials are resolved from the environment on every read, so a
/// misconfigured deployment fails the request that hit it (as a
/// configuration error) instead of refusing to start.
pub struct GoogleSheetsProvider {
    client: Client,
    base_url: String,
    token_url: String,
    params: ReadParams,
}

impl GoogleSheetsProvider {
    /// Creates a provider whose HTTP calls time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ProviderInitError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            params: ReadParams::default(),
        })
    }

    /// Overrides the Sheets and token endpoints (e.g., for a proxy).
    pub fn with_endpoints(mut self, base_url: impl Into<String>, token_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self.token_url = token_url.into();
        self
    }

    /// Overrides how values are rendered and laid out.
    pub fn with_params(mut self, params: ReadParams) -> Self {
        self.params = params;
        self
    }
}

#[async_trait]
impl SheetSource for GoogleSheetsProvider {
    async fn read_range(&self, range: &str) -> Result<Vec<RawRow>, ProviderError> {
        let creds = ServiceAccountCredentials::from_env()?;
        let url = values_url(&self.base_url, &creds.spreadsheet_id, range)?;

        // The token endpoint is the assertion audience.
        let assertion = build_assertion(&creds, &self.token_url, Utc::now())?;
        let token = fetch_access_token(&self.client, &self.token_url, &assertion).await?;

        debug!(%range, "reading spreadsheet range");
        let response = self
            .client
            .get(url)
            .bearer_auth(token.expose_secret())
            .query(&construct_params(&self.params))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            // Sheets answers 400 ("Unable to parse range") when the tab does not exist.
            let body = response.text().await.unwrap_or_default();
            warn!(%range, reason = %error_message(&body), "range rejected by the sheets api");
            return Err(ProviderError::RangeNotFound {
                range: range.to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let value_range = response.json::<ValueRange>().await?;
        debug!(%range, rows = value_range.values.len(), "range read");
        Ok(value_range.values)
    }
}
