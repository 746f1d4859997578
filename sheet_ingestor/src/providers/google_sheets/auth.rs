//! Service-account authentication (OAuth 2.0 JWT bearer flow).
//!
//! A signed RS256 assertion is exchanged for a short-lived access token on
//! every read. Nothing is cached between reads.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use shared_utils::env::{get_env_var, get_multiline_env_var};
use tracing::debug;

use crate::providers::{
    ProviderError, ProviderInitError,
    google_sheets::response::{TokenResponse, error_message},
};

/// Read-only spreadsheet scope.
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";
/// Default OAuth token endpoint (also the assertion audience).
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_TTL_SECS: i64 = 3600;

/// Spreadsheet identifier plus the service account allowed to read it.
pub struct ServiceAccountCredentials {
    pub spreadsheet_id: String,
    pub client_email: String,
    private_key: SecretString,
}

impl ServiceAccountCredentials {
    pub fn new(spreadsheet_id: String, client_email: String, private_key: SecretString) -> Self {
        Self {
            spreadsheet_id,
            client_email,
            private_key,
        }
    }

    /// Reads credentials from the environment.
    ///
    /// Uses `GOOGLE_SHEETS_SPREADSHEET_ID`, `GOOGLE_SERVICE_ACCOUNT_EMAIL` and
    /// `GOOGLE_PRIVATE_KEY` (literal `\n` sequences are unescaped).
    pub fn from_env() -> Result<Self, ProviderInitError> {
        let spreadsheet_id = get_env_var("GOOGLE_SHEETS_SPREADSHEET_ID")?;
        let client_email = get_env_var("GOOGLE_SERVICE_ACCOUNT_EMAIL")?;
        let private_key = SecretString::new(get_multiline_env_var("GOOGLE_PRIVATE_KEY")?.into());
        Ok(Self::new(spreadsheet_id, client_email, private_key))
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Signs the JWT assertion for `creds`, valid for one hour from `now`.
pub fn build_assertion(
    creds: &ServiceAccountCredentials,
    audience: &str,
    now: DateTime<Utc>,
) -> Result<String, ProviderInitError> {
    let key = EncodingKey::from_rsa_pem(creds.private_key.expose_secret().as_bytes())?;
    let claims = Claims {
        iss: &creds.client_email,
        scope: SHEETS_READONLY_SCOPE,
        aud: audience,
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ASSERTION_TTL_SECS)).timestamp(),
    };
    Ok(encode(&Header::new(Algorithm::RS256), &claims, &key)?)
}

/// Exchanges a signed assertion for an access token.
pub async fn fetch_access_token(
    client: &Client,
    token_url: &str,
    assertion: &str,
) -> Result<SecretString, ProviderError> {
    let response = client
        .post(token_url)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion)])
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Auth(format!(
            "token endpoint returned {status}: {}",
            error_message(&body)
        )));
    }

    let token = response.json::<TokenResponse>().await?;
    debug!(expires_in = ?token.expires_in, "obtained sheets access token");
    Ok(SecretString::new(token.access_token.into()))
}
