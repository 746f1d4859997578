use serde::Deserialize;

use crate::models::RawRow;

/// Body of a successful `values.get` call. `values` is omitted by the API
/// when the range is empty.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    pub range: Option<String>,
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<RawRow>,
}

/// Error envelope shared by the Sheets and OAuth endpoints.
#[derive(Deserialize, Debug)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Deserialize, Debug)]
pub struct ApiErrorBody {
    pub code: Option<u16>,
    pub message: String,
    pub status: Option<String>,
}

/// Response of the OAuth token endpoint.
#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: Option<u64>,
    pub token_type: Option<String>,
}

/// Extracts a human-readable message from an error body, falling back to
/// the raw text.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|env| env.error.message)
        .unwrap_or_else(|_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "Unknown API error".to_string()
            } else {
                trimmed.to_string()
            }
        })
}
