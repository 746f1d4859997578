use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sheet_ingestor::providers::ProviderError;
use thiserror::Error;
use tracing::error;

/// Failures surfaced to HTTP clients as `{ "success": false, "error": ... }`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The query string could not be read.
    #[error("{0}")]
    BadRequest(String),

    /// The MASTER sheet holds no rows.
    #[error("No data found in the sheet")]
    NoData,

    /// The deployment is missing credentials or has unusable ones.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading the spreadsheet failed.
    #[error(transparent)]
    Source(ProviderError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NoData => StatusCode::NOT_FOUND,
            ApiError::Config(_) | ApiError::Source(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        if err.is_configuration() {
            ApiError::Config(err.to_string())
        } else {
            ApiError::Source(err)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            error!(%status, error = %message, "request failed");
        }
        (status, Json(json!({ "success": false, "error": message }))).into_response()
    }
}
