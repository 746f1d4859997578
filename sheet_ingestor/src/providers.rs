//! Source abstraction for spreadsheet data.
//!
//! This module defines the [`SheetSource`] trait, a unified interface for
//! reading a range of cells from the spreadsheet backing the hub. The Google
//! Sheets v4 client implements it for production; [`memory::InMemorySheetSource`]
//! implements it for tests and local demos.
//!
//! The trait is designed for async usage and supports dynamic dispatch
//! (`Arc<dyn SheetSource>`) so the HTTP layer can be wired with either.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use sheet_ingestor::models::RawRow;
//! use sheet_ingestor::providers::{ProviderError, SheetSource};
//!
//! struct EmptySheet;
//!
//! #[async_trait]
//! impl SheetSource for EmptySheet {
//!     async fn read_range(&self, _range: &str) -> Result<Vec<RawRow>, ProviderError> {
//!         Ok(vec![])
//!     }
//! }
//! ```

pub mod google_sheets;
pub mod memory;

use async_trait::async_trait;
use shared_utils::env::MissingEnvVarError;
use thiserror::Error;

use crate::models::RawRow;

/// Trait for reading cell ranges from a spreadsheet.
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Reads the cells of `range` (A1 notation, e.g. `MASTER!A2:U`).
    ///
    /// # Returns
    ///
    /// * `Ok(rows)` - The rows of the range; empty when the range holds no values.
    /// * `Err(ProviderError::RangeNotFound)` - The range (usually its sheet) does not exist.
    /// * `Err(_)` - Any other configuration, transport or API failure.
    async fn read_range(&self, range: &str) -> Result<Vec<RawRow>, ProviderError>;
}

/// Errors that can occur while preparing a provider for a read
/// (credentials, HTTP client, request signing).
#[derive(Debug, Error)]
pub enum ProviderInitError {
    /// A required credential is not configured.
    #[error(transparent)]
    MissingEnvVar(#[from] MissingEnvVarError),

    /// Failed to init the reqwest client.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),

    /// The service-account key could not be loaded or used for signing.
    #[error("Invalid service account key: {0}")]
    InvalidKey(#[from] jsonwebtoken::errors::Error),
}

/// Errors that can occur within a `SheetSource` implementation.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout, undecodable body).
    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The token endpoint refused the service-account assertion.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The requested range does not exist (e.g., the sheet tab is missing).
    #[error("Range not found: {range}")]
    RangeNotFound { range: String },

    /// The request parameters were invalid for this provider.
    #[error("Invalid parameters for provider: {0}")]
    Validation(String),

    /// An error during provider configuration or initialization.
    #[error("Provider initialization error: {0}")]
    Init(#[from] ProviderInitError),
}

impl ProviderError {
    /// True when the failure comes from missing or unusable configuration
    /// rather than from talking to the data source.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ProviderError::Init(_))
    }
}

impl From<MissingEnvVarError> for ProviderError {
    fn from(err: MissingEnvVarError) -> Self {
        ProviderError::Init(err.into())
    }
}
