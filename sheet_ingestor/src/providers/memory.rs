//! In-memory [`SheetSource`] for tests and offline demos.

use std::collections::HashMap;

use async_trait::async_trait;
use shared_utils::env::MissingEnvVarError;

use crate::{
    models::RawRow,
    providers::{ProviderError, SheetSource},
};

/// Failure an [`InMemorySheetSource`] reproduces on every read.
#[derive(Debug, Clone)]
pub enum SimulatedFailure {
    /// Behaves like a deployment without the named credential.
    MissingCredential(String),
    /// Behaves like the remote API answering with `status`.
    Unavailable { status: u16, message: String },
}

/// Serves fixed rows per range. Unknown ranges behave like missing sheets.
#[derive(Debug, Clone, Default)]
pub struct InMemorySheetSource {
    ranges: HashMap<String, Vec<RawRow>>,
    failure: Option<SimulatedFailure>,
}

impl InMemorySheetSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the rows returned for `range`.
    pub fn with_range(mut self, range: impl Into<String>, rows: Vec<RawRow>) -> Self {
        self.ranges.insert(range.into(), rows);
        self
    }

    /// Makes every read fail.
    pub fn failing(failure: SimulatedFailure) -> Self {
        Self {
            ranges: HashMap::new(),
            failure: Some(failure),
        }
    }
}

#[async_trait]
impl SheetSource for InMemorySheetSource {
    async fn read_range(&self, range: &str) -> Result<Vec<RawRow>, ProviderError> {
        match &self.failure {
            Some(SimulatedFailure::MissingCredential(name)) => {
                return Err(MissingEnvVarError(name.clone()).into());
            }
            Some(SimulatedFailure::Unavailable { status, message }) => {
                return Err(ProviderError::Api {
                    status: *status,
                    message: message.clone(),
                });
            }
            None => {}
        }

        self.ranges
            .get(range)
            .cloned()
            .ok_or_else(|| ProviderError::RangeNotFound {
                range: range.to_string(),
            })
    }
}
