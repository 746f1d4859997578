//! Fetch-and-normalize entrypoints for the two sheets the hub reads.
//!
//! - MASTER is required: an empty range is reported as `Ok(None)` so callers
//!   can answer "no data" distinctly from a failed fetch.
//! - CREATIVES is optional: a missing tab or an empty range both yield an
//!   empty list.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    models::{CreativeRecord, PerformanceRecord},
    normalize::{normalize_creative_rows, normalize_performance_rows},
    providers::{ProviderError, SheetSource},
};

/// Default MASTER range: every column from row 2, skipping the header row.
pub const DEFAULT_MASTER_RANGE: &str = "MASTER!A2:U";
/// Default CREATIVES range.
pub const DEFAULT_CREATIVES_RANGE: &str = "CREATIVES!A2:M";

/// A1 ranges of the MASTER and CREATIVES sheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRanges {
    pub master: String,
    pub creatives: String,
}

impl Default for SheetRanges {
    fn default() -> Self {
        Self {
            master: DEFAULT_MASTER_RANGE.to_string(),
            creatives: DEFAULT_CREATIVES_RANGE.to_string(),
        }
    }
}

/// Reads and normalizes the MASTER sheet.
///
/// Returns `Ok(None)` when the sheet holds no rows.
pub async fn load_performance_records(
    source: &dyn SheetSource,
    range: &str,
) -> Result<Option<Vec<PerformanceRecord>>, ProviderError> {
    let rows = source.read_range(range).await?;
    let records = normalize_performance_rows(Some(rows));
    debug!(
        %range,
        records = records.as_ref().map_or(0, Vec::len),
        "performance rows normalized"
    );
    Ok(records)
}

/// Reads and normalizes the CREATIVES sheet; a missing tab degrades to an
/// empty list. Other failures still propagate.
pub async fn load_creative_records(
    source: &dyn SheetSource,
    range: &str,
) -> Result<Vec<CreativeRecord>, ProviderError> {
    let rows = match source.read_range(range).await {
        Ok(rows) => Some(rows),
        Err(ProviderError::RangeNotFound { .. }) => {
            info!(%range, "creatives sheet not found, continuing without creatives");
            None
        }
        Err(e) => return Err(e),
    };
    Ok(normalize_creative_rows(rows))
}
