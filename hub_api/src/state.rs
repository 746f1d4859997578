use std::sync::Arc;

use campaign_metrics::activity::{Clock, SystemClock};
use sheet_ingestor::{
    loader::{SheetRanges, load_creative_records, load_performance_records},
    models::{CreativeRecord, PerformanceRecord},
    providers::SheetSource,
};

use crate::{config::HubConfig, error::ApiError};

/// Shared, read-only request context.
pub struct AppState {
    pub source: Arc<dyn SheetSource>,
    pub clock: Arc<dyn Clock>,
    pub ranges: SheetRanges,
    pub activity_window_days: u32,
    pub top_performers_limit: usize,
}

impl AppState {
    pub fn new(source: Arc<dyn SheetSource>, config: &HubConfig) -> Self {
        Self {
            source,
            clock: Arc::new(SystemClock),
            ranges: config.ranges(),
            activity_window_days: config.activity_window_days,
            top_performers_limit: config.top_performers_limit,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// MASTER rows; an empty sheet is [`ApiError::NoData`].
    pub async fn performance_records(&self) -> Result<Vec<PerformanceRecord>, ApiError> {
        load_performance_records(self.source.as_ref(), &self.ranges.master)
            .await?
            .ok_or(ApiError::NoData)
    }

    /// CREATIVES rows; a missing sheet is an empty list.
    pub async fn creative_records(&self) -> Result<Vec<CreativeRecord>, ApiError> {
        Ok(load_creative_records(self.source.as_ref(), &self.ranges.creatives).await?)
    }
}
