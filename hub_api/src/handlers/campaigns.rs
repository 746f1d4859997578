use std::sync::Arc;

use axum::{Json, extract::State};
use campaign_metrics::{
    activity::{ActivityQuery, CampaignActivity, HierarchyNode, activity_hierarchy, campaign_activity},
    filters::{FilterParams, apply_basic_filters},
};
use serde::Serialize;
use sheet_ingestor::models::PerformanceRecord;
use tracing::debug;

use crate::{error::ApiError, extract::FirstValueQuery, state::AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignsResponse {
    pub raw_data: Vec<PerformanceRecord>,
    pub success: bool,
}

/// Raw rows under the country, platform and date filters. No campaign gate.
pub async fn list_campaigns(
    State(state): State<Arc<AppState>>,
    FirstValueQuery(params): FirstValueQuery<FilterParams>,
) -> Result<Json<CampaignsResponse>, ApiError> {
    let params = params.with_defaults();
    let records = state.performance_records().await?;
    let raw_data = apply_basic_filters(records, &params);
    debug!(rows = raw_data.len(), "campaign rows served");

    Ok(Json(CampaignsResponse {
        raw_data,
        success: true,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveCampaignsResponse {
    pub campaigns: Vec<CampaignActivity>,
    pub hierarchy: Vec<HierarchyNode>,
    pub total_campaigns: usize,
    pub active_campaigns: usize,
    pub success: bool,
}

/// Campaigns with spend, their activity flag, and the stage tree.
pub async fn active_campaigns(
    State(state): State<Arc<AppState>>,
    FirstValueQuery(query): FirstValueQuery<ActivityQuery>,
) -> Result<Json<ActiveCampaignsResponse>, ApiError> {
    let records = state.performance_records().await?;
    let now = state.clock.now();

    let campaigns = query.apply(campaign_activity(&records, now, state.activity_window_days));
    let hierarchy = activity_hierarchy(&campaigns);
    let active = campaigns.iter().filter(|c| c.is_active).count();
    debug!(%now, campaigns = campaigns.len(), active, "campaign activity computed");

    Ok(Json(ActiveCampaignsResponse {
        total_campaigns: campaigns.len(),
        active_campaigns: active,
        campaigns,
        hierarchy,
        success: true,
    }))
}
