use std::sync::Arc;

use axum::{Json, extract::State};
use campaign_metrics::creatives::{CreativeQuery, CreativesReport, creatives_by_campaign};
use serde::Serialize;
use tracing::debug;

use crate::{error::ApiError, extract::FirstValueQuery, state::AppState};

#[derive(Debug, Serialize)]
pub struct CreativesResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: CreativesReport,
    pub filters: CreativeQuery,
}

/// Creatives grouped by campaign, with campaign metrics attached.
///
/// A missing CREATIVES sheet yields an empty list; an empty MASTER sheet is
/// still "no data".
pub async fn list_creatives(
    State(state): State<Arc<AppState>>,
    FirstValueQuery(query): FirstValueQuery<CreativeQuery>,
) -> Result<Json<CreativesResponse>, ApiError> {
    let creatives = state.creative_records().await?;
    let records = state.performance_records().await?;

    let report = creatives_by_campaign(&creatives, &records, &query);
    debug!(
        creatives = report.total_creatives,
        campaigns = report.total_campaigns,
        "creatives joined"
    );

    Ok(Json(CreativesResponse {
        success: true,
        report,
        filters: query,
    }))
}
