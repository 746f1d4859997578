use std::sync::Arc;

use axum::{Json, extract::State};
use campaign_metrics::{
    aggregate::{
        DailyPoint, FunnelStep, GroupMetrics, MetricsSummary, ShareDimension, ShareSlice, TopPerformer,
        by_platform, conversion_funnel, daily_series, spend_share, summarize, top_performers,
    },
    filters::{FilterParams, apply_metrics_filters},
    options::{FilterOptions, filter_options},
};
use serde::{Deserialize, Serialize};
use sheet_ingestor::models::PerformanceRecord;
use tracing::debug;

use crate::{error::ApiError, extract::FirstValueQuery, state::AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetsResponse {
    pub metrics: MetricsSummary,
    pub raw_data: Vec<PerformanceRecord>,
    pub filters: FilterParams,
    pub success: bool,
}

/// Headline metrics and rows under the full metrics pipeline.
pub async fn sheet_metrics(
    State(state): State<Arc<AppState>>,
    FirstValueQuery(params): FirstValueQuery<FilterParams>,
) -> Result<Json<SheetsResponse>, ApiError> {
    let params = params.with_defaults();
    let records = apply_metrics_filters(state.performance_records().await?, &params);
    let metrics = summarize(&records);
    debug!(rows = records.len(), total_cost = metrics.total_cost, "sheet metrics computed");

    Ok(Json(SheetsResponse {
        metrics,
        raw_data: records,
        filters: params,
        success: true,
    }))
}

#[derive(Debug, Serialize)]
pub struct FilterOptionsResponse {
    #[serde(flatten)]
    pub options: FilterOptions,
    pub success: bool,
}

/// Distinct countries and platforms across every row.
pub async fn sheet_filter_options(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FilterOptionsResponse>, ApiError> {
    let records = state.performance_records().await?;
    Ok(Json(FilterOptionsResponse {
        options: filter_options(&records),
        success: true,
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShareQuery {
    pub share_by: ShareDimension,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub by_platform: Vec<GroupMetrics>,
    pub daily: Vec<DailyPoint>,
    pub top_performers: Vec<TopPerformer>,
    pub funnel: Vec<FunnelStep>,
    pub spend_share: Vec<ShareSlice>,
    pub success: bool,
}

/// Breakdowns behind the dashboard charts, over the metrics pipeline.
pub async fn sheet_analytics(
    State(state): State<Arc<AppState>>,
    FirstValueQuery(params): FirstValueQuery<FilterParams>,
    FirstValueQuery(share): FirstValueQuery<ShareQuery>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let params = params.with_defaults();
    let records = apply_metrics_filters(state.performance_records().await?, &params);
    debug!(rows = records.len(), share_by = ?share.share_by, "building analytics");

    Ok(Json(AnalyticsResponse {
        by_platform: by_platform(&records),
        daily: daily_series(&records),
        top_performers: top_performers(&records, state.top_performers_limit),
        funnel: conversion_funnel(&records),
        spend_share: spend_share(&records, share.share_by),
        success: true,
    }))
}
