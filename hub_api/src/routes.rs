use std::sync::Arc;

use axum::{Router, routing::get};

use crate::{
    handlers::{campaigns, creatives, health, sheets},
    state::AppState,
};

/// Every endpoint of the hub. Attach state with `.with_state(..)`.
pub fn configure_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health))
        .route("/campaigns", get(campaigns::list_campaigns))
        .route("/campaigns/active", get(campaigns::active_campaigns))
        .route("/sheets", get(sheets::sheet_metrics))
        .route("/sheets/filters", get(sheets::sheet_filter_options))
        .route("/sheets/analytics", get(sheets::sheet_analytics))
        .route("/creatives", get(creatives::list_creatives))
}
