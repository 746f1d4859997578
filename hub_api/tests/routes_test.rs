use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use campaign_metrics::activity::FixedClock;
use chrono::{TimeZone, Utc};
use hub_api::{config::HubConfig, routes::configure_routes, state::AppState};
use serde_json::Value;
use sheet_ingestor::{
    loader::{DEFAULT_CREATIVES_RANGE, DEFAULT_MASTER_RANGE},
    models::{Cell, RawRow},
    providers::memory::{InMemorySheetSource, SimulatedFailure},
};
use tower::ServiceExt;

fn master_row(date: &str, campaign: &str, country: &str, platform: &str, cost: &str, installs: &str) -> RawRow {
    let mut row: RawRow = vec![Cell::Empty; 21];
    row[0] = Cell::from(date);
    row[3] = Cell::from(format!("id-{campaign}"));
    row[4] = Cell::from(campaign);
    row[8] = Cell::from(country);
    row[9] = Cell::from(cost);
    row[10] = Cell::from("1000");
    row[11] = Cell::from("100");
    row[12] = Cell::from(installs);
    row[18] = Cell::from(platform);
    row
}

fn creative_row(id: &str, campaign: &str, status: &str) -> RawRow {
    let mut row: RawRow = vec![Cell::Empty; 12];
    row[0] = Cell::from(id);
    row[3] = Cell::from(campaign);
    row[9] = Cell::from(status);
    row
}

fn master_rows() -> Vec<RawRow> {
    vec![
        master_row("2025-10-20", "GG_AR_APP_PIX", "AR", "Google", "100", "10"),
        master_row("2025-10-20T23:00", "FB_BR_CONS_USDT", "BR", "Meta", "50", "5"),
        master_row("2025-10-21T00:00", "FB_BR_CONS_USDT", "BR", "Meta", "25", "5"),
        master_row("2025-09-01", "GG_AR_SRC_BRAND", "AR", "Google", "80", "2"),
        master_row("2025-10-25", "TK_MX_APP_TEST", "MX", "", "10", "1"),
    ]
}

fn app_with(source: InMemorySheetSource) -> Router {
    let now = Utc.with_ymd_and_hms(2025, 10, 30, 12, 0, 0).unwrap();
    let state = AppState::new(Arc::new(source), &HubConfig::default()).with_clock(Arc::new(FixedClock(now)));
    configure_routes().with_state(Arc::new(state))
}

fn app() -> Router {
    app_with(
        InMemorySheetSource::new()
            .with_range(DEFAULT_MASTER_RANGE, master_rows())
            .with_range(
                DEFAULT_CREATIVES_RANGE,
                vec![
                    creative_row("c1", "GG_AR_APP_PIX", ""),
                    creative_row("c2", "FB_BR_CONS_USDT", "paused"),
                    creative_row("c3", "GG_AR_APP_PIX", "active"),
                ],
            ),
    )
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn campaign_names(rows: &Value) -> Vec<String> {
    rows.as_array()
        .unwrap()
        .iter()
        .map(|r| r["campaign_name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = get(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn campaigns_skip_the_funnel_gate() {
    let (status, body) = get(app(), "/campaigns").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["rawData"].as_array().unwrap().len(), 5);

    let (_, sheets) = get(app(), "/sheets").await;
    let names = campaign_names(&sheets["rawData"]);
    assert_eq!(names.len(), 4);
    assert!(!names.contains(&"GG_AR_SRC_BRAND".to_string()));
}

#[tokio::test]
async fn date_to_includes_the_whole_day() {
    let (_, body) = get(app(), "/campaigns?periodoDesde=2025-10-20&periodoHasta=2025-10-20").await;
    let dates: Vec<_> = body["rawData"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2025-10-20", "2025-10-20T23:00"]);
}

#[tokio::test]
async fn sheets_metrics_echo_filters() {
    let (status, body) = get(app(), "/sheets?pais=br&productos=PIX,USDT&filtroIn=cons").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metrics"]["totalCost"], 75.0);
    assert_eq!(body["metrics"]["totalInstalls"], 10);
    assert_eq!(body["metrics"]["cpi"], 7.5);
    assert_eq!(body["filters"]["pais"], "br");
    assert_eq!(body["filters"]["plataforma"], "todas");
    assert_eq!(body["filters"]["productos"], serde_json::json!(["PIX", "USDT"]));
}

#[tokio::test]
async fn exclude_terms_win_over_include_terms() {
    let (_, body) = get(app(), "/sheets?filtroIn=app&filtroOut=test").await;
    assert_eq!(campaign_names(&body["rawData"]), vec!["GG_AR_APP_PIX"]);
}

#[tokio::test]
async fn filter_options_are_distinct_and_sorted() {
    let (_, body) = get(app(), "/sheets/filters").await;
    assert_eq!(body["paises"], serde_json::json!(["AR", "BR", "MX"]));
    assert_eq!(body["plataformas"], serde_json::json!(["Google", "Meta"]));
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn analytics_breakdowns() {
    let (status, body) = get(app(), "/sheets/analytics?shareBy=country").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["topPerformers"][0]["campaign_name"], "GG_AR_APP_PIX");
    assert_eq!(body["funnel"][0]["percentage"], 100.0);
    assert_eq!(body["funnel"][1]["percentage"], 10.0);
    assert_eq!(body["spendShare"][0]["label"], "AR");
    assert_eq!(body["byPlatform"][2]["name"], "Other");

    let days: Vec<_> = body["daily"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["date"].as_str().unwrap())
        .collect();
    assert_eq!(days, vec!["2025-10-20", "2025-10-21", "2025-10-25"]);
}

#[tokio::test]
async fn active_campaigns_use_the_injected_clock() {
    let (status, body) = get(app(), "/campaigns/active").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCampaigns"], 4);
    assert_eq!(body["activeCampaigns"], 3);

    let (_, inactive) = get(app(), "/campaigns/active?activity=inactive").await;
    assert_eq!(campaign_names(&inactive["campaigns"]), vec!["GG_AR_SRC_BRAND"]);
    assert_eq!(inactive["hierarchy"][0]["label"], "branding");

    let (_, search) = get(app(), "/campaigns/active?search=tiktok").await;
    assert_eq!(campaign_names(&search["campaigns"]), vec!["TK_MX_APP_TEST"]);
}

#[tokio::test]
async fn creatives_are_grouped_with_metrics() {
    let (status, body) = get(app(), "/creatives").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCreatives"], 3);
    assert_eq!(body["totalCampaigns"], 2);
    assert_eq!(body["creatives"][0]["campaign_name"], "GG_AR_APP_PIX");
    assert_eq!(body["creatives"][0]["creatives"][0]["status"], "active");
    assert_eq!(body["creatives"][0]["metrics"]["cost"], 100.0);
    assert_eq!(body["filters"]["status"], "all");

    let (_, paused) = get(app(), "/creatives?status=PAUSED").await;
    assert_eq!(paused["totalCreatives"], 1);
    assert_eq!(paused["creatives"][0]["platform"], "Meta");
}

#[tokio::test]
async fn missing_creatives_sheet_is_an_empty_list() {
    let app = app_with(InMemorySheetSource::new().with_range(DEFAULT_MASTER_RANGE, master_rows()));
    let (status, body) = get(app, "/creatives").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCreatives"], 0);
    assert_eq!(body["creatives"], serde_json::json!([]));
}

#[tokio::test]
async fn empty_master_sheet_is_not_found() {
    let app = app_with(InMemorySheetSource::new().with_range(DEFAULT_MASTER_RANGE, vec![]));
    let (status, body) = get(app, "/sheets").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No data found in the sheet");
}

#[tokio::test]
async fn missing_credentials_are_a_server_error() {
    let app = app_with(InMemorySheetSource::failing(SimulatedFailure::MissingCredential(
        "GOOGLE_SHEETS_SPREADSHEET_ID".into(),
    )));
    let (status, body) = get(app, "/campaigns").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("GOOGLE_SHEETS_SPREADSHEET_ID"));
}

#[tokio::test]
async fn upstream_failures_are_a_server_error() {
    let app = app_with(InMemorySheetSource::failing(SimulatedFailure::Unavailable {
        status: 503,
        message: "backend unavailable".into(),
    }));
    let (status, body) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let app = app_with(InMemorySheetSource::failing(SimulatedFailure::Unavailable {
        status: 503,
        message: "backend unavailable".into(),
    }));
    let (status, body) = get(app, "/sheets/analytics").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "API error (503): backend unavailable");
}

#[tokio::test]
async fn repeated_query_keys_keep_the_first_value() {
    let (status, body) = get(app(), "/sheets?pais=BR&pais=AR").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["filters"]["pais"], "BR");
    assert_eq!(body["metrics"]["totalCost"], 75.0);

    let (status, body) = get(app(), "/campaigns?periodoDesde=2025-10-21&periodoDesde=2025-01-01").await;
    assert_eq!(status, StatusCode::OK);
    let dates: Vec<_> = body["rawData"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2025-10-21T00:00", "2025-10-25"]);
}

#[tokio::test]
async fn invalid_query_values_are_json_bad_requests() {
    for uri in ["/sheets/analytics?shareBy=bogus", "/campaigns/active?activity=sometimes"] {
        let (status, body) = get(app(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("unknown variant"), "{uri}: {body}");
    }
}
