//! Per-platform, per-day and spend-share breakdowns.

use serde::{Deserialize, Serialize};
use sheet_ingestor::models::PerformanceRecord;

use super::{GroupKey, MetricTotals, group_by};
use crate::taxonomy::{detect_platform, detect_product, detect_stage, explicit_or};

/// Label used when a row has no value for the share dimension.
const UNKNOWN_LABEL: &str = "Unknown";

/// Totals and headline ratios for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMetrics {
    pub name: String,
    #[serde(flatten)]
    pub totals: MetricTotals,
    pub cpi: f64,
    pub cac: f64,
    pub ctr: f64,
    pub conversion: f64,
}

impl GroupMetrics {
    fn new(name: String, totals: MetricTotals) -> Self {
        Self {
            name,
            cpi: totals.cpi(),
            cac: totals.cac(),
            ctr: totals.ctr(),
            conversion: totals.conversion(),
            totals,
        }
    }
}

/// One day of the time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub date: String,
    #[serde(flatten)]
    pub totals: MetricTotals,
    pub cpi: f64,
}

/// Dimension a spend share is computed over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareDimension {
    #[default]
    Platform,
    Country,
    Product,
    Stage,
}

impl ShareDimension {
    fn label_of(self, record: &PerformanceRecord) -> String {
        let name = record.campaign_name.as_str();
        let label = match self {
            ShareDimension::Platform => explicit_or(&record.platform, || detect_platform(name)),
            ShareDimension::Country => record.country.trim().to_string(),
            ShareDimension::Product => detect_product(name).to_string(),
            ShareDimension::Stage => detect_stage(name).to_string(),
        };
        if label.is_empty() {
            UNKNOWN_LABEL.to_string()
        } else {
            label
        }
    }
}

/// Cost of one group and its share of total spend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareSlice {
    pub label: String,
    pub cost: f64,
    /// Percent of total cost; 0 when nothing was spent.
    pub percentage: f64,
}

/// Totals per platform column value, in first-seen order.
pub fn by_platform(records: &[PerformanceRecord]) -> Vec<GroupMetrics> {
    group_by(records, |r| GroupKey::Platform.key_of(r))
        .into_iter()
        .map(|(name, totals)| GroupMetrics::new(name, totals))
        .collect()
}

/// Totals per calendar day, oldest first.
pub fn daily_series(records: &[PerformanceRecord]) -> Vec<DailyPoint> {
    let mut groups = group_by(records, |r| GroupKey::Day.key_of(r));
    groups.sort_keys();
    groups
        .into_iter()
        .map(|(date, totals)| DailyPoint {
            date,
            cpi: totals.cpi(),
            totals,
        })
        .collect()
}

/// Spend per `dimension` value, most expensive first.
pub fn spend_share(records: &[PerformanceRecord], dimension: ShareDimension) -> Vec<ShareSlice> {
    let groups = group_by(records, |r| dimension.label_of(r));
    let total = MetricTotals::from_records(records).cost();

    let mut slices: Vec<ShareSlice> = groups
        .into_iter()
        .map(|(label, totals)| {
            let cost = totals.cost();
            ShareSlice {
                label,
                cost,
                percentage: if total > 0.0 { cost * 100.0 / total } else { 0.0 },
            }
        })
        .collect();
    slices.sort_by(|a, b| b.cost.total_cmp(&a.cost));
    slices
}
