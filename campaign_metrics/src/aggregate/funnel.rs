use serde::Serialize;
use sheet_ingestor::models::PerformanceRecord;

use super::{MetricTotals, percentage};

/// One stage of the conversion funnel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelStep {
    pub name: &'static str,
    pub value: u64,
    /// Share of the previous step, in percent. The first step is always 100.
    pub percentage: f64,
}

/// Impressions → Clicks → Installs → Accounts → FTT.
pub fn conversion_funnel(records: &[PerformanceRecord]) -> Vec<FunnelStep> {
    let totals = MetricTotals::from_records(records);
    let stages = [
        ("Impressions", totals.impressions),
        ("Clicks", totals.clicks),
        ("Installs", totals.installs),
        ("Accounts", totals.accounts_created),
        ("FTT", totals.ftt),
    ];

    let mut previous = None;
    stages
        .into_iter()
        .map(|(name, value)| {
            let pct = match previous {
                None => 100.0,
                Some(prev) => percentage(value, prev),
            };
            previous = Some(value);
            FunnelStep {
                name,
                value,
                percentage: pct,
            }
        })
        .collect()
}
