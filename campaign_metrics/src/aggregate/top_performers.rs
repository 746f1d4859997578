use indexmap::IndexMap;
use serde::Serialize;
use sheet_ingestor::models::PerformanceRecord;

use super::MetricTotals;

/// Default number of campaigns returned by [`top_performers`].
pub const DEFAULT_TOP_PERFORMERS: usize = 10;

/// A campaign ranked by installs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPerformer {
    #[serde(rename = "campaign_name")]
    pub campaign_name: String,
    #[serde(rename = "campaign_id")]
    pub campaign_id: String,
    /// Country of the first row seen for the campaign.
    pub country: String,
    /// Platform of the first row seen for the campaign.
    pub platform: String,
    #[serde(flatten)]
    pub totals: MetricTotals,
    pub cpi: f64,
    pub cac: f64,
    pub ftt_rate: f64,
    pub conv_rate: f64,
}

/// Groups rows by campaign name and id, then keeps the `limit` campaigns
/// with the most installs. Ties keep first-seen order.
pub fn top_performers(records: &[PerformanceRecord], limit: usize) -> Vec<TopPerformer> {
    let mut groups: IndexMap<(&str, &str), (&PerformanceRecord, MetricTotals)> = IndexMap::new();
    for record in records {
        let key = (record.campaign_name.as_str(), record.campaign_id.as_str());
        groups
            .entry(key)
            .or_insert_with(|| (record, MetricTotals::default()))
            .1
            .add(record);
    }

    let mut ranked: Vec<TopPerformer> = groups
        .into_values()
        .map(|(first, totals)| TopPerformer {
            campaign_name: first.campaign_name.clone(),
            campaign_id: first.campaign_id.clone(),
            country: first.country.clone(),
            platform: first.platform.clone(),
            cpi: totals.cpi(),
            cac: totals.cac(),
            ftt_rate: totals.ftt_rate(),
            conv_rate: totals.conversion(),
            totals,
        })
        .collect();
    ranked.sort_by(|a, b| b.totals.installs.cmp(&a.totals.installs));
    ranked.truncate(limit);
    ranked
}
