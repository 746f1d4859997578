//! Joins creative assets to the performance of their campaign.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sheet_ingestor::models::{CreativeRecord, PerformanceRecord};

use crate::{
    aggregate::MetricTotals,
    taxonomy::{detect_platform, detect_product, detect_stage, explicit_or},
};

/// Status value that disables the status filter.
pub const ANY_STATUS: &str = "all";

/// Creative filters. Every comparison ignores case; blank fields match all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreativeQuery {
    /// Substring of the campaign name.
    pub campaign_name: String,
    pub platform: String,
    /// Substring of the product label.
    pub product: String,
    pub country: String,
    pub stage: String,
    /// Exact status, or `all`.
    pub status: String,
}

impl Default for CreativeQuery {
    fn default() -> Self {
        Self {
            campaign_name: String::new(),
            platform: String::new(),
            product: String::new(),
            country: String::new(),
            stage: String::new(),
            status: ANY_STATUS.to_string(),
        }
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn equals_ci(value: &str, wanted: &str) -> bool {
    wanted.is_empty() || value.to_lowercase() == wanted.to_lowercase()
}

impl CreativeQuery {
    pub fn matches(&self, creative: &CreativeRecord) -> bool {
        let status_ok = self.status.is_empty()
            || self.status == ANY_STATUS
            || equals_ci(&creative.status, &self.status);
        contains_ci(&creative.campaign_name, &self.campaign_name)
            && equals_ci(&creative.platform, &self.platform)
            && contains_ci(&creative.product, &self.product)
            && equals_ci(&creative.country, &self.country)
            && equals_ci(&creative.stage, &self.stage)
            && status_ok
    }
}

/// Campaign-level performance attached to each creative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeMetrics {
    pub cost: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub installs: u64,
    pub accounts_created: u64,
    pub ftt: u64,
    pub cpi: f64,
    pub cac: f64,
    pub ctr: f64,
    pub conversion: f64,
}

impl From<&MetricTotals> for CreativeMetrics {
    fn from(totals: &MetricTotals) -> Self {
        Self {
            cost: totals.cost(),
            impressions: totals.impressions,
            clicks: totals.clicks,
            installs: totals.installs,
            accounts_created: totals.accounts_created,
            ftt: totals.ftt,
            cpi: totals.cpi(),
            cac: totals.cac(),
            ctr: totals.ctr(),
            conversion: totals.conversion(),
        }
    }
}

/// A creative with resolved taxonomy and its campaign's metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedCreative {
    #[serde(flatten)]
    pub creative: CreativeRecord,
    pub metrics: CreativeMetrics,
}

/// Creatives of one campaign.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignCreatives {
    pub campaign_name: String,
    pub campaign_id: String,
    pub platform: String,
    pub product: String,
    pub stage: String,
    pub country: String,
    pub metrics: CreativeMetrics,
    pub creatives: Vec<EnrichedCreative>,
}

/// Result of [`creatives_by_campaign`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativesReport {
    pub creatives: Vec<CampaignCreatives>,
    pub total_creatives: usize,
    pub total_campaigns: usize,
}

/// What the MASTER sheet knows about a campaign.
struct CampaignSummary {
    country: String,
    totals: MetricTotals,
}

fn summarize_campaigns(records: &[PerformanceRecord]) -> IndexMap<&str, CampaignSummary> {
    let mut campaigns: IndexMap<&str, CampaignSummary> = IndexMap::new();
    for record in records {
        let name = record.campaign_name.as_str();
        if name.is_empty() {
            continue;
        }
        campaigns
            .entry(name)
            .or_insert_with(|| CampaignSummary {
                country: record.country.clone(),
                totals: MetricTotals::default(),
            })
            .totals
            .add(record);
    }
    campaigns
}

/// Resolves blank taxonomy fields and attaches campaign metrics.
fn enrich(creative: &CreativeRecord, campaign: Option<&CampaignSummary>) -> EnrichedCreative {
    let name = creative.campaign_name.as_str();
    let mut resolved = creative.clone();
    resolved.platform = explicit_or(&creative.platform, || detect_platform(name));
    resolved.product = explicit_or(&creative.product, || detect_product(name));
    resolved.stage = explicit_or(&creative.stage, || detect_stage(name));
    if resolved.country.trim().is_empty() {
        resolved.country = campaign.map(|c| c.country.clone()).unwrap_or_default();
    }

    EnrichedCreative {
        creative: resolved,
        metrics: campaign
            .map(|c| CreativeMetrics::from(&c.totals))
            .unwrap_or_default(),
    }
}

/// Enriches, filters and groups creatives by campaign in first-seen order.
///
/// Campaign metrics are summed over every MASTER row of the campaign; the
/// dashboard filters do not apply here.
pub fn creatives_by_campaign(
    creatives: &[CreativeRecord],
    records: &[PerformanceRecord],
    query: &CreativeQuery,
) -> CreativesReport {
    let campaigns = summarize_campaigns(records);

    let mut groups: IndexMap<String, CampaignCreatives> = IndexMap::new();
    let mut total_creatives = 0;
    for creative in creatives {
        let enriched = enrich(creative, campaigns.get(creative.campaign_name.as_str()));
        if !query.matches(&enriched.creative) {
            continue;
        }
        total_creatives += 1;

        let resolved = &enriched.creative;
        groups
            .entry(resolved.campaign_name.clone())
            .or_insert_with(|| CampaignCreatives {
                campaign_name: resolved.campaign_name.clone(),
                campaign_id: resolved.campaign_id.clone(),
                platform: resolved.platform.clone(),
                product: resolved.product.clone(),
                stage: resolved.stage.clone(),
                country: resolved.country.clone(),
                metrics: enriched.metrics,
                creatives: Vec::new(),
            })
            .creatives
            .push(enriched);
    }

    CreativesReport {
        total_creatives,
        total_campaigns: groups.len(),
        creatives: groups.into_values().collect(),
    }
}
