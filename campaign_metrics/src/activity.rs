//! Active-campaign view.
//!
//! A campaign is active when it spent money on at least one calendar day in
//! the trailing window `[today - window_days, today]`, both ends inclusive.
//! "Today" comes from a [`Clock`] so the window is testable.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sheet_ingestor::models::PerformanceRecord;

use crate::{
    aggregate::MetricTotals,
    dates::{day_key, parse_date},
    taxonomy::{Platform, Product, Stage, classify},
};

/// Trailing window, in days, used when none is configured.
pub const DEFAULT_ACTIVITY_WINDOW_DAYS: u32 = 15;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// One campaign with its spend history and activity flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignActivity {
    #[serde(rename = "campaign_name")]
    pub campaign_name: String,
    /// Country of the first row seen for the campaign.
    pub country: String,
    pub platform: Platform,
    pub product: Product,
    pub stage: Stage,
    #[serde(flatten)]
    pub totals: MetricTotals,
    /// `YYYY-MM-DD` days on which the campaign had cost.
    pub dates_with_cost: BTreeSet<String>,
    pub is_active: bool,
}

/// Whether any of `dates` falls within the trailing window ending at `now`.
///
/// Dates that cannot be parsed never count.
pub fn is_campaign_active<'a>(
    dates: impl IntoIterator<Item = &'a str>,
    now: DateTime<Utc>,
    window_days: u32,
) -> bool {
    let today = now.date_naive();
    let Some(start) = today.checked_sub_signed(Duration::days(i64::from(window_days))) else {
        return false;
    };
    dates
        .into_iter()
        .filter_map(parse_date)
        .any(|day| start <= day && day <= today)
}

/// Collapses rows into one entry per campaign name.
///
/// Empty names and names containing spaces are not campaign identifiers and
/// are skipped.
pub fn campaign_activity(
    records: &[PerformanceRecord],
    now: DateTime<Utc>,
    window_days: u32,
) -> Vec<CampaignActivity> {
    let mut campaigns: IndexMap<&str, CampaignActivity> = IndexMap::new();
    for record in records {
        let name = record.campaign_name.as_str();
        if name.trim().is_empty() || name.contains(' ') {
            continue;
        }
        let campaign = campaigns.entry(name).or_insert_with(|| {
            let attrs = classify(name);
            CampaignActivity {
                campaign_name: name.to_string(),
                country: record.country.clone(),
                platform: attrs.platform,
                product: attrs.product,
                stage: attrs.stage,
                totals: MetricTotals::default(),
                dates_with_cost: BTreeSet::new(),
                is_active: false,
            }
        });
        campaign.totals.add(record);
        if record.cost > 0.0 {
            if let Some(day) = spend_day(&record.date) {
                campaign.dates_with_cost.insert(day);
            }
        }
    }

    campaigns
        .into_values()
        .map(|mut campaign| {
            campaign.is_active = is_campaign_active(
                campaign.dates_with_cost.iter().map(String::as_str),
                now,
                window_days,
            );
            campaign
        })
        .collect()
}

/// Day part of a sheet date; unparsable values keep their leading token.
fn spend_day(date: &str) -> Option<String> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    day_key(date).or_else(|| {
        date.split(['T', ' '])
            .next()
            .filter(|d| !d.is_empty())
            .map(str::to_string)
    })
}

/// Which campaigns to list by activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityFilter {
    #[default]
    All,
    Active,
    Inactive,
}

/// Filters for the active-campaigns list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityQuery {
    /// Stage label, or `all`.
    pub stage: String,
    pub activity: ActivityFilter,
    /// Case-insensitive substring of name, product, platform or country.
    pub search: String,
}

impl Default for ActivityQuery {
    fn default() -> Self {
        Self {
            stage: "all".to_string(),
            activity: ActivityFilter::All,
            search: String::new(),
        }
    }
}

impl ActivityQuery {
    /// Whether `campaign` is listed. Campaigns without spend never are.
    pub fn matches(&self, campaign: &CampaignActivity) -> bool {
        if campaign.totals.cost() <= 0.0 {
            return false;
        }

        let stage = self.stage.trim();
        if !stage.is_empty()
            && !stage.eq_ignore_ascii_case("all")
            && !campaign.stage.label().eq_ignore_ascii_case(stage)
        {
            return false;
        }

        let activity_ok = match self.activity {
            ActivityFilter::All => true,
            ActivityFilter::Active => campaign.is_active,
            ActivityFilter::Inactive => !campaign.is_active,
        };
        if !activity_ok {
            return false;
        }

        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || [
                campaign.campaign_name.as_str(),
                campaign.product.label(),
                campaign.platform.label(),
                campaign.country.as_str(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn apply(&self, campaigns: Vec<CampaignActivity>) -> Vec<CampaignActivity> {
        campaigns.into_iter().filter(|c| self.matches(c)).collect()
    }
}

/// A level of the activity tree with its campaign counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyNode {
    pub label: String,
    pub total: usize,
    pub active: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
    /// Only set on the innermost (product) level.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub campaigns: Vec<CampaignActivity>,
}

type LevelKey = fn(&CampaignActivity) -> String;

fn stage_key(c: &CampaignActivity) -> String {
    c.stage.to_string()
}

fn country_key(c: &CampaignActivity) -> String {
    c.country.clone()
}

fn platform_key(c: &CampaignActivity) -> String {
    c.platform.to_string()
}

fn product_key(c: &CampaignActivity) -> String {
    c.product.to_string()
}

const LEVELS: &[LevelKey] = &[stage_key, country_key, platform_key, product_key];

/// Stage → Country → Platform → Product tree, in first-seen order.
pub fn activity_hierarchy(campaigns: &[CampaignActivity]) -> Vec<HierarchyNode> {
    let all: Vec<&CampaignActivity> = campaigns.iter().collect();
    children(&all, LEVELS)
}

fn children(campaigns: &[&CampaignActivity], levels: &[LevelKey]) -> Vec<HierarchyNode> {
    let Some((key, rest)) = levels.split_first() else {
        return Vec::new();
    };
    let mut groups: IndexMap<String, Vec<&CampaignActivity>> = IndexMap::new();
    for &campaign in campaigns {
        groups.entry(key(campaign)).or_default().push(campaign);
    }

    groups
        .into_iter()
        .map(|(label, members)| HierarchyNode {
            label,
            total: members.len(),
            active: members.iter().filter(|c| c.is_active).count(),
            children: children(&members, rest),
            campaigns: if rest.is_empty() {
                members.iter().map(|c| (*c).clone()).collect()
            } else {
                Vec::new()
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 30, 12, 0, 0).unwrap()
    }

    fn row(date: &str, campaign: &str, country: &str, cost: f64) -> PerformanceRecord {
        PerformanceRecord {
            date: date.into(),
            campaign_name: campaign.into(),
            country: country.into(),
            cost,
            installs: 1,
            ..Default::default()
        }
    }

    #[test]
    fn window_boundaries() {
        assert!(is_campaign_active(["2025-10-20"], now(), 15));
        assert!(!is_campaign_active(["2025-10-10"], now(), 15));
        assert!(is_campaign_active(["2025-10-15"], now(), 15));
        assert!(!is_campaign_active(["2025-10-14"], now(), 15));
        assert!(is_campaign_active(["2025-10-30"], now(), 15));
        assert!(!is_campaign_active(["2025-10-31"], now(), 15));
        assert!(!is_campaign_active(["garbage"], now(), 15));
    }

    #[test]
    fn fixed_clock_reports_its_instant() {
        let clock = FixedClock(now());
        assert_eq!(clock.now(), now());
    }

    #[test]
    fn collapses_rows_per_campaign() {
        let rows = [
            row("2025-10-20T08:00:00Z", "GG_AR_APP_PIX", "AR", 10.0),
            row("2025-10-20 19:00", "GG_AR_APP_PIX", "BR", 5.0),
            row("2025-09-01", "GG_AR_APP_PIX", "AR", 0.0),
            row("2025-10-01", "FB_BR_AWARENESS", "BR", 3.0),
            row("2025-10-01", "Free text campaign", "AR", 9.0),
            row("2025-10-01", "", "AR", 9.0),
        ];
        let campaigns = campaign_activity(&rows, now(), DEFAULT_ACTIVITY_WINDOW_DAYS);
        assert_eq!(campaigns.len(), 2);

        let pix = &campaigns[0];
        assert_eq!(pix.country, "AR");
        assert_eq!(pix.platform, Platform::Google);
        assert_eq!(pix.product, Product::PixPayments);
        assert_eq!(pix.totals.cost(), 15.0);
        assert_eq!(pix.totals.installs, 3);
        assert_eq!(pix.dates_with_cost.iter().collect::<Vec<_>>(), vec!["2025-10-20"]);
        assert!(pix.is_active);

        assert_eq!(campaigns[1].stage, Stage::Awareness);
        assert!(!campaigns[1].is_active);
    }

    #[test]
    fn query_requires_spend_and_matches_labels() {
        let rows = [
            row("2025-10-20", "GG_AR_APP_PIX", "AR", 10.0),
            row("2025-10-01", "FB_BR_AWARENESS", "BR", 3.0),
            row("2025-10-20", "TK_MX_APP", "MX", 0.0),
        ];
        let campaigns = campaign_activity(&rows, now(), 15);

        assert_eq!(ActivityQuery::default().apply(campaigns.clone()).len(), 2);

        let active = ActivityQuery {
            activity: ActivityFilter::Active,
            ..Default::default()
        };
        assert_eq!(active.apply(campaigns.clone())[0].campaign_name, "GG_AR_APP_PIX");

        let search = ActivityQuery {
            search: "meta".into(),
            ..Default::default()
        };
        assert_eq!(search.apply(campaigns.clone())[0].campaign_name, "FB_BR_AWARENESS");

        let stage = ActivityQuery {
            stage: "AWARENESS".into(),
            activity: ActivityFilter::Inactive,
            ..Default::default()
        };
        assert_eq!(stage.apply(campaigns).len(), 1);
    }

    #[test]
    fn hierarchy_counts_active_campaigns_per_level() {
        let rows = [
            row("2025-10-20", "GG_AR_APP_PIX", "AR", 10.0),
            row("2025-09-01", "GG_AR_APP_USDT", "AR", 4.0),
            row("2025-10-25", "FB_BR_APP_PIX", "BR", 2.0),
        ];
        let campaigns = campaign_activity(&rows, now(), 15);
        let tree = activity_hierarchy(&campaigns);

        assert_eq!(tree.len(), 1);
        let app = &tree[0];
        assert_eq!((app.label.as_str(), app.total, app.active), ("app", 3, 2));

        let ar = &app.children[0];
        assert_eq!((ar.label.as_str(), ar.total, ar.active), ("AR", 2, 1));
        let google = &ar.children[0];
        assert_eq!(google.label, "Google");
        let products: Vec<_> = google.children.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(products, vec!["PIX Payments", "USDT Payments"]);
        assert_eq!(google.children[1].campaigns[0].campaign_name, "GG_AR_APP_USDT");
        assert!(google.children[1].children.is_empty());
    }

    #[test]
    fn serializes_dashboard_keys() {
        let campaigns = campaign_activity(&[row("2025-10-20", "GG_AR_APP", "AR", 1.0)], now(), 15);
        let json = serde_json::to_value(&campaigns[0]).unwrap();
        assert_eq!(json["campaign_name"], "GG_AR_APP");
        assert_eq!(json["isActive"], true);
        assert_eq!(json["datesWithCost"], serde_json::json!(["2025-10-20"]));
        assert_eq!(json["accountsCreated"], 0);
        assert_eq!(json["stage"], "app");
    }
}
