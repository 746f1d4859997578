//! Folding performance rows into metric accumulators.
//!
//! [`MetricTotals`] only ever holds sums. Ratios are derived from the final
//! sums on read, so grouping order never changes a result. Cost is summed in
//! integer micros to keep that true for floating-point inputs as well.

pub mod breakdown;
pub mod funnel;
pub mod summary;
pub mod top_performers;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use sheet_ingestor::models::PerformanceRecord;

use crate::dates::day_key;

pub use breakdown::{DailyPoint, GroupMetrics, ShareDimension, ShareSlice, by_platform, daily_series, spend_share};
pub use funnel::{FunnelStep, conversion_funnel};
pub use summary::{MetricsSummary, summarize};
pub use top_performers::{DEFAULT_TOP_PERFORMERS, TopPerformer, top_performers};

const MICROS_PER_UNIT: f64 = 1_000_000.0;

/// Bucket name for rows whose platform column is blank.
pub const OTHER_PLATFORM: &str = "Other";

/// Summed counters for a set of rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricTotals {
    #[serde(rename = "cost", serialize_with = "micros_as_units")]
    cost_micros: u64,
    pub impressions: u64,
    pub clicks: u64,
    pub installs: u64,
    pub accounts_created: u64,
    pub ftt: u64,
    pub global_card: u64,
    pub local_card: u64,
    pub usdt: u64,
    pub currency_exchange: u64,
    pub crypto_transfer: u64,
}

fn to_micros(cost: f64) -> u64 {
    if cost.is_finite() && cost > 0.0 {
        (cost * MICROS_PER_UNIT).round() as u64
    } else {
        0
    }
}

fn micros_as_units<S: Serializer>(micros: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(*micros as f64 / MICROS_PER_UNIT)
}

/// `numerator / denominator`, or 0 for an empty denominator.
pub(crate) fn ratio(numerator: f64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}

/// `numerator * 100 / denominator`, or 0 for an empty denominator.
pub(crate) fn percentage(numerator: u64, denominator: u64) -> f64 {
    ratio(numerator as f64 * 100.0, denominator)
}

impl MetricTotals {
    /// Adds one row.
    pub fn add(&mut self, record: &PerformanceRecord) {
        self.cost_micros = self.cost_micros.saturating_add(to_micros(record.cost));
        self.impressions = self.impressions.saturating_add(record.impressions);
        self.clicks = self.clicks.saturating_add(record.clicks);
        self.installs = self.installs.saturating_add(record.installs);
        self.accounts_created = self
            .accounts_created
            .saturating_add(record.registration_complete);
        self.ftt = self.ftt.saturating_add(record.ftt);
        self.global_card = self
            .global_card
            .saturating_add(record.global_card_payment_completed);
        self.local_card = self
            .local_card
            .saturating_add(record.local_card_payment_completed);
        self.usdt = self
            .usdt
            .saturating_add(record.usd_savings_onboarding_completed);
        self.currency_exchange = self
            .currency_exchange
            .saturating_add(record.currency_exchange_completed);
        self.crypto_transfer = self.crypto_transfer.saturating_add(record.crypto_transfer);
    }

    /// Adds another accumulator.
    pub fn merge(&mut self, other: &MetricTotals) {
        self.cost_micros = self.cost_micros.saturating_add(other.cost_micros);
        self.impressions = self.impressions.saturating_add(other.impressions);
        self.clicks = self.clicks.saturating_add(other.clicks);
        self.installs = self.installs.saturating_add(other.installs);
        self.accounts_created = self.accounts_created.saturating_add(other.accounts_created);
        self.ftt = self.ftt.saturating_add(other.ftt);
        self.global_card = self.global_card.saturating_add(other.global_card);
        self.local_card = self.local_card.saturating_add(other.local_card);
        self.usdt = self.usdt.saturating_add(other.usdt);
        self.currency_exchange = self.currency_exchange.saturating_add(other.currency_exchange);
        self.crypto_transfer = self.crypto_transfer.saturating_add(other.crypto_transfer);
    }

    /// Sums every record.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a PerformanceRecord>) -> Self {
        let mut totals = Self::default();
        for record in records {
            totals.add(record);
        }
        totals
    }

    /// Total spend.
    pub fn cost(&self) -> f64 {
        self.cost_micros as f64 / MICROS_PER_UNIT
    }

    /// Cost per install.
    pub fn cpi(&self) -> f64 {
        ratio(self.cost(), self.installs)
    }

    /// Cost per account created.
    pub fn cac(&self) -> f64 {
        ratio(self.cost(), self.accounts_created)
    }

    /// Click-through rate, in percent.
    pub fn ctr(&self) -> f64 {
        percentage(self.clicks, self.impressions)
    }

    /// Accounts per install, in percent.
    pub fn conversion(&self) -> f64 {
        percentage(self.accounts_created, self.installs)
    }

    /// First-time transactions per account, in percent.
    pub fn ftt_rate(&self) -> f64 {
        percentage(self.ftt, self.accounts_created)
    }

    /// Cost per global card payment.
    pub fn cpa_global(&self) -> f64 {
        ratio(self.cost(), self.global_card)
    }

    /// Cost per local card payment.
    pub fn cpa_local(&self) -> f64 {
        ratio(self.cost(), self.local_card)
    }

    /// Cost per USDT payment.
    pub fn cpa_usdt(&self) -> f64 {
        ratio(self.cost(), self.usdt)
    }

    /// Cost per first-time transaction.
    pub fn cpa_ftt(&self) -> f64 {
        ratio(self.cost(), self.ftt)
    }
}

/// Built-in grouping keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    /// Campaign name.
    Campaign,
    /// Platform column; blank platforms bucket as [`OTHER_PLATFORM`].
    Platform,
    /// `YYYY-MM-DD`; unparsable dates keep their raw value.
    Day,
    /// Campaign, platform and country.
    CampaignPlatformCountry,
}

impl GroupKey {
    /// The key `record` falls under. Empty keys are not grouped.
    pub fn key_of(self, record: &PerformanceRecord) -> String {
        match self {
            GroupKey::Campaign => record.campaign_name.clone(),
            GroupKey::Platform if record.platform.trim().is_empty() => OTHER_PLATFORM.to_string(),
            GroupKey::Platform => record.platform.clone(),
            GroupKey::Day => day_key(&record.date).unwrap_or_else(|| record.date.clone()),
            GroupKey::CampaignPlatformCountry if record.campaign_name.is_empty() => String::new(),
            GroupKey::CampaignPlatformCountry => format!(
                "{}|{}|{}",
                record.campaign_name, record.platform, record.country
            ),
        }
    }
}

/// One accumulator per distinct non-empty key, in first-seen order.
pub fn group_by<F>(records: &[PerformanceRecord], key_fn: F) -> IndexMap<String, MetricTotals>
where
    F: Fn(&PerformanceRecord) -> String,
{
    let mut groups: IndexMap<String, MetricTotals> = IndexMap::new();
    for record in records {
        let key = key_fn(record);
        if key.is_empty() {
            continue;
        }
        groups.entry(key).or_default().add(record);
    }
    groups
}
