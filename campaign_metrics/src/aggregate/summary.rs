use serde::Serialize;
use sheet_ingestor::models::PerformanceRecord;

use super::MetricTotals;

/// Headline metrics of the dashboard view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    /// Total spend.
    pub total_cost: f64,
    pub total_installs: u64,
    /// Cost per install.
    pub cpi: f64,
    /// FTT per account, in percent.
    pub ftt_acc: f64,
    pub accounts_created: u64,
    /// Cost per account created.
    pub cac: f64,
    /// Accounts per install, in percent.
    pub acc_installs: f64,
    pub currency_exchange: u64,
    pub global_card_payment: u64,
    pub local_card_payment: u64,
    pub usdt_payment: u64,
    /// First-time transactions.
    #[serde(rename = "totalFTT")]
    pub total_ftt: u64,
    /// Cost per global card payment.
    pub cpa_global: f64,
    /// Cost per local card payment.
    pub cpa_local: f64,
    /// Cost per USDT payment.
    #[serde(rename = "cpaUSDT")]
    pub cpa_usdt: f64,
    /// Cost per first-time transaction.
    #[serde(rename = "cpaFTT")]
    pub cpa_ftt: f64,
    pub impressions: u64,
    pub clicks: u64,
    /// Click-through rate, in percent.
    pub ctr: f64,
}

impl From<&MetricTotals> for MetricsSummary {
    fn from(totals: &MetricTotals) -> Self {
        Self {
            total_cost: totals.cost(),
            total_installs: totals.installs,
            cpi: totals.cpi(),
            ftt_acc: totals.ftt_rate(),
            accounts_created: totals.accounts_created,
            cac: totals.cac(),
            acc_installs: totals.conversion(),
            currency_exchange: totals.currency_exchange,
            global_card_payment: totals.global_card,
            local_card_payment: totals.local_card,
            usdt_payment: totals.usdt,
            total_ftt: totals.ftt,
            cpa_global: totals.cpa_global(),
            cpa_local: totals.cpa_local(),
            cpa_usdt: totals.cpa_usdt(),
            cpa_ftt: totals.cpa_ftt(),
            impressions: totals.impressions,
            clicks: totals.clicks,
            ctr: totals.ctr(),
        }
    }
}

/// Sums every row and derives the dashboard ratios.
pub fn summarize(records: &[PerformanceRecord]) -> MetricsSummary {
    MetricsSummary::from(&MetricTotals::from_records(records))
}
