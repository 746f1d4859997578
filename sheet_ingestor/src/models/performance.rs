//! Canonical per-row performance record of the MASTER sheet.

use serde::{Deserialize, Serialize};

/// Number of columns in the MASTER sheet (`A..U`).
pub const PERFORMANCE_COLUMNS: usize = 21;

/// One campaign-day performance row, after normalization.
///
/// Field order matches the column order of the MASTER sheet. Counters are
/// never negative and `cost` is always finite and non-negative.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub date: String,
    pub account_id: String,
    pub account_name: String,
    pub campaign_id: String,
    pub campaign_name: String,
    pub campaign_type: String,
    pub source_medium: String,
    pub channel_group: String,
    pub country: String,
    pub cost: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub installs: u64,
    /// Accounts created.
    pub registration_complete: u64,
    /// USDT payments.
    pub usd_savings_onboarding_completed: u64,
    pub local_card_payment_completed: u64,
    pub global_card_payment_completed: u64,
    pub currency_exchange_completed: u64,
    pub platform: String,
    /// First-time transactions.
    pub ftt: u64,
    pub crypto_transfer: u64,
}
