//! Campaign naming-convention classifier.
//!
//! Campaign names carry their taxonomy as tokens (`GG_AR_APP_GLOBALCARD`,
//! `FB_BR_CONS_AWARENESS`, ...). Three independent dimensions are inferred by
//! case-insensitive substring matching:
//!
//! - [`Platform`]: first matching token set wins, in declaration order.
//! - [`Product`]: PIX is checked first because it co-occurs with other
//!   product tokens.
//! - [`Stage`]: a `BRAND`/`CATEGORY`/`COMPETITION` suffix means branding and
//!   beats every substring rule; unmatched names default to `app`.
//!
//! All functions are total: empty or odd input yields `Unknown` / `app`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Advertising platform inferred from a campaign name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// `GG_`, `GOOGLE`
    Google,
    /// `FB_`, `FACEBOOK`, `META`
    Meta,
    /// `TK_`, `TIKTOK`
    TikTok,
    /// `LI_`, `LINKEDIN`
    LinkedIn,
    /// `AP_`, `APPLE`, `APL`
    Apple,
    /// `X_`, `TWITTER`
    Twitter,
    /// No token matched.
    Unknown,
}

/// Product advertised by a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Product {
    /// `PIX`
    #[serde(rename = "PIX Payments")]
    PixPayments,
    /// `CURRENCYEX`, `CURRENCY_EXCHANGE`
    #[serde(rename = "Currency Exchange")]
    CurrencyExchange,
    /// `GLOBALCARD`, `GLOBAL_CARD`, `GLOBAL-CARD`
    #[serde(rename = "Global Card")]
    GlobalCard,
    /// `LOCALCARD`, `LOCAL_CARD`
    #[serde(rename = "Local Card")]
    LocalCard,
    /// `USDT`
    #[serde(rename = "USDT Payments")]
    UsdtPayments,
    /// No token matched, or the name was empty.
    Unknown,
}

/// Coarse funnel stage (campaign intent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Name ends with `BRAND`, `CATEGORY` or `COMPETITION`.
    Branding,
    /// `AWA`, `AWARENESS`, `REACH`, `VIEWS`
    Awareness,
    /// `ENG`, `ENGAGEMENT`
    Engagement,
    /// `SRC`, `BRAND`, `CATEGORY` anywhere but the end.
    Search,
    /// App-install funnel; the default for uncategorized names.
    App,
}

/// The three inferred dimensions of a campaign name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassifiedAttributes {
    /// Inferred platform.
    pub platform: Platform,
    /// Inferred product.
    pub product: Product,
    /// Inferred funnel stage.
    pub stage: Stage,
}

const PLATFORM_TOKENS: &[(Platform, &[&str])] = &[
    (Platform::Google, &["GG_", "GOOGLE"]),
    (Platform::Meta, &["FB_", "FACEBOOK", "META"]),
    (Platform::TikTok, &["TK_", "TIKTOK"]),
    (Platform::LinkedIn, &["LI_", "LINKEDIN"]),
    (Platform::Apple, &["AP_", "APPLE", "APL"]),
    (Platform::Twitter, &["X_", "TWITTER"]),
];

const PRODUCT_TOKENS: &[(Product, &[&str])] = &[
    (Product::PixPayments, &["PIX"]),
    (Product::CurrencyExchange, &["CURRENCYEX", "CURRENCY_EXCHANGE"]),
    (Product::GlobalCard, &["GLOBALCARD", "GLOBAL_CARD", "GLOBAL-CARD"]),
    (Product::LocalCard, &["LOCALCARD", "LOCAL_CARD"]),
    (Product::UsdtPayments, &["USDT"]),
];

const BRANDING_SUFFIXES: &[&str] = &["BRAND", "CATEGORY", "COMPETITION"];

const STAGE_TOKENS: &[(Stage, &[&str])] = &[
    (Stage::Awareness, &["AWA", "AWARENESS", "REACH", "VIEWS"]),
    (Stage::Engagement, &["ENG", "ENGAGEMENT"]),
    (Stage::Search, &["SRC", "BRAND", "CATEGORY"]),
];

fn first_match<T: Copy>(name: &str, table: &[(T, &[&str])]) -> Option<T> {
    table
        .iter()
        .find(|(_, tokens)| tokens.iter().any(|t| name.contains(t)))
        .map(|(value, _)| *value)
}

/// Infers the platform from a campaign name.
pub fn detect_platform(campaign_name: &str) -> Platform {
    first_match(&campaign_name.to_uppercase(), PLATFORM_TOKENS).unwrap_or(Platform::Unknown)
}

/// Infers the product from a campaign name.
pub fn detect_product(campaign_name: &str) -> Product {
    if campaign_name.is_empty() {
        return Product::Unknown;
    }
    let name = campaign_name.trim().to_uppercase();
    first_match(&name, PRODUCT_TOKENS).unwrap_or(Product::Unknown)
}

/// Infers the funnel stage from a campaign name.
pub fn detect_stage(campaign_name: &str) -> Stage {
    let name = campaign_name.to_uppercase();
    if BRANDING_SUFFIXES.iter().any(|s| name.ends_with(s)) {
        return Stage::Branding;
    }
    first_match(&name, STAGE_TOKENS).unwrap_or(Stage::App)
}

/// Classifies all three dimensions at once.
pub fn classify(campaign_name: &str) -> ClassifiedAttributes {
    ClassifiedAttributes {
        platform: detect_platform(campaign_name),
        product: detect_product(campaign_name),
        stage: detect_stage(campaign_name),
    }
}

/// Returns `explicit` unless it is blank, otherwise the inferred label.
///
/// Sheet columns that were filled in by hand always win over inference.
pub fn explicit_or<T: fmt::Display>(explicit: &str, inferred: impl FnOnce() -> T) -> String {
    if explicit.trim().is_empty() {
        inferred().to_string()
    } else {
        explicit.to_string()
    }
}

impl Platform {
    /// Display label, as used in JSON.
    pub fn label(self) -> &'static str {
        match self {
            Platform::Google => "Google",
            Platform::Meta => "Meta",
            Platform::TikTok => "TikTok",
            Platform::LinkedIn => "LinkedIn",
            Platform::Apple => "Apple",
            Platform::Twitter => "Twitter",
            Platform::Unknown => "Unknown",
        }
    }

    /// Every platform, in matching order.
    pub const ALL: [Platform; 7] = [
        Platform::Google,
        Platform::Meta,
        Platform::TikTok,
        Platform::LinkedIn,
        Platform::Apple,
        Platform::Twitter,
        Platform::Unknown,
    ];
}

impl Product {
    /// Display label, as used in JSON.
    pub fn label(self) -> &'static str {
        match self {
            Product::PixPayments => "PIX Payments",
            Product::CurrencyExchange => "Currency Exchange",
            Product::GlobalCard => "Global Card",
            Product::LocalCard => "Local Card",
            Product::UsdtPayments => "USDT Payments",
            Product::Unknown => "Unknown",
        }
    }

    /// Every product, in matching order.
    pub const ALL: [Product; 6] = [
        Product::PixPayments,
        Product::CurrencyExchange,
        Product::GlobalCard,
        Product::LocalCard,
        Product::UsdtPayments,
        Product::Unknown,
    ];
}

impl Stage {
    /// Display label, as used in JSON.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Branding => "branding",
            Stage::Awareness => "awareness",
            Stage::Engagement => "engagement",
            Stage::Search => "search",
            Stage::App => "app",
        }
    }

    /// Every stage.
    pub const ALL: [Stage; 5] = [
        Stage::Awareness,
        Stage::Search,
        Stage::App,
        Stage::Engagement,
        Stage::Branding,
    ];
}

/// A label did not name any known taxonomy value.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownLabel {
    kind: &'static str,
    value: String,
}

macro_rules! label_impls {
    ($ty:ty, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownLabel;

            /// Case-insensitive match against the display labels.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                <$ty>::ALL
                    .into_iter()
                    .find(|v| v.label().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| UnknownLabel {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

label_impls!(Platform, "platform");
label_impls!(Product, "product");
label_impls!(Stage, "stage");
