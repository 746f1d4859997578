//! Creative asset rows of the optional CREATIVES sheet.

use serde::{Deserialize, Serialize};

/// Number of columns in the CREATIVES sheet.
pub const CREATIVE_COLUMNS: usize = 12;

/// Status assigned to creatives whose status cell is blank.
pub const DEFAULT_CREATIVE_STATUS: &str = "active";

/// One creative asset, joined to the MASTER sheet by `campaign_name`.
///
/// `platform`, `product`, `country` and `stage` are optional in the sheet; when
/// blank they are inferred from the campaign name downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreativeRecord {
    pub creative_id: String,
    pub creative_name: String,
    pub image_url: String,
    pub campaign_name: String,
    pub campaign_id: String,
    pub platform: String,
    pub product: String,
    pub country: String,
    pub stage: String,
    pub status: String,
    pub date_created: String,
    pub notes: String,
}

impl Default for CreativeRecord {
    fn default() -> Self {
        Self {
            creative_id: String::new(),
            creative_name: String::new(),
            image_url: String::new(),
            campaign_name: String::new(),
            campaign_id: String::new(),
            platform: String::new(),
            product: String::new(),
            country: String::new(),
            stage: String::new(),
            status: DEFAULT_CREATIVE_STATUS.to_string(),
            date_created: String::new(),
            notes: String::new(),
        }
    }
}
