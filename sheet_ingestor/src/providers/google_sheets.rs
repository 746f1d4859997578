//! Google Sheets v4 client authenticated with a service account.

pub mod auth;
pub mod params;
pub mod provider;
pub mod response;

pub use auth::ServiceAccountCredentials;
pub use params::{MajorDimension, ReadParams, ValueRenderOption};
pub use provider::GoogleSheetsProvider;
