//! Read-only access to the Paid Media Hub spreadsheet.
//!
//! The crate turns a spreadsheet range into typed records:
//! [`providers::SheetSource`] fetches raw cells, [`normalize`] coerces them into
//! [`models::PerformanceRecord`] / [`models::CreativeRecord`], and [`loader`]
//! glues both together with the "no data" and "optional sheet" semantics the
//! HTTP layer relies on.

pub mod loader;
pub mod models;
pub mod normalize;
pub mod providers;
