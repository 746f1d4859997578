//! Campaign analytics for the Paid Media Hub.
//!
//! Everything here is pure and synchronous: classify campaign names
//! ([`taxonomy`]), filter normalized rows ([`filters`]), fold them into
//! metric accumulators ([`aggregate`]), and derive the activity and creatives
//! views ([`activity`], [`creatives`]). Nothing is cached; every call
//! recomputes from the rows it is given.

pub mod activity;
pub mod aggregate;
pub mod creatives;
pub mod dates;
pub mod filters;
pub mod options;
pub mod taxonomy;
