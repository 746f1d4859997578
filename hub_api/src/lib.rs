//! HTTP surface of the Paid Media Hub.
//!
//! Every request reads the spreadsheet through the configured
//! [`SheetSource`](sheet_ingestor::providers::SheetSource) and recomputes its
//! answer from scratch; there is no cache and no shared mutable state.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;
