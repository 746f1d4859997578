//! Small helpers shared by the Paid Media Hub crates.

pub mod env;
