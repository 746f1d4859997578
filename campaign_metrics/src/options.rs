use std::collections::BTreeSet;

use serde::Serialize;
use sheet_ingestor::models::PerformanceRecord;

/// Values offered by the dashboard's country and platform selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Distinct countries, sorted.
    pub paises: Vec<String>,
    /// Distinct platforms, sorted.
    pub plataformas: Vec<String>,
}

/// Collects the distinct non-empty countries and platforms.
pub fn filter_options(records: &[PerformanceRecord]) -> FilterOptions {
    let distinct = |field: fn(&PerformanceRecord) -> &str| -> Vec<String> {
        records
            .iter()
            .map(field)
            .filter(|v| !v.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    };

    FilterOptions {
        paises: distinct(|r| r.country.as_str()),
        plataformas: distinct(|r| r.platform.as_str()),
    }
}
