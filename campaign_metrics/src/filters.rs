//! Row filter pipelines driven by dashboard query parameters.
//!
//! Two pipelines share the same predicates:
//!
//! - [`FilterPipeline::basic`]: country, platform and date bounds.
//! - [`FilterPipeline::metrics`]: the `CONS`/`APP` campaign gate, then the
//!   basic filters, then include and exclude terms.
//!
//! Value filters are skipped for the "everything" sentinels (`""`, `all`,
//! `todos`, `todas`). A date bound that cannot be parsed is ignored.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sheet_ingestor::models::PerformanceRecord;
use tracing::{debug, warn};

use crate::dates::parse_date_time;

/// Default for `pais`.
pub const ALL_COUNTRIES: &str = "todos";
/// Default for `plataforma`.
pub const ALL_PLATFORMS: &str = "todas";

const SENTINELS: &[&str] = &["", "all", "todos", "todas"];

/// Tokens a campaign name must contain to count towards the metrics views.
const FUNNEL_TAGS: &[&str] = &["CONS", "APP"];

/// Dashboard filter parameters, as received in the query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterParams {
    /// Country, exact match.
    pub pais: String,
    /// Platform, substring match.
    pub plataforma: String,
    /// Inclusive lower date bound.
    pub periodo_desde: String,
    /// Inclusive upper date bound (the whole day is included).
    pub periodo_hasta: String,
    /// Selected products. Echoed back; does not filter rows.
    #[serde(deserialize_with = "comma_list")]
    pub productos: Vec<String>,
    /// Comma-separated terms; keep rows whose campaign contains any.
    pub filtro_in: String,
    /// Comma-separated terms; drop rows whose campaign contains any.
    pub filtro_out: String,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            pais: ALL_COUNTRIES.to_string(),
            plataforma: ALL_PLATFORMS.to_string(),
            periodo_desde: String::new(),
            periodo_hasta: String::new(),
            productos: Vec::new(),
            filtro_in: String::new(),
            filtro_out: String::new(),
        }
    }
}

impl FilterParams {
    /// Replaces empty `pais`/`plataforma` (e.g. `?pais=`) with their defaults.
    pub fn with_defaults(mut self) -> Self {
        if self.pais.trim().is_empty() {
            self.pais = ALL_COUNTRIES.to_string();
        }
        if self.plataforma.trim().is_empty() {
            self.plataforma = ALL_PLATFORMS.to_string();
        }
        self
    }
}

fn comma_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(split_terms(&raw, false))
}

/// Splits on commas, trims, and drops blank entries.
fn split_terms(raw: &str, lowercase: bool) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| if lowercase { t.to_lowercase() } else { t.to_string() })
        .collect()
}

fn is_sentinel(value: &str) -> bool {
    let value = value.trim();
    SENTINELS.iter().any(|s| value.eq_ignore_ascii_case(s))
}

/// A single row predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum RowFilter {
    /// Campaign name contains `CONS` or `APP` (case-insensitive).
    RequireFunnelTag,
    /// Case-insensitive exact country.
    Country(String),
    /// Lowercased substring of the row's platform.
    Platform(String),
    /// Row date at or after the bound.
    DateFrom(DateTime<Utc>),
    /// Row date strictly before the bound.
    DateBefore(DateTime<Utc>),
    /// Lowercased campaign name contains any of the terms.
    IncludeTerms(Vec<String>),
    /// Lowercased campaign name contains none of the terms.
    ExcludeTerms(Vec<String>),
}

impl RowFilter {
    /// Whether `record` survives this filter.
    pub fn keeps(&self, record: &PerformanceRecord) -> bool {
        match self {
            RowFilter::RequireFunnelTag => {
                let name = record.campaign_name.to_uppercase();
                FUNNEL_TAGS.iter().any(|tag| name.contains(tag))
            }
            RowFilter::Country(country) => record.country.to_lowercase() == *country,
            RowFilter::Platform(platform) => record.platform.to_lowercase().contains(platform.as_str()),
            RowFilter::DateFrom(from) => parse_date_time(&record.date).is_some_and(|d| d >= *from),
            RowFilter::DateBefore(before) => parse_date_time(&record.date).is_some_and(|d| d < *before),
            RowFilter::IncludeTerms(terms) => {
                let name = record.campaign_name.to_lowercase();
                terms.iter().any(|t| name.contains(t.as_str()))
            }
            RowFilter::ExcludeTerms(terms) => {
                let name = record.campaign_name.to_lowercase();
                !terms.iter().any(|t| name.contains(t.as_str()))
            }
        }
    }
}

/// An ordered list of [`RowFilter`]s; a row must pass all of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPipeline {
    filters: Vec<RowFilter>,
}

impl FilterPipeline {
    /// Country, platform and date filters.
    pub fn basic(params: &FilterParams) -> Self {
        let mut filters = Vec::new();
        push_basic(&mut filters, params);
        Self { filters }
    }

    /// Funnel-tag gate, basic filters, then include and exclude terms.
    pub fn metrics(params: &FilterParams) -> Self {
        let mut filters = vec![RowFilter::RequireFunnelTag];
        push_basic(&mut filters, params);

        if !params.productos.is_empty() {
            debug!(productos = ?params.productos, "product selection does not narrow rows");
        }

        let include = split_terms(&params.filtro_in, true);
        if !include.is_empty() {
            filters.push(RowFilter::IncludeTerms(include));
        }
        let exclude = split_terms(&params.filtro_out, true);
        if !exclude.is_empty() {
            filters.push(RowFilter::ExcludeTerms(exclude));
        }
        Self { filters }
    }

    /// The filters, in evaluation order.
    pub fn filters(&self) -> &[RowFilter] {
        &self.filters
    }

    /// Whether `record` passes every filter.
    pub fn keeps(&self, record: &PerformanceRecord) -> bool {
        self.filters.iter().all(|f| f.keeps(record))
    }

    /// Keeps matching records, preserving their order.
    pub fn apply(&self, records: Vec<PerformanceRecord>) -> Vec<PerformanceRecord> {
        let before = records.len();
        let kept: Vec<_> = records.into_iter().filter(|r| self.keeps(r)).collect();
        debug!(before, after = kept.len(), filters = self.filters.len(), "rows filtered");
        kept
    }
}

fn push_basic(filters: &mut Vec<RowFilter>, params: &FilterParams) {
    if !is_sentinel(&params.pais) {
        filters.push(RowFilter::Country(params.pais.trim().to_lowercase()));
    }
    if !is_sentinel(&params.plataforma) {
        filters.push(RowFilter::Platform(params.plataforma.trim().to_lowercase()));
    }
    if let Some(from) = date_bound("periodoDesde", &params.periodo_desde) {
        filters.push(RowFilter::DateFrom(from));
    }
    if let Some(to) = date_bound("periodoHasta", &params.periodo_hasta)
        .and_then(|to| to.checked_add_signed(Duration::days(1)))
    {
        filters.push(RowFilter::DateBefore(to));
    }
}

fn date_bound(name: &str, value: &str) -> Option<DateTime<Utc>> {
    if value.trim().is_empty() {
        return None;
    }
    let parsed = parse_date_time(value);
    if parsed.is_none() {
        warn!(param = name, %value, "ignoring unparsable date filter");
    }
    parsed
}

/// Country, platform and date filters (used by the raw campaigns view).
pub fn apply_basic_filters(
    records: Vec<PerformanceRecord>,
    params: &FilterParams,
) -> Vec<PerformanceRecord> {
    FilterPipeline::basic(params).apply(records)
}

/// Funnel-tag gate plus every other filter (used by the metrics views).
pub fn apply_metrics_filters(
    records: Vec<PerformanceRecord>,
    params: &FilterParams,
) -> Vec<PerformanceRecord> {
    FilterPipeline::metrics(params).apply(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, campaign: &str, country: &str, platform: &str) -> PerformanceRecord {
        PerformanceRecord {
            date: date.to_string(),
            campaign_name: campaign.to_string(),
            country: country.to_string(),
            platform: platform.to_string(),
            ..Default::default()
        }
    }

    fn names(records: &[PerformanceRecord]) -> Vec<&str> {
        records.iter().map(|r| r.campaign_name.as_str()).collect()
    }

    #[test]
    fn query_defaults_and_product_list() {
        let params: FilterParams =
            serde_json::from_value(serde_json::json!({"productos": "PIX, ,Global Card,"})).unwrap();
        assert_eq!(params.pais, "todos");
        assert_eq!(params.plataforma, "todas");
        assert_eq!(params.productos, vec!["PIX", "Global Card"]);

        let params = FilterParams {
            pais: String::new(),
            ..Default::default()
        }
        .with_defaults();
        assert_eq!(params.pais, "todos");
    }

    #[test]
    fn sentinels_skip_value_filters() {
        for sentinel in ["", "all", "TODOS", "todas"] {
            let params = FilterParams {
                pais: sentinel.into(),
                plataforma: sentinel.into(),
                ..Default::default()
            };
            assert!(FilterPipeline::basic(&params).filters().is_empty());
        }
    }

    #[test]
    fn country_is_exact_and_platform_is_substring() {
        let rows = vec![
            record("2025-10-01", "A_APP", "AR", "Google Ads"),
            record("2025-10-01", "B_APP", "ar", "Meta"),
            record("2025-10-01", "C_APP", "ARG", "google"),
        ];
        let params = FilterParams {
            pais: "Ar".into(),
            plataforma: "GOOGLE".into(),
            ..Default::default()
        };
        assert_eq!(names(&apply_basic_filters(rows, &params)), vec!["A_APP"]);
    }

    #[test]
    fn date_to_includes_the_whole_day() {
        let rows = vec![
            record("2025-10-20T23:00", "LATE_APP", "AR", ""),
            record("2025-10-21T00:00", "NEXT_APP", "AR", ""),
            record("2025-10-19", "EARLY_APP", "AR", ""),
        ];
        let params = FilterParams {
            periodo_desde: "2025-10-20".into(),
            periodo_hasta: "2025-10-20".into(),
            ..Default::default()
        };
        assert_eq!(names(&apply_basic_filters(rows, &params)), vec!["LATE_APP"]);
    }

    #[test]
    fn malformed_bounds_fail_open_but_bad_rows_drop() {
        let rows = vec![record("2025-10-01", "A_APP", "", ""), record("soon", "B_APP", "", "")];

        let broken = FilterParams {
            periodo_desde: "not-a-date".into(),
            ..Default::default()
        };
        assert_eq!(apply_basic_filters(rows.clone(), &broken).len(), 2);

        let valid = FilterParams {
            periodo_desde: "2025-01-01".into(),
            ..Default::default()
        };
        assert_eq!(names(&apply_basic_filters(rows, &valid)), vec!["A_APP"]);
    }

    #[test]
    fn funnel_gate_only_in_metrics_pipeline() {
        let rows = vec![
            record("2025-10-01", "GG_AR_CONS_PIX", "AR", ""),
            record("2025-10-01", "gg_ar_app", "AR", ""),
            record("2025-10-01", "GG_AR_BRAND", "AR", ""),
        ];
        let params = FilterParams::default();
        assert_eq!(apply_basic_filters(rows.clone(), &params).len(), 3);
        assert_eq!(
            names(&apply_metrics_filters(rows, &params)),
            vec!["GG_AR_CONS_PIX", "gg_ar_app"]
        );
    }

    #[test]
    fn exclude_wins_over_include() {
        let rows = vec![
            record("2025-10-01", "GG_AR_APP_PIX", "", ""),
            record("2025-10-01", "GG_AR_APP_PIX_TEST", "", ""),
            record("2025-10-01", "GG_AR_APP_USDT", "", ""),
        ];
        let params = FilterParams {
            filtro_in: " pix , ".into(),
            filtro_out: "test".into(),
            ..Default::default()
        };
        assert_eq!(names(&apply_metrics_filters(rows, &params)), vec!["GG_AR_APP_PIX"]);
    }

    #[test]
    fn product_selection_never_narrows() {
        let rows = vec![record("2025-10-01", "GG_AR_APP_USDT", "", "")];
        let params = FilterParams {
            productos: vec!["PIX Payments".into()],
            ..Default::default()
        };
        assert_eq!(apply_metrics_filters(rows, &params).len(), 1);
    }
}
