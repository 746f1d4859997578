//! Row normalization: untyped cells → typed records.
//!
//! Every field has a fallback, so normalization never fails:
//! - text fields default to `""`;
//! - integer fields parse the leading integer of the cell (`"12.7"` → 12,
//!   `" 42 installs"` → 42) and fall back to 0;
//! - float fields parse the leading decimal literal (`"3.5 USD"` → 3.5) and
//!   fall back to 0;
//! - NaN, infinite and negative results become 0;
//! - cells past the end of a short row are treated as blank.
//!
//! The batch helpers keep "the sheet had no rows" distinguishable from "the
//! sheet had rows full of zeros": [`normalize_performance_rows`] returns `None`
//! for the former.

use tracing::debug;

use crate::models::{
    Cell, CreativeRecord, PerformanceRecord, RawRow,
    creative::{CREATIVE_COLUMNS, DEFAULT_CREATIVE_STATUS},
    performance::PERFORMANCE_COLUMNS,
};

/// Normalizes a batch of MASTER rows.
///
/// Returns `None` when the source produced no rows at all.
pub fn normalize_performance_rows(rows: Option<Vec<RawRow>>) -> Option<Vec<PerformanceRecord>> {
    match rows {
        Some(rows) if !rows.is_empty() => {
            log_row_shape("MASTER", &rows, PERFORMANCE_COLUMNS);
            Some(rows.iter().map(|row| normalize_performance_row(row)).collect())
        }
        _ => None,
    }
}

/// Normalizes a batch of CREATIVES rows. An absent sheet is just an empty list.
pub fn normalize_creative_rows(rows: Option<Vec<RawRow>>) -> Vec<CreativeRecord> {
    let rows = rows.unwrap_or_default();
    log_row_shape("CREATIVES", &rows, CREATIVE_COLUMNS);
    rows.iter().map(|row| normalize_creative_row(row)).collect()
}

/// Rows wider than the schema or entirely blank are still normalized; they
/// usually mean the sheet layout drifted.
fn log_row_shape(sheet: &str, rows: &[RawRow], columns: usize) {
    let wide = rows.iter().filter(|row| row.len() > columns).count();
    let blank = rows.iter().filter(|row| row.iter().all(Cell::is_blank)).count();
    if wide > 0 || blank > 0 {
        debug!(sheet, columns, wide, blank, "rows outside the expected layout");
    }
}

/// Maps one MASTER row (columns `A..U`) onto a [`PerformanceRecord`].
pub fn normalize_performance_row(row: &[Cell]) -> PerformanceRecord {
    let cols = Columns(row);
    PerformanceRecord {
        date: cols.text(0),
        account_id: cols.text(1),
        account_name: cols.text(2),
        campaign_id: cols.text(3),
        campaign_name: cols.text(4),
        campaign_type: cols.text(5),
        source_medium: cols.text(6),
        channel_group: cols.text(7),
        country: cols.text(8),
        cost: cols.float(9),
        impressions: cols.int(10),
        clicks: cols.int(11),
        installs: cols.int(12),
        registration_complete: cols.int(13),
        usd_savings_onboarding_completed: cols.int(14),
        local_card_payment_completed: cols.int(15),
        global_card_payment_completed: cols.int(16),
        currency_exchange_completed: cols.int(17),
        platform: cols.text(18),
        ftt: cols.int(19),
        crypto_transfer: cols.int(20),
    }
}

/// Maps one CREATIVES row onto a [`CreativeRecord`].
pub fn normalize_creative_row(row: &[Cell]) -> CreativeRecord {
    let cols = Columns(row);
    let status = cols.text(9);
    CreativeRecord {
        creative_id: cols.text(0),
        creative_name: cols.text(1),
        image_url: cols.text(2),
        campaign_name: cols.text(3),
        campaign_id: cols.text(4),
        platform: cols.text(5),
        product: cols.text(6),
        country: cols.text(7),
        stage: cols.text(8),
        status: if status.is_empty() {
            DEFAULT_CREATIVE_STATUS.to_string()
        } else {
            status
        },
        date_created: cols.text(10),
        notes: cols.text(11),
    }
}

/// Positional accessor that treats missing columns as blank cells.
struct Columns<'a>(&'a [Cell]);

impl Columns<'_> {
    fn cell(&self, idx: usize) -> &Cell {
        const BLANK: &Cell = &Cell::Empty;
        self.0.get(idx).unwrap_or(BLANK)
    }

    fn text(&self, idx: usize) -> String {
        self.cell(idx).to_text()
    }

    fn float(&self, idx: usize) -> f64 {
        match self.cell(idx) {
            Cell::Number(n) => sanitize(*n),
            Cell::Text(s) => parse_float_or_zero(s),
            Cell::Bool(_) | Cell::Empty => 0.0,
        }
    }

    fn int(&self, idx: usize) -> u64 {
        match self.cell(idx) {
            Cell::Number(n) => sanitize(n.trunc()) as u64,
            Cell::Text(s) => parse_int_or_zero(s),
            Cell::Bool(_) | Cell::Empty => 0,
        }
    }
}

fn sanitize(n: f64) -> f64 {
    if n.is_finite() && n > 0.0 { n } else { 0.0 }
}

/// Parses the leading decimal literal of `raw`; anything unusable is 0.
pub fn parse_float_or_zero(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    end += count_digits(&bytes[end..]);
    let mut mantissa_digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_digits = count_digits(&bytes[end + 1..]);
        // "5." is a valid literal; a lone "." is not.
        if mantissa_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
            mantissa_digits += frac_digits;
        }
    }
    if mantissa_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().map(sanitize).unwrap_or(0.0)
}

/// Parses the leading integer of `raw`; anything unusable is 0.
pub fn parse_int_or_zero(raw: &str) -> u64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let negative = bytes.first() == Some(&b'-');
    let start = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = count_digits(&bytes[start..]);
    if digits == 0 || negative {
        return 0;
    }
    // Overlong values saturate instead of wrapping.
    s[start..start + digits].parse::<u64>().unwrap_or(u64::MAX)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(cells: &[&str]) -> RawRow {
        cells.iter().map(|c| Cell::from(*c)).collect()
    }

    #[test]
    fn float_parsing_follows_leading_literal() {
        assert_eq!(parse_float_or_zero("12.5"), 12.5);
        assert_eq!(parse_float_or_zero("  3.5 USD"), 3.5);
        assert_eq!(parse_float_or_zero("1e3"), 1000.0);
        assert_eq!(parse_float_or_zero("2e"), 2.0);
        assert_eq!(parse_float_or_zero(".75"), 0.75);
        assert_eq!(parse_float_or_zero("abc"), 0.0);
        assert_eq!(parse_float_or_zero(""), 0.0);
        assert_eq!(parse_float_or_zero("."), 0.0);
        assert_eq!(parse_float_or_zero("-4.2"), 0.0);
        assert_eq!(parse_float_or_zero("1e999"), 0.0);
    }

    #[test]
    fn int_parsing_truncates_and_clamps() {
        assert_eq!(parse_int_or_zero("12.7"), 12);
        assert_eq!(parse_int_or_zero(" 42 installs"), 42);
        assert_eq!(parse_int_or_zero("+7"), 7);
        assert_eq!(parse_int_or_zero("1,234"), 1);
        assert_eq!(parse_int_or_zero("-3"), 0);
        assert_eq!(parse_int_or_zero("n/a"), 0);
        assert_eq!(parse_int_or_zero("99999999999999999999999"), u64::MAX);
    }

    #[test]
    fn full_master_row_maps_by_position() {
        let row = text_row(&[
            "2025-10-20", "acc-1", "Main", "c-1", "GG_AR_APP_GLOBALCARD", "UAC", "google / cpc",
            "Paid", "AR", "150.75", "10000", "300", "45", "12", "3", "2", "4", "1", "Google Ads",
            "5", "6",
        ]);
        let rec = normalize_performance_row(&row);
        assert_eq!(rec.date, "2025-10-20");
        assert_eq!(rec.campaign_name, "GG_AR_APP_GLOBALCARD");
        assert_eq!(rec.country, "AR");
        assert_eq!(rec.cost, 150.75);
        assert_eq!(rec.impressions, 10_000);
        assert_eq!(rec.clicks, 300);
        assert_eq!(rec.installs, 45);
        assert_eq!(rec.registration_complete, 12);
        assert_eq!(rec.usd_savings_onboarding_completed, 3);
        assert_eq!(rec.local_card_payment_completed, 2);
        assert_eq!(rec.global_card_payment_completed, 4);
        assert_eq!(rec.currency_exchange_completed, 1);
        assert_eq!(rec.platform, "Google Ads");
        assert_eq!(rec.ftt, 5);
        assert_eq!(rec.crypto_transfer, 6);
    }

    #[test]
    fn short_and_malformed_rows_default_every_field() {
        let rec = normalize_performance_row(&text_row(&["2025-10-20", "", "", "c-9", "FB_BR_CONS"]));
        assert_eq!(rec.campaign_name, "FB_BR_CONS");
        assert_eq!(rec.cost, 0.0);
        assert_eq!(rec.installs, 0);
        assert_eq!(rec.platform, "");

        let mut row = vec![Cell::Empty; 21];
        row[9] = Cell::from("N/A");
        row[12] = Cell::Number(f64::NAN);
        row[13] = Cell::Number(7.9);
        row[18] = Cell::Bool(true);
        let rec = normalize_performance_row(&row);
        assert_eq!(rec.cost, 0.0);
        assert_eq!(rec.installs, 0);
        assert_eq!(rec.registration_complete, 7);
        assert_eq!(rec.platform, "true");
    }

    #[test]
    fn creative_status_defaults_to_active() {
        let rec = normalize_creative_row(&text_row(&["cr-1", "Hero", "https://img", "GG_AR_APP"]));
        assert_eq!(rec.creative_id, "cr-1");
        assert_eq!(rec.campaign_name, "GG_AR_APP");
        assert_eq!(rec.status, "active");
        assert_eq!(rec.notes, "");

        let mut cells = text_row(&["cr-2", "", "", "X", "", "", "", "", "", "paused"]);
        cells.push(Cell::from("2025-09-01"));
        let rec = normalize_creative_row(&cells);
        assert_eq!(rec.status, "paused");
        assert_eq!(rec.date_created, "2025-09-01");
    }

    #[test]
    fn empty_source_is_distinct_from_zero_rows() {
        assert_eq!(normalize_performance_rows(None), None);
        assert_eq!(normalize_performance_rows(Some(vec![])), None);

        let zeros = normalize_performance_rows(Some(vec![vec![Cell::Empty; 21]])).unwrap();
        assert_eq!(zeros.len(), 1);
        assert_eq!(zeros[0], PerformanceRecord::default());

        assert!(normalize_creative_rows(None).is_empty());
    }

    #[test]
    fn rows_outside_the_layout_still_normalize() {
        let mut wide = vec![Cell::Empty; PERFORMANCE_COLUMNS + 3];
        wide[4] = Cell::from("GG_AR_APP");
        wide[PERFORMANCE_COLUMNS] = Cell::from("999");
        let blank = vec![Cell::from(""); 4];

        let records = normalize_performance_rows(Some(vec![wide, blank])).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].campaign_name, "GG_AR_APP");
        assert_eq!(records[0].crypto_transfer, 0);
        assert_eq!(records[1], PerformanceRecord::default());

        let creatives = normalize_creative_rows(Some(vec![vec![Cell::Empty; CREATIVE_COLUMNS + 1]]));
        assert_eq!(creatives[0].status, "active");
    }
}
