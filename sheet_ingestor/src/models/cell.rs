//! Untyped spreadsheet cells as returned by the values API.

use serde::{Deserialize, Serialize};

/// One row of cells, addressed by column position. Rows may be shorter than
/// the sheet schema: the API drops trailing blank cells.
pub type RawRow = Vec<Cell>;

/// A single spreadsheet cell.
///
/// Formatted reads yield text for every cell; unformatted reads yield numbers
/// and booleans as JSON scalars. `null` maps to [`Cell::Empty`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Cell {
    Bool(bool),
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl Cell {
    /// True for empty cells and for text cells that are empty.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Renders the cell as text. Whole numbers render without a fraction.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => render_number(*n),
            Cell::Bool(b) => b.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

fn render_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
