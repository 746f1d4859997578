use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::providers::ProviderError;

/// How cell values are rendered in the response.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueRenderOption {
    /// Values as displayed in the UI (always strings).
    #[default]
    FormattedValue,
    /// Raw numbers and booleans, unformatted.
    UnformattedValue,
    Formula,
}

impl ValueRenderOption {
    fn as_str(self) -> &'static str {
        match self {
            ValueRenderOption::FormattedValue => "FORMATTED_VALUE",
            ValueRenderOption::UnformattedValue => "UNFORMATTED_VALUE",
            ValueRenderOption::Formula => "FORMULA",
        }
    }
}

/// Whether the response is organized by rows or by columns.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MajorDimension {
    #[default]
    Rows,
    Columns,
}

impl MajorDimension {
    fn as_str(self) -> &'static str {
        match self {
            MajorDimension::Rows => "ROWS",
            MajorDimension::Columns => "COLUMNS",
        }
    }
}

/// Query options for a `values.get` request.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ReadParams {
    #[serde(default)]
    pub value_render_option: ValueRenderOption,
    #[serde(default)]
    pub major_dimension: MajorDimension,
}

/// Builds the query string pairs for a read.
pub fn construct_params(params: &ReadParams) -> Vec<(String, String)> {
    vec![
        (
            "valueRenderOption".to_string(),
            params.value_render_option.as_str().to_string(),
        ),
        (
            "majorDimension".to_string(),
            params.major_dimension.as_str().to_string(),
        ),
    ]
}

/// Builds `<base>/<spreadsheet_id>/values/<range>`, percent-encoding each segment.
pub fn values_url(base: &str, spreadsheet_id: &str, range: &str) -> Result<Url, ProviderError> {
    if range.trim().is_empty() {
        return Err(ProviderError::Validation("range cannot be empty".into()));
    }
    let mut url = Url::parse(base)
        .map_err(|e| ProviderError::Validation(format!("invalid base url {base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| ProviderError::Validation(format!("base url {base} cannot hold a path")))?
        .pop_if_empty()
        .push(spreadsheet_id)
        .push("values")
        .push(range);
    Ok(url)
}
