use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Query-string extractor where the first occurrence of a repeated key wins
/// (`?pais=AR&pais=BR` reads `AR`). Malformed input is rejected with
/// [`ApiError::BadRequest`] so it renders like every other failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstValueQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for FirstValueQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        parse_pairs(pairs).map(FirstValueQuery)
    }
}

fn parse_pairs<T: DeserializeOwned>(pairs: Vec<(String, String)>) -> Result<T, ApiError> {
    let mut fields = Map::new();
    for (key, value) in pairs {
        fields.entry(key).or_insert(Value::String(value));
    }
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| ApiError::BadRequest(format!("Invalid query parameter: {e}")))
}
