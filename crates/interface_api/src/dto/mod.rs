//! Request and response bodies

pub mod loans;
pub mod pnl;
pub mod progress;

use serde::{Deserialize, Deserializer};
use validator::Validate;

use crate::error::ApiError;

/// Runs the `validator` rules of a request body
pub fn validated<T: Validate>(request: T) -> Result<T, ApiError> {
    request.validate()?;
    Ok(request)
}

/// Accepts a JSON number or string and keeps its text for form parsing
pub(crate) fn number_or_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(serde_json::Number),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(number) => number.to_string(),
        Raw::Text(text) => text,
    })
}

/// Optional variant of [`number_or_text`]; `null` and absence read as empty
pub(crate) fn optional_number_or_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(serde_json::Number),
        Text(String),
        Null,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(number) => number.to_string(),
        Raw::Text(text) => text,
        Raw::Null => String::new(),
    })
}
