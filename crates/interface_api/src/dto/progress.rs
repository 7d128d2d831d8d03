//! Monthly progress DTOs

use core_kernel::MonthKey;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ProgressDeltaRequest {
    /// Signed change, e.g. `-250.5`
    #[serde(with = "rust_decimal::serde::float")]
    pub delta: Decimal,
}

/// Query of `GET /progress/:month`
#[derive(Debug, Default, Deserialize)]
pub struct ProgressQuery {
    /// Goal the percentage is measured against, as typed
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub month: MonthKey,
    #[serde(with = "rust_decimal::serde::float")]
    pub progress: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<u32>,
}
