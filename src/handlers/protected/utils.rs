use chrono::NaiveDate;

use crate::error::ApiError;

/// Parse a required `YYYY-MM-DD` value
pub fn parse_date(raw: Option<&str>) -> Result<NaiveDate, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation("A date is required"))?;

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::validation(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}
