use serde_json::Value;
use time::OffsetDateTime;

use crate::dates;
use crate::error::{AppError, AppResult};

/// Blank text counts as absent
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Require a non-blank text field
pub fn validate_required(field: &str, value: Option<String>) -> AppResult<String> {
    present(value).ok_or_else(|| AppError::Validation(format!("{} is required", field)))
}

/// Accept a JSON number or a numeric string. Null, blank and zero count as absent.
pub fn coerce_int(field: &str, value: Option<&Value>) -> AppResult<Option<i32>> {
    let invalid = || AppError::Validation(format!("{} must be a number", field));

    let number = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(n) => n,
            None => {
                let f = n.as_f64().ok_or_else(invalid)?;
                if f.fract() != 0.0 {
                    return Err(invalid());
                }
                f as i64
            }
        },
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| invalid())?,
        Some(_) => return Err(invalid()),
    };

    if number == 0 {
        return Ok(None);
    }
    i32::try_from(number).map(Some).map_err(|_| invalid())
}

/// Accept an RFC 3339 timestamp or a date-only string; blank counts as absent
pub fn coerce_date(field: &str, value: Option<String>) -> AppResult<Option<OffsetDateTime>> {
    match present(value) {
        None => Ok(None),
        Some(raw) => dates::parse_flexible(&raw)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("{} is not a valid date: {}", field, raw))),
    }
}
