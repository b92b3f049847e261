//! Payload validation for inbound requests
//!
//! Every field is checked and all failures are returned together, in field
//! order, so a caller can fix a request in one pass.

use crate::models::{AddTransactionRequest, SpendPointsRequest, ValidatedTransaction};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// ISO-8601 UTC datetime with a `Z` designator and optional fractional seconds
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(-?(?:[1-9][0-9]*)?[0-9]{4})-(1[0-2]|0[1-9])-(3[01]|0[1-9]|[12][0-9])T(2[0-3]|[01][0-9]):([0-5][0-9]):([0-5][0-9])(\.[0-9]+)?Z$",
    )
    .expect("timestamp pattern is valid")
});

/// Render a JSON value the way it appears in error messages (strings unquoted)
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Interpret a JSON value as a whole number of points
fn parse_points(value: &Value, errors: &mut Vec<String>) -> Option<i64> {
    let Value::Number(number) = value else {
        errors.push(format!(
            "Points value: '{}' needs to be a number.",
            display_value(value)
        ));
        return None;
    };

    if let Some(points) = number.as_i64() {
        return Some(points);
    }

    // Accept integral floats such as `1000.0`
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Some(f as i64),
        _ => {
            errors.push(format!(
                "Points value: '{}' needs to be a whole number.",
                number
            ));
            None
        }
    }
}

fn parse_payer(value: &Value, errors: &mut Vec<String>) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        other => {
            errors.push(format!(
                "Payer: '{}' needs to be a non-empty string.",
                display_value(other)
            ));
            None
        }
    }
}

fn parse_timestamp(value: &Value, errors: &mut Vec<String>) -> Option<DateTime<Utc>> {
    let raw = display_value(value);
    let matches = matches!(value, Value::String(s) if TIMESTAMP_REGEX.is_match(s));
    if !matches {
        errors.push(format!(
            "Timestamp: '{}' does not match a valid ISO-8601 DateTime string with Timezone designator.",
            raw
        ));
        return None;
    }

    match DateTime::parse_from_rfc3339(&raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(_) => {
            errors.push(format!(
                "Timestamp: '{}' is not a representable point in time.",
                raw
            ));
            None
        }
    }
}

/// Validate an add-transaction payload
pub fn validate_transaction(
    request: &AddTransactionRequest,
) -> Result<ValidatedTransaction, Vec<String>> {
    let mut errors = Vec::new();

    let payer = parse_payer(&request.payer, &mut errors);
    let points = parse_points(&request.points, &mut errors);
    let timestamp = parse_timestamp(&request.timestamp, &mut errors);

    match (payer, points, timestamp) {
        (Some(payer), Some(points), Some(timestamp)) if errors.is_empty() => {
            Ok(ValidatedTransaction {
                payer,
                points,
                timestamp,
            })
        }
        _ => Err(errors),
    }
}

/// Validate a spend payload; the sign is checked by the ledger
pub fn validate_spend(request: &SpendPointsRequest) -> Result<i64, Vec<String>> {
    let mut errors = Vec::new();
    match parse_points(&request.points, &mut errors) {
        Some(points) => Ok(points),
        None => Err(errors),
    }
}
