//! Shared response envelopes and loose request-field coercion.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ErrorCode;
use crate::validation::{self, RuleSet};

/// Failure payload returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: ErrorCode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationRulesResponse {
    pub success: bool,
    pub rules: &'static [RuleSet],
}

/// Coerce a loosely typed field into trimmed text.
///
/// Strings are trimmed, numbers keep their JSON spelling, anything else
/// (missing, null, bool, array, object) becomes empty.
pub fn loose_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Coerce a loosely typed id. Integral floats such as `2.0` count as
/// integers; anything else unparseable becomes 0 so that the positive-integer
/// check rejects it.
pub fn loose_id(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(integral))
            .unwrap_or(0),
        Value::String(s) => validation::parse_integral(s).unwrap_or(0),
        _ => 0,
    }
}

fn integral(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64)
        .then_some(value as i64)
}

/// Coerce a loosely typed id list; a non-array value yields an empty list.
pub fn loose_ids(value: Option<&Value>) -> Vec<i64> {
    match value {
        Some(Value::Array(items)) => items.iter().map(loose_id).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_loose_text() {
        assert_eq!(loose_text(Some(&json!("  ABC12 "))), "ABC12");
        assert_eq!(loose_text(Some(&json!(9.99))), "9.99");
        assert_eq!(loose_text(Some(&json!(5))), "5");
        assert_eq!(loose_text(Some(&json!(null))), "");
        assert_eq!(loose_text(Some(&json!(true))), "");
        assert_eq!(loose_text(None), "");
    }

    #[test]
    fn test_loose_ids() {
        assert_eq!(loose_ids(Some(&json!([1, "2", " 3 "]))), vec![1, 2, 3]);
        assert_eq!(loose_ids(Some(&json!([1, "x", 2.5, null]))), vec![1, 0, 0, 0]);
        assert_eq!(loose_ids(Some(&json!([2.0, "3.0", " 4 "]))), vec![2, 3, 4]);
        assert_eq!(loose_ids(Some(&json!("1,2"))), Vec::<i64>::new());
        assert_eq!(loose_ids(None), Vec::<i64>::new());
    }
}
