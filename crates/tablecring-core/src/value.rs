//! Dynamic row and parameter values
//!
//! Rows and query parameters arrive from the embedding application as JSON
//! objects. These helpers give them the truthiness and string coercion rules
//! the rest of the engine relies on.

use serde_json::{Map, Value};

/// One data row: field name to value
pub type Row = Map<String, Value>;

/// Current external filter/query state, and the payload shape of `on_filter`
pub type Params = Map<String, Value>;

/// Returns whether `value` counts as "set".
///
/// `null`, `false`, `0`, `NaN`-like numbers and `""` are falsy. Arrays and
/// objects are always truthy, even when empty.
pub fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
		Value::String(s) => !s.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}

/// Returns whether `value` is a numeric zero.
pub fn is_numeric_zero(value: &Value) -> bool {
	matches!(value, Value::Number(n) if n.as_f64() == Some(0.0))
}

/// Coerces a leaf value to display text.
///
/// Strings and numbers keep their textual form and booleans print as
/// `true`/`false`. `null` and nested structures coerce to the empty string,
/// which the cell renderer turns into the dash sentinel.
pub fn coerce_text(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		Value::Number(n) => n.to_string(),
		Value::Bool(b) => b.to_string(),
		Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
	}
}

/// Extracts the search terms stored under a parameter.
///
/// A scalar parameter yields one term and an array yields one term per
/// scalar element. Empty terms are dropped.
pub fn search_terms(value: &Value) -> Vec<String> {
	let terms = match value {
		Value::String(_) | Value::Number(_) => vec![coerce_text(value)],
		Value::Array(items) => items
			.iter()
			.filter(|item| matches!(item, Value::String(_) | Value::Number(_)))
			.map(coerce_text)
			.collect(),
		Value::Null | Value::Bool(_) | Value::Object(_) => Vec::new(),
	};
	terms.into_iter().filter(|t| !t.is_empty()).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(json!(null), false)]
	#[case(json!(false), false)]
	#[case(json!(0), false)]
	#[case(json!(0.0), false)]
	#[case(json!(""), false)]
	#[case(json!("0"), true)]
	#[case(json!(3), true)]
	#[case(json!([]), true)]
	#[case(json!({}), true)]
	fn test_is_truthy(#[case] value: Value, #[case] expected: bool) {
		assert_eq!(is_truthy(&value), expected);
	}

	#[rstest]
	#[case(json!("abc"), "abc")]
	#[case(json!(150000), "150000")]
	#[case(json!(1.5), "1.5")]
	#[case(json!(true), "true")]
	#[case(json!(null), "")]
	#[case(json!({"a": 1}), "")]
	fn test_coerce_text(#[case] value: Value, #[case] expected: &str) {
		assert_eq!(coerce_text(&value), expected);
	}

	#[rstest]
	fn test_search_terms() {
		assert_eq!(search_terms(&json!("inv")), vec!["inv"]);
		assert_eq!(search_terms(&json!(["a", 2, null, ""])), vec!["a", "2"]);
		assert!(search_terms(&json!({"from": "x"})).is_empty());
		assert!(search_terms(&json!("")).is_empty());
	}
}
