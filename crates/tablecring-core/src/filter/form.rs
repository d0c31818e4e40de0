//! Filter form state
//!
//! The form holds one value per filter name: `""` for scalar filters, or an
//! object with one key per shape field for autocomplete filters. It is
//! seeded from the current query parameters and shared with field widgets
//! through a [`FormStore`].

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Map, Value};

use super::{FilterKind, FlatFilter};
use crate::value::{Params, is_numeric_zero, is_truthy};

/// Values of every filter input, keyed by filter name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterFormState(Params);

impl FilterFormState {
	/// Creates an empty form
	pub fn new() -> Self {
		Self::default()
	}

	/// Value of one filter
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.0.get(name)
	}

	/// Replaces the value of one filter
	pub fn set(&mut self, name: impl Into<String>, value: Value) {
		self.0.insert(name.into(), value);
	}

	/// Sets one shape field inside an object-valued filter.
	///
	/// A non-object value is replaced by an object first.
	pub fn set_shape_field(&mut self, name: &str, field: impl Into<String>, value: Value) {
		let entry = self
			.0
			.entry(name.to_string())
			.or_insert_with(|| Value::Object(Map::new()));
		if !entry.is_object() {
			*entry = Value::Object(Map::new());
		}
		if let Value::Object(fields) = entry {
			fields.insert(field.into(), value);
		}
	}

	/// All values in filter declaration order
	pub fn values(&self) -> &Params {
		&self.0
	}

	/// Consumes the form into a parameter map
	pub fn into_params(self) -> Params {
		self.0
	}

	/// Number of filter values
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if the form has no values
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// Empty value of one filter
pub fn default_value(kind: &FilterKind) -> Value {
	match kind {
		FilterKind::Autocomplete(spec) => Value::Object(
			spec.shape
				.iter()
				.map(|shape| (shape.field.clone(), Value::String(String::new())))
				.collect(),
		),
		FilterKind::Text
		| FilterKind::Select { .. }
		| FilterKind::Date(_)
		| FilterKind::DateRange(_) => Value::String(String::new()),
	}
}

/// Builds the initial form: empty defaults overridden by truthy params.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tablecring_core::column::{Column, merge_columns};
/// use tablecring_core::filter::{Filter, build_form_defaults, flatten_filters};
///
/// let columns = merge_columns(vec![
///     Column::new("status", "Status").filter(Filter::text("status")),
///     Column::new("id", "ID").filter(Filter::text("id")),
/// ]);
/// let params = json!({"status": "paid", "id": ""});
///
/// let form = build_form_defaults(&flatten_filters(&columns), params.as_object().unwrap());
/// assert_eq!(form.get("status"), Some(&json!("paid")));
/// assert_eq!(form.get("id"), Some(&json!("")));
/// ```
pub fn build_form_defaults(filters: &[FlatFilter], params: &Params) -> FilterFormState {
	let mut form = FilterFormState::new();
	for flat in filters {
		let value = params
			.get(flat.name())
			.filter(|value| is_truthy(value))
			.cloned()
			.unwrap_or_else(|| default_value(flat.filter.kind()));
		form.set(flat.name(), value);
	}
	form
}

/// Drops every object or array value whose entries are all falsy.
///
/// Scalar values, including empty strings, are kept verbatim. With
/// `keeps_zero` a numeric `0` entry counts as set, so an amount range
/// `{"min": 0, "max": ""}` survives.
pub fn scrub_payload(payload: Params, keeps_zero: bool) -> Params {
	payload
		.into_iter()
		.filter(|(name, value)| {
			let empty = is_empty_container(value, keeps_zero);
			if empty {
				tracing::trace!(filter = %name, "scrubbed empty filter value");
			}
			!empty
		})
		.collect()
}

fn is_empty_container(value: &Value, keeps_zero: bool) -> bool {
	let unset = |entry: &Value| !is_truthy(entry) && !(keeps_zero && is_numeric_zero(entry));
	match value {
		Value::Object(fields) => fields.values().all(unset),
		Value::Array(items) => items.iter().all(unset),
		Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => false,
	}
}

/// Shared, mutable handle on the form, given to field widgets
#[derive(Debug, Clone, Default)]
pub struct FormStore {
	inner: Arc<Mutex<FilterFormState>>,
}

impl FormStore {
	/// Creates a store holding `state`
	pub fn new(state: FilterFormState) -> Self {
		Self {
			inner: Arc::new(Mutex::new(state)),
		}
	}

	/// Copy of the current form
	pub fn snapshot(&self) -> FilterFormState {
		self.inner.lock().clone()
	}

	/// Value of one filter
	pub fn get(&self, name: &str) -> Option<Value> {
		self.inner.lock().get(name).cloned()
	}

	/// Replaces the whole form
	pub fn replace(&self, state: FilterFormState) {
		*self.inner.lock() = state;
	}

	/// Writes one filter value
	pub fn set_field(&self, name: &str, value: Value) {
		tracing::trace!(filter = %name, "form field updated");
		self.inner.lock().set(name, value);
	}

	/// Writes one shape field of an object-valued filter
	pub fn set_shape_field(&self, name: &str, field: &str, value: Value) {
		tracing::trace!(filter = %name, field = %field, "form shape field updated");
		self.inner.lock().set_shape_field(name, field, value);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::filter::{AutocompleteSpec, DateSpec, Filter, SearchService, ShapeField};
	use rstest::rstest;
	use serde_json::json;

	fn flat(filter: Filter) -> FlatFilter {
		FlatFilter {
			filter,
			name_from: "owner".to_string(),
		}
	}

	fn merchant_filter() -> Filter {
		Filter::autocomplete(
			"merchant",
			AutocompleteSpec {
				service: SearchService {
					endpoint: "/merchants".to_string(),
					keyword_fields: vec!["name".to_string()],
				},
				shape: vec![
					ShapeField::new("merchant_id", "id"),
					ShapeField::new("merchant_name", "name"),
				],
			},
		)
	}

	#[rstest]
	fn test_autocomplete_default_is_shape_object() {
		let form = build_form_defaults(&[flat(merchant_filter())], &Params::new());
		assert_eq!(
			form.get("merchant"),
			Some(&json!({"merchant_id": "", "merchant_name": ""}))
		);
	}

	#[rstest]
	fn test_truthy_param_overrides_default() {
		let params = json!({"merchant": {"merchant_id": "m1", "merchant_name": "Acme"}});
		let form = build_form_defaults(&[flat(merchant_filter())], params.as_object().unwrap());
		assert_eq!(form.get("merchant"), Some(&params["merchant"]));
	}

	#[rstest]
	fn test_falsy_param_keeps_default() {
		let params = json!({"created": 0});
		let form = build_form_defaults(
			&[flat(Filter::date("created", DateSpec::default()))],
			params.as_object().unwrap(),
		);
		assert_eq!(form.get("created"), Some(&json!("")));
	}

	#[rstest]
	fn test_scrub_removes_all_falsy_objects_only() {
		let payload = json!({
			"merchant": {"merchant_id": "", "merchant_name": ""},
			"period": {"start": "2024-01-01", "end": ""},
			"status": "",
			"tags": [],
			"page": 1
		});

		let scrubbed = scrub_payload(payload.as_object().unwrap().clone(), false);
		assert!(!scrubbed.contains_key("merchant"));
		assert!(!scrubbed.contains_key("tags"));
		assert_eq!(scrubbed["status"], json!(""));
		assert_eq!(scrubbed["period"]["start"], json!("2024-01-01"));
		assert_eq!(scrubbed["page"], json!(1));
	}

	#[rstest]
	#[case(false, false)]
	#[case(true, true)]
	fn test_scrub_numeric_zero(#[case] keeps_zero: bool, #[case] kept: bool) {
		let payload = json!({"amount": {"min": 0, "max": ""}});
		let scrubbed = scrub_payload(payload.as_object().unwrap().clone(), keeps_zero);
		assert_eq!(scrubbed.contains_key("amount"), kept);
	}

	#[rstest]
	fn test_set_shape_field_replaces_scalar() {
		let mut form = FilterFormState::new();
		form.set("merchant", json!(""));
		form.set_shape_field("merchant", "merchant_id", json!("m9"));
		assert_eq!(form.get("merchant"), Some(&json!({"merchant_id": "m9"})));
	}

	#[rstest]
	fn test_store_clones_share_state() {
		let store = FormStore::default();
		let widget_handle = store.clone();
		widget_handle.set_field("status", json!("paid"));
		assert_eq!(store.get("status"), Some(json!("paid")));
	}
}
