//! Filter registry behaviour: panel exclusivity, submit payloads, scrubbing

use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use rstest::*;
use serde_json::{Value, json};
use tablecring_core::column::{Column, JoinedColumn, merge_columns};
use tablecring_core::filter::{
	AutocompleteSpec, DateSpec, Filter, FilterRegistry, OpenRequest, PanelState, SearchService,
	ShapeField, scrub_payload,
};
use tablecring_core::value::Params;
use tablecring_view::Callback;

type Submitted = Arc<Mutex<Vec<Params>>>;

fn params(value: Value) -> Params {
	value.as_object().cloned().unwrap_or_default()
}

#[fixture]
fn columns() -> Vec<JoinedColumn> {
	merge_columns(vec![
		Column::new("id", "Invoice").filter(Filter::text("id")),
		Column::new("merchant", "Merchant").filter(Filter::autocomplete(
			"merchant",
			AutocompleteSpec {
				service: SearchService {
					endpoint: "/api/merchants".to_string(),
					keyword_fields: vec!["name".to_string()],
				},
				shape: vec![
					ShapeField::new("merchant_id", "id"),
					ShapeField::new("merchant_name", "name"),
				],
			},
		)),
		Column::new("created", "Created").filter(Filter::date_range("created", DateSpec::default())),
	])
}

#[fixture]
fn submitted() -> Submitted {
	Arc::new(Mutex::new(Vec::new()))
}

fn registry(columns: &[JoinedColumn], current: Params, submitted: &Submitted) -> FilterRegistry {
	let sink = Arc::clone(submitted);
	FilterRegistry::new(columns, current)
		.with_on_filter(Callback::new(move |payload: Params| sink.lock().unwrap().push(payload)))
}

#[rstest]
fn test_submit_resets_page(columns: Vec<JoinedColumn>, submitted: Submitted) {
	let mut registry = registry(&columns, params(json!({"page": 7, "id": "inv"})), &submitted);
	registry.on_open(OpenRequest::open("t-id", "id"));
	registry.set_field("id", json!("inv-42"));

	registry.on_submit(None);

	let payloads = submitted.lock().unwrap();
	assert_eq!(payloads.len(), 1);
	assert_eq!(payloads[0]["page"], json!(1));
	assert_eq!(payloads[0]["id"], json!("inv-42"));
	assert_eq!(registry.panel(), &PanelState::Closed);
}

#[rstest]
fn test_submit_scrubs_empty_objects_keeps_empty_scalars(
	columns: Vec<JoinedColumn>,
	submitted: Submitted,
) {
	let mut registry = registry(&columns, Params::new(), &submitted);
	registry.on_submit(None);

	let payload = &submitted.lock().unwrap()[0];
	assert_eq!(payload.get("id"), Some(&json!("")));
	assert!(!payload.contains_key("merchant"));
	// date range defaults to "" until a bound is picked
	assert_eq!(payload.get("created"), Some(&json!("")));
}

#[rstest]
fn test_opening_second_panel_resets_first(columns: Vec<JoinedColumn>, submitted: Submitted) {
	let mut registry = registry(&columns, Params::new(), &submitted);
	registry.on_open(OpenRequest::open("t-id", "id"));
	registry.set_field("id", json!("half typed"));

	registry.on_open(OpenRequest::open("t-merchant", "merchant"));

	assert_eq!(
		registry.panel(),
		&PanelState::Open {
			trigger_id: "t-merchant".to_string(),
			column_name: "merchant".to_string(),
		}
	);
	assert_eq!(registry.form().get("id"), Some(&json!("")));
	let shown: Vec<&str> = registry.panel_filters().iter().map(|f| f.name()).collect();
	assert_eq!(shown, vec!["merchant"]);
}

#[rstest]
fn test_stale_column_shows_no_filters(columns: Vec<JoinedColumn>, submitted: Submitted) {
	let mut registry = registry(&columns, Params::new(), &submitted);
	registry.on_open(OpenRequest::open("t-gone", "gone"));
	assert!(registry.panel().is_open());
	assert!(registry.panel_filters().is_empty());
}

#[rstest]
fn test_autocomplete_values_submit_when_set(columns: Vec<JoinedColumn>, submitted: Submitted) {
	let mut registry = registry(&columns, Params::new(), &submitted);
	registry.on_open(OpenRequest::open("t-merchant", "merchant"));
	registry
		.store()
		.set_shape_field("merchant", "merchant_id", json!("m-1"));

	registry.on_submit(Some(params(json!({"sort": "desc"}))));

	let payload = &submitted.lock().unwrap()[0];
	assert_eq!(payload["merchant"], json!({"merchant_id": "m-1", "merchant_name": ""}));
	assert_eq!(payload["sort"], json!("desc"));
	assert_eq!(payload["page"], json!(1));
}

#[rstest]
fn test_params_change_reseeds_form(columns: Vec<JoinedColumn>, submitted: Submitted) {
	let mut registry = registry(&columns, Params::new(), &submitted);
	assert_eq!(registry.form().get("id"), Some(&json!("")));

	registry.sync_params(&params(json!({"id": "inv-9"})));
	assert_eq!(registry.form().get("id"), Some(&json!("inv-9")));
}

fn leaf() -> impl Strategy<Value = Value> {
	prop_oneof![
		Just(Value::Null),
		Just(json!("")),
		Just(json!(0)),
		Just(json!(false)),
		"[a-z]{1,4}".prop_map(Value::from),
		(1i64..100).prop_map(Value::from),
	]
}

fn field() -> impl Strategy<Value = Value> {
	prop_oneof![
		leaf(),
		prop::collection::btree_map("[a-z]{1,3}", leaf(), 0..4)
			.prop_map(|m| Value::Object(m.into_iter().collect())),
	]
}

proptest! {
	#[test]
	fn test_scrub_law(payload in prop::collection::btree_map("[a-z]{1,5}", field(), 0..8)) {
		let payload: Params = payload.into_iter().collect();
		let scrubbed = scrub_payload(payload.clone(), false);

		for (name, value) in &payload {
			match value {
				Value::Object(fields) if fields.values().all(|v| !tablecring_core::value::is_truthy(v)) => {
					prop_assert!(!scrubbed.contains_key(name));
				}
				_ => prop_assert_eq!(scrubbed.get(name), Some(value)),
			}
		}
	}
}
