//! Filter field widgets
//!
//! The panel hands every filter to a [`FieldRenderer`]. The engine only
//! supplies name, label, current value and change callbacks; the widget
//! decides how it looks. [`HtmlFieldRenderer`] is a plain HTML widget set
//! that covers every [`FilterKind`].

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tablecring_view::{Callback, ElementView, EventType, IntoView, View, event_handler};

use super::registry::FilterRegistry;
use super::{FilterKind, FlatFilter, SelectOption, ShapeField};
use crate::value::{Params, coerce_text};

/// Keys of a date-range form value
pub const RANGE_START: &str = "start";
/// See [`RANGE_START`]
pub const RANGE_END: &str = "end";

/// Everything a widget needs to render one filter
#[derive(Debug, Clone)]
pub struct FieldProps<'a> {
	/// The filter being rendered
	pub filter: &'a FlatFilter,
	/// Current form value
	pub value: Value,
	/// Replaces the whole value
	pub on_change: Callback<Value>,
	/// Sets one key of an object value (shape fields, range bounds)
	pub on_field_change: Callback<(String, Value)>,
}

impl FieldProps<'_> {
	/// Form key
	pub fn name(&self) -> &str {
		self.filter.name()
	}

	/// Visible label
	pub fn label(&self) -> &str {
		self.filter.display_label()
	}

	/// Filter kind
	pub fn kind(&self) -> &FilterKind {
		self.filter.filter.kind()
	}

	/// Sub-value of an object value as text
	pub fn sub_value(&self, key: &str) -> String {
		self.value.get(key).map(coerce_text).unwrap_or_default()
	}
}

/// Renders one filter input
pub trait FieldRenderer: Send + Sync {
	/// Renders the widget for `props`
	fn render(&self, props: FieldProps<'_>) -> View;
}

/// Plain HTML widgets
#[derive(Debug, Clone, Default)]
pub struct HtmlFieldRenderer {
	id_prefix: String,
}

impl HtmlFieldRenderer {
	/// Creates a renderer whose input ids start with `id_prefix`
	pub fn new(id_prefix: impl Into<String>) -> Self {
		Self {
			id_prefix: id_prefix.into(),
		}
	}

	fn input_id(&self, name: &str) -> String {
		if self.id_prefix.is_empty() {
			format!("filter-{name}")
		} else {
			format!("{}-filter-{name}", self.id_prefix)
		}
	}

	fn text_input(&self, props: &FieldProps<'_>) -> ElementView {
		let on_change = props.on_change.clone();
		ElementView::new("input")
			.attr("type", "text")
			.id(self.input_id(props.name()))
			.attr("name", props.name().to_string())
			.attr("value", coerce_text(&props.value))
			.on(
				EventType::Input,
				event_handler(move |data| {
					on_change.call(Value::String(data.value.clone().unwrap_or_default()))
				}),
			)
	}

	fn select(&self, props: &FieldProps<'_>, options: &[SelectOption]) -> ElementView {
		let current = coerce_text(&props.value);
		let on_change = props.on_change.clone();
		let placeholder = ElementView::new("option").attr("value", "").child("-");
		let options = options.iter().map(|option| {
			let element = ElementView::new("option").attr("value", option.value.clone());
			let element = if option.value == current {
				element.attr("selected", "selected")
			} else {
				element
			};
			element.child(option.label.clone())
		});

		ElementView::new("select")
			.id(self.input_id(props.name()))
			.attr("name", props.name().to_string())
			.child(placeholder)
			.children(options)
			.on(
				EventType::Change,
				event_handler(move |data| {
					on_change.call(Value::String(data.value.clone().unwrap_or_default()))
				}),
			)
	}

	fn autocomplete(
		&self,
		props: &FieldProps<'_>,
		shape: &[ShapeField],
		endpoint: &str,
		keywords: &[String],
	) -> ElementView {
		let shown = shape
			.first()
			.map(|first| props.sub_value(&first.field))
			.unwrap_or_default();
		let mapping = serde_json::to_string(shape).unwrap_or_default();
		let on_field_change = props.on_field_change.clone();
		let shape = shape.to_vec();

		ElementView::new("input")
			.attr("type", "search")
			.id(self.input_id(props.name()))
			.attr("name", props.name().to_string())
			.attr("value", shown)
			.attr("data-endpoint", endpoint.to_string())
			.attr("data-keyword-fields", keywords.join(","))
			.attr("data-shape", mapping)
			.on(
				EventType::Change,
				event_handler(move |data| {
					let Some(raw) = data.value.as_deref() else {
						return;
					};
					match serde_json::from_str::<Value>(raw) {
						Ok(result) => {
							for (field, value) in shape_values(&shape, &result) {
								on_field_change.call((field, value));
							}
						}
						Err(error) => {
							tracing::debug!(%error, "ignored malformed autocomplete result");
						}
					}
				}),
			)
	}

	fn date_input(
		&self,
		id: String,
		name: String,
		value: String,
		bounds: (Option<String>, Option<String>),
		on_change: Callback<Value>,
	) -> ElementView {
		ElementView::new("input")
			.attr("type", "date")
			.id(id)
			.attr("name", name)
			.attr("value", value)
			.attr_opt("min", bounds.0)
			.attr_opt("max", bounds.1)
			.on(
				EventType::Change,
				event_handler(move |data| {
					on_change.call(Value::String(data.value.clone().unwrap_or_default()))
				}),
			)
	}
}

impl FieldRenderer for HtmlFieldRenderer {
	fn render(&self, props: FieldProps<'_>) -> View {
		let input_id = self.input_id(props.name());
		let widget = match props.kind() {
			FilterKind::Text => self.text_input(&props).into_view(),
			FilterKind::Select { options } => self.select(&props, options).into_view(),
			FilterKind::Autocomplete(spec) => self
				.autocomplete(
					&props,
					&spec.shape,
					&spec.service.endpoint,
					&spec.service.keyword_fields,
				)
				.into_view(),
			FilterKind::Date(spec) => self
				.date_input(
					input_id.clone(),
					props.name().to_string(),
					coerce_text(&props.value),
					(html_date(spec.min), html_date(spec.max)),
					props.on_change.clone(),
				)
				.into_view(),
			FilterKind::DateRange(spec) => {
				let bound = |key: &'static str| {
					let on_field_change = props.on_field_change.clone();
					self.date_input(
						format!("{input_id}-{key}"),
						format!("{}[{key}]", props.name()),
						props.sub_value(key),
						(html_date(spec.min), html_date(spec.max)),
						Callback::new(move |value: Value| {
							on_field_change.call((key.to_string(), value))
						}),
					)
				};
				ElementView::new("div")
					.class("tablecring-date-range")
					.child(bound(RANGE_START))
					.child(bound(RANGE_END))
					.into_view()
			}
		};

		ElementView::new("div")
			.class(format!("tablecring-field tablecring-field-{}", props.kind().tag()))
			.child(
				ElementView::new("label")
					.attr("for", input_id)
					.child(props.label().to_string()),
			)
			.child(widget)
			.into_view()
	}
}

// `<input type="date">` bounds are always ISO dates, whatever the submit format.
fn html_date(date: Option<NaiveDate>) -> Option<String> {
	date.map(|d| d.format("%Y-%m-%d").to_string())
}

/// Translates one search result into flat form values through the shape mapping.
///
/// Missing result fields become `""`.
pub fn shape_values(shape: &[ShapeField], result: &Value) -> Params {
	shape
		.iter()
		.map(|mapping| {
			let value = result
				.get(&mapping.from)
				.cloned()
				.unwrap_or_else(|| Value::String(String::new()));
			(mapping.field.clone(), value)
		})
		.collect::<Map<String, Value>>()
}

/// Renders the fields of the open panel, wired to the registry's form store.
pub fn render_panel_fields(registry: &FilterRegistry, renderer: &dyn FieldRenderer) -> Vec<View> {
	registry
		.panel_filters()
		.into_iter()
		.map(|flat| {
			let store = registry.store().clone();
			let value = store
				.get(flat.name())
				.unwrap_or_else(|| Value::String(String::new()));

			let on_change = {
				let store = store.clone();
				let name = flat.name().to_string();
				Callback::new(move |value: Value| store.set_field(&name, value))
			};
			let on_field_change = {
				let name = flat.name().to_string();
				Callback::new(move |(field, value): (String, Value)| {
					store.set_shape_field(&name, &field, value)
				})
			};

			renderer.render(FieldProps {
				filter: flat,
				value,
				on_change,
				on_field_change,
			})
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::column::{Column, merge_columns};
	use crate::filter::{AutocompleteSpec, DateSpec, Filter, OpenRequest, SearchService};
	use serde_json::json;
	use tablecring_view::EventData;

	fn registry() -> FilterRegistry {
		let columns = merge_columns(vec![
			Column::new("status", "Status").filter(Filter::select(
				"status",
				[
					SelectOption::new("Paid", "paid"),
					SelectOption::new("Failed", "failed"),
				],
			)),
			Column::new("merchant", "Merchant").filter(Filter::autocomplete(
				"merchant",
				AutocompleteSpec {
					service: SearchService {
						endpoint: "/api/merchants".to_string(),
						keyword_fields: vec!["name".to_string(), "code".to_string()],
					},
					shape: vec![
						ShapeField::new("merchant_name", "name"),
						ShapeField::new("merchant_id", "id"),
					],
				},
			)),
			Column::new("created", "Created").filter(Filter::date_range(
				"created",
				DateSpec {
					min: NaiveDate::from_ymd_opt(2024, 1, 1),
					..DateSpec::default()
				},
			)),
		]);
		FilterRegistry::new(&columns, Params::new())
	}

	fn open(registry: &mut FilterRegistry, column: &str) -> View {
		registry.on_open(OpenRequest::open(format!("t-{column}"), column));
		View::fragment(render_panel_fields(registry, &HtmlFieldRenderer::new("t")))
	}

	#[test]
	fn test_closed_panel_renders_nothing() {
		let registry = registry();
		assert!(render_panel_fields(&registry, &HtmlFieldRenderer::default()).is_empty());
	}

	#[test]
	fn test_select_change_writes_store() {
		let mut registry = registry();
		let view = open(&mut registry, "status");

		let select = view.find_by_id("t-filter-status").unwrap();
		assert_eq!(select.tag_name(), "select");
		select.fire(EventType::Change, &EventData::with_value("failed"));

		assert_eq!(registry.form().get("status"), Some(&json!("failed")));
	}

	#[test]
	fn test_autocomplete_passes_service_through() {
		let mut registry = registry();
		let view = open(&mut registry, "merchant");

		let input = view.find_by_id("t-filter-merchant").unwrap();
		assert_eq!(input.get_attr("data-endpoint"), Some("/api/merchants"));
		assert_eq!(input.get_attr("data-keyword-fields"), Some("name,code"));

		input.fire(
			EventType::Change,
			&EventData::with_value(r#"{"id": "m-7", "name": "Acme"}"#),
		);
		assert_eq!(
			registry.form().get("merchant"),
			Some(&json!({"merchant_name": "Acme", "merchant_id": "m-7"}))
		);
	}

	#[test]
	fn test_date_range_renders_two_bounded_inputs() {
		let mut registry = registry();
		let view = open(&mut registry, "created");

		let start = view.find_by_id("t-filter-created-start").unwrap();
		assert_eq!(start.get_attr("min"), Some("2024-01-01"));
		assert!(view.find_by_id("t-filter-created-end").is_some());

		start.fire(EventType::Change, &EventData::with_value("2024-02-01"));
		assert_eq!(registry.form().get("created"), Some(&json!({"start": "2024-02-01"})));
	}

	#[test]
	fn test_shape_values_fills_missing_with_empty() {
		let shape = vec![ShapeField::new("merchant_id", "id")];
		assert_eq!(shape_values(&shape, &json!({}))["merchant_id"], json!(""));
	}
}
