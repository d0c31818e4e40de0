//! Filter registry
//!
//! Owns the flattened filter list, the form store and the single panel
//! state of one table. Only one filter panel can be open at a time; that
//! is a property of [`PanelState`] itself rather than a convention.

use serde_json::Value;
use tablecring_view::Callback;

use super::form::{FilterFormState, FormStore, build_form_defaults, scrub_payload};
use super::{FlatFilter, flatten_filters};
use crate::column::JoinedColumn;
use crate::value::Params;

/// Which filter panel is showing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PanelState {
	/// No panel
	#[default]
	Closed,
	/// The panel of one column
	Open {
		/// DOM id of the header cell that opened the panel
		trigger_id: String,
		/// Display column whose filters are shown
		column_name: String,
	},
}

impl PanelState {
	/// Returns whether a panel is showing
	pub fn is_open(&self) -> bool {
		matches!(self, PanelState::Open { .. })
	}

	/// Header cell id of the open panel
	pub fn trigger_id(&self) -> Option<&str> {
		match self {
			PanelState::Open { trigger_id, .. } => Some(trigger_id),
			PanelState::Closed => None,
		}
	}

	/// Column name of the open panel
	pub fn column_name(&self) -> Option<&str> {
		match self {
			PanelState::Open { column_name, .. } => Some(column_name),
			PanelState::Closed => None,
		}
	}
}

/// Request to open or close the filter panel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenRequest {
	/// `true` opens, `false` closes
	pub status: bool,
	/// Header cell id of the trigger
	pub id_from: Option<String>,
	/// Column whose filters to show
	pub name_from: Option<String>,
}

impl OpenRequest {
	/// Opens the panel of `name_from`, triggered from header `id_from`
	pub fn open(id_from: impl Into<String>, name_from: impl Into<String>) -> Self {
		Self {
			status: true,
			id_from: Some(id_from.into()),
			name_from: Some(name_from.into()),
		}
	}

	/// Closes whichever panel is open
	pub fn close() -> Self {
		Self::default()
	}
}

/// Filter state of one table
pub struct FilterRegistry {
	filters: Vec<FlatFilter>,
	params: Params,
	defaults: FilterFormState,
	store: FormStore,
	panel: PanelState,
	on_filter: Option<Callback<Params>>,
	keeps_zero: bool,
}

impl FilterRegistry {
	/// Builds the registry for `columns`, seeding the form from `params`
	pub fn new(columns: &[JoinedColumn], params: Params) -> Self {
		let filters = flatten_filters(columns);
		let defaults = build_form_defaults(&filters, &params);
		Self {
			store: FormStore::new(defaults.clone()),
			filters,
			params,
			defaults,
			panel: PanelState::Closed,
			on_filter: None,
			keeps_zero: false,
		}
	}

	/// Sets the callback receiving submitted payloads
	pub fn with_on_filter(mut self, on_filter: Callback<Params>) -> Self {
		self.on_filter = Some(on_filter);
		self
	}

	/// Replaces the submit callback
	pub fn set_on_filter(&mut self, on_filter: Option<Callback<Params>>) {
		self.on_filter = on_filter;
	}

	/// Keep numeric zero sub-fields when scrubbing
	pub fn with_scrub_keeps_zero(mut self, keeps_zero: bool) -> Self {
		self.keeps_zero = keeps_zero;
		self
	}

	/// Re-derives filters after the column set changed; the form is re-seeded
	pub fn set_columns(&mut self, columns: &[JoinedColumn]) {
		self.filters = flatten_filters(columns);
		self.reseed();
	}

	/// Re-seeds the form when the external params changed.
	///
	/// Returns `true` if the form was replaced. Identical params leave
	/// in-progress edits untouched.
	pub fn sync_params(&mut self, params: &Params) -> bool {
		if &self.params == params {
			return false;
		}
		self.params = params.clone();
		self.reseed();
		true
	}

	fn reseed(&mut self) {
		self.defaults = build_form_defaults(&self.filters, &self.params);
		self.store.replace(self.defaults.clone());
		tracing::debug!(filters = self.filters.len(), "filter form re-seeded");
	}

	/// All flattened filters
	pub fn filters(&self) -> &[FlatFilter] {
		&self.filters
	}

	/// Current params the form was seeded from
	pub fn params(&self) -> &Params {
		&self.params
	}

	/// Panel state
	pub fn panel(&self) -> &PanelState {
		&self.panel
	}

	/// Shared form store
	pub fn store(&self) -> &FormStore {
		&self.store
	}

	/// Copy of the current form values
	pub fn form(&self) -> FilterFormState {
		self.store.snapshot()
	}

	/// Last computed defaults
	pub fn defaults(&self) -> &FilterFormState {
		&self.defaults
	}

	/// Filters of the open panel, in declaration order
	pub fn panel_filters(&self) -> Vec<&FlatFilter> {
		match self.panel.column_name() {
			Some(column) => self
				.filters
				.iter()
				.filter(|flat| flat.name_from == column)
				.collect(),
			None => Vec::new(),
		}
	}

	/// Returns whether the display column `name` owns any filter
	pub fn has_filters_for(&self, name: &str) -> bool {
		self.filters.iter().any(|flat| flat.name_from == name)
	}

	/// Writes one field of the form
	pub fn set_field(&self, name: &str, value: Value) {
		self.store.set_field(name, value);
	}

	/// Discards unsaved edits
	pub fn reset(&self) {
		self.store.replace(self.defaults.clone());
	}

	/// Opens or closes the panel.
	///
	/// Closing, or opening while another panel is showing, resets the form
	/// to its defaults.
	pub fn on_open(&mut self, request: OpenRequest) {
		if !request.status {
			if self.panel.is_open() {
				tracing::debug!(column = ?self.panel.column_name(), "filter panel closed");
			}
			self.panel = PanelState::Closed;
			self.reset();
			return;
		}

		if self.panel.is_open() {
			self.reset();
		}
		let column_name = request.name_from.unwrap_or_default();
		if !self.has_filters_for(&column_name) {
			tracing::debug!(column = %column_name, "opened a panel with no matching filters");
		}
		tracing::debug!(column = %column_name, "filter panel opened");
		self.panel = PanelState::Open {
			trigger_id: request.id_from.unwrap_or_default(),
			column_name,
		};
	}

	/// Submits the form.
	///
	/// The payload is the form merged with `overrides`; `page` is forced to
	/// `1` unless the overrides carry one. Empty object values are scrubbed
	/// before `on_filter` runs, and the panel closes afterwards. Without an
	/// `on_filter` callback this does nothing.
	pub fn on_submit(&mut self, overrides: Option<Params>) {
		let Some(on_filter) = self.on_filter.clone() else {
			tracing::debug!("filter submit ignored: no on_filter callback");
			return;
		};

		let overrides = overrides.unwrap_or_default();
		let explicit_page = overrides.contains_key("page");
		let mut payload = self.store.snapshot().into_params();
		payload.extend(overrides);
		if !explicit_page {
			payload.insert("page".to_string(), Value::from(1));
		}

		let payload = scrub_payload(payload, self.keeps_zero);
		tracing::debug!(keys = payload.len(), "filter submitted");
		on_filter.call(payload);
		self.on_open(OpenRequest::close());
	}
}

impl std::fmt::Debug for FilterRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FilterRegistry")
			.field("filters", &self.filters)
			.field("panel", &self.panel)
			.field("has_on_filter", &self.on_filter.is_some())
			.field("keeps_zero", &self.keeps_zero)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::column::{Column, merge_columns};
	use crate::filter::Filter;
	use serde_json::json;
	use std::sync::{Arc, Mutex};

	fn columns() -> Vec<JoinedColumn> {
		merge_columns(vec![
			Column::new("status", "Status").filter(Filter::text("status")),
			Column::new("id", "ID").filter(Filter::text("id")),
		])
	}

	fn recorder() -> (Arc<Mutex<Vec<Params>>>, Callback<Params>) {
		let seen = Arc::new(Mutex::new(Vec::new()));
		let callback = Callback::new({
			let seen = Arc::clone(&seen);
			move |payload: Params| seen.lock().unwrap().push(payload)
		});
		(seen, callback)
	}

	#[test]
	fn test_panel_filters_scoped_to_open_column() {
		let mut registry = FilterRegistry::new(&columns(), Params::new());
		assert!(registry.panel_filters().is_empty());

		registry.on_open(OpenRequest::open("t-status", "status"));
		let shown: Vec<_> = registry.panel_filters().iter().map(|f| f.name()).collect();
		assert_eq!(shown, vec!["status"]);
		assert_eq!(registry.panel().trigger_id(), Some("t-status"));
	}

	#[test]
	fn test_close_discards_edits() {
		let mut registry = FilterRegistry::new(&columns(), Params::new());
		registry.on_open(OpenRequest::open("t-status", "status"));
		registry.set_field("status", json!("paid"));

		registry.on_open(OpenRequest::close());
		assert!(!registry.panel().is_open());
		assert_eq!(registry.form().get("status"), Some(&json!("")));
	}

	#[test]
	fn test_submit_without_callback_is_noop() {
		let mut registry = FilterRegistry::new(&columns(), Params::new());
		registry.on_open(OpenRequest::open("t-status", "status"));
		registry.set_field("status", json!("paid"));

		registry.on_submit(None);
		assert!(registry.panel().is_open());
		assert_eq!(registry.form().get("status"), Some(&json!("paid")));
	}

	#[test]
	fn test_submit_keeps_explicit_page() {
		let (seen, callback) = recorder();
		let mut registry =
			FilterRegistry::new(&columns(), Params::new()).with_on_filter(callback);

		let overrides = json!({"page": 4}).as_object().unwrap().clone();
		registry.on_submit(Some(overrides));

		assert_eq!(seen.lock().unwrap()[0]["page"], json!(4));
	}

	#[test]
	fn test_sync_params_only_on_change() {
		let params = json!({"status": "paid"}).as_object().unwrap().clone();
		let mut registry = FilterRegistry::new(&columns(), params.clone());
		registry.set_field("id", json!("inv-1"));

		assert!(!registry.sync_params(&params));
		assert_eq!(registry.form().get("id"), Some(&json!("inv-1")));

		let next = json!({"status": "failed"}).as_object().unwrap().clone();
		assert!(registry.sync_params(&next));
		assert_eq!(registry.form().get("status"), Some(&json!("failed")));
		assert_eq!(registry.form().get("id"), Some(&json!("")));
	}
}
