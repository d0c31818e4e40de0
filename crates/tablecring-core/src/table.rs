//! The data table
//!
//! [`DataTable`] ties the pieces together: merged columns, the filter
//! registry and its panel, the popup positioner, row expand state, action
//! menus and pagination. It renders to a [`View`] whose event handlers post
//! [`TableMsg`]s to the table's [`Mailbox`]; [`DataTable::process`] applies
//! them.
//!
//! ```
//! use serde_json::json;
//! use tablecring_core::column::Column;
//! use tablecring_core::table::{DataTable, TableEvents, TableProps};
//!
//! let props = TableProps::new(vec![Column::new("id", "ID"), Column::new("status", "Status")])
//!     .with_id("invoices")
//!     .with_data(vec![json!({"id": "inv-1", "status": "paid"}).as_object().unwrap().clone()]);
//! let table = DataTable::new(props, TableEvents::default());
//!
//! let view = table.render();
//! assert!(view.find_by_id("invoices-status").is_some());
//! assert!(view.text_content().contains("inv-1"));
//! ```

use std::sync::Arc;

use serde_json::Value;
use tablecring_view::{
	Callback, ElementView, EventTarget, EventType, IntoView, ListenerRegistry, View,
};

use crate::action::{ActionEntry, ActionMenu, Navigator};
use crate::cell::{CellContext, Clipboard, render_cell};
use crate::column::{CellFn, Column, JoinedColumn, Label, merge_columns};
use crate::error::{Result, TableError};
use crate::filter::field::render_panel_fields;
use crate::filter::{FieldRenderer, FilterRegistry, HtmlFieldRenderer, OpenRequest, PanelState};
use crate::message::{Mailbox, TableMsg};
use crate::pagination::{GoToPageInput, PaginationState};
use crate::placement::{LayoutSource, Placement, PopupPositioner, PopupTarget, StaticLayout};
use crate::row::RowToggles;
use crate::settings::TableSettings;
use crate::value::{Params, Row};

/// Caller-owned inputs of a table
#[derive(Clone, Default)]
pub struct TableProps {
	/// Container element id; defaults to the settings' id prefix
	pub id: Option<String>,
	/// Rows of the current page
	pub data: Vec<Row>,
	/// Declared columns, before merging
	pub columns: Vec<Column>,
	/// Current external filter/query state
	pub params: Params,
	/// Server-side pagination
	pub pagination: Option<PaginationState>,
	/// Whether the caller is fetching
	pub is_loading: bool,
	/// Detail renderer; enables row expand toggles
	pub expanded: Option<CellFn>,
	/// Per-row actions
	pub actions: Vec<ActionEntry>,
}

impl TableProps {
	/// Props with `columns` and nothing else
	pub fn new(columns: Vec<Column>) -> Self {
		Self {
			columns,
			..Self::default()
		}
	}

	/// Sets the container id
	pub fn with_id(mut self, id: impl Into<String>) -> Self {
		self.id = Some(id.into());
		self
	}

	/// Sets the rows
	pub fn with_data(mut self, data: Vec<Row>) -> Self {
		self.data = data;
		self
	}

	/// Sets the params
	pub fn with_params(mut self, params: Params) -> Self {
		self.params = params;
		self
	}

	/// Sets the pagination
	pub fn with_pagination(mut self, pagination: PaginationState) -> Self {
		self.pagination = Some(pagination);
		self
	}

	/// Sets the loading flag
	pub fn loading(mut self, is_loading: bool) -> Self {
		self.is_loading = is_loading;
		self
	}

	/// Sets the detail renderer
	pub fn with_expanded(mut self, expanded: impl Fn(&Row) -> View + Send + Sync + 'static) -> Self {
		self.expanded = Some(Arc::new(expanded));
		self
	}

	/// Sets the row actions
	pub fn with_actions(mut self, actions: Vec<ActionEntry>) -> Self {
		self.actions = actions;
		self
	}
}

impl std::fmt::Debug for TableProps {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TableProps")
			.field("id", &self.id)
			.field("rows", &self.data.len())
			.field("columns", &self.columns)
			.field("params", &self.params)
			.field("pagination", &self.pagination)
			.field("is_loading", &self.is_loading)
			.field("has_expanded", &self.expanded.is_some())
			.field("actions", &self.actions)
			.finish()
	}
}

/// Outbound events
#[derive(Debug, Clone, Default)]
pub struct TableEvents {
	/// Scrubbed filter payload on submit; `{"page": n}` on page change
	/// when `on_page` is not set
	pub on_filter: Option<Callback<Params>>,
	/// Row activated
	pub on_click: Option<Callback<Row>>,
	/// Page requested
	pub on_page: Option<Callback<u64>>,
}

impl TableEvents {
	/// Sets `on_filter`
	pub fn on_filter(mut self, f: impl Fn(Params) + Send + Sync + 'static) -> Self {
		self.on_filter = Some(Callback::new(f));
		self
	}

	/// Sets `on_click`
	pub fn on_click(mut self, f: impl Fn(Row) + Send + Sync + 'static) -> Self {
		self.on_click = Some(Callback::new(f));
		self
	}

	/// Sets `on_page`
	pub fn on_page(mut self, f: impl Fn(u64) + Send + Sync + 'static) -> Self {
		self.on_page = Some(Callback::new(f));
		self
	}
}

/// A rendered, interactive data table
pub struct DataTable {
	id: String,
	data: Vec<Row>,
	columns: Vec<JoinedColumn>,
	params: Params,
	pagination: Option<PaginationState>,
	is_loading: bool,
	expanded: Option<CellFn>,
	actions: ActionMenu,
	events: TableEvents,
	settings: TableSettings,
	filters: FilterRegistry,
	positioner: PopupPositioner,
	rows: RowToggles,
	page_input: GoToPageInput,
	mailbox: Mailbox,
	clipboard: Option<Arc<dyn Clipboard>>,
	navigator: Option<Arc<dyn Navigator>>,
	field_renderer: Arc<dyn FieldRenderer>,
}

impl DataTable {
	/// Creates a table with default settings
	pub fn new(props: TableProps, events: TableEvents) -> Self {
		Self::with_settings(props, events, TableSettings::default())
	}

	/// Creates a table with explicit settings
	pub fn with_settings(props: TableProps, events: TableEvents, settings: TableSettings) -> Self {
		let id = props.id.unwrap_or_else(|| settings.id_prefix.clone());
		let columns = merge_columns(props.columns);
		let filters = FilterRegistry::new(&columns, props.params.clone())
			.with_scrub_keeps_zero(settings.scrub_keeps_zero);
		let filters = match &events.on_filter {
			Some(on_filter) => filters.with_on_filter(on_filter.clone()),
			None => filters,
		};
		let positioner = PopupPositioner::new(
			Arc::new(StaticLayout::new()),
			Arc::new(ListenerRegistry::new()),
		)
		.with_offset(settings.popup_offset);

		tracing::debug!(table = %id, columns = columns.len(), rows = props.data.len(), "table created");
		Self {
			field_renderer: Arc::new(HtmlFieldRenderer::new(id.clone())),
			id,
			data: props.data,
			columns,
			params: props.params,
			pagination: props.pagination,
			is_loading: props.is_loading,
			expanded: props.expanded,
			actions: ActionMenu::new(props.actions),
			events,
			settings,
			filters,
			positioner,
			rows: RowToggles::new(),
			page_input: GoToPageInput::new(),
			mailbox: Mailbox::new(),
			clipboard: None,
			navigator: None,
		}
	}

	/// Measures through `layout` and follows scroll on `scroll_target`
	pub fn with_layout(
		mut self,
		layout: Arc<dyn LayoutSource>,
		scroll_target: Arc<dyn EventTarget>,
	) -> Self {
		self.positioner =
			PopupPositioner::new(layout, scroll_target).with_offset(self.settings.popup_offset);
		self
	}

	/// Target of copy affordances
	pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
		self.clipboard = Some(clipboard);
		self
	}

	/// Router for href actions
	pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
		self.navigator = Some(navigator);
		self
	}

	/// Replaces the filter field widgets
	pub fn with_field_renderer(mut self, renderer: Arc<dyn FieldRenderer>) -> Self {
		self.field_renderer = renderer;
		self
	}

	/// Container element id
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Id of the filter panel element
	pub fn panel_id(&self) -> String {
		format!("{}-panel", self.id)
	}

	/// Id of the header cell of `column`
	pub fn header_id(&self, column: &str) -> String {
		format!("{}-{column}", self.id)
	}

	/// Message queue shared with the rendered view
	pub fn mailbox(&self) -> &Mailbox {
		&self.mailbox
	}

	/// Display columns
	pub fn columns(&self) -> &[JoinedColumn] {
		&self.columns
	}

	/// Current rows
	pub fn data(&self) -> &[Row] {
		&self.data
	}

	/// Filter state
	pub fn filters(&self) -> &FilterRegistry {
		&self.filters
	}

	/// Filter panel state
	pub fn panel(&self) -> &PanelState {
		self.filters.panel()
	}

	/// Latest filter panel placement
	pub fn placement(&self) -> Option<Placement> {
		self.positioner.placement()
	}

	/// Measures the open filter panel again.
	///
	/// Call after mounting a render that shows the panel for the first time;
	/// the panel element does not exist yet while `OpenFilter` is handled.
	pub fn remeasure(&self) -> Option<Placement> {
		self.positioner.refresh()
	}

	/// Row expand state
	pub fn rows(&self) -> &RowToggles {
		&self.rows
	}

	/// Action menus
	pub fn action_menu(&self) -> &ActionMenu {
		&self.actions
	}

	/// "Go to page" field
	pub fn page_input(&self) -> &GoToPageInput {
		&self.page_input
	}

	/// Replaces the rows; every row collapses and menus close
	pub fn set_data(&mut self, data: Vec<Row>) {
		self.data = data;
		self.rows.clear();
		self.actions.close();
	}

	/// Replaces the params; the filter form is re-seeded if they changed
	pub fn set_params(&mut self, params: Params) {
		self.filters.sync_params(&params);
		self.params = params;
	}

	/// Replaces the declared columns
	pub fn set_columns(&mut self, columns: Vec<Column>) {
		self.columns = merge_columns(columns);
		self.filters.set_columns(&self.columns);
	}

	/// Replaces the pagination
	pub fn set_pagination(&mut self, pagination: Option<PaginationState>) {
		self.pagination = pagination;
	}

	/// Sets the loading flag
	pub fn set_loading(&mut self, is_loading: bool) {
		self.is_loading = is_loading;
	}

	/// Applies every queued message in order.
	///
	/// Stops at the first error; later messages stay queued.
	pub async fn process(&mut self) -> Result<()> {
		while let Some(msg) = self.mailbox.pop() {
			self.handle(msg).await?;
		}
		Ok(())
	}

	/// Applies one message
	pub async fn handle(&mut self, msg: TableMsg) -> Result<()> {
		match msg {
			TableMsg::OpenFilter { id_from, name_from } => {
				let target = PopupTarget {
					container_id: self.id.clone(),
					id_from: id_from.clone(),
					panel_id: self.panel_id(),
				};
				self.filters.on_open(OpenRequest::open(id_from, name_from));
				self.positioner.open(target);
			}
			TableMsg::CloseFilter => {
				self.filters.on_open(OpenRequest::close());
				self.positioner.close();
			}
			TableMsg::SetFilterField { name, value } => self.filters.set_field(&name, value),
			TableMsg::SubmitFilter => {
				self.filters.on_submit(None);
				if !self.filters.panel().is_open() {
					self.positioner.close();
				}
			}
			TableMsg::ResetFilter => self.filters.reset(),
			TableMsg::ToggleRow(index) => {
				self.check_row(index)?;
				if self.expanded.is_some() {
					self.rows.toggle(index);
				} else {
					tracing::debug!(row = index, "row toggle ignored: table has no expanded renderer");
				}
			}
			TableMsg::RowClick(index) => {
				let row = self.row(index)?.clone();
				if let Some(on_click) = &self.events.on_click {
					on_click.call(row);
				}
			}
			TableMsg::GoToPage(page) => self.change_page(page),
			TableMsg::PrevPage => {
				if let Some(pagination) = self.pagination {
					self.change_page(pagination.prev_page());
				}
			}
			TableMsg::NextPage => {
				if let Some(pagination) = self.pagination {
					self.change_page(pagination.next_page());
				}
			}
			TableMsg::PageInput(raw) => {
				self.page_input.input(&raw);
			}
			TableMsg::PageInputSubmit => {
				if let Some(page) = self.page_input.page() {
					self.page_input.clear();
					self.change_page(page);
				}
			}
			TableMsg::ToggleActionMenu(index) => {
				self.check_row(index)?;
				self.actions.toggle(index);
			}
			TableMsg::Action { row, entry } => {
				let row = self.row(row)?.clone();
				self.actions
					.activate(entry, &row, self.navigator.as_deref())
					.await?;
			}
		}
		Ok(())
	}

	fn row(&self, index: usize) -> Result<&Row> {
		self.data.get(index).ok_or(TableError::RowOutOfRange {
			index,
			len: self.data.len(),
		})
	}

	fn check_row(&self, index: usize) -> Result<()> {
		self.row(index).map(|_| ())
	}

	fn change_page(&self, page: u64) {
		tracing::debug!(page, "page change requested");
		if let Some(on_page) = &self.events.on_page {
			on_page.call(page);
		} else if let Some(on_filter) = &self.events.on_filter {
			let mut payload = Params::new();
			payload.insert("page".to_string(), Value::from(page));
			on_filter.call(payload);
		}
	}

	fn column_count(&self) -> usize {
		self.columns.len() + usize::from(!self.actions.is_empty())
	}

	/// Renders the whole table
	pub fn render(&self) -> View {
		let table = ElementView::new("table")
			.class("tablecring-table")
			.child(ElementView::new("thead").child(self.render_header()))
			.child(ElementView::new("tbody").children(self.render_body()));

		ElementView::new("div")
			.id(self.id.clone())
			.class("tablecring")
			.child(table)
			.child(self.render_panel())
			.child(self.pagination.map(|p| self.render_pagination(&p)))
			.into_view()
	}

	fn render_header(&self) -> ElementView {
		let cells = self.columns.iter().map(|column| {
			let th_id = self.header_id(column.name());
			let label = render_label(column.label());

			let trigger = self.filters.has_filters_for(column.name()).then(|| {
				let open_here = self.panel().column_name() == Some(column.name());
				let msg = if open_here {
					TableMsg::CloseFilter
				} else {
					TableMsg::OpenFilter {
						id_from: th_id.clone(),
						name_from: column.name().to_string(),
					}
				};
				ElementView::new("button")
					.attr("type", "button")
					.id(format!("{th_id}-button"))
					.class(if open_here {
						"tablecring-filter-trigger active"
					} else {
						"tablecring-filter-trigger"
					})
					.attr("aria-label", "Filter")
					.on(EventType::Click, self.mailbox.post(msg))
			});

			ElementView::new("th")
				.id(th_id)
				.class(if column.label().is_stacked() {
					"tablecring-th stacked"
				} else {
					"tablecring-th"
				})
				.child(label)
				.child(trigger)
		});

		let actions = (!self.actions.is_empty())
			.then(|| ElementView::new("th").class("tablecring-th tablecring-actions-col"));

		ElementView::new("tr").children(cells).child(actions)
	}

	fn render_body(&self) -> Vec<View> {
		let colspan = self.column_count().to_string();
		if self.is_loading {
			return vec![message_row("tablecring-loader", &colspan, &self.settings.loading_text)];
		}
		if self.data.is_empty() {
			return vec![message_row("tablecring-empty", &colspan, &self.settings.empty_text)];
		}

		let ctx = CellContext {
			params: &self.params,
			number_format: self.settings.number_format(),
			clipboard: self.clipboard.clone(),
		};
		let mut rows = Vec::with_capacity(self.data.len());
		for (index, row) in self.data.iter().enumerate() {
			rows.push(self.render_row(index, row, &ctx));
			if let Some(expanded) = &self.expanded {
				if self.rows.state(index).is_expanded() {
					rows.push(
						ElementView::new("tr")
							.class("tablecring-expanded")
							.child(
								ElementView::new("td")
									.attr("colspan", colspan.clone())
									.child(expanded(row)),
							)
							.into_view(),
					);
				}
			}
		}
		rows
	}

	fn render_row(&self, index: usize, row: &Row, ctx: &CellContext<'_>) -> View {
		let cells = self.columns.iter().enumerate().map(|(position, column)| {
			let toggle = (position == 0 && self.expanded.is_some()).then(|| {
				let expanded = self.rows.state(index).is_expanded();
				ElementView::new("button")
					.attr("type", "button")
					.class("tablecring-expand-toggle")
					.attr("aria-expanded", expanded.to_string())
					.on(EventType::Click, self.mailbox.post(TableMsg::ToggleRow(index)))
					.stop_propagation(EventType::Click)
					.child(if expanded { "▾" } else { "▸" })
			});
			ElementView::new("td")
				.attr_opt("style", column.column().abilities().style.clone())
				.child(toggle)
				.child(render_cell(column, row, ctx))
		});
		let actions = (!self.actions.is_empty()).then(|| {
			ElementView::new("td")
				.class("tablecring-actions-col")
				.child(self.actions.render(index, &self.mailbox))
		});

		ElementView::new("tr")
			.class("tablecring-row")
			.attr("data-row", index.to_string())
			.on(EventType::Click, self.mailbox.post(TableMsg::RowClick(index)))
			.children(cells)
			.child(actions)
			.into_view()
	}

	fn render_panel(&self) -> Option<ElementView> {
		if !self.panel().is_open() {
			return None;
		}
		let fields = render_panel_fields(&self.filters, self.field_renderer.as_ref());
		let buttons = ElementView::new("div")
			.class("tablecring-filter-buttons")
			.child(
				ElementView::new("button")
					.attr("type", "button")
					.class("tablecring-filter-reset")
					.on(EventType::Click, self.mailbox.post(TableMsg::ResetFilter))
					.child("Reset"),
			)
			.child(
				ElementView::new("button")
					.attr("type", "submit")
					.class("tablecring-filter-submit")
					.child("Apply"),
			);
		let form = ElementView::new("form")
			.on(EventType::Submit, self.mailbox.post(TableMsg::SubmitFilter))
			.children(fields)
			.child(buttons);

		Some(
			ElementView::new("div")
				.id(self.panel_id())
				.class("tablecring-filter-panel")
				.attr_opt("style", self.placement().map(|p| p.to_style()))
				.child(form),
		)
	}

	fn render_pagination(&self, pagination: &PaginationState) -> ElementView {
		let control = |class: &'static str, enabled: bool, msg: TableMsg, text: &'static str| {
			let button = ElementView::new("button")
				.attr("type", "button")
				.class(class)
				.on(EventType::Click, self.mailbox.post(msg))
				.child(text);
			if enabled {
				button
			} else {
				button.attr("disabled", "disabled")
			}
		};

		let go_to = ElementView::new("form")
			.class("tablecring-goto")
			.on(EventType::Submit, self.mailbox.post(TableMsg::PageInputSubmit))
			.child(
				ElementView::new("input")
					.attr("type", "text")
					.attr("inputmode", "numeric")
					.id(format!("{}-goto", self.id))
					.attr("value", self.page_input.text().to_string())
					.on(EventType::Input, self.mailbox.post_value(TableMsg::PageInput)),
			);

		ElementView::new("nav")
			.class("tablecring-pagination")
			.child(
				ElementView::new("span")
					.class("tablecring-range")
					.child(pagination.display()),
			)
			.child(control(
				"tablecring-prev",
				pagination.has_prev(),
				TableMsg::PrevPage,
				"‹",
			))
			.child(
				ElementView::new("span")
					.class("tablecring-page")
					.child(format!("{} / {}", pagination.current, pagination.total)),
			)
			.child(control(
				"tablecring-next",
				pagination.has_next(),
				TableMsg::NextPage,
				"›",
			))
			.child(go_to)
	}
}

impl std::fmt::Debug for DataTable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DataTable")
			.field("id", &self.id)
			.field("rows", &self.data.len())
			.field("columns", &self.columns.len())
			.field("panel", self.filters.panel())
			.field("pagination", &self.pagination)
			.field("is_loading", &self.is_loading)
			.finish_non_exhaustive()
	}
}

fn render_label(label: &Label) -> View {
	match label {
		Label::Single(part) => part.render(),
		Label::Stacked(parts) => View::fragment(parts.iter().map(|part| {
			ElementView::new("div")
				.class("tablecring-label-line")
				.child(part.render())
		})),
	}
}

fn message_row(class: &'static str, colspan: &str, text: &str) -> View {
	ElementView::new("tr")
		.child(
			ElementView::new("td")
				.class(class)
				.attr("colspan", colspan.to_string())
				.child(text.to_string()),
		)
		.into_view()
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn rows(value: Value) -> Vec<Row> {
		value
			.as_array()
			.unwrap()
			.iter()
			.map(|row| row.as_object().unwrap().clone())
			.collect()
	}

	#[test]
	fn test_empty_and_loading_states() {
		let mut table = DataTable::new(
			TableProps::new(vec![Column::new("id", "ID")]).with_id("t"),
			TableEvents::default(),
		);
		assert!(table.render().text_content().contains("No data found"));

		table.set_loading(true);
		let text = table.render().text_content();
		assert!(text.contains("Loading..."));
		assert!(!text.contains("No data found"));
	}

	#[test]
	fn test_stacked_header_for_joined_columns() {
		let table = DataTable::new(
			TableProps::new(vec![
				Column::new("a", "A").join("x"),
				Column::new("b", "B").join("x"),
				Column::new("c", "C"),
			])
			.with_id("t"),
			TableEvents::default(),
		);
		let view = table.render();
		let th = view.find_by_id("t-a").unwrap();
		assert!(th.has_class("stacked"));
		assert_eq!(th.text_content(), "AB");
		assert!(view.find_by_id("t-b").is_none());
		assert!(view.find_by_id("t-c").is_some());
	}

	#[tokio::test]
	async fn test_expand_toggle_only_with_renderer() {
		let data = rows(json!([{"id": "inv-1"}]));
		let mut plain = DataTable::new(
			TableProps::new(vec![Column::new("id", "ID")]).with_data(data.clone()),
			TableEvents::default(),
		);
		let view = plain.render();
		assert!(view.find(&|el| el.has_class("tablecring-expand-toggle")).is_none());
		plain.handle(TableMsg::ToggleRow(0)).await.unwrap();
		assert!(!plain.rows().state(0).is_expanded());

		let mut table = DataTable::new(
			TableProps::new(vec![Column::new("id", "ID")])
				.with_data(data.clone())
				.with_expanded(|row| View::text(format!("detail {}", row["id"]))),
			TableEvents::default(),
		);
		table.handle(TableMsg::ToggleRow(0)).await.unwrap();
		assert!(table.render().text_content().contains("detail \"inv-1\""));

		table.set_data(data);
		assert!(!table.rows().state(0).is_expanded());
	}

	#[tokio::test]
	async fn test_out_of_range_row_is_an_error() {
		let mut table = DataTable::new(TableProps::new(vec![]), TableEvents::default());
		let error = table.handle(TableMsg::RowClick(2)).await.unwrap_err();
		assert!(matches!(error, TableError::RowOutOfRange { index: 2, len: 0 }));
	}
}
