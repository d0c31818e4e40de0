//! Cell rendering
//!
//! Dispatch order for one cell:
//!
//! 1. the column's custom `content` renderer, used verbatim;
//! 2. for joined columns, every constituent in turn, separated by `<br />`;
//! 3. the row value by shape: a tag for objects with a truthy `label`, one
//!    line per element for arrays, the string rule for strings and numbers,
//!    and [`NO_DATA`] for everything else.
//!
//! The string rule coerces to text, substitutes [`NO_DATA`] for empty text,
//! applies currency formatting, highlights the search terms found in the
//! params under the column's name and finally wraps the text in a
//! click-to-copy span when the column asks for it.

use std::sync::Arc;

use parking_lot::Mutex;
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use tablecring_view::{ElementView, EventType, IntoView, View, event_handler};

use crate::column::{Column, JoinedColumn};
use crate::format::{NumberFormat, format_currency};
use crate::value::{Params, Row, coerce_text, is_truthy, search_terms};

/// Text of a cell that has no data
pub const NO_DATA: &str = "-";

/// System clipboard
pub trait Clipboard: Send + Sync {
	/// Replaces the clipboard content with `text`
	fn write_text(&self, text: &str);
}

/// Clipboard kept in memory
#[derive(Debug, Default)]
pub struct MemoryClipboard {
	content: Mutex<Option<String>>,
}

impl MemoryClipboard {
	/// Creates an empty clipboard
	pub fn new() -> Self {
		Self::default()
	}

	/// Last written text
	pub fn content(&self) -> Option<String> {
		self.content.lock().clone()
	}
}

impl Clipboard for MemoryClipboard {
	fn write_text(&self, text: &str) {
		*self.content.lock() = Some(text.to_string());
	}
}

/// Table-wide inputs of cell rendering
#[derive(Clone)]
pub struct CellContext<'a> {
	/// Current params; search terms are read from here
	pub params: &'a Params,
	/// Currency separators
	pub number_format: NumberFormat,
	/// Target of copy affordances
	pub clipboard: Option<Arc<dyn Clipboard>>,
}

impl<'a> CellContext<'a> {
	/// Context with default separators and no clipboard
	pub fn new(params: &'a Params) -> Self {
		Self {
			params,
			number_format: NumberFormat::default(),
			clipboard: None,
		}
	}

	/// Sets the clipboard
	pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
		self.clipboard = Some(clipboard);
		self
	}

	/// Sets the currency separators
	pub fn with_number_format(mut self, number_format: NumberFormat) -> Self {
		self.number_format = number_format;
		self
	}
}

impl std::fmt::Debug for CellContext<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CellContext")
			.field("params", &self.params)
			.field("number_format", &self.number_format)
			.field("has_clipboard", &self.clipboard.is_some())
			.finish()
	}
}

/// Renders the cell of `column` for `row`.
pub fn render_cell(column: &JoinedColumn, row: &Row, ctx: &CellContext<'_>) -> View {
	if let Some(content) = column.column().content_fn() {
		return content(row);
	}
	if column.is_joined() {
		return line_separated(column.joined().iter().map(|c| render_column(c, row, ctx)));
	}
	render_column(column.column(), row, ctx)
}

fn render_column(column: &Column, row: &Row, ctx: &CellContext<'_>) -> View {
	match column.content_fn() {
		Some(content) => content(row),
		None => render_value(column, row.get(column.name()), ctx),
	}
}

/// Renders one value of `column` by its shape
pub fn render_value(column: &Column, value: Option<&Value>, ctx: &CellContext<'_>) -> View {
	match value {
		Some(Value::Object(tag)) if tag.get("label").is_some_and(is_truthy) => {
			let label = tag.get("label").map(coerce_text).unwrap_or_default();
			let color = tag.get("color").map(coerce_text).filter(|c| !c.is_empty());
			ElementView::new("span")
				.class("tablecring-tag")
				.attr_opt("style", color.map(|c| format!("background-color: {c};")))
				.child(label)
				.into_view()
		}
		Some(Value::Array(items)) if !items.is_empty() => {
			line_separated(items.iter().map(|item| render_text(column, item, ctx)))
		}
		Some(value @ (Value::String(_) | Value::Number(_))) => render_text(column, value, ctx),
		_ => View::text(NO_DATA),
	}
}

/// Applies the string rule to one leaf value
pub fn render_text(column: &Column, value: &Value, ctx: &CellContext<'_>) -> View {
	let raw = coerce_text(value);
	if raw.is_empty() {
		return View::text(NO_DATA);
	}

	let ability = column.abilities();
	let text = match &ability.currency {
		Some(symbol) => format_currency(symbol, &raw, ctx.number_format),
		None => raw,
	};

	let terms = ctx
		.params
		.get(column.name())
		.map(search_terms)
		.unwrap_or_default();
	let content = highlight(&text, &terms);

	if !ability.copy {
		return content;
	}
	let handler = ctx.clipboard.clone().map(|clipboard| {
		let copied = text.clone();
		event_handler(move |_| {
			tracing::trace!("cell text copied");
			clipboard.write_text(&copied);
		})
	});
	let wrapper = ElementView::new("span")
		.class("tablecring-copy")
		.attr("data-copy", text)
		.child(content);
	match handler {
		Some(handler) => wrapper.on(EventType::Click, handler).into_view(),
		None => wrapper.into_view(),
	}
}

/// Wraps every case-insensitive occurrence of any term in `<mark>`.
pub fn highlight(text: &str, terms: &[String]) -> View {
	let Some(pattern) = term_pattern(terms) else {
		return View::text(text.to_string());
	};

	let mut parts = Vec::new();
	let mut last = 0;
	for found in pattern.find_iter(text) {
		if found.start() > last {
			parts.push(View::text(text[last..found.start()].to_string()));
		}
		parts.push(
			ElementView::new("mark")
				.child(found.as_str().to_string())
				.into_view(),
		);
		last = found.end();
	}
	if parts.is_empty() {
		return View::text(text.to_string());
	}
	if last < text.len() {
		parts.push(View::text(text[last..].to_string()));
	}
	View::Fragment(parts)
}

fn term_pattern(terms: &[String]) -> Option<Regex> {
	if terms.is_empty() {
		return None;
	}
	let alternation = terms
		.iter()
		.map(|term| regex::escape(term))
		.collect::<Vec<_>>()
		.join("|");
	match RegexBuilder::new(&alternation).case_insensitive(true).build() {
		Ok(pattern) => Some(pattern),
		Err(error) => {
			tracing::debug!(%error, "highlight pattern rejected");
			None
		}
	}
}

fn line_separated(views: impl Iterator<Item = View>) -> View {
	let mut parts = Vec::new();
	for (i, view) in views.enumerate() {
		if i > 0 {
			parts.push(ElementView::new("br").into_view());
		}
		parts.push(view);
	}
	View::Fragment(parts)
}
