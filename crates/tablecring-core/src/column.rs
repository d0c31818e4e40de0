//! Column definitions
//!
//! A [`Column`] describes one logical field of a row: how its header reads,
//! which filters it owns, and how its cells render. Columns that share a
//! `join` key are folded into one display column by [`merge_columns`].

pub mod merge;

use std::fmt::Debug;
use std::sync::Arc;

use tablecring_view::View;

use crate::filter::Filter;
use crate::value::Row;

pub use merge::{JoinedColumn, merge_columns};

/// Custom cell renderer; bypasses the default cell pipeline entirely
pub type CellFn = Arc<dyn Fn(&Row) -> View + Send + Sync>;

/// Opaque header fragment
pub type FragmentFn = Arc<dyn Fn() -> View + Send + Sync>;

/// One line of a column header
#[derive(Clone)]
pub enum LabelPart {
	/// Plain text
	Text(String),
	/// Caller-rendered fragment
	Fragment(FragmentFn),
}

impl LabelPart {
	/// Renders this part
	pub fn render(&self) -> View {
		match self {
			LabelPart::Text(text) => View::text(text.clone()),
			LabelPart::Fragment(fragment) => fragment(),
		}
	}

	/// Returns the text of a text part
	pub fn as_text(&self) -> Option<&str> {
		match self {
			LabelPart::Text(text) => Some(text),
			LabelPart::Fragment(_) => None,
		}
	}
}

impl PartialEq for LabelPart {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(LabelPart::Text(a), LabelPart::Text(b)) => a == b,
			(LabelPart::Fragment(a), LabelPart::Fragment(b)) => Arc::ptr_eq(a, b),
			_ => false,
		}
	}
}

impl Debug for LabelPart {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			LabelPart::Text(text) => f.debug_tuple("Text").field(text).finish(),
			LabelPart::Fragment(_) => f.write_str("Fragment(<function>)"),
		}
	}
}

/// Column header label
///
/// Joined columns carry a stacked label, one part per constituent, in
/// declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum Label {
	/// A single line
	Single(LabelPart),
	/// Several lines rendered on top of each other
	Stacked(Vec<LabelPart>),
}

impl Label {
	/// Text label
	pub fn text(text: impl Into<String>) -> Self {
		Label::Single(LabelPart::Text(text.into()))
	}

	/// Fragment label
	pub fn fragment(fragment: impl Fn() -> View + Send + Sync + 'static) -> Self {
		Label::Single(LabelPart::Fragment(Arc::new(fragment)))
	}

	/// Stacked text label
	pub fn stacked<I, S>(parts: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Label::Stacked(
			parts
				.into_iter()
				.map(|p| LabelPart::Text(p.into()))
				.collect(),
		)
	}

	/// Returns the parts in display order
	pub fn parts(&self) -> &[LabelPart] {
		match self {
			Label::Single(part) => std::slice::from_ref(part),
			Label::Stacked(parts) => parts,
		}
	}

	/// Returns whether the label has more than one line
	pub fn is_stacked(&self) -> bool {
		matches!(self, Label::Stacked(_))
	}

	/// Appends `other` after this label, converting a single label into a stack
	pub fn append(self, other: Label) -> Label {
		let mut parts = match self {
			Label::Single(part) => vec![part],
			Label::Stacked(parts) => parts,
		};
		match other {
			Label::Single(part) => parts.push(part),
			Label::Stacked(more) => parts.extend(more),
		}
		Label::Stacked(parts)
	}

	/// Text parts joined with `" / "`; fragments are skipped
	pub fn plain_text(&self) -> String {
		self.parts()
			.iter()
			.filter_map(LabelPart::as_text)
			.collect::<Vec<_>>()
			.join(" / ")
	}
}

impl From<&str> for Label {
	fn from(text: &str) -> Self {
		Label::text(text)
	}
}

impl From<String> for Label {
	fn from(text: String) -> Self {
		Label::text(text)
	}
}

/// Optional per-column cell capabilities
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ability {
	/// Wrap cell text with a click-to-copy affordance
	pub copy: bool,
	/// Currency symbol; enables symbol prefix and thousands grouping
	pub currency: Option<String>,
	/// Free-form inline style for the cell
	pub style: Option<String>,
}

impl Ability {
	/// Creates an empty ability set
	pub fn new() -> Self {
		Self::default()
	}

	/// Enables click-to-copy
	pub fn copy(mut self) -> Self {
		self.copy = true;
		self
	}

	/// Formats values as currency with `symbol`
	pub fn currency(mut self, symbol: impl Into<String>) -> Self {
		self.currency = Some(symbol.into());
		self
	}

	/// Sets an inline style override
	pub fn style(mut self, style: impl Into<String>) -> Self {
		self.style = Some(style.into());
		self
	}
}

/// One logical table column
///
/// # Example
///
/// ```
/// use tablecring_core::column::{Ability, Column};
/// use tablecring_core::filter::Filter;
///
/// let amount = Column::new("amount", "Amount")
///     .ability(Ability::new().currency("Rp"))
///     .filter(Filter::text("amount"));
///
/// assert_eq!(amount.name(), "amount");
/// assert_eq!(amount.filters().len(), 1);
/// ```
#[derive(Clone)]
pub struct Column {
	name: String,
	label: Label,
	join: Option<String>,
	ability: Ability,
	filters: Vec<Filter>,
	content: Option<CellFn>,
	visible: bool,
}

impl Column {
	/// Creates a visible column with no filters
	pub fn new(name: impl Into<String>, label: impl Into<Label>) -> Self {
		Self {
			name: name.into(),
			label: label.into(),
			join: None,
			ability: Ability::default(),
			filters: Vec::new(),
			content: None,
			visible: true,
		}
	}

	/// Sets the join key; columns sharing it are merged into one header
	pub fn join(mut self, key: impl Into<String>) -> Self {
		self.join = Some(key.into());
		self
	}

	/// Sets the cell abilities
	pub fn ability(mut self, ability: Ability) -> Self {
		self.ability = ability;
		self
	}

	/// Appends a filter
	pub fn filter(mut self, filter: Filter) -> Self {
		self.filters.push(filter);
		self
	}

	/// Appends several filters
	pub fn filters_from(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
		self.filters.extend(filters);
		self
	}

	/// Overrides cell rendering
	pub fn content(mut self, content: impl Fn(&Row) -> View + Send + Sync + 'static) -> Self {
		self.content = Some(Arc::new(content));
		self
	}

	/// Sets whether this column is shown (hidden columns are dropped before merging)
	pub fn visible(mut self, visible: bool) -> Self {
		self.visible = visible;
		self
	}

	/// Returns the row field this column reads
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the header label
	pub fn label(&self) -> &Label {
		&self.label
	}

	/// Returns the join key when it is set and non-empty
	pub fn join_key(&self) -> Option<&str> {
		self.join.as_deref().filter(|key| !key.is_empty())
	}

	/// Returns the cell abilities
	pub fn abilities(&self) -> &Ability {
		&self.ability
	}

	/// Returns the declared filters
	pub fn filters(&self) -> &[Filter] {
		&self.filters
	}

	/// Returns the custom cell renderer
	pub fn content_fn(&self) -> Option<&CellFn> {
		self.content.as_ref()
	}

	/// Returns whether the column is shown
	pub fn is_visible(&self) -> bool {
		self.visible
	}
}

impl PartialEq for Column {
	fn eq(&self, other: &Self) -> bool {
		let same_content = match (&self.content, &other.content) {
			(Some(a), Some(b)) => Arc::ptr_eq(a, b),
			(None, None) => true,
			_ => false,
		};
		same_content
			&& self.name == other.name
			&& self.label == other.label
			&& self.join == other.join
			&& self.ability == other.ability
			&& self.filters == other.filters
			&& self.visible == other.visible
	}
}

impl Debug for Column {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Column")
			.field("name", &self.name)
			.field("label", &self.label)
			.field("join", &self.join)
			.field("ability", &self.ability)
			.field("filters", &self.filters)
			.field("has_content", &self.content.is_some())
			.field("visible", &self.visible)
			.finish()
	}
}
