//! Filter declarations
//!
//! Every column may declare filters. A filter's kind is a closed set
//! ([`FilterKind`]) so the panel renderer can match exhaustively:
//!
//! - `Text`: free-text input
//! - `Select`: one value out of fixed options
//! - `Autocomplete`: delegated search widget whose result fills several shape fields
//! - `Date`: single date
//! - `DateRange`: start / end dates
//!
//! Filters are declared per column and flattened into one list, each
//! tagged with the display column that owns it ([`FlatFilter::name_from`]).

pub mod field;
pub mod form;
pub mod registry;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::column::JoinedColumn;

pub use field::{FieldProps, FieldRenderer, HtmlFieldRenderer};
pub use form::{FilterFormState, FormStore, build_form_defaults, scrub_payload};
pub use registry::{FilterRegistry, OpenRequest, PanelState};

/// One option of a select filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
	/// Text shown to the user
	pub label: String,
	/// Value written into the form state
	pub value: String,
}

impl SelectOption {
	/// Creates an option
	pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			value: value.into(),
		}
	}
}

/// Search service queried by an autocomplete widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchService {
	/// Endpoint the widget queries
	pub endpoint: String,
	/// Result fields the typed keyword is matched against
	pub keyword_fields: Vec<String>,
}

/// Maps one field of a search result into the flat form value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeField {
	/// Key inside the filter's form value
	pub field: String,
	/// Field of the search result it is copied from
	pub from: String,
}

impl ShapeField {
	/// Creates a mapping
	pub fn new(field: impl Into<String>, from: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			from: from.into(),
		}
	}
}

/// Autocomplete payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteSpec {
	/// Where suggestions come from
	pub service: SearchService,
	/// How a picked suggestion becomes form values
	pub shape: Vec<ShapeField>,
}

fn default_date_format() -> String {
	"%Y-%m-%d".to_string()
}

/// Bounds and display format of date filters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpec {
	/// Earliest selectable date
	#[serde(default)]
	pub min: Option<NaiveDate>,
	/// Latest selectable date
	#[serde(default)]
	pub max: Option<NaiveDate>,
	/// `strftime` format of the submitted value
	#[serde(default = "default_date_format")]
	pub format: String,
}

impl Default for DateSpec {
	fn default() -> Self {
		Self {
			min: None,
			max: None,
			format: default_date_format(),
		}
	}
}

impl DateSpec {
	/// Formats a bound with this spec's format
	pub fn format_bound(&self, date: Option<NaiveDate>) -> Option<String> {
		date.map(|d| d.format(&self.format).to_string())
	}
}

/// Kind of a filter input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FilterKind {
	/// Free text
	Text,
	/// Fixed options
	Select {
		/// Available options
		options: Vec<SelectOption>,
	},
	/// Delegated search widget
	Autocomplete(AutocompleteSpec),
	/// Single date
	Date(DateSpec),
	/// Start and end date; the form value is `{"start": .., "end": ..}`
	DateRange(DateSpec),
}

impl FilterKind {
	/// Kebab-case tag of this kind
	pub fn tag(&self) -> &'static str {
		match self {
			FilterKind::Text => "text",
			FilterKind::Select { .. } => "select",
			FilterKind::Autocomplete(_) => "autocomplete",
			FilterKind::Date(_) => "date",
			FilterKind::DateRange(_) => "date-range",
		}
	}
}

/// One input of a filter panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
	name: String,
	#[serde(default)]
	label: Option<String>,
	#[serde(flatten)]
	kind: FilterKind,
}

impl Filter {
	/// Creates a filter of any kind
	pub fn new(name: impl Into<String>, kind: FilterKind) -> Self {
		Self {
			name: name.into(),
			label: None,
			kind,
		}
	}

	/// Free-text filter
	pub fn text(name: impl Into<String>) -> Self {
		Self::new(name, FilterKind::Text)
	}

	/// Select filter
	pub fn select(name: impl Into<String>, options: impl IntoIterator<Item = SelectOption>) -> Self {
		Self::new(
			name,
			FilterKind::Select {
				options: options.into_iter().collect(),
			},
		)
	}

	/// Autocomplete filter
	pub fn autocomplete(name: impl Into<String>, spec: AutocompleteSpec) -> Self {
		Self::new(name, FilterKind::Autocomplete(spec))
	}

	/// Single date filter
	pub fn date(name: impl Into<String>, spec: DateSpec) -> Self {
		Self::new(name, FilterKind::Date(spec))
	}

	/// Date range filter
	pub fn date_range(name: impl Into<String>, spec: DateSpec) -> Self {
		Self::new(name, FilterKind::DateRange(spec))
	}

	/// Sets an explicit display label
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Form-state key
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Display label, if one is known
	pub fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	/// Input kind
	pub fn kind(&self) -> &FilterKind {
		&self.kind
	}

	pub(crate) fn fill_label(&mut self, label: &str) {
		if self.label.is_none() {
			self.label = Some(label.to_string());
		}
	}
}

/// A filter tagged with the display column that owns it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatFilter {
	/// The declaration
	pub filter: Filter,
	/// Name of the owning display column
	pub name_from: String,
}

impl FlatFilter {
	/// Form-state key
	pub fn name(&self) -> &str {
		self.filter.name()
	}

	/// Label to show: the filter's own, else its form key
	pub fn display_label(&self) -> &str {
		self.filter.label().unwrap_or(self.filter.name())
	}
}

/// Flattens every display column's filters into one ordered list.
pub fn flatten_filters(columns: &[JoinedColumn]) -> Vec<FlatFilter> {
	columns
		.iter()
		.flat_map(|column| {
			column.filters().iter().map(move |filter| FlatFilter {
				filter: filter.clone(),
				name_from: column.name().to_string(),
			})
		})
		.collect()
}
