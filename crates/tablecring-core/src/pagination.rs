//! Pagination arithmetic
//!
//! Page numbers are 1-indexed. The table never clamps a requested page
//! against `total`; the `on_page` owner decides what an out-of-range page
//! means.

use serde::{Deserialize, Serialize};

/// Server-side pagination as reported by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
	/// Current page
	pub current: u64,
	/// Rows per page
	pub limit: u64,
	/// Number of pages
	pub total: u64,
	/// Number of rows across all pages
	pub rows: u64,
}

impl PaginationState {
	/// Number of the first row shown
	pub fn range_start(&self) -> u64 {
		self.current
			.saturating_mul(self.limit)
			.saturating_sub(self.limit.saturating_sub(1))
	}

	/// Number of the last row shown, never past `rows`
	pub fn range_end(&self) -> u64 {
		self.current.saturating_mul(self.limit).min(self.rows)
	}

	/// `"{start} - {end} of {rows}"`
	///
	/// ```
	/// use tablecring_core::pagination::PaginationState;
	///
	/// let state = PaginationState { current: 2, limit: 10, total: 5, rows: 45 };
	/// assert_eq!(state.display(), "11 - 20 of 45");
	/// ```
	pub fn display(&self) -> String {
		format!(
			"{} - {} of {}",
			self.range_start(),
			self.range_end(),
			self.rows
		)
	}

	/// Page requested by the "previous" control
	pub fn prev_page(&self) -> u64 {
		self.current.saturating_sub(1)
	}

	/// Page requested by the "next" control
	pub fn next_page(&self) -> u64 {
		self.current + 1
	}

	/// Returns whether there is a page before the current one
	pub fn has_prev(&self) -> bool {
		self.current > 1
	}

	/// Returns whether there is a page after the current one
	pub fn has_next(&self) -> bool {
		self.current < self.total
	}
}

/// "Go to page" text field that only ever holds digits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoToPageInput {
	text: String,
}

impl GoToPageInput {
	/// Empty field
	pub fn new() -> Self {
		Self::default()
	}

	/// Current field text
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Applies a keystroke result.
	///
	/// Returns `false` and leaves the field unchanged when `raw` contains
	/// anything but ASCII digits.
	pub fn input(&mut self, raw: &str) -> bool {
		if !raw.chars().all(|c| c.is_ascii_digit()) {
			tracing::trace!(input = %raw, "rejected non-numeric page input");
			return false;
		}
		self.text = raw.to_string();
		true
	}

	/// Requested page, if the field holds one
	pub fn page(&self) -> Option<u64> {
		self.text.parse().ok()
	}

	/// Empties the field
	pub fn clear(&mut self) {
		self.text.clear();
	}
}
