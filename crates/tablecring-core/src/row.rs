//! Expandable rows

use std::collections::HashSet;

/// Expand state of one row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExpandState {
	/// Detail row hidden
	#[default]
	Collapsed,
	/// Detail row shown
	Expanded,
}

impl ExpandState {
	/// The other state
	pub fn toggled(self) -> Self {
		match self {
			ExpandState::Collapsed => ExpandState::Expanded,
			ExpandState::Expanded => ExpandState::Collapsed,
		}
	}

	/// Returns whether the detail row is shown
	pub fn is_expanded(self) -> bool {
		self == ExpandState::Expanded
	}
}

/// Expand state of every row of the current data set, by row index.
///
/// Rows start collapsed. The set is cleared whenever the data is replaced,
/// matching a remount of every row.
#[derive(Debug, Clone, Default)]
pub struct RowToggles {
	expanded: HashSet<usize>,
}

impl RowToggles {
	/// All rows collapsed
	pub fn new() -> Self {
		Self::default()
	}

	/// State of row `index`
	pub fn state(&self, index: usize) -> ExpandState {
		if self.expanded.contains(&index) {
			ExpandState::Expanded
		} else {
			ExpandState::Collapsed
		}
	}

	/// Flips row `index` and returns its new state
	pub fn toggle(&mut self, index: usize) -> ExpandState {
		let next = self.state(index).toggled();
		match next {
			ExpandState::Expanded => self.expanded.insert(index),
			ExpandState::Collapsed => self.expanded.remove(&index),
		};
		tracing::trace!(row = index, state = ?next, "row toggled");
		next
	}

	/// Collapses every row
	pub fn clear(&mut self) {
		self.expanded.clear();
	}

	/// Number of expanded rows
	pub fn expanded_count(&self) -> usize {
		self.expanded.len()
	}
}
