//! Column merging
//!
//! Columns that share a non-empty `join` key collapse into one display
//! column. The merged header stacks the constituents' labels in declaration
//! order and the merged filter list is the concatenation of their filters.

use std::collections::HashMap;

use super::{Column, Label};
use crate::filter::Filter;

/// A display column, possibly made of several declared columns
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedColumn {
	column: Column,
	joined: Vec<Column>,
}

impl JoinedColumn {
	/// The merged column (name and abilities of the first constituent)
	pub fn column(&self) -> &Column {
		&self.column
	}

	/// Display name; for joined columns this is the first constituent's name
	pub fn name(&self) -> &str {
		self.column.name()
	}

	/// Header label; stacked for joined columns
	pub fn label(&self) -> &Label {
		self.column.label()
	}

	/// All filters of every constituent, in declaration order
	pub fn filters(&self) -> &[Filter] {
		self.column.filters()
	}

	/// Constituent columns; empty unless two or more columns were merged
	pub fn joined(&self) -> &[Column] {
		&self.joined
	}

	/// Returns whether this entry merges several columns
	pub fn is_joined(&self) -> bool {
		!self.joined.is_empty()
	}

	fn absorb(&mut self, other: JoinedColumn) {
		if self.joined.is_empty() {
			self.joined.push(self.column.clone());
		}

		let label = std::mem::replace(&mut self.column.label, Label::Stacked(Vec::new()));
		self.column.label = label.append(other.column.label.clone());
		self.column
			.filters
			.extend(other.column.filters.iter().cloned());

		if other.joined.is_empty() {
			self.joined.push(other.column);
		} else {
			self.joined.extend(other.joined);
		}
	}
}

impl From<Column> for JoinedColumn {
	fn from(mut column: Column) -> Self {
		// Filters without a label read as their own column once merged.
		let text = column.label.plain_text();
		if !text.is_empty() {
			for filter in &mut column.filters {
				filter.fill_label(&text);
			}
		}
		Self {
			column,
			joined: Vec::new(),
		}
	}
}

/// Normalises declared columns into display columns.
///
/// Hidden columns are dropped first. Output order is the first-occurrence
/// order of each join group; columns without a join key are never merged.
/// Feeding the output back in returns it unchanged.
///
/// # Example
///
/// ```
/// use tablecring_core::column::{Column, Label, merge_columns};
///
/// let merged = merge_columns(vec![
///     Column::new("a", "A").join("x"),
///     Column::new("b", "B").join("x"),
///     Column::new("c", "C"),
/// ]);
///
/// assert_eq!(merged.len(), 2);
/// assert_eq!(merged[0].label(), &Label::stacked(["A", "B"]));
/// assert_eq!(merged[0].joined().len(), 2);
/// assert!(!merged[1].is_joined());
/// ```
pub fn merge_columns<I>(columns: I) -> Vec<JoinedColumn>
where
	I: IntoIterator,
	I::Item: Into<JoinedColumn>,
{
	let (merged, groups) = columns
		.into_iter()
		.map(Into::into)
		.filter(|entry: &JoinedColumn| entry.column.is_visible())
		.fold(
			(Vec::<JoinedColumn>::new(), HashMap::<String, usize>::new()),
			|(mut merged, mut groups), entry| {
				match entry.column.join_key().map(str::to_owned) {
					Some(key) => match groups.get(&key) {
						Some(&index) => merged[index].absorb(entry),
						None => {
							groups.insert(key, merged.len());
							merged.push(entry);
						}
					},
					None => merged.push(entry),
				}
				(merged, groups)
			},
		);

	tracing::trace!(
		columns = merged.len(),
		join_groups = groups.len(),
		"columns merged"
	);
	merged
}
