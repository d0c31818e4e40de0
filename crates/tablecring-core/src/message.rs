//! Table messages
//!
//! Event handlers in the rendered view never touch table state. They post a
//! [`TableMsg`] to the table's [`Mailbox`]; the owner drains it and applies
//! each message with [`DataTable::handle`](crate::table::DataTable::handle),
//! in the order the events fired.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tablecring_view::{ViewEventHandler, event_handler};

/// Everything a user can do to a table
#[derive(Debug, Clone, PartialEq)]
pub enum TableMsg {
	/// Filter trigger of a header cell activated
	OpenFilter {
		/// Header cell id
		id_from: String,
		/// Display column name
		name_from: String,
	},
	/// Panel dismissed
	CloseFilter,
	/// One filter value written
	SetFilterField {
		/// Filter name
		name: String,
		/// New value
		value: Value,
	},
	/// Panel form submitted
	SubmitFilter,
	/// Panel edits discarded, panel stays open
	ResetFilter,
	/// Expand toggle of a row
	ToggleRow(usize),
	/// Row activated; expand toggle and action menu clicks stop short of the row
	RowClick(usize),
	/// Explicit page requested
	GoToPage(u64),
	/// "Previous" control
	PrevPage,
	/// "Next" control
	NextPage,
	/// Keystroke in the "go to page" field
	PageInput(String),
	/// "Go to page" field committed
	PageInputSubmit,
	/// Action menu button of a row
	ToggleActionMenu(usize),
	/// Action entry activated
	Action {
		/// Row index
		row: usize,
		/// Entry index
		entry: usize,
	},
}

/// Queue of pending messages, shared with view event handlers
#[derive(Debug, Clone, Default)]
pub struct Mailbox {
	queue: Arc<Mutex<VecDeque<TableMsg>>>,
}

impl Mailbox {
	/// Creates an empty mailbox
	pub fn new() -> Self {
		Self::default()
	}

	/// Enqueues a message
	pub fn send(&self, msg: TableMsg) {
		tracing::trace!(?msg, "table message queued");
		self.queue.lock().push_back(msg);
	}

	/// Takes the oldest pending message
	pub fn pop(&self) -> Option<TableMsg> {
		self.queue.lock().pop_front()
	}

	/// Takes every pending message, oldest first
	pub fn drain(&self) -> Vec<TableMsg> {
		self.queue.lock().drain(..).collect()
	}

	/// Number of pending messages
	pub fn len(&self) -> usize {
		self.queue.lock().len()
	}

	/// Returns whether nothing is pending
	pub fn is_empty(&self) -> bool {
		self.queue.lock().is_empty()
	}

	/// Handler that posts `msg` whenever it fires
	pub fn post(&self, msg: TableMsg) -> ViewEventHandler {
		let mailbox = self.clone();
		event_handler(move |_| mailbox.send(msg.clone()))
	}

	/// Handler that builds a message from the event's target value
	pub fn post_value(
		&self,
		build: impl Fn(String) -> TableMsg + Send + Sync + 'static,
	) -> ViewEventHandler {
		let mailbox = self.clone();
		event_handler(move |data| mailbox.send(build(data.value.clone().unwrap_or_default())))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tablecring_view::EventData;

	#[test]
	fn test_handlers_queue_in_fire_order() {
		let mailbox = Mailbox::new();
		let next = mailbox.post(TableMsg::NextPage);
		let typed = mailbox.post_value(TableMsg::PageInput);

		next(&EventData::default());
		typed(&EventData::with_value("4"));

		assert_eq!(
			mailbox.drain(),
			vec![TableMsg::NextPage, TableMsg::PageInput("4".to_string())]
		);
		assert!(mailbox.is_empty());
	}
}
