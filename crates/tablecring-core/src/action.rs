//! Per-row action menu
//!
//! Each entry either builds a URL for client-side navigation or runs an
//! async handler. The handler's error is returned to the caller untouched
//! (wrapped in [`TableError::Action`]) and the menu stays open so the user
//! can see which action failed.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use tablecring_view::{ElementView, EventType, IntoView, View};

use crate::error::{Result, TableError};
use crate::message::{Mailbox, TableMsg};
use crate::value::Row;

/// Builds a navigation target from a row
pub type HrefFn = Arc<dyn Fn(&Row) -> String + Send + Sync>;

/// Async row handler
pub type ClickFn = Arc<dyn Fn(Row) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// What activating an entry does
#[derive(Clone)]
pub enum ActionHandler {
	/// Navigate to the returned URL
	Href(HrefFn),
	/// Await the returned future; no navigation
	OnClick(ClickFn),
}

impl std::fmt::Debug for ActionHandler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ActionHandler::Href(_) => f.write_str("Href(<function>)"),
			ActionHandler::OnClick(_) => f.write_str("OnClick(<function>)"),
		}
	}
}

/// One menu entry
#[derive(Debug, Clone)]
pub struct ActionEntry {
	label: String,
	icon: Option<String>,
	handler: ActionHandler,
}

impl ActionEntry {
	/// Entry that navigates to `href(row)`
	pub fn href(
		label: impl Into<String>,
		href: impl Fn(&Row) -> String + Send + Sync + 'static,
	) -> Self {
		Self {
			label: label.into(),
			icon: None,
			handler: ActionHandler::Href(Arc::new(href)),
		}
	}

	/// Entry that awaits `on_click(row)`
	///
	/// ```
	/// use tablecring_core::action::ActionEntry;
	///
	/// let archive = ActionEntry::on_click("Archive", |row| async move {
	///     anyhow::ensure!(row.contains_key("id"), "row has no id");
	///     Ok(())
	/// });
	/// assert_eq!(archive.label(), "Archive");
	/// ```
	pub fn on_click<F, Fut>(label: impl Into<String>, on_click: F) -> Self
	where
		F: Fn(Row) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
	{
		Self {
			label: label.into(),
			icon: None,
			handler: ActionHandler::OnClick(Arc::new(move |row: Row| on_click(row).boxed())),
		}
	}

	/// Sets the icon name
	pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
		self.icon = Some(icon.into());
		self
	}

	/// Visible text
	pub fn label(&self) -> &str {
		&self.label
	}

	/// Icon name
	pub fn icon(&self) -> Option<&str> {
		self.icon.as_deref()
	}

	/// Behaviour
	pub fn handler(&self) -> &ActionHandler {
		&self.handler
	}
}

/// Client-side router
pub trait Navigator: Send + Sync {
	/// Navigates to `url`
	fn navigate(&self, url: &str);
}

/// Navigator that records visited URLs
#[derive(Debug, Default)]
pub struct MemoryNavigator {
	visited: Mutex<Vec<String>>,
}

impl MemoryNavigator {
	/// Creates a navigator with no history
	pub fn new() -> Self {
		Self::default()
	}

	/// URLs in visit order
	pub fn visited(&self) -> Vec<String> {
		self.visited.lock().clone()
	}
}

impl Navigator for MemoryNavigator {
	fn navigate(&self, url: &str) {
		self.visited.lock().push(url.to_string());
	}
}

/// Which row's menu is showing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MenuState {
	/// No menu
	#[default]
	Closed,
	/// Menu of one row
	Open {
		/// Row index
		row: usize,
	},
}

/// Action menus of one table; at most one is open
#[derive(Debug, Clone, Default)]
pub struct ActionMenu {
	entries: Vec<ActionEntry>,
	state: MenuState,
}

impl ActionMenu {
	/// Menu with `entries` for every row
	pub fn new(entries: Vec<ActionEntry>) -> Self {
		Self {
			entries,
			state: MenuState::Closed,
		}
	}

	/// Entries shown for every row
	pub fn entries(&self) -> &[ActionEntry] {
		&self.entries
	}

	/// Returns whether any entry is declared
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Current state
	pub fn state(&self) -> MenuState {
		self.state
	}

	/// Opens the menu of `row`, or closes it if it is already open
	pub fn toggle(&mut self, row: usize) {
		self.state = match self.state {
			MenuState::Open { row: open } if open == row => MenuState::Closed,
			_ => MenuState::Open { row },
		};
	}

	/// Closes the menu
	pub fn close(&mut self) {
		self.state = MenuState::Closed;
	}

	/// Runs entry `entry` for `row`.
	///
	/// The menu closes once the entry succeeded; a failing handler leaves
	/// it open and its error is returned.
	pub async fn activate(
		&mut self,
		entry: usize,
		row: &Row,
		navigator: Option<&dyn Navigator>,
	) -> Result<()> {
		let action = self
			.entries
			.get(entry)
			.ok_or(TableError::ActionOutOfRange {
				index: entry,
				len: self.entries.len(),
			})?;
		tracing::debug!(action = %action.label, "row action activated");

		match &action.handler {
			ActionHandler::OnClick(on_click) => {
				let on_click = Arc::clone(on_click);
				on_click(row.clone()).await?;
			}
			ActionHandler::Href(href) => {
				let url = href(row);
				match navigator {
					Some(navigator) => navigator.navigate(&url),
					None => tracing::warn!(%url, "no navigator for href action"),
				}
			}
		}

		self.close();
		Ok(())
	}

	/// Menu button and, when open, the entry list of `row`
	pub fn render(&self, row: usize, mailbox: &Mailbox) -> View {
		let button = ElementView::new("button")
			.attr("type", "button")
			.class("tablecring-action-toggle")
			.attr("aria-label", "Actions")
			.on(EventType::Click, mailbox.post(TableMsg::ToggleActionMenu(row)))
			.child("⋮");

		let open = self.state == MenuState::Open { row };
		let list = open.then(|| {
			let items = self.entries.iter().enumerate().map(|(index, entry)| {
				let icon = entry.icon().map(|icon| {
					ElementView::new("i")
						.class(format!("tablecring-icon icon-{icon}"))
				});
				ElementView::new("li").child(
					ElementView::new("button")
						.attr("type", "button")
						.class("tablecring-action")
						.on(
							EventType::Click,
							mailbox.post(TableMsg::Action { row, entry: index }),
						)
						.child(icon)
						.child(entry.label().to_string()),
				)
			});
			ElementView::new("ul")
				.class("tablecring-action-menu")
				.attr("role", "menu")
				.children(items)
		});

		// Menu clicks must not also activate the row.
		ElementView::new("div")
			.class("tablecring-actions")
			.stop_propagation(EventType::Click)
			.child(button)
			.child(list)
			.into_view()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use std::sync::atomic::{AtomicUsize, Ordering};

	fn row() -> Row {
		json!({"id": "inv-1"}).as_object().unwrap().clone()
	}

	#[test]
	fn test_only_one_menu_open() {
		let mut menu = ActionMenu::new(vec![ActionEntry::href("View", |_| "/".to_string())]);
		menu.toggle(0);
		menu.toggle(2);
		assert_eq!(menu.state(), MenuState::Open { row: 2 });
		menu.toggle(2);
		assert_eq!(menu.state(), MenuState::Closed);
	}

	#[tokio::test]
	async fn test_href_navigates_and_closes() {
		let navigator = MemoryNavigator::new();
		let mut menu = ActionMenu::new(vec![ActionEntry::href("View", |row| {
			format!("/invoices/{}", row["id"].as_str().unwrap_or_default())
		})]);
		menu.toggle(0);

		menu.activate(0, &row(), Some(&navigator)).await.unwrap();
		assert_eq!(navigator.visited(), vec!["/invoices/inv-1"]);
		assert_eq!(menu.state(), MenuState::Closed);
	}

	#[tokio::test]
	async fn test_on_click_does_not_navigate() {
		let calls = Arc::new(AtomicUsize::new(0));
		let navigator = MemoryNavigator::new();
		let mut menu = ActionMenu::new(vec![ActionEntry::on_click("Ping", {
			let calls = Arc::clone(&calls);
			move |_| {
				let calls = Arc::clone(&calls);
				async move {
					calls.fetch_add(1, Ordering::SeqCst);
					Ok(())
				}
			}
		})]);

		menu.activate(0, &row(), Some(&navigator)).await.unwrap();
		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert!(navigator.visited().is_empty());
	}

	#[tokio::test]
	async fn test_failure_propagates_and_keeps_menu_open() {
		let mut menu = ActionMenu::new(vec![ActionEntry::on_click("Refund", |_| async {
			Err::<(), _>(anyhow::anyhow!("gateway timeout"))
		})]);
		menu.toggle(1);

		let error = menu.activate(0, &row(), None).await.unwrap_err();
		assert!(matches!(error, TableError::Action(_)));
		assert_eq!(error.to_string(), "gateway timeout");
		assert_eq!(menu.state(), MenuState::Open { row: 1 });
	}

	#[tokio::test]
	async fn test_unknown_entry_is_an_error() {
		let mut menu = ActionMenu::default();
		let error = menu.activate(3, &row(), None).await.unwrap_err();
		assert!(matches!(error, TableError::ActionOutOfRange { index: 3, len: 0 }));
	}
}
