//! Global event listeners with scoped lifetimes.
//!
//! Some table features need listeners on a shared target (the document's
//! `scroll` event for the filter popup). [`ListenerHandle`] owns one such
//! registration and removes it when dropped, so a registration can never
//! outlive the component that created it.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::view::{EventData, EventType, ViewEventHandler};

/// Identifier of a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// A target that global listeners can be attached to (e.g. `window`).
pub trait EventTarget: Send + Sync {
	/// Registers `handler` for `event_type` and returns its id.
	fn add_listener(&self, event_type: EventType, handler: ViewEventHandler) -> ListenerId;

	/// Removes a listener. Returns `false` if it was not registered.
	fn remove_listener(&self, id: ListenerId) -> bool;
}

/// RAII registration on an [`EventTarget`].
///
/// The listener is removed when the handle is dropped.
pub struct ListenerHandle {
	target: Arc<dyn EventTarget>,
	id: ListenerId,
	event_type: EventType,
}

impl ListenerHandle {
	/// Attaches `handler` to `target` for `event_type`.
	pub fn attach(
		target: Arc<dyn EventTarget>,
		event_type: EventType,
		handler: ViewEventHandler,
	) -> Self {
		let id = target.add_listener(event_type, handler);
		tracing::trace!(?id, event = event_type.as_str(), "listener attached");
		Self {
			target,
			id,
			event_type,
		}
	}

	/// Returns the id of the underlying registration.
	pub fn id(&self) -> ListenerId {
		self.id
	}

	/// Returns the event type this handle listens to.
	pub fn event_type(&self) -> EventType {
		self.event_type
	}
}

impl Drop for ListenerHandle {
	fn drop(&mut self) {
		let removed = self.target.remove_listener(self.id);
		tracing::trace!(
			id = ?self.id,
			event = self.event_type.as_str(),
			removed,
			"listener detached"
		);
	}
}

impl std::fmt::Debug for ListenerHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ListenerHandle")
			.field("id", &self.id)
			.field("event_type", &self.event_type)
			.finish_non_exhaustive()
	}
}

/// In-process [`EventTarget`] that can dispatch events itself.
///
/// Used as the document stand-in for server-side rendering and tests.
#[derive(Default)]
pub struct ListenerRegistry {
	next_id: AtomicU64,
	listeners: Mutex<BTreeMap<ListenerId, (EventType, ViewEventHandler)>>,
}

impl ListenerRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of listeners registered for `event_type`.
	pub fn listener_count(&self, event_type: EventType) -> usize {
		self.listeners
			.lock()
			.values()
			.filter(|(kind, _)| *kind == event_type)
			.count()
	}

	/// Total number of registered listeners.
	pub fn len(&self) -> usize {
		self.listeners.lock().len()
	}

	/// Returns true if no listeners are registered.
	pub fn is_empty(&self) -> bool {
		self.listeners.lock().is_empty()
	}

	/// Calls every listener registered for `event_type` in registration order.
	///
	/// Returns the number of listeners invoked.
	pub fn dispatch(&self, event_type: EventType, data: &EventData) -> usize {
		// Handlers may register or remove listeners, so never call them under the lock.
		let handlers: Vec<ViewEventHandler> = self
			.listeners
			.lock()
			.values()
			.filter(|(kind, _)| *kind == event_type)
			.map(|(_, handler)| Arc::clone(handler))
			.collect();
		for handler in &handlers {
			handler(data);
		}
		handlers.len()
	}
}

impl EventTarget for ListenerRegistry {
	fn add_listener(&self, event_type: EventType, handler: ViewEventHandler) -> ListenerId {
		let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
		self.listeners.lock().insert(id, (event_type, handler));
		id
	}

	fn remove_listener(&self, id: ListenerId) -> bool {
		self.listeners.lock().remove(&id).is_some()
	}
}

impl std::fmt::Debug for ListenerRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ListenerRegistry")
			.field("len", &self.len())
			.finish()
	}
}
