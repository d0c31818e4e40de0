//! Callback types and event handler conversion.
//!
//! [`Callback`] is the cloneable function wrapper used for every outbound
//! table event (`on_filter`, `on_click`, `on_page`). [`event_handler`] builds
//! a [`ViewEventHandler`] for element handlers.

use std::sync::Arc;

use crate::view::{EventData, ViewEventHandler};

/// A type-safe, cloneable callback wrapper.
///
/// `Callback` wraps a function in an `Arc`, making it cheaply cloneable while
/// providing a stable reference that won't change between renders.
///
/// ## Example
///
/// ```
/// use tablecring_view::Callback;
///
/// let double = Callback::new(|x: i32| x * 2);
/// assert_eq!(double.call(21), 42);
/// ```
pub struct Callback<Args, Ret = ()> {
	inner: Arc<dyn Fn(Args) -> Ret + Send + Sync + 'static>,
}

impl<Args, Ret> Callback<Args, Ret> {
	/// Creates a new Callback from a function or closure.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(Args) -> Ret + Send + Sync + 'static,
	{
		Self { inner: Arc::new(f) }
	}

	/// Calls the callback with the given arguments.
	pub fn call(&self, args: Args) -> Ret {
		(self.inner)(args)
	}
}

impl<Args, Ret> Clone for Callback<Args, Ret> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<Args, Ret> std::fmt::Debug for Callback<Args, Ret> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Callback")
			.field("inner", &"<function>")
			.finish()
	}
}

impl<F, Args, Ret> From<F> for Callback<Args, Ret>
where
	F: Fn(Args) -> Ret + Send + Sync + 'static,
{
	fn from(f: F) -> Self {
		Self::new(f)
	}
}

/// Event handler helper with a concrete argument type for better inference.
pub fn event_handler(f: impl Fn(&EventData) + Send + Sync + 'static) -> ViewEventHandler {
	Arc::new(f)
}
