//! View primitives for the TableCRING data-table engine.
//!
//! This crate holds the rendering substrate the engine draws into:
//!
//! - [`View`] / [`ElementView`]: an element tree with attached event handlers
//!   that serialises to HTML
//! - [`Callback`]: the cloneable wrapper for outbound events
//! - [`EventTarget`] / [`ListenerHandle`]: scoped global listeners (the
//!   `scroll` listener of the filter popup)

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod callback;
pub mod listener;
pub mod view;

pub use callback::{Callback, event_handler};
pub use listener::{EventTarget, ListenerHandle, ListenerId, ListenerRegistry};
pub use view::{ElementView, EventData, EventType, IntoView, View, ViewEventHandler, html_escape};
