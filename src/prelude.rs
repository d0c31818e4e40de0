//! Common imports
//!
//! ```
//! use tablecring::prelude::*;
//! ```

pub use tablecring_view::{Callback, ElementView, EventData, EventType, IntoView, View};

#[cfg(feature = "core")]
pub use tablecring_core::{
	Ability, ActionEntry, Clipboard, Column, DataTable, Filter, FilterKind, Label, Mailbox,
	Navigator, PaginationState, Params, Row, TableError, TableEvents, TableMsg, TableProps,
	TableSettings, merge_columns,
};

#[cfg(feature = "core")]
pub use tablecring_core::filter::{DateSpec, SelectOption};
