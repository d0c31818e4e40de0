//! # TableCRING
//!
//! A generic data-table engine: declared columns are merged into display
//! columns, every column may own typed filters shown in a popup panel, cells
//! render with search highlighting, currency formatting and copy affordances,
//! and pagination and per-row actions report back to the caller.
//!
//! ## Feature Flags
//!
//! - `core` (default): the table engine ([`tablecring_core`])
//!
//! Without `core` only the view primitives of [`view`] are available.
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use tablecring::prelude::*;
//!
//! let columns = vec![
//!     Column::new("id", "ID").ability(Ability::new().copy()),
//!     Column::new("amount", "Amount").ability(Ability::new().currency("Rp")),
//! ];
//! let row = json!({"id": "inv-1", "amount": 150000});
//! let props = TableProps::new(columns)
//!     .with_id("invoices")
//!     .with_data(vec![row.as_object().unwrap().clone()]);
//!
//! let table = DataTable::new(props, TableEvents::default());
//! assert!(table.render().text_content().contains("Rp 150.000"));
//! ```

#![warn(missing_docs)]

pub mod prelude;

/// View tree, callbacks and scoped listeners
pub use tablecring_view as view;

#[cfg(feature = "core")]
pub use tablecring_core::{
	action, cell, column, error, filter, format, message, pagination, placement, row, settings,
	table, value,
};

#[cfg(feature = "core")]
pub use tablecring_core::{
	Ability, ActionEntry, Column, DataTable, Filter, FilterKind, Label, PaginationState, Params,
	Result, Row, TableError, TableEvents, TableMsg, TableProps, TableSettings,
};
