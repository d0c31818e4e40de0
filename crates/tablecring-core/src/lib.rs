//! TableCRING data-table engine
//!
//! A column-merging, multi-type filter, form-synchronised, paginated table
//! renderer. The caller supplies rows, columns, the current query params and
//! pagination; the engine renders a [`View`](tablecring_view::View) and
//! reports interaction through `on_filter`, `on_click` and `on_page`.
//!
//! ## Modules
//!
//! - [`column`]: column declarations and [`merge_columns`](column::merge_columns)
//! - [`filter`]: filter kinds, the form store and the [`FilterRegistry`](filter::FilterRegistry)
//! - [`placement`]: filter popup positioning
//! - [`cell`]: cell dispatch, highlighting and copy affordances
//! - [`pagination`]: range display and the "go to page" field
//! - [`action`]: per-row action menus
//! - [`table`]: [`DataTable`](table::DataTable), tying everything together
//!
//! The engine holds no server data and performs no I/O of its own.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod action;
pub mod cell;
pub mod column;
pub mod error;
pub mod filter;
pub mod format;
pub mod message;
pub mod pagination;
pub mod placement;
pub mod row;
pub mod settings;
pub mod table;
pub mod value;

pub use action::{ActionEntry, ActionHandler, ActionMenu, MenuState, Navigator};
pub use cell::{Clipboard, NO_DATA};
pub use column::{Ability, Column, JoinedColumn, Label, merge_columns};
pub use error::{Result, SettingsError, TableError};
pub use filter::{Filter, FilterKind, FilterRegistry, OpenRequest, PanelState};
pub use message::{Mailbox, TableMsg};
pub use pagination::PaginationState;
pub use placement::{Placement, Rect, Size, compute_placement};
pub use settings::TableSettings;
pub use table::{DataTable, TableEvents, TableProps};
pub use value::{Params, Row};
