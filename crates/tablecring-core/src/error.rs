//! Error types for the table engine

use thiserror::Error;

/// Table engine error type
#[derive(Debug, Error)]
pub enum TableError {
	/// A row index outside the current data set
	#[error("Row {index} is out of range (table has {len} rows)")]
	RowOutOfRange {
		/// Requested index
		index: usize,
		/// Number of rows currently held
		len: usize,
	},

	/// An action index outside the configured action list
	#[error("Action {index} is out of range ({len} actions configured)")]
	ActionOutOfRange {
		/// Requested index
		index: usize,
		/// Number of configured actions
		len: usize,
	},

	/// An action menu entry failed; the error comes from the entry's own handler
	#[error(transparent)]
	Action(#[from] anyhow::Error),

	/// Settings could not be loaded
	#[error("Settings error: {0}")]
	Settings(#[from] SettingsError),
}

/// Errors raised while loading [`TableSettings`](crate::settings::TableSettings)
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SettingsError {
	/// Settings file could not be read
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// Settings file is not valid TOML or has wrong field types
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	/// A value parsed but is not acceptable
	#[error("Invalid setting '{field}': {reason}")]
	Invalid {
		/// Offending field
		field: &'static str,
		/// Why it was rejected
		reason: String,
	},
}

/// Result type for table engine operations
pub type Result<T> = std::result::Result<T, TableError>;
