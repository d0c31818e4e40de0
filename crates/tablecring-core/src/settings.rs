//! Table settings
//!
//! Display constants that differ between deployments (currency grouping,
//! popup offset, empty-state copy) live in [`TableSettings`]. Settings are
//! plain serde data and can be loaded from TOML:
//!
//! ```
//! use tablecring_core::settings::TableSettings;
//!
//! let settings = TableSettings::from_toml_str(
//!     r#"
//!     thousands_separator = ","
//!     empty_text = "Nothing here"
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(settings.thousands_separator, ',');
//! assert_eq!(settings.popup_offset, 40.0);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SettingsError};
use crate::format::NumberFormat;

/// Deployment-level settings for every table instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
	/// Vertical gap between a filter trigger and its popup, in pixels
	pub popup_offset: f64,
	/// Separator inserted between thousands groups of currency values
	pub thousands_separator: char,
	/// Separator placed before the fractional part of currency values
	pub decimal_separator: char,
	/// Message shown when the table is not loading and has no rows
	pub empty_text: String,
	/// Message shown while the caller reports `is_loading`
	pub loading_text: String,
	/// Keep numeric `0` sub-fields when scrubbing filter payloads
	pub scrub_keeps_zero: bool,
	/// Prefix for generated element ids
	pub id_prefix: String,
}

impl Default for TableSettings {
	fn default() -> Self {
		Self {
			popup_offset: 40.0,
			thousands_separator: '.',
			decimal_separator: ',',
			empty_text: "No data found".to_string(),
			loading_text: "Loading...".to_string(),
			scrub_keeps_zero: false,
			id_prefix: "tablecring".to_string(),
		}
	}
}

impl TableSettings {
	/// Parses settings from TOML text; missing keys take their defaults
	pub fn from_toml_str(source: &str) -> Result<Self> {
		let settings: Self = toml::from_str(source).map_err(SettingsError::from)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Reads settings from a TOML file
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let source = fs::read_to_string(path).map_err(SettingsError::from)?;
		tracing::debug!(path = %path.display(), "loading table settings");
		Self::from_toml_str(&source)
	}

	/// Currency separators
	pub fn number_format(&self) -> NumberFormat {
		NumberFormat {
			thousands: self.thousands_separator,
			decimal: self.decimal_separator,
		}
	}

	/// Checks invariants serde cannot express
	pub fn validate(&self) -> std::result::Result<(), SettingsError> {
		if !self.popup_offset.is_finite() {
			return Err(SettingsError::Invalid {
				field: "popup_offset",
				reason: "must be a finite number".to_string(),
			});
		}
		if self.thousands_separator.is_ascii_digit() {
			return Err(SettingsError::Invalid {
				field: "thousands_separator",
				reason: "must not be a digit".to_string(),
			});
		}
		if self.decimal_separator == self.thousands_separator {
			return Err(SettingsError::Invalid {
				field: "decimal_separator",
				reason: "must differ from thousands_separator".to_string(),
			});
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::TableError;
	use rstest::rstest;
	use std::io::Write;

	#[rstest]
	fn test_defaults() {
		let settings = TableSettings::default();
		assert_eq!(settings.popup_offset, 40.0);
		assert_eq!(settings.thousands_separator, '.');
		assert_eq!(settings.empty_text, "No data found");
		assert!(!settings.scrub_keeps_zero);
	}

	#[rstest]
	fn test_empty_toml_is_default() {
		let settings = TableSettings::from_toml_str("").unwrap();
		assert_eq!(settings, TableSettings::default());
	}

	#[rstest]
	#[case("thousands_separator = \"5\"", "thousands_separator")]
	#[case("decimal_separator = \".\"", "decimal_separator")]
	fn test_invalid_separators(#[case] source: &str, #[case] field: &str) {
		let err = TableSettings::from_toml_str(source).unwrap_err();
		assert!(matches!(err, TableError::Settings(SettingsError::Invalid { .. })));
		assert!(err.to_string().contains(field));
	}

	#[rstest]
	fn test_wrong_type_is_toml_error() {
		let err = TableSettings::from_toml_str("popup_offset = \"far\"").unwrap_err();
		assert!(matches!(err, TableError::Settings(SettingsError::Toml(_))));
	}

	#[rstest]
	fn test_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "popup_offset = 24.0\nscrub_keeps_zero = true").unwrap();

		let settings = TableSettings::from_file(file.path()).unwrap();
		assert_eq!(settings.popup_offset, 24.0);
		assert!(settings.scrub_keeps_zero);
	}

	#[rstest]
	fn test_missing_file_is_io_error() {
		let err = TableSettings::from_file("/definitely/not/here.toml").unwrap_err();
		assert!(matches!(err, TableError::Settings(SettingsError::Io(_))));
	}
}
