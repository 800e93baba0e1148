//! Settings for time-bucket SQL generation.
//!
//! Loaded from TOML:
//!
//! ```toml
//! time_zone = "Europe/Berlin"
//! max_series_rows = 5000
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
	builder::{BucketSqlBuilder, DEFAULT_MAX_SERIES_ROWS},
	dialect::Dialect,
	error::Result,
	time_zone::{TimeZoneSpec, clear_default_time_zone, set_default_time_zone},
};

/// Groupdate settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupdateSettings {
	/// Default zone installed by [`GroupdateSettings::apply`]; `None` means UTC.
	pub time_zone: Option<String>,

	/// Cap on rows in a materialized series, 0 for no cap.
	pub max_series_rows: usize,
}

impl Default for GroupdateSettings {
	fn default() -> Self {
		Self {
			time_zone: None,
			max_series_rows: DEFAULT_MAX_SERIES_ROWS,
		}
	}
}

impl GroupdateSettings {
	/// Parse settings from a TOML string.
	///
	/// # Examples
	///
	/// ```rust
	/// use reinhardt_groupdate::GroupdateSettings;
	///
	/// let settings = GroupdateSettings::from_toml_str("time_zone = \"Asia/Tokyo\"").unwrap();
	/// assert_eq!(settings.time_zone.as_deref(), Some("Asia/Tokyo"));
	/// assert_eq!(settings.max_series_rows, 10_000);
	/// ```
	pub fn from_toml_str(content: &str) -> Result<Self> {
		let settings: Self = toml::from_str(content)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Load settings from a TOML file.
	///
	/// # Errors
	///
	/// Returns [`GroupdateError::Settings`](crate::GroupdateError::Settings)
	/// if the file cannot be read or parsed, and
	/// [`GroupdateError::UnrecognizedTimeZone`](crate::GroupdateError::UnrecognizedTimeZone)
	/// for an unknown zone.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
		let content = std::fs::read_to_string(path.as_ref())?;
		tracing::debug!(path = %path.as_ref().display(), "loading groupdate settings");
		Self::from_toml_str(&content)
	}

	/// Check that the configured zone resolves.
	pub fn validate(&self) -> Result<()> {
		self.zone().map(|_| ())
	}

	/// The configured zone, UTC when unset.
	pub fn zone(&self) -> Result<TimeZoneSpec> {
		match &self.time_zone {
			Some(name) => TimeZoneSpec::parse(name),
			None => Ok(TimeZoneSpec::UTC),
		}
	}

	/// Row cap as the builder takes it.
	pub fn series_limit(&self) -> Option<usize> {
		(self.max_series_rows > 0).then_some(self.max_series_rows)
	}

	/// Install the configured zone as the process-wide default, or clear the
	/// default when none is configured.
	pub fn apply(&self) -> Result<()> {
		match &self.time_zone {
			Some(name) => {
				set_default_time_zone(name)?;
			}
			None => clear_default_time_zone(),
		}
		Ok(())
	}

	/// A builder carrying these settings, without touching the process
	/// default.
	pub fn builder(&self, dialect: Dialect) -> Result<BucketSqlBuilder> {
		Ok(BucketSqlBuilder::new(dialect)
			.time_zone(self.zone()?)
			.max_series_rows(self.series_limit()))
	}
}
