//! Error types for time-bucket SQL generation.
//!
//! Every error is fatal to the call that raised it. No builder returns a
//! partially rendered fragment.

use thiserror::Error;

use crate::granularity::Granularity;

/// Errors that can occur while building bucket expressions or series joins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupdateError {
	/// The time zone name does not resolve to a known IANA zone.
	#[error("Unrecognized time zone: {0}")]
	UnrecognizedTimeZone(String),

	/// The dialect or adapter name is neither PostgreSQL nor MySQL.
	#[error("Connection adapter not supported: {0}")]
	UnsupportedDialect(String),

	/// Zero-filling a time-based granularity was requested without a range.
	#[error("A range is required to zero-fill `{0}` buckets")]
	MissingRange(Granularity),

	/// The granularity name is outside the supported set.
	#[error("Invalid granularity: {0}")]
	InvalidGranularity(String),

	/// The materialized series would exceed the configured row limit.
	#[error("Series for `{granularity}` exceeds the limit of {limit} rows")]
	SeriesTooLarge {
		/// Granularity the series was requested for.
		granularity: Granularity,
		/// Configured maximum number of rows.
		limit: usize,
	},

	/// Settings could not be read or parsed.
	#[error("Settings error: {0}")]
	Settings(String),
}

/// Result type alias for groupdate operations.
pub type Result<T> = std::result::Result<T, GroupdateError>;

impl From<toml::de::Error> for GroupdateError {
	fn from(err: toml::de::Error) -> Self {
		GroupdateError::Settings(err.to_string())
	}
}

impl From<std::io::Error> for GroupdateError {
	fn from(err: std::io::Error) -> Self {
		GroupdateError::Settings(err.to_string())
	}
}
