//! Time zone resolution.
//!
//! A zone is resolved in this order: the name given by the caller, the
//! process-wide default installed with [`set_default_time_zone`], then UTC.
//! Names are looked up in the IANA database shipped with `chrono-tz`; the
//! canonical spelling is what ends up bound into SQL.

use std::fmt;

use chrono_tz::Tz;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::error::{GroupdateError, Result};

/// Process-wide default zone.
static DEFAULT_TIME_ZONE: Lazy<RwLock<Option<TimeZoneSpec>>> = Lazy::new(|| RwLock::new(None));

/// A resolved IANA time zone.
///
/// # Examples
///
/// ```rust
/// use reinhardt_groupdate::TimeZoneSpec;
///
/// let zone = TimeZoneSpec::parse("america/new_york").unwrap();
/// assert_eq!(zone.name(), "America/New_York");
/// assert!(TimeZoneSpec::parse("Mars/Olympus").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeZoneSpec(Tz);

impl TimeZoneSpec {
	pub const UTC: TimeZoneSpec = TimeZoneSpec(chrono_tz::UTC);

	/// Look up a zone by name, exact spelling first, then case-insensitively.
	pub fn parse(name: &str) -> Result<Self> {
		name.parse::<Tz>()
			.or_else(|_| Tz::from_str_insensitive(name))
			.map(TimeZoneSpec)
			.map_err(|_| GroupdateError::UnrecognizedTimeZone(name.to_string()))
	}

	/// Resolve an optional caller-supplied name against the process default.
	pub fn resolve(name: Option<&str>) -> Result<Self> {
		let zone = match name {
			Some(name) => Self::parse(name)?,
			None => default_time_zone().unwrap_or(Self::UTC),
		};
		tracing::trace!(requested = ?name, resolved = zone.name(), "resolved time zone");
		Ok(zone)
	}

	/// Canonical IANA name.
	pub fn name(&self) -> &'static str {
		self.0.name()
	}

	pub fn tz(&self) -> Tz {
		self.0
	}
}

impl Default for TimeZoneSpec {
	fn default() -> Self {
		Self::UTC
	}
}

impl From<Tz> for TimeZoneSpec {
	fn from(tz: Tz) -> Self {
		TimeZoneSpec(tz)
	}
}

impl fmt::Display for TimeZoneSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Install the process-wide default zone.
///
/// Fails without touching the current default if `name` does not resolve.
pub fn set_default_time_zone(name: &str) -> Result<TimeZoneSpec> {
	let zone = TimeZoneSpec::parse(name)?;
	*DEFAULT_TIME_ZONE.write() = Some(zone);
	tracing::debug!(time_zone = zone.name(), "installed default time zone");
	Ok(zone)
}

/// Remove the process-wide default zone, falling back to UTC.
pub fn clear_default_time_zone() {
	*DEFAULT_TIME_ZONE.write() = None;
}

/// Current process-wide default zone, if one is installed.
pub fn default_time_zone() -> Option<TimeZoneSpec> {
	*DEFAULT_TIME_ZONE.read()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serial_test::serial;

	#[rstest]
	#[serial(default_time_zone)]
	fn test_resolve_none_without_default_is_utc() {
		clear_default_time_zone();
		let zone = TimeZoneSpec::resolve(None).unwrap();
		assert_eq!(zone, TimeZoneSpec::UTC);
		assert_eq!(zone.name(), "UTC");
	}

	#[rstest]
	#[serial(default_time_zone)]
	fn test_resolve_none_uses_default() {
		set_default_time_zone("Asia/Tokyo").unwrap();
		let zone = TimeZoneSpec::resolve(None).unwrap();
		clear_default_time_zone();
		assert_eq!(zone.name(), "Asia/Tokyo");
	}

	#[rstest]
	#[serial(default_time_zone)]
	fn test_explicit_zone_beats_default() {
		set_default_time_zone("Asia/Tokyo").unwrap();
		let zone = TimeZoneSpec::resolve(Some("Europe/Berlin")).unwrap();
		clear_default_time_zone();
		assert_eq!(zone.name(), "Europe/Berlin");
	}

	#[rstest]
	#[serial(default_time_zone)]
	fn test_invalid_default_keeps_previous() {
		set_default_time_zone("Europe/London").unwrap();
		let err = set_default_time_zone("Nowhere/Special").unwrap_err();
		let current = default_time_zone();
		clear_default_time_zone();
		assert_eq!(
			err,
			GroupdateError::UnrecognizedTimeZone("Nowhere/Special".to_string())
		);
		assert_eq!(current.map(|z| z.name()), Some("Europe/London"));
	}

	#[rstest]
	#[case("invalid-zone")]
	#[case("")]
	#[case("'; DROP TABLE users; --")]
	fn test_resolve_unrecognized(#[case] name: &str) {
		assert_eq!(
			TimeZoneSpec::resolve(Some(name)).unwrap_err(),
			GroupdateError::UnrecognizedTimeZone(name.to_string())
		);
	}

	#[rstest]
	#[case("America/Los_Angeles", "America/Los_Angeles")]
	#[case("america/los_angeles", "America/Los_Angeles")]
	#[case("Etc/UTC", "Etc/UTC")]
	#[case("utc", "UTC")]
	fn test_canonical_names(#[case] input: &str, #[case] canonical: &str) {
		assert_eq!(TimeZoneSpec::parse(input).unwrap().name(), canonical);
	}
}
