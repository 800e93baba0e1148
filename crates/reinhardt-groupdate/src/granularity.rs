//! Bucket granularities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GroupdateError;

/// The unit rows are bucketed by.
///
/// Time-based granularities truncate a timestamp to the start of its bucket.
/// Cyclic granularities extract a small integer (`0..=6` for day of week with
/// Sunday as 0, `0..=23` for hour of day) and never take part in range
/// arithmetic.
///
/// # Examples
///
/// ```rust
/// use reinhardt_groupdate::Granularity;
///
/// let granularity: Granularity = "hour_of_day".parse().unwrap();
/// assert!(granularity.is_cyclic());
/// assert_eq!(granularity.cycle_max(), Some(23));
/// assert_eq!(Granularity::Week.as_str(), "week");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
	Second,
	Minute,
	Hour,
	Day,
	Week,
	Month,
	Year,
	DayOfWeek,
	HourOfDay,
}

impl Granularity {
	/// Every granularity, time-based first.
	pub const ALL: [Granularity; 9] = [
		Granularity::Second,
		Granularity::Minute,
		Granularity::Hour,
		Granularity::Day,
		Granularity::Week,
		Granularity::Month,
		Granularity::Year,
		Granularity::DayOfWeek,
		Granularity::HourOfDay,
	];

	/// Field name, also used as result alias and series column name.
	pub fn as_str(&self) -> &'static str {
		match self {
			Granularity::Second => "second",
			Granularity::Minute => "minute",
			Granularity::Hour => "hour",
			Granularity::Day => "day",
			Granularity::Week => "week",
			Granularity::Month => "month",
			Granularity::Year => "year",
			Granularity::DayOfWeek => "day_of_week",
			Granularity::HourOfDay => "hour_of_day",
		}
	}

	/// Whether this granularity extracts a cyclic number instead of a timestamp.
	pub fn is_cyclic(&self) -> bool {
		matches!(self, Granularity::DayOfWeek | Granularity::HourOfDay)
	}

	/// Largest value of a cyclic granularity, `None` for time-based ones.
	pub fn cycle_max(&self) -> Option<u32> {
		match self {
			Granularity::DayOfWeek => Some(6),
			Granularity::HourOfDay => Some(23),
			_ => None,
		}
	}

	/// PostgreSQL interval literal for one step of this granularity.
	pub(crate) fn interval(&self) -> Option<&'static str> {
		match self {
			Granularity::Second => Some("1 second"),
			Granularity::Minute => Some("1 minute"),
			Granularity::Hour => Some("1 hour"),
			Granularity::Day => Some("1 day"),
			Granularity::Week => Some("1 week"),
			Granularity::Month => Some("1 month"),
			Granularity::Year => Some("1 year"),
			Granularity::DayOfWeek | Granularity::HourOfDay => None,
		}
	}
}

impl fmt::Display for Granularity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Granularity {
	type Err = GroupdateError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Granularity::ALL
			.iter()
			.copied()
			.find(|g| g.as_str() == s)
			.ok_or_else(|| GroupdateError::InvalidGranularity(s.to_string()))
	}
}
