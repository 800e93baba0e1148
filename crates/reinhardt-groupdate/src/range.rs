//! Ranges bounding a zero-filled series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The `(start, end)` window a gap-filling series must cover.
///
/// Inclusive ranges (`start..=end`) are empty only when `start > end`, so a
/// range with `start == end` still covers the bucket containing that
/// instant. Half-open ranges (`start..end`) are empty when `start >= end`.
///
/// # Examples
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use reinhardt_groupdate::GapFillRange;
///
/// let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// assert!(!GapFillRange::new(t, t).is_empty());
/// assert!(GapFillRange::half_open(t, t).is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapFillRange {
	pub start: DateTime<Utc>,
	pub end: DateTime<Utc>,
	#[serde(default = "default_inclusive")]
	pub inclusive: bool,
}

fn default_inclusive() -> bool {
	true
}

impl GapFillRange {
	/// Inclusive range `start..=end`.
	pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
		Self {
			start,
			end,
			inclusive: true,
		}
	}

	/// Half-open range `start..end`.
	pub fn half_open(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
		Self {
			start,
			end,
			inclusive: false,
		}
	}

	pub fn is_empty(&self) -> bool {
		if self.inclusive {
			self.start > self.end
		} else {
			self.start >= self.end
		}
	}

	/// Last instant covered by the range, `None` when empty.
	pub(crate) fn last_instant(&self) -> Option<DateTime<Utc>> {
		if self.is_empty() {
			None
		} else if self.inclusive {
			Some(self.end)
		} else {
			Some(self.end - chrono::Duration::nanoseconds(1))
		}
	}
}

impl From<std::ops::RangeInclusive<DateTime<Utc>>> for GapFillRange {
	fn from(range: std::ops::RangeInclusive<DateTime<Utc>>) -> Self {
		let (start, end) = range.into_inner();
		Self::new(start, end)
	}
}

impl From<std::ops::Range<DateTime<Utc>>> for GapFillRange {
	fn from(range: std::ops::Range<DateTime<Utc>>) -> Self {
		Self::half_open(range.start, range.end)
	}
}
