//! In-memory bucket arithmetic.
//!
//! These functions compute, in Rust, the same bucket boundaries the
//! generated SQL computes in the database. The MySQL series is materialized
//! with them, and tests use them as the reference the SQL must agree with.
//!
//! Truncation happens on the wall-clock time in the target zone. Turning a
//! wall-clock bucket start back into an instant follows PostgreSQL's rules:
//! a time skipped by a spring-forward transition takes the offset in effect
//! before the transition, and a time repeated by a fall-back transition takes
//! the offset in effect after it.

use chrono::{
	DateTime, Datelike, Duration, LocalResult, Months, NaiveDate, NaiveDateTime, Offset,
	TimeZone, Timelike, Utc,
};

use crate::error::{GroupdateError, Result};
use crate::granularity::Granularity;
use crate::range::GapFillRange;
use crate::time_zone::TimeZoneSpec;

/// Start of the bucket containing `ts`, or `None` for cyclic granularities.
///
/// # Examples
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use reinhardt_groupdate::{Granularity, TimeZoneSpec, calendar};
///
/// // Tuesday 2024-05-14 10:30 UTC falls in the week starting Sunday the 12th.
/// let ts = Utc.with_ymd_and_hms(2024, 5, 14, 10, 30, 0).unwrap();
/// let week = calendar::bucket_start(ts, Granularity::Week, TimeZoneSpec::UTC).unwrap();
/// assert_eq!(week, Utc.with_ymd_and_hms(2024, 5, 12, 0, 0, 0).unwrap());
/// ```
pub fn bucket_start(
	ts: DateTime<Utc>,
	granularity: Granularity,
	zone: TimeZoneSpec,
) -> Option<DateTime<Utc>> {
	let local = to_local(ts, zone);
	truncate_local(local, granularity).map(|start| local_to_utc(start, zone))
}

/// Value of a cyclic granularity for `ts`: day of week with Sunday as 0, or
/// hour of day. `None` for time-based granularities.
pub fn cyclic_value(ts: DateTime<Utc>, granularity: Granularity, zone: TimeZoneSpec) -> Option<u32> {
	let local = to_local(ts, zone);
	match granularity {
		Granularity::DayOfWeek => Some(local.weekday().num_days_from_sunday()),
		Granularity::HourOfDay => Some(local.hour()),
		_ => None,
	}
}

/// Start of the bucket following `bucket`.
pub fn next_bucket(
	bucket: DateTime<Utc>,
	granularity: Granularity,
	zone: TimeZoneSpec,
) -> Option<DateTime<Utc>> {
	let local = truncate_local(to_local(bucket, zone), granularity)?;
	step_local(local, granularity).map(|next| local_to_utc(next, zone))
}

/// Wall-clock first and last bucket starts covered by `range`, `None` when
/// it is empty.
///
/// These are local times in `zone`, not instants: a bucket start skipped by
/// a DST jump (local midnight in America/Santiago on 2024-09-08) is kept as
/// written, so stepping from it stays on the same wall-clock grid as
/// `DATE_TRUNC`.
pub fn series_bounds(
	range: &GapFillRange,
	granularity: Granularity,
	zone: TimeZoneSpec,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
	let last = range.last_instant()?;
	let first = truncate_local(to_local(range.start, zone), granularity)?;
	let last = truncate_local(to_local(last, zone), granularity)?;
	Some((first, last))
}

/// Every bucket start whose bucket meets `range`, ascending, without
/// duplicates.
///
/// Fails with [`GroupdateError::SeriesTooLarge`] once more than `limit`
/// wall-clock steps would be needed.
pub fn series(
	range: &GapFillRange,
	granularity: Granularity,
	zone: TimeZoneSpec,
	limit: Option<usize>,
) -> Result<Vec<DateTime<Utc>>> {
	let Some((mut current, last_local)) = series_bounds(range, granularity, zone) else {
		return Ok(Vec::new());
	};

	let mut buckets = Vec::new();
	while current <= last_local {
		if let Some(limit) = limit
			&& buckets.len() >= limit
		{
			return Err(GroupdateError::SeriesTooLarge { granularity, limit });
		}
		buckets.push(local_to_utc(current, zone));
		match step_local(current, granularity) {
			Some(next) => current = next,
			None => break,
		}
	}

	// Wall-clock times inside a DST gap land on instants of the following
	// hour, which the loop visits again.
	buckets.sort_unstable();
	buckets.dedup();
	Ok(buckets)
}

fn to_local(ts: DateTime<Utc>, zone: TimeZoneSpec) -> NaiveDateTime {
	ts.with_timezone(&zone.tz()).naive_local()
}

/// Truncate a wall-clock time to the start of its bucket.
pub(crate) fn truncate_local(local: NaiveDateTime, granularity: Granularity) -> Option<NaiveDateTime> {
	let date = local.date();
	match granularity {
		Granularity::Second => local.with_nanosecond(0),
		Granularity::Minute => date.and_hms_opt(local.hour(), local.minute(), 0),
		Granularity::Hour => date.and_hms_opt(local.hour(), 0, 0),
		Granularity::Day => date.and_hms_opt(0, 0, 0),
		Granularity::Week => {
			let sunday = date - Duration::days(i64::from(date.weekday().num_days_from_sunday()));
			sunday.and_hms_opt(0, 0, 0)
		}
		Granularity::Month => {
			NaiveDate::from_ymd_opt(date.year(), date.month(), 1).and_then(|d| d.and_hms_opt(0, 0, 0))
		}
		Granularity::Year => {
			NaiveDate::from_ymd_opt(date.year(), 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
		}
		Granularity::DayOfWeek | Granularity::HourOfDay => None,
	}
}

/// Advance a wall-clock bucket start by one unit.
pub(crate) fn step_local(local: NaiveDateTime, granularity: Granularity) -> Option<NaiveDateTime> {
	match granularity {
		Granularity::Second => local.checked_add_signed(Duration::seconds(1)),
		Granularity::Minute => local.checked_add_signed(Duration::minutes(1)),
		Granularity::Hour => local.checked_add_signed(Duration::hours(1)),
		Granularity::Day => local.checked_add_signed(Duration::days(1)),
		Granularity::Week => local.checked_add_signed(Duration::weeks(1)),
		Granularity::Month => local.checked_add_months(Months::new(1)),
		Granularity::Year => local.checked_add_months(Months::new(12)),
		Granularity::DayOfWeek | Granularity::HourOfDay => None,
	}
}

/// Interpret a wall-clock time in `zone`.
pub(crate) fn local_to_utc(local: NaiveDateTime, zone: TimeZoneSpec) -> DateTime<Utc> {
	let tz = zone.tz();
	match tz.from_local_datetime(&local) {
		LocalResult::Single(dt) => dt.with_timezone(&Utc),
		LocalResult::Ambiguous(_, after) => after.with_timezone(&Utc),
		LocalResult::None => {
			// Skipped by a transition: read it with the offset from before it.
			let before = local - Duration::days(1);
			let offset = tz
				.offset_from_utc_datetime(&before)
				.fix()
				.local_minus_utc();
			Utc.from_utc_datetime(&(local - Duration::seconds(i64::from(offset))))
		}
	}
}
