//! PostgreSQL bucket backend
//!
//! Buckets are computed with `DATE_TRUNC` on the wall-clock time in the
//! target zone (`col::timestamptz AT TIME ZONE tz`), then turned back into a
//! `timestamptz` with a second `AT TIME ZONE tz`. Series use the native
//! `generate_series` over wall-clock `timestamp` bounds, so they step on the
//! same local grid `DATE_TRUNC` truncates to.

use chrono::NaiveDateTime;

use super::BucketBackend;
use crate::{
	calendar,
	dialect::Dialect,
	error::Result,
	granularity::Granularity,
	range::GapFillRange,
	time_zone::TimeZoneSpec,
	value::Value,
	writer::SqlWriter,
};

/// PostgreSQL bucket backend
///
/// # Examples
///
/// ```rust
/// use reinhardt_groupdate::backend::{BucketBackend, PostgresBucketBackend};
/// use reinhardt_groupdate::{Dialect, Granularity, SqlWriter, TimeZoneSpec};
///
/// let mut writer = SqlWriter::new(Dialect::Postgres);
/// PostgresBucketBackend.write_bucket_expression(
///     &mut writer,
///     "\"created_at\"",
///     Granularity::Day,
///     TimeZoneSpec::UTC,
/// );
/// assert_eq!(
///     writer.sql(),
///     "DATE_TRUNC('day', \"created_at\"::timestamptz AT TIME ZONE $1) AT TIME ZONE $2"
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresBucketBackend;

impl PostgresBucketBackend {
	fn push_zone(&self, writer: &mut SqlWriter, zone: TimeZoneSpec) {
		writer.push_value(Value::from(zone.name()));
	}

	/// `column::timestamptz AT TIME ZONE tz`
	fn push_local(&self, writer: &mut SqlWriter, column: &str, zone: TimeZoneSpec) {
		writer.push(column);
		writer.push("::timestamptz AT TIME ZONE ");
		self.push_zone(writer, zone);
	}

	/// `CAST(local AS timestamp)`
	fn push_local_bound(&self, writer: &mut SqlWriter, bound: NaiveDateTime) {
		writer.push("CAST(");
		writer.push_value(Value::from(bound));
		writer.push(" AS timestamp)");
	}
}

impl BucketBackend for PostgresBucketBackend {
	fn dialect(&self) -> Dialect {
		Dialect::Postgres
	}

	fn write_bucket_expression(
		&self,
		writer: &mut SqlWriter,
		column: &str,
		granularity: Granularity,
		zone: TimeZoneSpec,
	) {
		match granularity {
			Granularity::DayOfWeek => {
				writer.push("EXTRACT(DOW FROM ");
				self.push_local(writer, column, zone);
				writer.push(")");
			}
			Granularity::HourOfDay => {
				writer.push("EXTRACT(HOUR FROM ");
				self.push_local(writer, column, zone);
				writer.push(")");
			}
			Granularity::Week => {
				// DATE_TRUNC weeks start on Monday; shifting the wall-clock
				// time by a day moves the boundary to Sunday.
				writer.push("(DATE_TRUNC('week', (");
				self.push_local(writer, column, zone);
				writer.push(") + INTERVAL '1 day') - INTERVAL '1 day') AT TIME ZONE ");
				self.push_zone(writer, zone);
			}
			_ => {
				writer.push("DATE_TRUNC('");
				writer.push(granularity.as_str());
				writer.push("', ");
				self.push_local(writer, column, zone);
				writer.push(") AT TIME ZONE ");
				self.push_zone(writer, zone);
			}
		}
	}

	fn write_cyclic_series(&self, writer: &mut SqlWriter, granularity: Granularity, max: u32) {
		writer.push(&format!(
			"SELECT generate_series(0, {}, 1) AS {}",
			max,
			granularity.as_str()
		));
	}

	fn write_time_series(
		&self,
		writer: &mut SqlWriter,
		granularity: Granularity,
		zone: TimeZoneSpec,
		range: &GapFillRange,
		_max_rows: Option<usize>,
	) -> Result<()> {
		let (Some((first, last)), Some(interval)) = (
			calendar::series_bounds(range, granularity, zone),
			granularity.interval(),
		) else {
			self.write_empty_series(writer, granularity);
			return Ok(());
		};

		// Wall-clock steps landing in a spring-forward gap convert to the
		// next bucket's instant; DISTINCT drops the duplicate.
		writer.push("SELECT DISTINCT (generate_series(");
		self.push_local_bound(writer, first);
		writer.push(", ");
		self.push_local_bound(writer, last);
		writer.push(", CAST(");
		writer.push_value(Value::from(interval));
		writer.push(" AS interval)) AT TIME ZONE ");
		self.push_zone(writer, zone);
		writer.push(") AS ");
		writer.push(granularity.as_str());
		Ok(())
	}

	fn write_empty_series(&self, writer: &mut SqlWriter, granularity: Granularity) {
		let column_type = if granularity.is_cyclic() {
			"integer"
		} else {
			"timestamptz"
		};
		writer.push(&format!(
			"SELECT CAST(NULL AS {}) AS {} WHERE FALSE",
			column_type,
			granularity.as_str()
		));
	}
}
