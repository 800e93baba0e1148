//! MySQL bucket backend
//!
//! MySQL has neither `DATE_TRUNC` nor `generate_series`. Buckets are formed by
//! converting the UTC column to the target zone with `CONVERT_TZ`, formatting
//! it with the unit's precision and converting the result back to UTC. Series
//! are materialized in Rust as a `UNION` of bound `DATETIME` literals.
//!
//! Named zones in `CONVERT_TZ` require the server's time zone tables to be
//! loaded.

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

/// MySQL bucket backend
///
/// # Examples
///
/// ```rust
/// use reinhardt_groupdate::backend::{BucketBackend, MySqlBucketBackend};
/// use reinhardt_groupdate::{Dialect, Granularity, SqlWriter, TimeZoneSpec};
///
/// let mut writer = SqlWriter::new(Dialect::MySql);
/// MySqlBucketBackend.write_bucket_expression(
///     &mut writer,
///     "`created_at`",
///     Granularity::HourOfDay,
///     TimeZoneSpec::UTC,
/// );
/// assert_eq!(writer.sql(), "EXTRACT(HOUR FROM CONVERT_TZ(`created_at`, '+00:00', ?))");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlBucketBackend;

impl MySqlBucketBackend {
	fn push_zone(&self, writer: &mut SqlWriter, zone: TimeZoneSpec) {
		writer.push_value(Value::from(zone.name()));
	}

	/// `CONVERT_TZ(column, '+00:00', tz)`
	fn push_local(&self, writer: &mut SqlWriter, column: &str, zone: TimeZoneSpec) {
		writer.push("CONVERT_TZ(");
		writer.push(column);
		writer.push(", '+00:00', ");
		self.push_zone(writer, zone);
		writer.push(")");
	}

	/// `CONVERT_TZ(DATE_FORMAT(local, format), tz, '+00:00')`
	fn push_truncated(&self, writer: &mut SqlWriter, column: &str, zone: TimeZoneSpec, format: &str) {
		writer.push("CONVERT_TZ(DATE_FORMAT(");
		self.push_local(writer, column, zone);
		writer.push(", '");
		writer.push(format);
		writer.push("'), ");
		self.push_zone(writer, zone);
		writer.push(", '+00:00')");
	}
}

impl BucketBackend for MySqlBucketBackend {
	fn dialect(&self) -> Dialect {
		Dialect::MySql
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
				// DAYOFWEEK is 1 for Sunday
				writer.push("DAYOFWEEK(");
				self.push_local(writer, column, zone);
				writer.push(") - 1");
			}
			Granularity::HourOfDay => {
				writer.push("EXTRACT(HOUR FROM ");
				self.push_local(writer, column, zone);
				writer.push(")");
			}
			Granularity::Week => {
				// Step back to Sunday on the wall clock, not in UTC.
				writer.push("CONVERT_TZ(DATE_FORMAT(DATE_SUB(");
				self.push_local(writer, column, zone);
				writer.push(", INTERVAL (DAYOFWEEK(");
				self.push_local(writer, column, zone);
				writer.push(") - 1) DAY), '%Y-%m-%d 00:00:00'), ");
				self.push_zone(writer, zone);
				writer.push(", '+00:00')");
			}
			Granularity::Second => self.push_truncated(writer, column, zone, "%Y-%m-%d %H:%i:%S"),
			Granularity::Minute => self.push_truncated(writer, column, zone, "%Y-%m-%d %H:%i:00"),
			Granularity::Hour => self.push_truncated(writer, column, zone, "%Y-%m-%d %H:00:00"),
			Granularity::Day => self.push_truncated(writer, column, zone, "%Y-%m-%d 00:00:00"),
			Granularity::Month => self.push_truncated(writer, column, zone, "%Y-%m-01 00:00:00"),
			Granularity::Year => self.push_truncated(writer, column, zone, "%Y-01-01 00:00:00"),
		}
	}

	fn write_cyclic_series(&self, writer: &mut SqlWriter, granularity: Granularity, max: u32) {
		let alias = granularity.as_str();
		writer.push_list(0..=max, " UNION ", |w, i| {
			w.push(&format!("SELECT {} AS {}", i, alias));
		});
	}

	fn write_time_series(
		&self,
		writer: &mut SqlWriter,
		granularity: Granularity,
		zone: TimeZoneSpec,
		range: &GapFillRange,
		max_rows: Option<usize>,
	) -> Result<()> {
		let buckets = calendar::series(range, granularity, zone, max_rows)?;
		if buckets.is_empty() {
			self.write_empty_series(writer, granularity);
			return Ok(());
		}

		tracing::trace!(
			granularity = %granularity,
			rows = buckets.len(),
			"materialized MySQL series"
		);
		let alias = granularity.as_str();
		writer.push_list(buckets, " UNION ", |w, bucket| {
			w.push("SELECT CAST(");
			w.push_value(Value::from(bucket.naive_utc()));
			w.push(" AS DATETIME) AS ");
			w.push(alias);
		});
		Ok(())
	}

	fn write_empty_series(&self, writer: &mut SqlWriter, granularity: Granularity) {
		let column_type = if granularity.is_cyclic() {
			"SIGNED"
		} else {
			"DATETIME"
		};
		writer.push(&format!(
			"SELECT CAST(NULL AS {}) AS {} FROM DUAL WHERE FALSE",
			column_type,
			granularity.as_str()
		));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{TimeZone, Utc};
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	fn expression(granularity: Granularity) -> (String, usize) {
		let mut writer = SqlWriter::new(Dialect::MySql);
		MySqlBucketBackend.write_bucket_expression(
			&mut writer,
			"created_at",
			granularity,
			TimeZoneSpec::parse("Europe/Madrid").unwrap(),
		);
		let (sql, values) = writer.finish().into_parts();
		(sql, values.len())
	}

	#[rstest]
	#[case::second(Granularity::Second, "%Y-%m-%d %H:%i:%S")]
	#[case::minute(Granularity::Minute, "%Y-%m-%d %H:%i:00")]
	#[case::hour(Granularity::Hour, "%Y-%m-%d %H:00:00")]
	#[case::day(Granularity::Day, "%Y-%m-%d 00:00:00")]
	#[case::month(Granularity::Month, "%Y-%m-01 00:00:00")]
	#[case::year(Granularity::Year, "%Y-01-01 00:00:00")]
	fn test_time_expressions(#[case] granularity: Granularity, #[case] format: &str) {
		let (sql, binds) = expression(granularity);
		assert_eq!(
			sql,
			format!(
				"CONVERT_TZ(DATE_FORMAT(CONVERT_TZ(created_at, '+00:00', ?), '{}'), ?, '+00:00')",
				format
			)
		);
		assert_eq!(binds, 2);
	}

	#[rstest]
	fn test_week_expression() {
		let (sql, binds) = expression(Granularity::Week);
		assert_eq!(
			sql,
			"CONVERT_TZ(DATE_FORMAT(DATE_SUB(CONVERT_TZ(created_at, '+00:00', ?), INTERVAL (DAYOFWEEK(CONVERT_TZ(created_at, '+00:00', ?)) - 1) DAY), '%Y-%m-%d 00:00:00'), ?, '+00:00')"
		);
		assert_eq!(binds, 3);
	}

	#[rstest]
	#[case::day_of_week(Granularity::DayOfWeek, "DAYOFWEEK(CONVERT_TZ(created_at, '+00:00', ?)) - 1")]
	#[case::hour_of_day(Granularity::HourOfDay, "EXTRACT(HOUR FROM CONVERT_TZ(created_at, '+00:00', ?))")]
	fn test_cyclic_expressions(#[case] granularity: Granularity, #[case] expected: &str) {
		let (sql, binds) = expression(granularity);
		assert_eq!(sql, expected);
		assert_eq!(binds, 1);
	}

	#[rstest]
	fn test_cyclic_series() {
		let mut writer = SqlWriter::new(Dialect::MySql);
		MySqlBucketBackend.write_cyclic_series(&mut writer, Granularity::DayOfWeek, 6);
		assert_eq!(
			writer.sql(),
			"SELECT 0 AS day_of_week UNION SELECT 1 AS day_of_week UNION SELECT 2 AS day_of_week UNION SELECT 3 AS day_of_week UNION SELECT 4 AS day_of_week UNION SELECT 5 AS day_of_week UNION SELECT 6 AS day_of_week"
		);
	}

	#[rstest]
	fn test_time_series_binds_utc_datetimes() {
		let zone = TimeZoneSpec::parse("Asia/Tokyo").unwrap();
		// 2024-06-01 09:00 JST to 2024-06-02 23:00 JST
		let range = GapFillRange::new(
			Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
			Utc.with_ymd_and_hms(2024, 6, 2, 14, 0, 0).unwrap(),
		);
		let mut writer = SqlWriter::new(Dialect::MySql);
		MySqlBucketBackend
			.write_time_series(&mut writer, Granularity::Day, zone, &range, None)
			.unwrap();
		let (sql, values) = writer.finish().into_parts();

		assert_eq!(
			sql,
			"SELECT CAST(? AS DATETIME) AS day UNION SELECT CAST(? AS DATETIME) AS day"
		);
		assert_eq!(
			values.into_inner(),
			vec![
				Value::from(Utc.with_ymd_and_hms(2024, 5, 31, 15, 0, 0).unwrap().naive_utc()),
				Value::from(Utc.with_ymd_and_hms(2024, 6, 1, 15, 0, 0).unwrap().naive_utc()),
			]
		);
	}

	#[rstest]
	fn test_time_series_limit() {
		let range = GapFillRange::new(
			Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
			Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
		);
		let mut writer = SqlWriter::new(Dialect::MySql);
		let result = MySqlBucketBackend.write_time_series(
			&mut writer,
			Granularity::Minute,
			TimeZoneSpec::UTC,
			&range,
			Some(100),
		);
		assert!(result.is_err());
	}

	#[rstest]
	fn test_empty_series() {
		let mut writer = SqlWriter::new(Dialect::MySql);
		MySqlBucketBackend.write_empty_series(&mut writer, Granularity::Hour);
		assert_eq!(
			writer.sql(),
			"SELECT CAST(NULL AS DATETIME) AS hour FROM DUAL WHERE FALSE"
		);
	}
}
