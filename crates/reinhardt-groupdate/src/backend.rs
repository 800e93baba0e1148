//! Dialect backends
//!
//! Each backend writes the bucket expression and the synthetic series table
//! for one SQL dialect into a [`SqlWriter`].

use crate::{
	dialect::Dialect,
	error::Result,
	granularity::Granularity,
	range::GapFillRange,
	time_zone::TimeZoneSpec,
	writer::SqlWriter,
};

mod mysql;
mod postgres;

pub use mysql::MySqlBucketBackend;
pub use postgres::PostgresBucketBackend;

/// Renders time-bucket SQL for one dialect.
///
/// # Implementations
///
/// - [`PostgresBucketBackend`] - PostgreSQL backend
/// - [`MySqlBucketBackend`] - MySQL backend
///
/// Both must agree with [`crate::calendar`] on bucket boundaries: a series
/// value and the bucket expression evaluated for a row in that bucket have to
/// compare equal, or zero-filled rows duplicate real ones.
pub trait BucketBackend {
	fn dialect(&self) -> Dialect;

	/// Write the expression truncating (or extracting from) `column`.
	///
	/// `column` is written verbatim; quoting it is the caller's job.
	fn write_bucket_expression(
		&self,
		writer: &mut SqlWriter,
		column: &str,
		granularity: Granularity,
		zone: TimeZoneSpec,
	);

	/// Write a `SELECT` producing `0..=max`, every value of a cyclic
	/// granularity.
	fn write_cyclic_series(&self, writer: &mut SqlWriter, granularity: Granularity, max: u32);

	/// Write a `SELECT` producing every bucket start covered by `range`.
	///
	/// `range` is non-empty. `max_rows` bounds materialized series.
	fn write_time_series(
		&self,
		writer: &mut SqlWriter,
		granularity: Granularity,
		zone: TimeZoneSpec,
		range: &GapFillRange,
		max_rows: Option<usize>,
	) -> Result<()>;

	/// Write a `SELECT` with the series column and no rows.
	fn write_empty_series(&self, writer: &mut SqlWriter, granularity: Granularity);
}

/// Backend for `dialect`.
pub fn backend_for(dialect: Dialect) -> &'static dyn BucketBackend {
	match dialect {
		Dialect::Postgres => &PostgresBucketBackend,
		Dialect::MySql => &MySqlBucketBackend,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Dialect::Postgres)]
	#[case(Dialect::MySql)]
	fn test_backend_for_dialect(#[case] dialect: Dialect) {
		assert_eq!(backend_for(dialect).dialect(), dialect);
	}
}
