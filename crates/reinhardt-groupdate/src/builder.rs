//! Bucket expression and gap-fill series builder
//!
//! [`BucketSqlBuilder`] holds the resolved dialect, time zone and parameter
//! offset, and delegates SQL generation to the dialect's
//! [`BucketBackend`](crate::backend::BucketBackend). The free functions
//! [`build_bucket_expression`] and [`build_gap_fill_series`] accept the raw
//! names a host application usually has at hand and resolve them first.

use crate::{
	backend::backend_for,
	dialect::Dialect,
	error::{GroupdateError, Result},
	granularity::Granularity,
	range::GapFillRange,
	time_zone::{TimeZoneSpec, default_time_zone},
	value::Values,
	writer::{SqlFragment, SqlWriter},
};

/// Default cap on rows in a materialized series.
pub const DEFAULT_MAX_SERIES_ROWS: usize = 10_000;

/// Alias of the derived series table in the join clause.
pub const SERIES_ALIAS: &str = "groupdate_series";

/// A bucket expression for one column and granularity.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketExpression {
	fragment: SqlFragment,
	granularity: Granularity,
}

impl BucketExpression {
	pub fn sql(&self) -> &str {
		self.fragment.sql()
	}

	pub fn values(&self) -> &Values {
		self.fragment.values()
	}

	pub fn fragment(&self) -> &SqlFragment {
		&self.fragment
	}

	pub fn granularity(&self) -> Granularity {
		self.granularity
	}

	/// Result column alias, the granularity name.
	pub fn alias(&self) -> &'static str {
		self.granularity.as_str()
	}

	pub fn into_fragment(self) -> SqlFragment {
		self.fragment
	}
}

/// A derived series table and the join that zero-fills buckets with it.
///
/// The three fragments share one placeholder numbering: the derived table's
/// binds come first, then the bucket expression's. `join` is the derived
/// table and predicate assembled into a `RIGHT OUTER JOIN` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesJoin {
	granularity: Granularity,
	derived_table: SqlFragment,
	predicate: SqlFragment,
	join: SqlFragment,
	group_key: String,
}

impl SeriesJoin {
	pub fn granularity(&self) -> Granularity {
		self.granularity
	}

	/// The `SELECT` producing one row per bucket.
	pub fn derived_table(&self) -> &SqlFragment {
		&self.derived_table
	}

	/// `groupdate_series.<alias> = (<bucket expression>)`
	pub fn predicate(&self) -> &SqlFragment {
		&self.predicate
	}

	/// The full join clause.
	pub fn join(&self) -> &SqlFragment {
		&self.join
	}

	/// Key the host must group and select by.
	pub fn group_key(&self) -> &str {
		&self.group_key
	}

	pub fn alias(&self) -> &'static str {
		self.granularity.as_str()
	}

	pub fn into_join(self) -> SqlFragment {
		self.join
	}
}

/// Builds bucket expressions and gap-fill series for one dialect and zone.
///
/// # Examples
///
/// ```rust
/// use reinhardt_groupdate::{BucketSqlBuilder, Dialect, Granularity, TimeZoneSpec};
///
/// let builder = BucketSqlBuilder::new(Dialect::Postgres)
///     .time_zone(TimeZoneSpec::parse("Europe/Paris").unwrap())
///     .param_offset(2);
/// let expr = builder.build_bucket_expression("\"orders\".\"created_at\"", Granularity::Month);
///
/// assert_eq!(
///     expr.sql(),
///     "DATE_TRUNC('month', \"orders\".\"created_at\"::timestamptz AT TIME ZONE $3) AT TIME ZONE $4"
/// );
/// assert_eq!(expr.alias(), "month");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketSqlBuilder {
	dialect: Dialect,
	zone: TimeZoneSpec,
	param_offset: usize,
	max_series_rows: Option<usize>,
}

impl BucketSqlBuilder {
	/// Builder using the process-wide default zone, or UTC.
	pub fn new(dialect: Dialect) -> Self {
		Self {
			dialect,
			zone: default_time_zone().unwrap_or(TimeZoneSpec::UTC),
			param_offset: 0,
			max_series_rows: Some(DEFAULT_MAX_SERIES_ROWS),
		}
	}

	pub fn time_zone(mut self, zone: TimeZoneSpec) -> Self {
		self.zone = zone;
		self
	}

	/// Resolve and set the zone from an optional name.
	pub fn with_time_zone_name(self, name: Option<&str>) -> Result<Self> {
		Ok(self.time_zone(TimeZoneSpec::resolve(name)?))
	}

	/// Number of parameters the host statement already binds.
	pub fn param_offset(mut self, offset: usize) -> Self {
		self.param_offset = offset;
		self
	}

	/// Row cap for materialized series; `None` removes it.
	pub fn max_series_rows(mut self, limit: Option<usize>) -> Self {
		self.max_series_rows = limit;
		self
	}

	pub fn dialect(&self) -> Dialect {
		self.dialect
	}

	pub fn zone(&self) -> TimeZoneSpec {
		self.zone
	}

	/// Build the expression bucketing `column` by `granularity`.
	///
	/// `column` is written verbatim and must already be quoted.
	pub fn build_bucket_expression(&self, column: &str, granularity: Granularity) -> BucketExpression {
		let mut writer = SqlWriter::with_offset(self.dialect, self.param_offset);
		backend_for(self.dialect).write_bucket_expression(&mut writer, column, granularity, self.zone);
		let fragment = writer.finish();

		tracing::debug!(
			dialect = %self.dialect,
			granularity = %granularity,
			time_zone = self.zone.name(),
			sql = fragment.sql(),
			"built bucket expression"
		);
		BucketExpression {
			fragment,
			granularity,
		}
	}

	/// Build the series table and join that zero-fill `granularity` buckets
	/// of `column`.
	///
	/// Time-based granularities need a `range`; cyclic ones ignore it. An
	/// empty range yields a series with no rows.
	pub fn build_gap_fill_series(
		&self,
		column: &str,
		granularity: Granularity,
		range: Option<&GapFillRange>,
	) -> Result<SeriesJoin> {
		let backend = backend_for(self.dialect);
		let alias = granularity.as_str();

		let mut writer = SqlWriter::with_offset(self.dialect, self.param_offset);
		if let Some(max) = granularity.cycle_max() {
			backend.write_cyclic_series(&mut writer, granularity, max);
		} else {
			let range = range.ok_or(GroupdateError::MissingRange(granularity))?;
			if range.is_empty() {
				backend.write_empty_series(&mut writer, granularity);
			} else {
				backend
					.write_time_series(&mut writer, granularity, self.zone, range, self.max_series_rows)
					.inspect_err(|err| {
						tracing::warn!(
							dialect = %self.dialect,
							granularity = %granularity,
							error = %err,
							"refused to build gap-fill series"
						);
					})?;
			}
		}
		let derived_table = writer.finish();

		let mut writer = SqlWriter::with_offset(self.dialect, derived_table.next_param() - 1);
		writer.push(&format!("{}.{} = (", SERIES_ALIAS, alias));
		backend.write_bucket_expression(&mut writer, column, granularity, self.zone);
		writer.push(")");
		let predicate = writer.finish();

		let mut writer = SqlWriter::with_offset(self.dialect, self.param_offset);
		writer.push("RIGHT OUTER JOIN (");
		writer.push_fragment(&derived_table);
		writer.push(&format!(") {} ON ", SERIES_ALIAS));
		writer.push_fragment(&predicate);
		let join = writer.finish();

		tracing::debug!(
			dialect = %self.dialect,
			granularity = %granularity,
			binds = join.values().len(),
			"built gap-fill series"
		);
		Ok(SeriesJoin {
			granularity,
			derived_table,
			predicate,
			join,
			group_key: format!("{}.{}", SERIES_ALIAS, alias),
		})
	}
}

fn resolve(granularity: &str, time_zone: Option<&str>, dialect: &str) -> Result<(Granularity, BucketSqlBuilder)> {
	let dialect = Dialect::from_adapter_name(dialect)?;
	let granularity = granularity.parse::<Granularity>()?;
	let builder = BucketSqlBuilder::new(dialect).with_time_zone_name(time_zone)?;
	Ok((granularity, builder))
}

/// Build a bucket expression from unresolved names.
///
/// # Examples
///
/// ```rust
/// use reinhardt_groupdate::build_bucket_expression;
///
/// let expr = build_bucket_expression("`created_at`", "day_of_week", Some("UTC"), "mysql2").unwrap();
/// assert_eq!(expr.sql(), "DAYOFWEEK(CONVERT_TZ(`created_at`, '+00:00', ?)) - 1");
///
/// assert!(build_bucket_expression("`created_at`", "day", None, "sqlite").is_err());
/// ```
pub fn build_bucket_expression(
	column: &str,
	granularity: &str,
	time_zone: Option<&str>,
	dialect: &str,
) -> Result<BucketExpression> {
	let (granularity, builder) = resolve(granularity, time_zone, dialect)?;
	Ok(builder.build_bucket_expression(column, granularity))
}

/// Build a gap-fill series join from unresolved names.
pub fn build_gap_fill_series(
	column: &str,
	granularity: &str,
	time_zone: Option<&str>,
	dialect: &str,
	range: Option<&GapFillRange>,
) -> Result<SeriesJoin> {
	let (granularity, builder) = resolve(granularity, time_zone, dialect)?;
	builder.build_gap_fill_series(column, granularity, range)
}
