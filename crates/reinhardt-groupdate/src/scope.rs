//! Group-by composition
//!
//! [`GroupDate`] wraps a [`BucketSqlBuilder`] and hands back a [`GroupBy`]:
//! everything a host query needs to group rows by a time bucket, with the
//! select/group key, the result alias and, when zero-filling, the join that
//! brings in empty buckets.

use crate::{
	builder::BucketSqlBuilder,
	dialect::Dialect,
	error::Result,
	granularity::Granularity,
	range::GapFillRange,
	time_zone::TimeZoneSpec,
	writer::{SqlFragment, SqlWriter},
};

/// Pieces of a grouped query for one bucket column.
///
/// `group()` is what the host selects and groups by. For zero-filled results
/// it is the series key `groupdate_series.<alias>` and `join()` holds the
/// `RIGHT OUTER JOIN` to splice after the `FROM` clause. Otherwise it is the
/// bucket expression itself and there is no join.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBy {
	granularity: Granularity,
	group: SqlFragment,
	join: Option<SqlFragment>,
}

impl GroupBy {
	pub fn granularity(&self) -> Granularity {
		self.granularity
	}

	/// Result column alias, the granularity name.
	pub fn alias(&self) -> &'static str {
		self.granularity.as_str()
	}

	/// Select and group key.
	pub fn group(&self) -> &SqlFragment {
		&self.group
	}

	pub fn join(&self) -> Option<&SqlFragment> {
		self.join.as_ref()
	}

	pub fn is_zero_filled(&self) -> bool {
		self.join.is_some()
	}

	/// `<group> AS <alias>`
	///
	/// Binds and placeholder numbering are those of [`GroupBy::group`].
	pub fn select_clause(&self) -> SqlFragment {
		let mut writer = SqlWriter::with_offset(self.group.dialect(), self.group.first_param() - 1);
		writer.push_fragment(&self.group);
		writer.push_keyword("AS ");
		writer.push(self.alias());
		writer.finish()
	}
}

/// Time-bucket grouping for one dialect.
///
/// A time-based granularity is zero-filled when a range is given. Cyclic
/// granularities are always zero-filled, since their full set of values is
/// known, unless [`GroupDate::series`] turns filling off.
///
/// # Examples
///
/// ```rust
/// use reinhardt_groupdate::{Dialect, GroupDate, TimeZoneSpec};
///
/// let group = GroupDate::new(Dialect::Postgres)
///     .time_zone(TimeZoneSpec::UTC)
///     .group_by_day_of_week("\"created_at\"", None)
///     .unwrap();
///
/// assert!(group.is_zero_filled());
/// assert_eq!(
///     group.select_clause().sql(),
///     "groupdate_series.day_of_week AS day_of_week"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupDate {
	builder: BucketSqlBuilder,
	series: bool,
}

macro_rules! define_group_by {
	($(#[$meta:meta])* $name:ident, $granularity:expr) => {
		$(#[$meta])*
		pub fn $name(&self, column: &str, range: Option<GapFillRange>) -> Result<GroupBy> {
			self.group_by(column, $granularity, range)
		}
	};
}

impl GroupDate {
	pub fn new(dialect: Dialect) -> Self {
		Self::from_builder(BucketSqlBuilder::new(dialect))
	}

	pub fn from_builder(builder: BucketSqlBuilder) -> Self {
		Self {
			builder,
			series: true,
		}
	}

	pub fn time_zone(mut self, zone: TimeZoneSpec) -> Self {
		self.builder = self.builder.time_zone(zone);
		self
	}

	pub fn param_offset(mut self, offset: usize) -> Self {
		self.builder = self.builder.param_offset(offset);
		self
	}

	pub fn max_series_rows(mut self, limit: Option<usize>) -> Self {
		self.builder = self.builder.max_series_rows(limit);
		self
	}

	/// Enable or disable zero-filling.
	pub fn series(mut self, enabled: bool) -> Self {
		self.series = enabled;
		self
	}

	pub fn builder(&self) -> &BucketSqlBuilder {
		&self.builder
	}

	/// Group `column` by `granularity`.
	pub fn group_by(
		&self,
		column: &str,
		granularity: Granularity,
		range: Option<GapFillRange>,
	) -> Result<GroupBy> {
		let zero_fill = self.series && (granularity.is_cyclic() || range.is_some());
		if !zero_fill {
			let expression = self.builder.build_bucket_expression(column, granularity);
			return Ok(GroupBy {
				granularity,
				group: expression.into_fragment(),
				join: None,
			});
		}

		let series = self
			.builder
			.build_gap_fill_series(column, granularity, range.as_ref())?;
		Ok(GroupBy {
			granularity,
			group: SqlFragment::raw(self.builder.dialect(), series.group_key()),
			join: Some(series.into_join()),
		})
	}

	define_group_by!(
		/// Group by second.
		group_by_second, Granularity::Second
	);

	define_group_by!(
		/// Group by minute.
		group_by_minute, Granularity::Minute
	);

	define_group_by!(
		/// Group by hour.
		group_by_hour, Granularity::Hour
	);

	define_group_by!(
		/// Group by calendar day in the zone.
		group_by_day, Granularity::Day
	);

	define_group_by!(
		/// Group by week, weeks starting on Sunday.
		group_by_week, Granularity::Week
	);

	define_group_by!(
		/// Group by calendar month.
		group_by_month, Granularity::Month
	);

	define_group_by!(
		/// Group by calendar year.
		group_by_year, Granularity::Year
	);

	define_group_by!(
		/// Group by day of week, Sunday as 0.
		group_by_day_of_week, Granularity::DayOfWeek
	);

	define_group_by!(
		/// Group by hour of day, 0 to 23.
		group_by_hour_of_day, Granularity::HourOfDay
	);
}
