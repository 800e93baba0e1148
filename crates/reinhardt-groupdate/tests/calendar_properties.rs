//! Calendar property-based tests
//!
//! Bucket arithmetic invariants over a handful of zones with and without
//! daylight saving time, including zones that skip local midnight.

mod common;

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use reinhardt_groupdate::{
	BucketSqlBuilder, Dialect, GapFillRange, Granularity, TimeZoneSpec, calendar,
};

const ZONES: [&str; 9] = [
	"UTC",
	"America/New_York",
	"Europe/Berlin",
	"Asia/Tokyo",
	"Asia/Kolkata",
	"Australia/Sydney",
	"America/Sao_Paulo",
	"America/Santiago",
	"America/Havana",
];

fn zone() -> impl Strategy<Value = TimeZoneSpec> {
	prop::sample::select(ZONES.to_vec()).prop_map(|name| TimeZoneSpec::parse(name).unwrap())
}

fn time_granularity() -> impl Strategy<Value = Granularity> {
	prop::sample::select(Granularity::ALL.to_vec()).prop_filter("time-based", |g| !g.is_cyclic())
}

/// Instants between 2000 and 2035.
fn instant() -> impl Strategy<Value = DateTime<Utc>> {
	(946_684_800i64..2_051_222_400i64).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

/// Coarser granularities get wider ranges so series stay small.
fn span_for(granularity: Granularity) -> i64 {
	match granularity {
		Granularity::Second => 2 * 3_600,
		Granularity::Minute => 3 * 86_400,
		Granularity::Hour => 60 * 86_400,
		Granularity::Day | Granularity::Week => 3 * 365 * 86_400,
		_ => 30 * 365 * 86_400,
	}
}

// ============================================================================
// Property-Based Tests: bucket_start
// ============================================================================

proptest! {
	/// Test: bucket_start is idempotent
	///
	/// Category: Property
	/// Flooring a bucket start again yields the same instant.
	#[test]
	fn prop_bucket_start_idempotent(ts in instant(), granularity in time_granularity(), zone in zone()) {
		let bucket = calendar::bucket_start(ts, granularity, zone).unwrap();
		prop_assert_eq!(calendar::bucket_start(bucket, granularity, zone), Some(bucket));
	}

	/// Test: next bucket is later
	///
	/// Category: Property
	/// Stepping from a bucket start moves strictly forward.
	#[test]
	fn prop_next_bucket_advances(ts in instant(), granularity in time_granularity(), zone in zone()) {
		let bucket = calendar::bucket_start(ts, granularity, zone).unwrap();
		let next = calendar::next_bucket(bucket, granularity, zone).unwrap();
		prop_assert!(next > bucket);
		prop_assert_eq!(calendar::bucket_start(next, granularity, zone), Some(next));
	}

	/// Test: cyclic values stay in range
	///
	/// Category: Property
	#[test]
	fn prop_cyclic_values_bounded(ts in instant(), zone in zone()) {
		let dow = calendar::cyclic_value(ts, Granularity::DayOfWeek, zone).unwrap();
		let hour = calendar::cyclic_value(ts, Granularity::HourOfDay, zone).unwrap();
		prop_assert!(dow <= 6);
		prop_assert!(hour <= 23);
	}

	/// Test: week buckets start on Sunday
	///
	/// Category: Property
	#[test]
	fn prop_weeks_start_on_sunday(ts in instant(), zone in zone()) {
		let week = calendar::bucket_start(ts, Granularity::Week, zone).unwrap();
		prop_assert_eq!(calendar::cyclic_value(week, Granularity::DayOfWeek, zone), Some(0));
	}
}

// ============================================================================
// Property-Based Tests: series
// ============================================================================

proptest! {
	#![proptest_config(ProptestConfig::with_cases(64))]

	/// Test: series is the chain of next_bucket steps
	///
	/// Category: Property
	/// Consecutive entries are one step apart and start at the floor of the
	/// range start.
	#[test]
	fn prop_series_is_contiguous(
		start in instant(),
		granularity in time_granularity(),
		zone in zone(),
		fraction in 0.0f64..1.0,
	) {
		let span = (span_for(granularity) as f64 * fraction) as i64 + 2 * 3_600;
		let range = GapFillRange::new(start, start + Duration::seconds(span));
		let series = calendar::series(&range, granularity, zone, None).unwrap();

		prop_assert!(!series.is_empty());
		prop_assert_eq!(series[0], calendar::bucket_start(start, granularity, zone).unwrap());
		for pair in series.windows(2) {
			prop_assert_eq!(calendar::next_bucket(pair[0], granularity, zone), Some(pair[1]));
		}
	}

	/// Test: every instant in the range has its bucket in the series
	///
	/// Category: Property
	#[test]
	fn prop_series_covers_range(
		start in instant(),
		granularity in time_granularity(),
		zone in zone(),
		offsets in prop::collection::vec(0.0f64..1.0, 1..8),
	) {
		let span = span_for(granularity) + 2 * 3_600;
		let range = GapFillRange::new(start, start + Duration::seconds(span));
		let series = calendar::series(&range, granularity, zone, None).unwrap();

		for offset in offsets {
			let ts = start + Duration::seconds((span as f64 * offset) as i64);
			let bucket = calendar::bucket_start(ts, granularity, zone).unwrap();
			prop_assert!(series.binary_search(&bucket).is_ok(), "{} missing for {}", bucket, ts);
		}
	}

	/// Test: the PostgreSQL series evaluates to the calendar series
	///
	/// Category: Property
	/// Stepping the wall-clock bounds in the database and converting each step
	/// yields exactly the buckets the calendar materializes.
	#[test]
	fn prop_postgres_series_matches_calendar(
		start in instant(),
		granularity in time_granularity(),
		zone in zone(),
		fraction in 0.0f64..1.0,
	) {
		let span = (span_for(granularity) as f64 * fraction) as i64 + 2 * 3_600;
		let range = GapFillRange::half_open(start, start + Duration::seconds(span));
		let series = calendar::series(&range, granularity, zone, None).unwrap();
		let join = BucketSqlBuilder::new(Dialect::Postgres)
			.time_zone(zone)
			.build_gap_fill_series("ts", granularity, Some(&range))
			.unwrap();

		prop_assert_eq!(common::postgres_time_series(join.derived_table().values()), series);
	}
}
