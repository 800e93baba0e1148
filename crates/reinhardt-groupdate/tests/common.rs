//! Common test utilities for gap-fill integration tests
//!
//! Evaluates generated PostgreSQL series in Rust the way the server would, so
//! the rows a series produces can be compared with the calendar.

// Each test binary compiles common.rs separately, causing unused code warnings.
#![allow(dead_code, unreachable_pub)]

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, LocalResult, Months, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use reinhardt_groupdate::{Value, Values};

/// `timestamp AT TIME ZONE tz` as PostgreSQL evaluates it.
///
/// A repeated local time takes the offset in effect after the transition; a
/// skipped one takes the offset in effect before it.
pub fn at_time_zone(local: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
	match tz.from_local_datetime(&local) {
		LocalResult::Single(dt) => dt.with_timezone(&Utc),
		LocalResult::Ambiguous(_, later) => later.with_timezone(&Utc),
		LocalResult::None => {
			let mut after = local;
			let transition = loop {
				after += Duration::minutes(1);
				if let Some(dt) = tz.from_local_datetime(&after).earliest() {
					break dt.with_timezone(&Utc);
				}
			};
			let before = tz
				.offset_from_utc_datetime(&(transition - Duration::minutes(1)).naive_utc())
				.fix();
			Utc.from_utc_datetime(&(local - Duration::seconds(i64::from(before.local_minus_utc()))))
		}
	}
}

/// `timestamp + interval` for the single-unit intervals the series binds.
fn add_interval(ts: NaiveDateTime, interval: &str) -> NaiveDateTime {
	match interval {
		"1 second" => ts + Duration::seconds(1),
		"1 minute" => ts + Duration::minutes(1),
		"1 hour" => ts + Duration::hours(1),
		"1 day" => ts + Duration::days(1),
		"1 week" => ts + Duration::weeks(1),
		"1 month" => ts.checked_add_months(Months::new(1)).unwrap(),
		"1 year" => ts.checked_add_months(Months::new(12)).unwrap(),
		other => panic!("unexpected interval {:?}", other),
	}
}

/// Rows of
/// `SELECT DISTINCT (generate_series(CAST($1 AS timestamp), CAST($2 AS timestamp), CAST($3 AS interval)) AT TIME ZONE $4)`
/// for the given binds, ascending.
pub fn postgres_time_series(values: &Values) -> Vec<DateTime<Utc>> {
	let [
		Value::ChronoDateTime(first),
		Value::ChronoDateTime(last),
		Value::String(interval),
		Value::String(zone),
	] = values.0.as_slice()
	else {
		panic!("unexpected series binds: {:?}", values);
	};
	let tz: Tz = zone.parse().unwrap();

	let mut rows = BTreeSet::new();
	let mut current = *first;
	while current <= *last {
		rows.insert(at_time_zone(current, tz));
		current = add_interval(current, interval);
	}
	rows.into_iter().collect()
}
