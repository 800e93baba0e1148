//! Time-bucket SQL generation for PostgreSQL and MySQL.
//!
//! This crate renders the SQL needed to group rows by a time bucket in a
//! chosen IANA time zone, and to zero-fill buckets that have no rows:
//!
//! - **Bucket expressions**: truncate a timestamp column to second, minute,
//!   hour, day, Sunday-start week, month or year, or extract day of week
//!   (Sunday = 0) or hour of day
//! - **Gap-fill series**: a derived table with one row per bucket and the
//!   `RIGHT OUTER JOIN` that brings empty buckets into a grouped result
//! - **Time zones**: a per-call zone, a process-wide default, or UTC
//!
//! All output is parameterized. Zone names and series bounds are bind
//! values; only the caller-quoted column is interpolated.
//!
//! # Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use reinhardt_groupdate::prelude::*;
//!
//! let range = GapFillRange::new(
//!     Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap(),
//! );
//! let group = GroupDate::new(Dialect::Postgres)
//!     .time_zone(TimeZoneSpec::parse("America/New_York").unwrap())
//!     .group_by_day("\"orders\".\"created_at\"", Some(range))
//!     .unwrap();
//!
//! let sql = format!(
//!     "SELECT {}, COUNT(\"orders\".\"id\") FROM \"orders\" {} GROUP BY 1 ORDER BY 1",
//!     group.select_clause().sql(),
//!     group.join().unwrap().sql(),
//! );
//! assert!(sql.starts_with("SELECT groupdate_series.day AS day"));
//! ```
//!
//! # Architecture
//!
//! - [`BucketSqlBuilder`] - resolved dialect, zone and parameter offset
//! - [`backend::BucketBackend`] - per-dialect SQL rendering
//! - [`calendar`] - bucket arithmetic in Rust, matching the SQL
//! - [`GroupDate`] / [`GroupBy`] - grouping composed for a host query
//! - [`GroupdateSettings`] - TOML-loadable defaults

pub mod backend;
pub mod builder;
pub mod calendar;
pub mod dialect;
pub mod error;
pub mod granularity;
pub mod prelude;
pub mod range;
pub mod scope;
pub mod settings;
pub mod time_zone;
pub mod value;
pub mod writer;

// Re-export commonly used types at crate root
pub use builder::{
	BucketExpression, BucketSqlBuilder, DEFAULT_MAX_SERIES_ROWS, SERIES_ALIAS, SeriesJoin,
	build_bucket_expression, build_gap_fill_series,
};
pub use dialect::Dialect;
pub use error::{GroupdateError, Result};
pub use granularity::Granularity;
pub use range::GapFillRange;
pub use scope::{GroupBy, GroupDate};
pub use settings::GroupdateSettings;
pub use time_zone::{TimeZoneSpec, clear_default_time_zone, default_time_zone, set_default_time_zone};
pub use value::{Value, Values};
pub use writer::{SqlFragment, SqlWriter};
