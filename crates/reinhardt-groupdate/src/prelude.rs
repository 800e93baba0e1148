//! Commonly used types.

pub use crate::backend::BucketBackend;
pub use crate::builder::{BucketExpression, BucketSqlBuilder, SeriesJoin};
pub use crate::dialect::Dialect;
pub use crate::error::{GroupdateError, Result};
pub use crate::granularity::Granularity;
pub use crate::range::GapFillRange;
pub use crate::scope::{GroupBy, GroupDate};
pub use crate::settings::GroupdateSettings;
pub use crate::time_zone::TimeZoneSpec;
pub use crate::writer::{SqlFragment, SqlWriter};
