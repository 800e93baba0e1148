//! SQL dialects supported by the bucket builders.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GroupdateError;

/// Target SQL dialect
///
/// Resolved once at the boundary from a dialect or connection adapter name,
/// then passed around as a value.
///
/// - PostgreSQL: placeholders `$1, $2, ...`
/// - MySQL: placeholders `?`
///
/// # Examples
///
/// ```rust
/// use reinhardt_groupdate::Dialect;
///
/// assert_eq!(Dialect::from_adapter_name("Mysql2").unwrap(), Dialect::MySql);
/// assert_eq!("PostgreSQL".parse::<Dialect>().unwrap(), Dialect::Postgres);
/// assert!("SQLite".parse::<Dialect>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
	#[serde(rename = "postgresql")]
	Postgres,
	MySql,
}

impl Dialect {
	/// Resolve a connection adapter name (`PostgreSQL`, `MySQL`, `Mysql2`, ...).
	pub fn from_adapter_name(name: &str) -> Result<Self, GroupdateError> {
		name.parse()
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Dialect::Postgres => "postgresql",
			Dialect::MySql => "mysql",
		}
	}

	/// Format the placeholder for the 1-based parameter `index`.
	pub fn placeholder(&self, index: usize) -> String {
		match self {
			Dialect::Postgres => format!("${}", index),
			Dialect::MySql => "?".to_string(),
		}
	}
}

impl fmt::Display for Dialect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Dialect {
	type Err = GroupdateError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"postgresql" | "postgres" => Ok(Dialect::Postgres),
			"mysql" | "mysql2" => Ok(Dialect::MySql),
			_ => Err(GroupdateError::UnsupportedDialect(s.to_string())),
		}
	}
}
