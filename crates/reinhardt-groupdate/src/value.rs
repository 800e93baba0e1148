//! Bind values carried alongside generated SQL.

use chrono::NaiveDateTime;

/// A bind parameter value.
///
/// Generated SQL only binds zone names, interval literals and wall-clock
/// timestamps, so there is no NULL.
///
/// ## Example
///
/// ```rust
/// use reinhardt_groupdate::Value;
///
/// let zone = Value::from("America/Chicago");
/// assert_eq!(zone.to_sql_literal(), "'America/Chicago'");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
	/// Zone names and interval literals
	String(String),
	/// Timestamp without time zone: MySQL `DATETIME` rows and PostgreSQL
	/// `timestamp` series bounds
	ChronoDateTime(NaiveDateTime),
}

impl Value {
	/// Render this value as an inline SQL literal.
	///
	/// Only meant for logging and debugging; generated SQL always binds.
	#[must_use]
	pub fn to_sql_literal(&self) -> String {
		match self {
			Self::String(v) => format!("'{}'", v.replace('\'', "''")),
			Self::ChronoDateTime(v) => format!("'{}'", v.format("%Y-%m-%d %H:%M:%S%.f")),
		}
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::String(s.to_string())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::String(s)
	}
}

impl From<NaiveDateTime> for Value {
	fn from(dt: NaiveDateTime) -> Self {
		Value::ChronoDateTime(dt)
	}
}

/// Ordered bind values for one SQL fragment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Values(pub Vec<Value>);

impl Values {
	pub fn new() -> Self {
		Self(Vec::new())
	}

	pub fn push(&mut self, value: Value) {
		self.0.push(value);
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Value> {
		self.0.iter()
	}

	pub fn into_inner(self) -> Vec<Value> {
		self.0
	}
}

impl IntoIterator for Values {
	type Item = Value;
	type IntoIter = std::vec::IntoIter<Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl<'a> IntoIterator for &'a Values {
	type Item = &'a Value;
	type IntoIter = std::slice::Iter<'a, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

impl std::ops::Index<usize> for Values {
	type Output = Value;

	fn index(&self, index: usize) -> &Self::Output {
		&self.0[index]
	}
}
