//! SQL writer and parameterized fragments
//!
//! [`SqlWriter`] builds SQL text while collecting bind values and numbering
//! placeholders for the target dialect. [`SqlFragment`] is what it produces:
//! SQL text plus the ordered values for its placeholders.

use crate::dialect::Dialect;
use crate::value::{Value, Values};

/// A parameterized SQL fragment.
///
/// The SQL never has values interpolated into it. `first_param` is the index
/// of the first placeholder, so PostgreSQL fragments built with an offset
/// can be merged into a host statement that already has parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
	sql: String,
	values: Values,
	dialect: Dialect,
	first_param: usize,
}

impl SqlFragment {
	/// A fragment with no bind values.
	pub fn raw(dialect: Dialect, sql: impl Into<String>) -> Self {
		Self {
			sql: sql.into(),
			values: Values::new(),
			dialect,
			first_param: 1,
		}
	}

	pub fn sql(&self) -> &str {
		&self.sql
	}

	pub fn values(&self) -> &Values {
		&self.values
	}

	pub fn dialect(&self) -> Dialect {
		self.dialect
	}

	/// Index of the first placeholder (1-based).
	pub fn first_param(&self) -> usize {
		self.first_param
	}

	/// Index the next placeholder after this fragment would take.
	pub fn next_param(&self) -> usize {
		self.first_param + self.values.len()
	}

	/// Consume the fragment and return (SQL, Values).
	pub fn into_parts(self) -> (String, Values) {
		(self.sql, self.values)
	}

	/// Render the fragment with every placeholder replaced by its literal.
	///
	/// For logging and debugging only.
	pub fn to_inline_sql(&self) -> String {
		let mut out = String::with_capacity(self.sql.len());
		let mut chars = self.sql.chars().peekable();
		let mut next = 0;
		while let Some(c) = chars.next() {
			match (self.dialect, c) {
				(Dialect::MySql, '?') => {
					out.push_str(&self.literal_at(next));
					next += 1;
				}
				(Dialect::Postgres, '$') if chars.peek().is_some_and(char::is_ascii_digit) => {
					let mut digits = String::new();
					while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
						digits.push(d);
						chars.next();
					}
					let index = digits.parse::<usize>().unwrap_or(0);
					out.push_str(&self.literal_at(index.saturating_sub(self.first_param)));
				}
				_ => out.push(c),
			}
		}
		out
	}

	fn literal_at(&self, position: usize) -> String {
		self.values
			.0
			.get(position)
			.map(Value::to_sql_literal)
			.unwrap_or_else(|| "?".to_string())
	}
}

/// SQL Writer for constructing parameterized SQL
///
/// # Examples
///
/// ```rust
/// use reinhardt_groupdate::{Dialect, SqlWriter, Value};
///
/// let mut writer = SqlWriter::new(Dialect::Postgres);
/// writer.push("created_at AT TIME ZONE ");
/// writer.push_value(Value::from("UTC"));
///
/// let fragment = writer.finish();
/// assert_eq!(fragment.sql(), "created_at AT TIME ZONE $1");
/// assert_eq!(fragment.values().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SqlWriter {
	dialect: Dialect,
	/// The SQL string being constructed
	sql: String,
	/// Parameter values collected during construction
	values: Values,
	first_param: usize,
	/// Current parameter index (1-based for PostgreSQL)
	param_index: usize,
}

impl SqlWriter {
	pub fn new(dialect: Dialect) -> Self {
		Self::with_offset(dialect, 0)
	}

	/// Create a writer whose first placeholder is `offset + 1`.
	pub fn with_offset(dialect: Dialect, offset: usize) -> Self {
		Self {
			dialect,
			sql: String::new(),
			values: Values::new(),
			first_param: offset + 1,
			param_index: offset + 1,
		}
	}

	pub fn dialect(&self) -> Dialect {
		self.dialect
	}

	pub fn push(&mut self, s: &str) {
		self.sql.push_str(s);
	}

	/// Push a space unless the SQL is empty or already ends with one
	pub fn push_space(&mut self) {
		if !self.sql.is_empty() && !self.sql.ends_with(' ') {
			self.sql.push(' ');
		}
	}

	/// Push a keyword (with automatic spacing)
	pub fn push_keyword(&mut self, keyword: &str) {
		self.push_space();
		self.sql.push_str(keyword);
	}

	/// Push a value placeholder and collect the value
	pub fn push_value(&mut self, value: Value) {
		self.sql.push_str(&self.dialect.placeholder(self.param_index));
		self.values.push(value);
		self.param_index += 1;
	}

	/// Push a list of items with a separator
	pub fn push_list<I, T, F>(&mut self, items: I, separator: &str, mut f: F)
	where
		I: IntoIterator<Item = T>,
		F: FnMut(&mut Self, T),
	{
		let mut first = true;
		for item in items {
			if !first {
				self.sql.push_str(separator);
			}
			f(self, item);
			first = false;
		}
	}

	/// Append another fragment, renumbering nothing.
	///
	/// The fragment must have been built starting at this writer's current
	/// parameter index.
	pub fn push_fragment(&mut self, fragment: &SqlFragment) {
		debug_assert!(
			self.dialect == Dialect::MySql || fragment.first_param == self.param_index,
			"fragment placeholders start at {} but writer is at {}",
			fragment.first_param,
			self.param_index
		);
		self.sql.push_str(&fragment.sql);
		for value in fragment.values.iter() {
			self.values.push(value.clone());
		}
		self.param_index += fragment.values.len();
	}

	pub fn sql(&self) -> &str {
		&self.sql
	}

	pub fn values(&self) -> &Values {
		&self.values
	}

	/// Consume writer and return the fragment
	pub fn finish(self) -> SqlFragment {
		SqlFragment {
			sql: self.sql,
			values: self.values,
			dialect: self.dialect,
			first_param: self.first_param,
		}
	}
}
