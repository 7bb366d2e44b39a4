//! Parameterized SQL fragment builders for partial updates and dynamic
//! filters. Both track the positional parameter index explicitly so the
//! placeholder numbering can never drift from the bound value list.

use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::types::BigDecimal;
use sqlx::Postgres;

use crate::prelude::{ApiError, Result};

/// A value destined for one `$N` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i32),
    Numeric(BigDecimal),
}

impl SqlValue {
    /// Replays this value onto a query, keeping bind order aligned with the
    /// placeholder order the builders produced.
    pub fn bind_to<'q, O>(
        self,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        match self {
            SqlValue::Text(v) => query.bind(v),
            SqlValue::Int(v) => query.bind(v),
            SqlValue::Numeric(v) => query.bind(v),
        }
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v)
    }
}

impl From<BigDecimal> for SqlValue {
    fn from(v: BigDecimal) -> Self {
        SqlValue::Numeric(v)
    }
}

/// Builds the `SET` clause of a partial update from the subset of fields the
/// caller supplied. Field names are translated to column names through a
/// static per-entity override table; fields not listed there use their own
/// name. Columns are always double-quoted.
pub struct UpdateBuilder {
    columns: &'static [(&'static str, &'static str)],
    assignments: Vec<String>,
    values: Vec<SqlValue>,
}

impl UpdateBuilder {
    pub fn new(columns: &'static [(&'static str, &'static str)]) -> Self {
        UpdateBuilder {
            columns,
            assignments: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn set(&mut self, field: &str, value: impl Into<SqlValue>) -> &mut Self {
        let column = self
            .columns
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, c)| *c)
            .unwrap_or(field);
        self.values.push(value.into());
        self.assignments
            .push(format!("\"{}\"=${}", column, self.values.len()));
        self
    }

    pub fn set_opt(&mut self, field: &str, value: Option<impl Into<SqlValue>>) -> &mut Self {
        if let Some(value) = value {
            self.set(field, value);
        }
        self
    }

    /// Joined `"col"=$N` fragments plus the same-order value list. Refuses to
    /// build from an empty field set so callers never emit a no-op UPDATE.
    pub fn build(self) -> Result<(String, Vec<SqlValue>)> {
        if self.assignments.is_empty() {
            return Err(ApiError::bad_request("no data to update"));
        }
        Ok((self.assignments.join(", "), self.values))
    }
}

/// Comparison operators the filter builder knows about.
#[derive(Debug, Clone, Copy)]
pub enum Cmp {
    Like,
    Ge,
    Le,
    Gt,
}

impl Cmp {
    fn as_str(self) -> &'static str {
        match self {
            Cmp::Like => "LIKE",
            Cmp::Ge => ">=",
            Cmp::Le => "<=",
            Cmp::Gt => ">",
        }
    }
}

/// Builds a conjunctive `WHERE` clause incrementally; absent filters simply
/// never get pushed, and an empty builder contributes no clause at all.
#[derive(Debug, Default)]
pub struct WhereBuilder {
    clauses: Vec<String>,
    values: Vec<SqlValue>,
}

impl WhereBuilder {
    pub fn new() -> Self {
        WhereBuilder::default()
    }

    pub fn push(&mut self, column: &str, op: Cmp, value: impl Into<SqlValue>) -> &mut Self {
        self.values.push(value.into());
        self.clauses
            .push(format!("{} {} ${}", column, op.as_str(), self.values.len()));
        self
    }

    /// Leading-space `" WHERE ..."` fragment, or the empty string when no
    /// filters were pushed.
    pub fn clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_COLUMNS: &[(&str, &str)] = &[("username", "u_name"), ("firstName", "first_name")];

    #[test]
    fn single_field_update() -> Result<()> {
        let mut builder = UpdateBuilder::new(USER_COLUMNS);
        builder.set("username", "jo");
        let (set_cols, values) = builder.build()?;
        assert_eq!(set_cols, "\"u_name\"=$1");
        assert_eq!(values, vec![SqlValue::Text("jo".into())]);
        Ok(())
    }

    #[test]
    fn two_field_update_keeps_positional_order() -> Result<()> {
        let mut builder = UpdateBuilder::new(USER_COLUMNS);
        builder.set("username", "jo").set("firstName", "joe");
        let (set_cols, values) = builder.build()?;
        assert_eq!(set_cols, "\"u_name\"=$1, \"first_name\"=$2");
        assert_eq!(
            values,
            vec![SqlValue::Text("jo".into()), SqlValue::Text("joe".into())]
        );
        Ok(())
    }

    #[test]
    fn unmapped_field_uses_its_own_name() -> Result<()> {
        let mut builder = UpdateBuilder::new(USER_COLUMNS);
        builder.set("title", "engineer").set("salary", 90000);
        let (set_cols, values) = builder.build()?;
        assert_eq!(set_cols, "\"title\"=$1, \"salary\"=$2");
        assert_eq!(values.len(), 2);
        Ok(())
    }

    #[test]
    fn empty_update_is_rejected_before_sql() {
        let builder = UpdateBuilder::new(USER_COLUMNS);
        let err = builder.build().unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn set_opt_skips_absent_fields() -> Result<()> {
        let mut builder = UpdateBuilder::new(&[]);
        builder
            .set_opt("title", Some("dev"))
            .set_opt("salary", None::<i32>);
        let (set_cols, values) = builder.build()?;
        assert_eq!(set_cols, "\"title\"=$1");
        assert_eq!(values.len(), 1);
        Ok(())
    }

    #[test]
    fn no_filters_means_no_where_clause() {
        let filter = WhereBuilder::new();
        assert_eq!(filter.clause(), "");
        assert!(filter.into_values().is_empty());
    }

    #[test]
    fn filters_join_with_and_in_push_order() {
        let mut filter = WhereBuilder::new();
        filter
            .push("title", Cmp::Like, "%job3%")
            .push("salary", Cmp::Ge, 60000)
            .push("equity", Cmp::Gt, 0);
        assert_eq!(
            filter.clause(),
            " WHERE title LIKE $1 AND salary >= $2 AND equity > $3"
        );
        assert_eq!(
            filter.into_values(),
            vec![
                SqlValue::Text("%job3%".into()),
                SqlValue::Int(60000),
                SqlValue::Int(0),
            ]
        );
    }

    #[test]
    fn single_filter_has_no_trailing_and() {
        let mut filter = WhereBuilder::new();
        filter.push("num_employees", Cmp::Le, 500);
        assert_eq!(filter.clause(), " WHERE num_employees <= $1");
    }
}
