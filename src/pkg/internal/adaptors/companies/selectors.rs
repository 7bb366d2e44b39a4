use sqlx::PgConnection;

use crate::{
    pkg::{
        internal::{
            adaptors::companies::spec::CompanyEntry,
            sql::{Cmp, WhereBuilder},
        },
        server::handlers::companies::CompanyFilters,
    },
    prelude::{ApiError, Result},
};

pub struct CompanySelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> CompanySelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        CompanySelector { pool }
    }

    pub async fn get_by_handle(&mut self, handle: &str) -> Result<Option<CompanyEntry>> {
        let row = sqlx::query_as::<_, CompanyEntry>(
            "SELECT handle, name, description, num_employees, logo_url
             FROM companies WHERE handle = $1",
        )
        .bind(handle)
        .fetch_optional(&mut *self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_all(&mut self, filters: &CompanyFilters) -> Result<Vec<CompanyEntry>> {
        let filter = filter_clauses(filters)?;
        let sql = format!(
            "SELECT handle, name, description, num_employees, logo_url
             FROM companies{} ORDER BY name",
            filter.clause()
        );
        let mut query = sqlx::query_as::<_, CompanyEntry>(&sql);
        for value in filter.into_values() {
            query = value.bind_to(query);
        }
        let rows = query.fetch_all(&mut *self.pool).await?;
        Ok(rows)
    }
}

/// Translates the listing filters into their WHERE clauses: name becomes a
/// substring LIKE and the employee bounds become `>=`/`<=` on num_employees.
/// An inverted range is rejected here, before any SQL exists.
pub fn filter_clauses(filters: &CompanyFilters) -> Result<WhereBuilder> {
    if let (Some(min), Some(max)) = (filters.min_employees, filters.max_employees) {
        if min > max {
            return Err(ApiError::bad_request(
                "minEmployees cannot be greater than maxEmployees",
            ));
        }
    }
    let mut filter = WhereBuilder::new();
    if let Some(name) = &filters.name {
        filter.push("name", Cmp::Like, format!("%{}%", name));
    }
    if let Some(min_employees) = filters.min_employees {
        filter.push("num_employees", Cmp::Ge, min_employees);
    }
    if let Some(max_employees) = filters.max_employees {
        filter.push("num_employees", Cmp::Le, max_employees);
    }
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkg::internal::sql::SqlValue;

    fn filters(
        name: Option<&str>,
        min_employees: Option<i32>,
        max_employees: Option<i32>,
    ) -> CompanyFilters {
        CompanyFilters {
            name: name.map(String::from),
            min_employees,
            max_employees,
        }
    }

    #[test]
    fn no_filters_builds_no_clause() -> Result<()> {
        let filter = filter_clauses(&filters(None, None, None))?;
        assert_eq!(filter.clause(), "");
        assert!(filter.into_values().is_empty());
        Ok(())
    }

    #[test]
    fn all_filters_keep_name_min_max_order() -> Result<()> {
        let filter = filter_clauses(&filters(Some("C"), Some(2), Some(500)))?;
        assert_eq!(
            filter.clause(),
            " WHERE name LIKE $1 AND num_employees >= $2 AND num_employees <= $3"
        );
        assert_eq!(
            filter.into_values(),
            vec![
                SqlValue::Text("%C%".into()),
                SqlValue::Int(2),
                SqlValue::Int(500),
            ]
        );
        Ok(())
    }

    #[test]
    fn inverted_employee_range_is_rejected() {
        let err = filter_clauses(&filters(None, Some(10), Some(2))).unwrap_err();
        match err {
            ApiError::BadRequest(msgs) => {
                assert_eq!(msgs, vec!["minEmployees cannot be greater than maxEmployees"]);
            }
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn equal_bounds_are_allowed() -> Result<()> {
        let filter = filter_clauses(&filters(None, Some(3), Some(3)))?;
        assert_eq!(
            filter.clause(),
            " WHERE num_employees >= $1 AND num_employees <= $2"
        );
        Ok(())
    }
}
