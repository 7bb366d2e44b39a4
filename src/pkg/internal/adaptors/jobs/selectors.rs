use sqlx::PgConnection;

use crate::{
    pkg::{
        internal::{
            adaptors::jobs::spec::{JobEntry, JobListRow, JobSummary},
            sql::{Cmp, WhereBuilder},
        },
        server::handlers::jobs::JobFilters,
    },
    prelude::Result,
};

pub struct JobSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> JobSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        JobSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i32) -> Result<Option<JobEntry>> {
        let row = sqlx::query_as::<_, JobEntry>(
            "SELECT id, title, salary, equity, company_handle
             FROM jobs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;

        Ok(row)
    }

    /// Filtered listing. `has_equity == Some(true)` keeps only rows with
    /// equity strictly above zero; false or absent filters nothing, so
    /// zero-equity rows stay in.
    pub async fn get_all(&mut self, filters: &JobFilters) -> Result<Vec<JobListRow>> {
        let filter = filter_clauses(filters);
        let sql = format!(
            "SELECT j.id, j.title, j.salary, j.equity, j.company_handle, c.name
             FROM jobs j
               LEFT JOIN companies c ON c.handle = j.company_handle{}
             ORDER BY j.title",
            filter.clause()
        );
        let mut query = sqlx::query_as::<_, JobListRow>(&sql);
        for value in filter.into_values() {
            query = value.bind_to(query);
        }
        let rows = query.fetch_all(&mut *self.pool).await?;
        Ok(rows)
    }

    pub async fn get_for_company(&mut self, handle: &str) -> Result<Vec<JobSummary>> {
        let rows = sqlx::query_as::<_, JobSummary>(
            "SELECT id, title, salary, equity
             FROM jobs WHERE company_handle = $1 ORDER BY id",
        )
        .bind(handle)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }
}

/// Translates the listing filters into their WHERE clauses: title becomes a
/// substring LIKE, minSalary a `>=`, and `hasEquity=true` an `equity > 0`
/// check. `hasEquity=false` is treated the same as absent.
pub fn filter_clauses(filters: &JobFilters) -> WhereBuilder {
    let mut filter = WhereBuilder::new();
    if let Some(title) = &filters.title {
        filter.push("j.title", Cmp::Like, format!("%{}%", title));
    }
    if let Some(min_salary) = filters.min_salary {
        filter.push("j.salary", Cmp::Ge, min_salary);
    }
    if filters.has_equity == Some(true) {
        filter.push("j.equity", Cmp::Gt, 0);
    }
    filter
}
