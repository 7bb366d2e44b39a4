use sqlx::PgConnection;

use crate::{
    pkg::{
        internal::{
            adaptors::jobs::spec::{JobEntry, SET_COLUMNS},
            sql::UpdateBuilder,
        },
        server::handlers::jobs::{CreateJobInput, UpdateJobInput},
    },
    prelude::{ApiError, Result},
};

pub struct JobMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> JobMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        JobMutator { pool }
    }

    pub async fn create(&mut self, job: CreateJobInput) -> Result<JobEntry> {
        let row = sqlx::query_as::<_, JobEntry>(
            r#"
            INSERT INTO jobs (title, salary, equity, company_handle)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, salary, equity, company_handle
            "#,
        )
        .bind(&job.title)
        .bind(job.salary)
        .bind(&job.equity)
        .bind(&job.company_handle)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// Applies only the supplied fields. The id and company handle are not
    /// part of the input type, so they can never be touched here.
    pub async fn update(&mut self, id: i32, job: UpdateJobInput) -> Result<JobEntry> {
        let mut update = UpdateBuilder::new(SET_COLUMNS);
        update
            .set_opt("title", job.title)
            .set_opt("salary", job.salary)
            .set_opt("equity", job.equity);
        let (set_cols, values) = update.build()?;

        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} \
             RETURNING id, title, salary, equity, company_handle",
            set_cols,
            values.len() + 1
        );
        let mut query = sqlx::query_as::<_, JobEntry>(&sql);
        for value in values {
            query = value.bind_to(query);
        }
        let row = query
            .bind(id)
            .fetch_optional(&mut *self.pool)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("no job: {}", id)))?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("no job: {}", id)));
        }
        Ok(())
    }
}
