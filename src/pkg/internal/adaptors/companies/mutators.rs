use sqlx::PgConnection;

use crate::{
    pkg::{
        internal::{
            adaptors::companies::spec::{CompanyEntry, SET_COLUMNS},
            sql::UpdateBuilder,
        },
        server::handlers::companies::{CreateCompanyInput, UpdateCompanyInput},
    },
    prelude::{ApiError, Result},
};

pub struct CompanyMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> CompanyMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        CompanyMutator { pool }
    }

    pub async fn create(&mut self, company: CreateCompanyInput) -> Result<CompanyEntry> {
        let row = sqlx::query_as::<_, CompanyEntry>(
            r#"
            INSERT INTO companies (handle, name, description, num_employees, logo_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING handle, name, description, num_employees, logo_url
            "#,
        )
        .bind(&company.handle)
        .bind(&company.name)
        .bind(company.description.unwrap_or_default())
        .bind(company.num_employees)
        .bind(&company.logo_url)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&mut self, handle: &str, company: UpdateCompanyInput) -> Result<CompanyEntry> {
        let mut update = UpdateBuilder::new(SET_COLUMNS);
        update
            .set_opt("name", company.name)
            .set_opt("description", company.description)
            .set_opt("numEmployees", company.num_employees)
            .set_opt("logoUrl", company.logo_url);
        let (set_cols, values) = update.build()?;

        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${} \
             RETURNING handle, name, description, num_employees, logo_url",
            set_cols,
            values.len() + 1
        );
        let mut query = sqlx::query_as::<_, CompanyEntry>(&sql);
        for value in values {
            query = value.bind_to(query);
        }
        let row = query
            .bind(handle)
            .fetch_optional(&mut *self.pool)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("no company: {}", handle)))?;
        Ok(row)
    }

    pub async fn delete(&mut self, handle: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM companies WHERE handle = $1")
            .bind(handle)
            .execute(&mut *self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("no company: {}", handle)));
        }
        Ok(())
    }
}
