use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

use crate::{
    pkg::{
        internal::adaptors::{
            companies::{
                mutators::CompanyMutator, selectors::CompanySelector, spec::CompanyDetail,
            },
            jobs::selectors::JobSelector,
        },
        server::{
            middlewares::authn::AdminUser,
            state::{AppState, GetTxn},
        },
    },
    prelude::{ApiError, Result},
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCompanyInput {
    #[validate(length(min = 1, max = 25, message = "handle must be 1 to 25 characters"))]
    pub handle: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "numEmployees must not be negative"))]
    pub num_employees: Option<i32>,
    #[validate(url(message = "logoUrl must be a valid url"))]
    pub logo_url: Option<String>,
}

// The handle is deliberately absent; submitting it is an unknown-field
// rejection.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateCompanyInput {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "numEmployees must not be negative"))]
    pub num_employees: Option<i32>,
    #[validate(url(message = "logoUrl must be a valid url"))]
    pub logo_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyFilters {
    pub name: Option<String>,
    #[validate(range(min = 0, message = "minEmployees must not be negative"))]
    pub min_employees: Option<i32>,
    #[validate(range(min = 0, message = "maxEmployees must not be negative"))]
    pub max_employees: Option<i32>,
}

pub async fn create(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    WithRejection(Json(input), _): WithRejection<Json<CreateCompanyInput>, ApiError>,
) -> Result<impl IntoResponse> {
    input.validate()?;
    let mut tx = state.db_pool.begin_txn().await?;
    let company = CompanyMutator::new(&mut tx).create(input).await?;
    tx.commit().await?;
    tracing::info!("company {} created by {}", company.handle, user.username);
    Ok((StatusCode::CREATED, Json(json!({"company": company}))))
}

pub async fn list(
    State(state): State<AppState>,
    WithRejection(Query(filters), _): WithRejection<Query<CompanyFilters>, ApiError>,
) -> Result<Json<Value>> {
    filters.validate()?;
    let mut conn = state.db_pool.acquire().await?;
    let companies = CompanySelector::new(&mut conn).get_all(&filters).await?;
    Ok(Json(json!({"companies": companies})))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let company = CompanySelector::new(&mut conn)
        .get_by_handle(&handle)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no company: {}", handle)))?;
    let jobs = JobSelector::new(&mut conn).get_for_company(&handle).await?;
    let company = CompanyDetail { company, jobs };
    Ok(Json(json!({"company": company})))
}

pub async fn update(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(handle): Path<String>,
    WithRejection(Json(input), _): WithRejection<Json<UpdateCompanyInput>, ApiError>,
) -> Result<Json<Value>> {
    input.validate()?;
    let mut tx = state.db_pool.begin_txn().await?;
    let company = CompanyMutator::new(&mut tx).update(&handle, input).await?;
    tx.commit().await?;
    tracing::info!("company {} updated by {}", handle, user.username);
    Ok(Json(json!({"company": company})))
}

pub async fn remove(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(handle): Path<String>,
) -> Result<Json<Value>> {
    let mut tx = state.db_pool.begin_txn().await?;
    CompanyMutator::new(&mut tx).delete(&handle).await?;
    tx.commit().await?;
    tracing::info!("company {} deleted by {}", handle, user.username);
    Ok(Json(json!({"deleted": handle})))
}
