use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Deserializer, de};
use serde_json::{Value, json};
use sqlx::types::BigDecimal;
use validator::{Validate, ValidationError};

use crate::{
    pkg::{
        internal::adaptors::{
            companies::selectors::CompanySelector,
            jobs::{mutators::JobMutator, selectors::JobSelector, spec::JobDetail},
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
pub struct CreateJobInput {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(range(min = 0, message = "salary must not be negative"))]
    pub salary: Option<i32>,
    #[validate(custom(function = equity_in_range))]
    #[serde(default, deserialize_with = "deserialize_equity")]
    pub equity: Option<BigDecimal>,
    #[validate(length(min = 1, message = "companyHandle must not be empty"))]
    pub company_handle: String,
}

// The id and companyHandle are deliberately absent; submitting them is an
// unknown-field rejection.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateJobInput {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[validate(range(min = 0, message = "salary must not be negative"))]
    pub salary: Option<i32>,
    #[validate(custom(function = equity_in_range))]
    #[serde(default, deserialize_with = "deserialize_equity")]
    pub equity: Option<BigDecimal>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobFilters {
    pub title: Option<String>,
    #[validate(range(min = 0, message = "minSalary must not be negative"))]
    pub min_salary: Option<i32>,
    pub has_equity: Option<bool>,
}

// Routes JSON numbers through their decimal text form: going through f64
// would turn 0.2 into its full binary expansion, which then gets stored and
// echoed back to clients. Strings are parsed as-is.
fn deserialize_equity<'de, D>(deserializer: D) -> std::result::Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .to_string()
            .parse::<BigDecimal>()
            .map(Some)
            .map_err(de::Error::custom),
        Some(Value::String(s)) => s.parse::<BigDecimal>().map(Some).map_err(de::Error::custom),
        Some(_) => Err(de::Error::custom("equity must be a number or decimal string")),
    }
}

fn equity_in_range(equity: &BigDecimal) -> std::result::Result<(), ValidationError> {
    if *equity < BigDecimal::from(0) || *equity > BigDecimal::from(1) {
        return Err(
            ValidationError::new("range").with_message("equity must be between 0 and 1".into())
        );
    }
    Ok(())
}

pub async fn create(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    WithRejection(Json(input), _): WithRejection<Json<CreateJobInput>, ApiError>,
) -> Result<impl IntoResponse> {
    input.validate()?;
    let mut tx = state.db_pool.begin_txn().await?;
    let job = JobMutator::new(&mut tx).create(input).await?;
    tx.commit().await?;
    tracing::info!("job {} created by {}", job.id, user.username);
    Ok((StatusCode::CREATED, Json(json!({"job": job}))))
}

pub async fn list(
    State(state): State<AppState>,
    WithRejection(Query(filters), _): WithRejection<Query<JobFilters>, ApiError>,
) -> Result<Json<Value>> {
    filters.validate()?;
    let mut conn = state.db_pool.acquire().await?;
    let jobs = JobSelector::new(&mut conn).get_all(&filters).await?;
    Ok(Json(json!({"jobs": jobs})))
}

pub async fn retrieve(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ApiError>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let job = JobSelector::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no job: {}", id)))?;
    let company = CompanySelector::new(&mut conn)
        .get_by_handle(&job.company_handle)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no company: {}", job.company_handle)))?;
    let job = JobDetail {
        id: job.id,
        title: job.title,
        salary: job.salary,
        equity: job.equity,
        company,
    };
    Ok(Json(json!({"job": job})))
}

pub async fn update(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ApiError>,
    WithRejection(Json(input), _): WithRejection<Json<UpdateJobInput>, ApiError>,
) -> Result<Json<Value>> {
    input.validate()?;
    let mut tx = state.db_pool.begin_txn().await?;
    let job = JobMutator::new(&mut tx).update(id, input).await?;
    tx.commit().await?;
    tracing::info!("job {} updated by {}", id, user.username);
    Ok(Json(json!({"job": job})))
}

pub async fn remove(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ApiError>,
) -> Result<Json<Value>> {
    let mut tx = state.db_pool.begin_txn().await?;
    JobMutator::new(&mut tx).delete(id).await?;
    tx.commit().await?;
    tracing::info!("job {} deleted by {}", id, user.username);
    Ok(Json(json!({"deleted": id})))
}
