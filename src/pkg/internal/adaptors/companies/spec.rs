use serde::Serialize;
use sqlx::prelude::FromRow;

use crate::pkg::internal::adaptors::jobs::spec::JobSummary;

/// Column-name overrides for company partial updates, keyed by the external
/// camelCase field vocabulary. The handle is immutable and deliberately
/// missing.
pub const SET_COLUMNS: &[(&str, &str)] = &[
    ("numEmployees", "num_employees"),
    ("logoUrl", "logo_url"),
];

#[derive(Serialize, FromRow, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CompanyEntry {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// Detail view: the company plus its jobs.
#[derive(Serialize, Debug)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: CompanyEntry,
    pub jobs: Vec<JobSummary>,
}
