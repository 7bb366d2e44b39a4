use serde::Serialize;
use sqlx::prelude::FromRow;
use sqlx::types::BigDecimal;

use crate::pkg::internal::adaptors::companies::spec::CompanyEntry;

/// Column-name overrides for job partial updates; fields not listed map to
/// a column of the same name. The identifier and company handle are absent
/// on purpose, they are immutable after creation.
pub const SET_COLUMNS: &[(&str, &str)] = &[];

#[derive(Serialize, FromRow, Debug)]
#[serde(rename_all = "camelCase")]
pub struct JobEntry {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<BigDecimal>,
    pub company_handle: String,
}

/// Listing row, carries the company name from the join.
#[derive(Serialize, FromRow, Debug)]
#[serde(rename_all = "camelCase")]
pub struct JobListRow {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<BigDecimal>,
    pub company_handle: String,
    pub name: String,
}

/// Compact shape embedded in a company's detail view.
#[derive(Serialize, FromRow, Debug)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<BigDecimal>,
}

/// Detail view: the raw foreign key is replaced by the full parent company.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<BigDecimal>,
    pub company: CompanyEntry,
}
