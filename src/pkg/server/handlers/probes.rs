use axum::extract::State;
use sqlx::query;

use crate::{conf::settings, pkg::server::state::AppState, prelude::Result};

pub async fn livez() -> Result<()> {
    tracing::debug!("{} is live", settings.service_name);
    Ok(())
}

/// Proves the database is reachable, not just that the process is up.
pub async fn healthz(State(state): State<AppState>) -> Result<()> {
    query("select 1").execute(&*state.db_pool).await?;
    tracing::debug!("{} is healthy", settings.service_name);
    Ok(())
}
