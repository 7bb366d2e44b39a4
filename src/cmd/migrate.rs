use crate::{conf::settings, prelude::{ApiError, Result}};
use sqlx::{migrate::Migrator, postgres::PgPoolOptions};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn apply() -> Result<()> {
    let pool = PgPoolOptions::new().connect(&settings.database_url).await?;

    tracing::debug!("connected to db");
    MIGRATOR
        .run(&pool)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    println!("Migrations applied successfully");
    Ok(())
}
