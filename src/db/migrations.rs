use sqlx::{Pool, Postgres};
use tracing::info;

/// Apply any pending schema migrations.
///
/// The SQL files under migrations/ are embedded at compile time and
/// tracked by sqlx, so running this repeatedly is safe. The whole schema
/// is the single kv_store table the entity repositories sit on.
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations...");

    sqlx::migrate!("./migrations").run(pool).await?;

    info!("Database migrations completed");
    Ok(())
}
