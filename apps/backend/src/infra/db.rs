use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::{db_url, DbOwner, DbProfile};
use crate::error::AppError;

/// Connect to the database for the given profile and run migrations.
///
/// Single entrypoint used by `StateBuilder` and service binaries.
pub async fn bootstrap_db(profile: DbProfile, owner: DbOwner) -> Result<DatabaseConnection, AppError> {
    let url = db_url(profile, owner)?;

    let mut options = ConnectOptions::new(url.clone());
    if url.starts_with("sqlite") {
        // The in-memory database lives inside its single connection; a wider
        // pool would hand out empty databases.
        options.max_connections(1).min_connections(1);
    } else {
        options.max_connections(10);
    }
    options.sqlx_logging(false);

    let conn = Database::connect(options).await?;
    migration::migrate(&conn, migration::MigrationCommand::Up)
        .await
        .map_err(|e| AppError::db(format!("migration failed: {e}")))?;

    info!("database bootstrapped");
    Ok(conn)
}
