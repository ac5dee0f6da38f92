use std::path::Path;
use std::str::FromStr;

pub mod sqlite {
    pub use sqlx_sqlite::{SqliteConnectOptions, SqlitePoolOptions};
}

pub use sqlx_core::query::query;
pub use sqlx_core::query_as::query_as;
pub use sqlx_sqlite::SqlitePool;

/// Open a pool on `url`, creating the database file when it does not exist.
/// Connections are never recycled so `sqlite::memory:` keeps its contents.
pub async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool, sqlx_core::Error> {
    let options = sqlite::SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    sqlite::SqlitePoolOptions::new()
        .max_connections(max_connections)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

const WORKSPACE_MIGRATIONS_DIR: &str = "server/migrations";
const CRATE_MIGRATIONS_DIR: &str = "./migrations";

fn migrations_path() -> &'static Path {
    let workspace_path = Path::new(WORKSPACE_MIGRATIONS_DIR);
    if workspace_path.exists() {
        return workspace_path;
    }
    Path::new(CRATE_MIGRATIONS_DIR)
}

/// Create the `crime_data` table if it does not exist yet.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx_core::migrate::MigrateError> {
    let migrator = sqlx_core::migrate::Migrator::new(migrations_path()).await?;
    migrator.run(pool).await
}
