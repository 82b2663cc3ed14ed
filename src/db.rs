use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement};

use crate::{config::Config, error::AppResult};

const SQLITE_PRAGMAS: &[&str] = &["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL"];

pub async fn connect_and_migrate(config: &Config) -> AppResult<DatabaseConnection> {
    let mut opts = ConnectOptions::new(config.database_url.clone());
    opts.max_connections(config.db_max_connections)
        .connect_timeout(Duration::from_secs(10));

    let db = Database::connect(opts).await?;
    migrate(&db).await?;
    Ok(db)
}

/// Applies backend tuning and any pending migrations.
pub async fn migrate(db: &DatabaseConnection) -> AppResult<()> {
    let backend = db.get_database_backend();
    if backend == DbBackend::Sqlite {
        for pragma in SQLITE_PRAGMAS {
            db.execute(Statement::from_string(backend, pragma.to_string())).await?;
        }
    }

    Migrator::up(db, None).await?;
    Ok(())
}
