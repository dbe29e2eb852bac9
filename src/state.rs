use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, EntityTrait,
    Schema,
};
use sqlx::postgres::PgPool;

use crate::config::Config;
use crate::entity;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// SeaORM connection pool shared by every request
    pub db: DatabaseConnection,
    pub config: Config,
}

impl AppState {
    /// Connect to the configured database and bring its schema up to date
    pub async fn new(config: Config) -> Result<Self, AppStateError> {
        let is_sqlite = config.database_url.starts_with("sqlite:");

        if !is_sqlite {
            // Postgres schema is owned by the SQL migrations
            let pg_pool = PgPool::connect(&config.database_url)
                .await
                .map_err(|e| AppStateError::Connection(e.to_string()))?;

            sqlx::migrate!("./migrations")
                .run(&pg_pool)
                .await
                .map_err(|e| AppStateError::Migration(e.to_string()))?;

            pg_pool.close().await;
        }

        let mut opt = ConnectOptions::new(&config.database_url);
        if is_sqlite {
            // An in-memory database lives and dies with its single connection
            opt.max_connections(1).min_connections(1);
        } else {
            opt.max_connections(100).min_connections(5);
        }
        opt.sqlx_logging(true);

        let db = Database::connect(opt)
            .await
            .map_err(|e| AppStateError::Connection(e.to_string()))?;

        if db.get_database_backend() == DatabaseBackend::Sqlite {
            create_schema(&db).await?;
        }

        Ok(Self { db, config })
    }
}

/// Create every table from the entity definitions, parents first
async fn create_schema(db: &DatabaseConnection) -> Result<(), AppStateError> {
    create_table(db, entity::Team).await?;
    create_table(db, entity::User).await?;
    create_table(db, entity::Project).await?;
    create_table(db, entity::Task).await?;
    create_table(db, entity::Comment).await?;
    create_table(db, entity::Attachment).await?;
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), AppStateError> {
    let backend = db.get_database_backend();
    let mut statement = Schema::new(backend).create_table_from_entity(entity);
    statement.if_not_exists();

    db.execute(backend.build(&statement))
        .await
        .map_err(|e| AppStateError::Migration(e.to_string()))?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Migration error: {0}")]
    Migration(String),
}
