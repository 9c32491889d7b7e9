use sqlx::{postgres::PgPoolOptions, PgPool};

pub type Database = PgPool;

pub async fn create_database_connection(database_url: &str) -> Result<Database, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await?;

    tracing::info!("✅ Conexión a PostgreSQL exitosa");
    Ok(pool)
}

pub async fn run_migrations(pool: &Database) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("✅ Migraciones ejecutadas");
    Ok(())
}
