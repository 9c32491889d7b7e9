use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use peturnidad_server::config::Config;
use peturnidad_server::{app, database, AppState};

#[tokio::main]
async fn main() {
    // Cargar variables desde .env
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    let pool = database::create_database_connection(&config.database_url)
        .await
        .expect("No se pudo conectar a PostgreSQL");

    database::run_migrations(&pool)
        .await
        .expect("Fallaron las migraciones");

    let addr = format!("0.0.0.0:{}", config.port);
    let router = app(AppState::new(pool, config));

    tracing::info!("🚀 Servidor corriendo en http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("No se pudo abrir el puerto");

    axum::serve(listener, router)
        .await
        .expect("El servidor terminó con error");
}
