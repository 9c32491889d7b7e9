use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod database;
pub mod error;
pub mod media;
pub mod models;
pub mod notify;
pub mod routes;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // La app móvil pega desde cualquier origen
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::api_router(state).layer(cors)
}
