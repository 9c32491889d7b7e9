use axum::{
    http::StatusCode,
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

pub mod alerts;
pub mod auth;
pub mod maintenance;
pub mod pets;
pub mod profile;
pub mod upload;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Cuentas
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        // Perfil
        .route("/api/register-extended", post(profile::register_extended))
        .route("/api/user-profile", get(profile::get_user_profile))
        .route("/api/user-profile-picture", put(profile::update_profile_picture))
        .route("/api/save-push-token", put(profile::save_push_token))
        // Mascotas
        .route("/api/pet", post(pets::create_pet))
        .route("/api/pets", get(pets::list_pets))
        // Alertas de emergencia
        .route("/api/send-emergency", post(alerts::send_emergency))
        .route("/api/lost-pets", get(alerts::lost_pets))
        .route("/api/my-alerts", get(alerts::my_alerts))
        .route("/api/emergency-alert", delete(alerts::resolve_alert))
        .route("/api/i-found-a-pet", post(alerts::report_found_pet))
        .route("/api/found-pets/:owner_id", get(alerts::found_pets_for_owner))
        // Medios
        .route("/api/upload-image", post(upload::upload_image))
        // Mantenimiento
        .route("/api/cleanup-incomplete-users", delete(maintenance::cleanup_incomplete_users))
        .fallback(handle_404)
        .with_state(state)
}

async fn handle_404() -> StatusCode {
    StatusCode::NOT_FOUND
}
