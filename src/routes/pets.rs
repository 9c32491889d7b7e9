use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::pet::{NewPetRequest, Pet};
use crate::routes::profile::EmailQuery;
use crate::state::AppState;

pub async fn create_pet(
    State(state): State<AppState>,
    Json(payload): Json<NewPetRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if payload.email.is_empty()
        || payload.name.is_empty()
        || payload.color.is_empty()
        || payload.size.is_empty()
    {
        return Err(ApiError::BadRequest(
            "Email, nombre, color y tamaño son obligatorios".to_string(),
        ));
    }

    let owner_id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&payload.email)
        .fetch_optional(&state.db)
        .await?;

    let owner_id = owner_id.ok_or_else(|| ApiError::NotFound("Usuario no encontrado".to_string()))?;

    let pet_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO pets (id, user_id, pet_type, name, color, size, features, image_url) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(pet_id)
    .bind(owner_id)
    .bind(payload.pet_type)
    .bind(&payload.name)
    .bind(&payload.color)
    .bind(&payload.size)
    .bind(&payload.features)
    .bind(&payload.photo_url)
    .execute(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Mascota registrada correctamente",
            "petId": pet_id
        })),
    ))
}

pub async fn list_pets(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Pet>>, ApiError> {
    let email = query
        .email
        .filter(|email| !email.is_empty())
        .ok_or_else(|| ApiError::BadRequest("El email es requerido".to_string()))?;

    // Dueño desconocido devuelve lista vacía, no 404
    let pets = sqlx::query_as::<_, Pet>(
        "SELECT p.* FROM pets p \
         JOIN users u ON p.user_id = u.id \
         WHERE u.email = $1 \
         ORDER BY p.created_at DESC",
    )
    .bind(&email)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(pets))
}
