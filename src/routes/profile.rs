use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::profile::{Profile, RegisterExtendedRequest, UpdateProfilePictureRequest};
use crate::models::user::SavePushTokenRequest;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    #[serde(default)]
    pub email: Option<String>,
}

/// Completa el registro: alta del perfil y marca de cuenta completa en una
/// sola transacción. Si cualquiera de las dos escrituras falla, ninguna queda.
pub async fn register_extended(
    State(state): State<AppState>,
    Json(payload): Json<RegisterExtendedRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if payload.email.is_empty()
        || payload.first_name.is_empty()
        || payload.last_name.is_empty()
        || payload.phone.is_empty()
    {
        return Err(ApiError::BadRequest(
            "Email, nombre, apellido y teléfono son obligatorios".to_string(),
        ));
    }

    let birth_date = payload.birth_date.as_deref().and_then(parse_birth_date);

    let mut tx = state.db.begin().await?;

    let user_id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&payload.email)
        .fetch_optional(&mut *tx)
        .await?;

    let user_id = user_id.ok_or_else(|| ApiError::NotFound("Usuario no encontrado".to_string()))?;

    let profile_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO user_profiles \
         (id, user_id, first_name, last_name, phone, birth_date, postal_code, address, city) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(profile_id)
    .bind(user_id)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.phone)
    .bind(birth_date)
    .bind(&payload.postal_code)
    .bind(&payload.address)
    .bind(&payload.city)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE users SET is_complete = TRUE WHERE id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Registro completado exitosamente",
            "userId": user_id,
            "profileId": profile_id
        })),
    ))
}

pub async fn get_user_profile(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Profile>, ApiError> {
    let email = query
        .email
        .filter(|email| !email.is_empty())
        .ok_or_else(|| ApiError::BadRequest("El email es requerido".to_string()))?;

    let profile = sqlx::query_as::<_, Profile>(
        "SELECT up.* FROM user_profiles up \
         JOIN users u ON up.user_id = u.id \
         WHERE u.email = $1",
    )
    .bind(&email)
    .fetch_optional(&state.db)
    .await?;

    profile
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Perfil no encontrado".to_string()))
}

pub async fn update_profile_picture(
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfilePictureRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.email.is_empty() || payload.image_url.is_empty() {
        return Err(ApiError::BadRequest(
            "Email e imageUrl son obligatorios".to_string(),
        ));
    }

    let updated: Option<Uuid> = sqlx::query_scalar(
        "UPDATE user_profiles up SET profile_picture_url = $1, updated_at = NOW() \
         FROM users u \
         WHERE up.user_id = u.id AND u.email = $2 \
         RETURNING up.id",
    )
    .bind(&payload.image_url)
    .bind(&payload.email)
    .fetch_optional(&state.db)
    .await?;

    if updated.is_none() {
        return Err(ApiError::NotFound("Perfil no encontrado".to_string()));
    }

    Ok(Json(json!({ "message": "Imagen de perfil actualizada" })))
}

pub async fn save_push_token(
    State(state): State<AppState>,
    Json(payload): Json<SavePushTokenRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.email.is_empty() || payload.push_token.is_empty() {
        return Err(ApiError::BadRequest(
            "Email y push_token son obligatorios".to_string(),
        ));
    }

    let updated: Option<Uuid> =
        sqlx::query_scalar("UPDATE users SET push_token = $1 WHERE email = $2 RETURNING id")
            .bind(&payload.push_token)
            .bind(&payload.email)
            .fetch_optional(&state.db)
            .await?;

    if updated.is_none() {
        return Err(ApiError::NotFound("Usuario no encontrado".to_string()));
    }

    Ok(Json(json!({ "message": "Push token guardado" })))
}

// El frontend captura la fecha como DD/MM/YYYY
fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%d/%m/%Y").ok()
}
