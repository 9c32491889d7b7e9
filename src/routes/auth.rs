use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::user::{LoginRequest, RegisterRequest, User};
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    // Validar entrada
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Email y password son obligatorios".to_string(),
        ));
    }

    // Verificar si el usuario ya existe
    let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&payload.email)
        .fetch_optional(&state.db)
        .await?;

    if existing.is_some() {
        return Err(ApiError::BadRequest("El usuario ya existe".to_string()));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)?;

    // La cuenta nace incompleta; register-extended la completa después
    let user_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO users (id, email, password_hash, is_complete) VALUES ($1, $2, $3, FALSE)",
    )
    .bind(user_id)
    .bind(&payload.email)
    .bind(&password_hash)
    .execute(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Usuario registrado correctamente",
            "userId": user_id,
            "requiresProfile": true
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Email y password son obligatorios".to_string(),
        ));
    }

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(&payload.email)
        .fetch_optional(&state.db)
        .await?;

    // Mismo mensaje para email desconocido y contraseña incorrecta
    let user = user.ok_or_else(|| {
        ApiError::Unauthorized("Email o contraseña incorrectos".to_string())
    })?;

    if !bcrypt::verify(&payload.password, &user.password_hash)? {
        return Err(ApiError::Unauthorized(
            "Email o contraseña incorrectos".to_string(),
        ));
    }

    Ok(Json(json!({
        "message": "Login exitoso",
        "userId": user.id,
        "email": user.email,
        "is_complete": user.is_complete
    })))
}
