use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

/// Barrido manual: elimina cuentas que nunca completaron su registro después
/// de 24 horas. Re-ejecutarlo no encuentra nada que borrar.
pub async fn cleanup_incomplete_users(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let deleted = sqlx::query(
        "DELETE FROM users \
         WHERE is_complete = FALSE \
         AND created_at < NOW() - INTERVAL '24 hours'",
    )
    .execute(&state.db)
    .await?
    .rows_affected();

    Ok(Json(json!({
        "message": "Limpieza completada",
        "deletedUsers": deleted
    })))
}
