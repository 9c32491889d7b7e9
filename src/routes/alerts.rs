use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::alert::{
    EmergencyAlert, FoundPetReport, FoundPetRequest, ResolveAlertRequest, SendEmergencyRequest,
};
use crate::notify::{self, AlertKind, NotifyOutcome};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ColoniaQuery {
    #[serde(default)]
    pub colonia: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

/// Reporta una mascota perdida: guarda la alerta y avisa a los vecinos de la
/// colonia. El guardado manda; un fallo de entrega se degrada a mensaje.
pub async fn send_emergency(
    State(state): State<AppState>,
    Json(payload): Json<SendEmergencyRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if payload.email.is_empty() || payload.colonia.is_empty() || payload.pet.name.is_empty() {
        return Err(ApiError::BadRequest(
            "Email, colonia y mascota son obligatorios".to_string(),
        ));
    }

    let alert_id = Uuid::new_v4();
    let disappearance_date = payload
        .pet
        .disappearance_date
        .unwrap_or_else(|| Utc::now().date_naive());

    // Ligado al email del reportante: si el email no existe, no inserta nada
    sqlx::query(
        "INSERT INTO emergency_alerts \
         (id, user_id, pet_name, pet_type, description, image_url, last_seen_location, disappearance_date) \
         SELECT $1, u.id, $2, $3, $4, $5, $6, $7 \
         FROM users u WHERE u.email = $8",
    )
    .bind(alert_id)
    .bind(&payload.pet.name)
    .bind(payload.pet.pet_type)
    .bind(&payload.pet.description)
    .bind(&payload.pet.photo_url)
    .bind(&payload.colonia)
    .bind(disappearance_date)
    .bind(&payload.email)
    .execute(&state.db)
    .await?;

    let outcome = notify::notify_neighbors(
        &state,
        &payload.colonia,
        &payload.email,
        &payload.pet.name,
        payload.pet.pet_type,
        AlertKind::Lost,
    )
    .await;

    let message = match outcome {
        NotifyOutcome::Sent(count) => {
            format!("Alerta guardada, {count} vecinos notificados")
        }
        NotifyOutcome::NoRecipients => {
            "Alerta guardada, ningún vecino tiene notificaciones activas".to_string()
        }
        NotifyOutcome::Failed => {
            "Alerta guardada, pero falló el envío de notificaciones".to_string()
        }
    };

    Ok((StatusCode::CREATED, Json(json!({ "message": message }))))
}

/// Feed de la colonia: alertas con la misma last_seen_location, más recientes
/// primero. Sin paginación.
pub async fn lost_pets(
    State(state): State<AppState>,
    Query(query): Query<ColoniaQuery>,
) -> Result<Json<Vec<EmergencyAlert>>, ApiError> {
    let colonia = query
        .colonia
        .filter(|colonia| !colonia.is_empty())
        .ok_or_else(|| ApiError::BadRequest("La colonia es requerida".to_string()))?;

    let alerts = sqlx::query_as::<_, EmergencyAlert>(
        "SELECT * FROM emergency_alerts \
         WHERE last_seen_location = $1 \
         ORDER BY created_at DESC",
    )
    .bind(&colonia)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(alerts))
}

pub async fn my_alerts(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<Vec<EmergencyAlert>>, ApiError> {
    let user_id = query
        .user_id
        .ok_or_else(|| ApiError::BadRequest("El user_id es requerido".to_string()))?;

    let alerts = sqlx::query_as::<_, EmergencyAlert>(
        "SELECT * FROM emergency_alerts \
         WHERE user_id = $1 \
         ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(alerts))
}

/// Marca la mascota como recuperada. La llave es (reportante, nombre, tipo),
/// así que puede borrar más de una alerta si hubo reportes repetidos; después
/// re-notifica a la colonia con la plantilla de recuperado.
pub async fn resolve_alert(
    State(state): State<AppState>,
    Json(payload): Json<ResolveAlertRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.email.is_empty() || payload.pet_name.is_empty() {
        return Err(ApiError::BadRequest(
            "Email, petName y petType son obligatorios".to_string(),
        ));
    }

    let reporter = sqlx::query_as::<_, (Uuid, Option<String>)>(
        "SELECT u.id, up.address FROM users u \
         LEFT JOIN user_profiles up ON up.user_id = u.id \
         WHERE u.email = $1",
    )
    .bind(&payload.email)
    .fetch_optional(&state.db)
    .await?;

    let (reporter_id, colonia) =
        reporter.ok_or_else(|| ApiError::NotFound("Usuario no encontrado".to_string()))?;

    let deleted = sqlx::query(
        "DELETE FROM emergency_alerts \
         WHERE user_id = $1 AND pet_name = $2 AND pet_type = $3",
    )
    .bind(reporter_id)
    .bind(&payload.pet_name)
    .bind(payload.pet_type)
    .execute(&state.db)
    .await?
    .rows_affected();

    if deleted == 0 {
        return Err(ApiError::NotFound(
            "No se encontró una alerta activa para esa mascota".to_string(),
        ));
    }

    let outcome = match colonia {
        Some(colonia) if !colonia.is_empty() => {
            notify::notify_neighbors(
                &state,
                &colonia,
                &payload.email,
                &payload.pet_name,
                payload.pet_type,
                AlertKind::Recovered,
            )
            .await
        }
        // Sin colonia en el perfil no hay a quién avisar
        _ => NotifyOutcome::NoRecipients,
    };

    let message = match outcome {
        NotifyOutcome::Sent(count) => {
            format!("Alerta eliminada, {count} vecinos notificados")
        }
        NotifyOutcome::NoRecipients => {
            "Alerta eliminada, ningún vecino tiene notificaciones activas".to_string()
        }
        NotifyOutcome::Failed => {
            "Alerta eliminada, pero falló el envío de notificaciones".to_string()
        }
    };

    Ok(Json(json!({ "message": message, "success": true })))
}

/// Un tercero avisa que localizó a la mascota de una alerta. Inserción ciega:
/// no se valida que la alerta siga viva y no se notifica al dueño en línea.
pub async fn report_found_pet(
    State(state): State<AppState>,
    Json(payload): Json<FoundPetRequest>,
) -> Result<Json<Value>, ApiError> {
    sqlx::query("INSERT INTO found_pets (id, pet_id, user_id) VALUES ($1, $2, $3)")
        .bind(Uuid::new_v4())
        .bind(payload.pet_id)
        .bind(payload.user_id)
        .execute(&state.db)
        .await?;

    Ok(Json(json!({
        "message": "Gracias por avisar, el dueño podrá ver tus datos de contacto"
    })))
}

/// Avistamientos sobre las alertas del dueño, con los datos de contacto del
/// que los reportó. El dueño descubre aquí los hallazgos; resolver la alerta
/// sigue siendo un paso aparte.
pub async fn found_pets_for_owner(
    State(state): State<AppState>,
    Path(owner_id): Path<Uuid>,
) -> Result<Json<Vec<FoundPetReport>>, ApiError> {
    let reports = sqlx::query_as::<_, FoundPetReport>(
        "SELECT ea.id AS alert_id, ea.pet_name, ea.pet_type, \
                up.first_name AS finder_first_name, up.last_name AS finder_last_name, \
                up.phone AS finder_phone, u.email AS finder_email, \
                f.created_at AS found_at \
         FROM found_pets f \
         JOIN emergency_alerts ea ON ea.id = f.pet_id \
         JOIN users u ON u.id = f.user_id \
         JOIN user_profiles up ON up.user_id = u.id \
         WHERE ea.user_id = $1 \
         ORDER BY f.created_at DESC",
    )
    .bind(owner_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(reports))
}
