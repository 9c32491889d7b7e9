use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::pet::PetKind;

/// Alerta de mascota perdida. Su existencia es la señal de "sigue perdida":
/// al marcarla como recuperada la fila se elimina.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct EmergencyAlert {
    pub id: Uuid,
    pub user_id: Uuid,
    pub pet_name: String,
    #[serde(rename = "type")]
    pub pet_type: PetKind,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub last_seen_location: String,
    pub disappearance_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SendEmergencyRequest {
    pub email: String,
    pub colonia: String,
    pub pet: PetReport,
}

/// Snapshot de la mascota al momento del reporte. El frontend manda la fila
/// completa de la mascota registrada, así que se aceptan sus nombres de campo.
#[derive(Debug, Deserialize)]
pub struct PetReport {
    pub name: String,
    #[serde(rename = "type")]
    pub pet_type: PetKind,
    #[serde(default, alias = "features")]
    pub description: Option<String>,
    #[serde(default, alias = "photoUrl", alias = "image_url")]
    pub photo_url: Option<String>,
    #[serde(default, alias = "disappearanceDate")]
    pub disappearance_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveAlertRequest {
    pub email: String,
    pub pet_name: String,
    pub pet_type: PetKind,
}

#[derive(Debug, Deserialize)]
pub struct FoundPetRequest {
    // pet_id es el id de la alerta, no el de la mascota registrada
    pub pet_id: Uuid,
    pub user_id: Uuid,
}

/// Fila del listado de avistamientos para el dueño: quién dice haber visto a
/// la mascota y cómo contactarlo.
#[derive(Debug, Serialize, FromRow)]
pub struct FoundPetReport {
    pub alert_id: Uuid,
    pub pet_name: String,
    #[serde(rename = "type")]
    pub pet_type: PetKind,
    pub finder_first_name: String,
    pub finder_last_name: String,
    pub finder_phone: String,
    pub finder_email: String,
    pub found_at: DateTime<Utc>,
}
