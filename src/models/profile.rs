use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub postal_code: Option<String>,
    // address es la colonia tal como la capturó el usuario
    pub address: Option<String>,
    pub city: Option<String>,
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterExtendedRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    // la colonia llega en address desde el frontend
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePictureRequest {
    pub email: String,
    pub image_url: String,
}
