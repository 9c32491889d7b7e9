use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tipos de mascota que maneja la plataforma. Se mapea al tipo enum
/// `pet_type` de Postgres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "pet_type", rename_all = "lowercase")]
pub enum PetKind {
    Perro,
    Gato,
}

impl PetKind {
    pub fn label(&self) -> &'static str {
        match self {
            PetKind::Perro => "perro",
            PetKind::Gato => "gato",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Pet {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub pet_type: PetKind,
    pub name: String,
    pub color: String,
    pub size: String,
    pub features: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewPetRequest {
    pub email: String,
    #[serde(rename = "type")]
    pub pet_type: PetKind,
    pub name: String,
    pub color: String,
    pub size: String,
    #[serde(default)]
    pub features: Option<String>,
    #[serde(default, rename = "photoUrl", alias = "image_url")]
    pub photo_url: Option<String>,
}
