use std::env;

use tracing::info;

// URL del API de push de Expo (una sola llamada batch por fan-out)
const DEFAULT_PUSH_GATEWAY_URL: &str = "https://exp.host/--/api/v2/push/send";
const DEFAULT_MEDIA_CLOUD_NAME: &str = "okhuysen";
const DEFAULT_MEDIA_UPLOAD_PRESET: &str = "peturnidad-unsigned";
const DEFAULT_MEDIA_FOLDER: &str = "peturnidad";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub push_gateway_url: String,
    pub media_cloud_name: String,
    pub media_upload_preset: String,
    pub media_folder: String,
}

impl Config {
    pub fn from_env() -> Config {
        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL no está definida en el entorno ni en .env");

        Config {
            database_url,
            port: try_load("PORT", "3000"),
            push_gateway_url: load_or("PUSH_GATEWAY_URL", DEFAULT_PUSH_GATEWAY_URL),
            media_cloud_name: load_or("MEDIA_CLOUD_NAME", DEFAULT_MEDIA_CLOUD_NAME),
            media_upload_preset: load_or("MEDIA_UPLOAD_PRESET", DEFAULT_MEDIA_UPLOAD_PRESET),
            media_folder: load_or("MEDIA_FOLDER", DEFAULT_MEDIA_FOLDER),
        }
    }
}

fn load_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        info!("{key} no definida, usando valor por defecto");
        default.to_string()
    })
}

fn try_load(key: &str, default: &str) -> u16 {
    load_or(key, default)
        .parse()
        .expect("PORT debe ser un número de puerto válido")
}
