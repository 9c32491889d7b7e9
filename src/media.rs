use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use thiserror::Error;

use crate::config::Config;

// Misma transformación que aplicaba el uploader original
const UPLOAD_TRANSFORMATION: &str = "w_800,h_800,c_limit/q_auto";

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("no se pudo contactar al servicio de imágenes: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("el servicio de imágenes respondió {0}")]
    Gateway(reqwest::StatusCode),
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug)]
pub struct UploadedImage {
    pub url: String,
    pub public_id: String,
}

/// Sube la imagen al hosting y devuelve su URL pública. Upload sin firma,
/// con preset y carpeta fijados por configuración.
pub async fn upload_image(
    http: &reqwest::Client,
    config: &Config,
    bytes: Vec<u8>,
    file_name: String,
) -> Result<UploadedImage, MediaError> {
    let endpoint = format!(
        "https://api.cloudinary.com/v1_1/{}/image/upload",
        config.media_cloud_name
    );

    let file = Part::bytes(bytes)
        .file_name(file_name)
        .mime_str("application/octet-stream")?;

    let form = Form::new()
        .text("upload_preset", config.media_upload_preset.clone())
        .text("folder", config.media_folder.clone())
        .text("transformation", UPLOAD_TRANSFORMATION)
        .part("file", file);

    let response = http.post(endpoint).multipart(form).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(MediaError::Gateway(status));
    }

    let uploaded: UploadResponse = response.json().await?;
    Ok(UploadedImage {
        url: uploaded.secure_url,
        public_id: uploaded.public_id,
    })
}
