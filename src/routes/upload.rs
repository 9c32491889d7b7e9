use axum::{
    extract::{Multipart, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::media;
use crate::state::AppState;

/// Recibe la imagen por multipart y la reenvía al hosting de medios. El
/// cliente recibe la URL pública y el public_id que devuelve el servicio.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut image: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Formulario multipart inválido".to_string()))?
    {
        if field.name() == Some("image") {
            let file_name = field
                .file_name()
                .unwrap_or("image.jpg")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|_| ApiError::BadRequest("No se pudo leer la imagen".to_string()))?;
            image = Some((bytes.to_vec(), file_name));
            break;
        }
    }

    let (bytes, file_name) =
        image.ok_or_else(|| ApiError::BadRequest("No se ha subido ninguna imagen".to_string()))?;

    let uploaded = media::upload_image(&state.http, &state.config, bytes, file_name).await?;

    Ok(Json(json!({
        "message": "Imagen subida exitosamente",
        "imageUrl": uploaded.url,
        "publicId": uploaded.public_id
    })))
}
