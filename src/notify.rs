use serde::Serialize;
use serde_json::json;

use crate::database::Database;
use crate::models::pet::PetKind;
use crate::state::AppState;

/// Qué le pasó a la mascota; decide la plantilla del mensaje.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Lost,
    Recovered,
}

/// Resultado del fan-out. Nunca es un error duro: el guardado o borrado de la
/// alerta ya ocurrió y no se revierte por un fallo de entrega.
#[derive(Debug, PartialEq, Eq)]
pub enum NotifyOutcome {
    Sent(usize),
    NoRecipients,
    Failed,
}

/// Mensaje individual en el batch que se manda al gateway de push.
#[derive(Debug, Serialize)]
pub struct PushMessage {
    pub to: String,
    pub sound: &'static str,
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
}

/// Tokens de push de los vecinos de la colonia, excluyendo al actor.
/// La coincidencia es igualdad exacta de cadenas sobre el campo address.
pub async fn collect_neighbor_tokens(
    db: &Database,
    colonia: &str,
    exclude_email: &str,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT u.push_token FROM users u \
         JOIN user_profiles up ON up.user_id = u.id \
         WHERE up.address = $1 AND u.email <> $2 AND u.push_token IS NOT NULL",
    )
    .bind(colonia)
    .bind(exclude_email)
    .fetch_all(db)
    .await
}

pub fn build_messages(
    tokens: &[String],
    pet_name: &str,
    pet_type: PetKind,
    kind: AlertKind,
) -> Vec<PushMessage> {
    let (title, body, event) = match kind {
        AlertKind::Lost => (
            "🚨 Mascota perdida en tu colonia".to_string(),
            format!(
                "{} ({}) se perdió por tu zona. Si lo ves, avisa a su dueño desde la app.",
                pet_name,
                pet_type.label()
            ),
            "lost",
        ),
        AlertKind::Recovered => (
            "🎉 Mascota recuperada".to_string(),
            format!(
                "{} ({}) ya está de vuelta en casa. ¡Gracias por ayudar a buscarlo!",
                pet_name,
                pet_type.label()
            ),
            "recovered",
        ),
    };

    tokens
        .iter()
        .map(|token| PushMessage {
            to: token.clone(),
            sound: "default",
            title: title.clone(),
            body: body.clone(),
            data: json!({ "event": event, "pet_name": pet_name }),
        })
        .collect()
}

/// Fan-out completo: busca tokens, arma el batch y hace un solo POST al
/// gateway. Sin particionado, sin reintentos, sin confirmaciones por token.
pub async fn notify_neighbors(
    state: &AppState,
    colonia: &str,
    exclude_email: &str,
    pet_name: &str,
    pet_type: PetKind,
    kind: AlertKind,
) -> NotifyOutcome {
    let tokens = match collect_neighbor_tokens(&state.db, colonia, exclude_email).await {
        Ok(tokens) => tokens,
        Err(err) => {
            tracing::warn!("❌ No se pudieron leer los tokens de vecinos: {err}");
            return NotifyOutcome::Failed;
        }
    };

    if tokens.is_empty() {
        return NotifyOutcome::NoRecipients;
    }

    let messages = build_messages(&tokens, pet_name, pet_type, kind);

    let response = state
        .http
        .post(state.config.push_gateway_url.as_str())
        .json(&messages)
        .send()
        .await;

    match response {
        Ok(resp) if resp.status().is_success() => NotifyOutcome::Sent(messages.len()),
        Ok(resp) => {
            tracing::warn!("❌ El gateway de push respondió {}", resp.status());
            NotifyOutcome::Failed
        }
        Err(err) => {
            tracing::warn!("❌ No se pudo contactar al gateway de push: {err}");
            NotifyOutcome::Failed
        }
    }
}
