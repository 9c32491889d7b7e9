use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::database::Database;

// Sin reintentos: un fallo o timeout se degrada a aviso, nunca bloquea la
// operación que lo disparó
const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub http: reqwest::Client,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> AppState {
        let http = reqwest::Client::builder()
            .timeout(OUTBOUND_TIMEOUT)
            .build()
            .expect("no se pudo construir el cliente HTTP");

        AppState {
            db,
            http,
            config: Arc::new(config),
        }
    }
}
