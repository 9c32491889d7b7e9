//! Pruebas de integración contra un Postgres real. Cada prueba se omite con
//! un aviso si DATABASE_URL no está definida, para que la suite pase también
//! en entornos sin base de datos.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use peturnidad_server::config::Config;
use peturnidad_server::database;
use peturnidad_server::error::ApiError;
use peturnidad_server::models::alert::{
    FoundPetRequest, PetReport, ResolveAlertRequest, SendEmergencyRequest,
};
use peturnidad_server::models::pet::PetKind;
use peturnidad_server::models::profile::RegisterExtendedRequest;
use peturnidad_server::models::user::{LoginRequest, RegisterRequest, SavePushTokenRequest};
use peturnidad_server::notify;
use peturnidad_server::routes::alerts::{self, ColoniaQuery, UserIdQuery};
use peturnidad_server::routes::auth;
use peturnidad_server::routes::maintenance;
use peturnidad_server::routes::profile;
use peturnidad_server::AppState;

async fn test_state() -> Option<AppState> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL no definida, prueba omitida");
        return None;
    };

    let pool = database::create_database_connection(&url)
        .await
        .expect("no se pudo conectar a la base de pruebas");
    database::run_migrations(&pool)
        .await
        .expect("no se pudieron correr las migraciones");

    // Gateway inalcanzable: ninguna prueba debe llegar a despachar un batch
    let config = Config {
        database_url: url,
        port: 0,
        push_gateway_url: "http://127.0.0.1:9/push".to_string(),
        media_cloud_name: "pruebas".to_string(),
        media_upload_preset: "pruebas".to_string(),
        media_folder: "pruebas".to_string(),
    };

    Some(AppState::new(pool, config))
}

fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4())
}

fn unique_colonia(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

async fn register_user(state: &AppState, email: &str) -> Uuid {
    let (status, Json(body)) = auth::register(
        State(state.clone()),
        Json(RegisterRequest {
            email: email.to_string(),
            password: "secreta123".to_string(),
        }),
    )
    .await
    .expect("el registro debe funcionar");

    assert_eq!(status, StatusCode::CREATED);
    Uuid::parse_str(body["userId"].as_str().unwrap()).unwrap()
}

async fn complete_profile(state: &AppState, email: &str, colonia: &str) -> Uuid {
    let (status, Json(body)) = profile::register_extended(
        State(state.clone()),
        Json(RegisterExtendedRequest {
            email: email.to_string(),
            first_name: "Ana".to_string(),
            last_name: "García".to_string(),
            phone: "5512345678".to_string(),
            birth_date: Some("07/03/1991".to_string()),
            postal_code: Some("06100".to_string()),
            address: Some(colonia.to_string()),
            city: Some("CDMX".to_string()),
        }),
    )
    .await
    .expect("completar el perfil debe funcionar");

    assert_eq!(status, StatusCode::CREATED);
    Uuid::parse_str(body["userId"].as_str().unwrap()).unwrap()
}

fn lost_pet_report(name: &str) -> PetReport {
    serde_json::from_value(serde_json::json!({
        "name": name,
        "type": "perro",
        "features": "collar azul",
        "image_url": "https://res.example.com/foto.jpg"
    }))
    .unwrap()
}

#[tokio::test]
async fn registrar_el_mismo_email_dos_veces_da_conflicto() {
    let Some(state) = test_state().await else { return };
    let email = unique_email("dup");

    register_user(&state, &email).await;

    let err = auth::register(
        State(state.clone()),
        Json(RegisterRequest {
            email: email.clone(),
            password: "otra456".to_string(),
        }),
    )
    .await
    .expect_err("el segundo registro debe fallar");

    match err {
        ApiError::BadRequest(msg) => assert_eq!(msg, "El usuario ya existe"),
        other => panic!("se esperaba BadRequest, llegó {other:?}"),
    }
}

#[tokio::test]
async fn login_fallido_no_revela_cual_factor_fallo() {
    let Some(state) = test_state().await else { return };
    let email = unique_email("login");
    register_user(&state, &email).await;

    let wrong_password = auth::login(
        State(state.clone()),
        Json(LoginRequest {
            email: email.clone(),
            password: "incorrecta".to_string(),
        }),
    )
    .await
    .expect_err("contraseña incorrecta debe fallar");

    let unknown_email = auth::login(
        State(state.clone()),
        Json(LoginRequest {
            email: unique_email("fantasma"),
            password: "incorrecta".to_string(),
        }),
    )
    .await
    .expect_err("email desconocido debe fallar");

    let messages: Vec<String> = [wrong_password, unknown_email]
        .into_iter()
        .map(|err| match err {
            ApiError::Unauthorized(msg) => msg,
            other => panic!("se esperaba Unauthorized, llegó {other:?}"),
        })
        .collect();

    // Mismo mensaje en ambos casos
    assert_eq!(messages[0], messages[1]);
}

#[tokio::test]
async fn completar_perfil_es_atomico() {
    let Some(state) = test_state().await else { return };

    // Caso feliz: las dos escrituras quedan
    let email_ok = unique_email("perfil-ok");
    register_user(&state, &email_ok).await;
    complete_profile(&state, &email_ok, &unique_colonia("centro")).await;

    let is_complete: bool =
        sqlx::query_scalar("SELECT is_complete FROM users WHERE email = $1")
            .bind(&email_ok)
            .fetch_one(&state.db)
            .await
            .unwrap();
    assert!(is_complete);

    // Caso forzado a fallar: ya existe un perfil para el usuario, así que el
    // INSERT truena y la marca de completo no debe aplicarse
    let email_err = unique_email("perfil-err");
    let user_id = register_user(&state, &email_err).await;

    sqlx::query(
        "INSERT INTO user_profiles (id, user_id, first_name, last_name, phone) \
         VALUES ($1, $2, 'X', 'Y', '000')",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .execute(&state.db)
    .await
    .unwrap();

    let err = profile::register_extended(
        State(state.clone()),
        Json(RegisterExtendedRequest {
            email: email_err.clone(),
            first_name: "Ana".to_string(),
            last_name: "García".to_string(),
            phone: "5512345678".to_string(),
            birth_date: None,
            postal_code: None,
            address: None,
            city: None,
        }),
    )
    .await
    .expect_err("el perfil duplicado debe fallar");

    assert!(matches!(err, ApiError::Database(_)));

    let is_complete: bool =
        sqlx::query_scalar("SELECT is_complete FROM users WHERE email = $1")
            .bind(&email_err)
            .fetch_one(&state.db)
            .await
            .unwrap();
    assert!(!is_complete, "la transacción debió revertirse completa");
}

#[tokio::test]
async fn el_feed_de_colonia_solo_muestra_sus_alertas() {
    let Some(state) = test_state().await else { return };
    let email = unique_email("feed");
    let colonia = unique_colonia("centro");

    register_user(&state, &email).await;
    complete_profile(&state, &email, &colonia).await;

    let (status, Json(body)) = alerts::send_emergency(
        State(state.clone()),
        Json(SendEmergencyRequest {
            email: email.clone(),
            colonia: colonia.clone(),
            pet: lost_pet_report("Firulais"),
        }),
    )
    .await
    .expect("el reporte debe guardarse");

    assert_eq!(status, StatusCode::CREATED);
    // Sin vecinos con token el resultado sigue siendo éxito
    assert!(body["message"].as_str().unwrap().starts_with("Alerta guardada"));

    let Json(feed) = alerts::lost_pets(
        State(state.clone()),
        Query(ColoniaQuery {
            colonia: Some(colonia.clone()),
        }),
    )
    .await
    .unwrap();

    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].pet_name, "Firulais");
    assert_eq!(feed[0].pet_type, PetKind::Perro);
    assert_eq!(feed[0].last_seen_location, colonia);

    let Json(other_feed) = alerts::lost_pets(
        State(state.clone()),
        Query(ColoniaQuery {
            colonia: Some(unique_colonia("otra")),
        }),
    )
    .await
    .unwrap();

    assert!(other_feed.is_empty());
}

#[tokio::test]
async fn resolver_la_alerta_la_saca_del_feed_y_el_segundo_intento_es_404() {
    let Some(state) = test_state().await else { return };
    let email = unique_email("resolver");
    let colonia = unique_colonia("roma");

    register_user(&state, &email).await;
    complete_profile(&state, &email, &colonia).await;

    alerts::send_emergency(
        State(state.clone()),
        Json(SendEmergencyRequest {
            email: email.clone(),
            colonia: colonia.clone(),
            pet: lost_pet_report("Michi"),
        }),
    )
    .await
    .unwrap();

    let resolve = || {
        alerts::resolve_alert(
            State(state.clone()),
            Json(ResolveAlertRequest {
                email: email.clone(),
                pet_name: "Michi".to_string(),
                pet_type: PetKind::Perro,
            }),
        )
    };

    let Json(body) = resolve().await.expect("la primera resolución debe funcionar");
    assert_eq!(body["success"], true);

    let Json(feed) = alerts::lost_pets(
        State(state.clone()),
        Query(ColoniaQuery {
            colonia: Some(colonia.clone()),
        }),
    )
    .await
    .unwrap();
    assert!(feed.is_empty(), "la alerta resuelta no debe seguir en el feed");

    let err = resolve().await.expect_err("la segunda resolución debe ser 404");
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn el_dueno_ve_los_avistamientos_con_contacto_del_que_aviso() {
    let Some(state) = test_state().await else { return };
    let owner_email = unique_email("dueno");
    let finder_email = unique_email("vecino");
    let colonia = unique_colonia("condesa");

    register_user(&state, &owner_email).await;
    let owner_id = complete_profile(&state, &owner_email, &colonia).await;

    register_user(&state, &finder_email).await;
    let finder_id = complete_profile(&state, &finder_email, &colonia).await;

    alerts::send_emergency(
        State(state.clone()),
        Json(SendEmergencyRequest {
            email: owner_email.clone(),
            colonia: colonia.clone(),
            pet: lost_pet_report("Solovino"),
        }),
    )
    .await
    .unwrap();

    let Json(own) = alerts::my_alerts(
        State(state.clone()),
        Query(UserIdQuery {
            user_id: Some(owner_id),
        }),
    )
    .await
    .unwrap();
    let alert_id = own[0].id;

    alerts::report_found_pet(
        State(state.clone()),
        Json(FoundPetRequest {
            pet_id: alert_id,
            user_id: finder_id,
        }),
    )
    .await
    .expect("el aviso de hallazgo debe guardarse");

    let Json(reports) =
        alerts::found_pets_for_owner(State(state.clone()), Path(owner_id))
            .await
            .unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].alert_id, alert_id);
    assert_eq!(reports[0].pet_name, "Solovino");
    assert_eq!(reports[0].finder_email, finder_email);
    assert_eq!(reports[0].finder_phone, "5512345678");
    assert_eq!(reports[0].finder_first_name, "Ana");
}

#[tokio::test]
async fn el_fanout_excluye_el_token_del_reportante() {
    let Some(state) = test_state().await else { return };
    let reporter_email = unique_email("reportante");
    let neighbor_email = unique_email("vecino");
    let colonia = unique_colonia("centro");

    for email in [&reporter_email, &neighbor_email] {
        register_user(&state, email).await;
        complete_profile(&state, email, &colonia).await;
    }

    for (email, token) in [
        (&reporter_email, "ExponentPushToken[reportante]"),
        (&neighbor_email, "ExponentPushToken[vecino]"),
    ] {
        profile::save_push_token(
            State(state.clone()),
            Json(SavePushTokenRequest {
                email: email.to_string(),
                push_token: token.to_string(),
            }),
        )
        .await
        .unwrap();
    }

    let tokens = notify::collect_neighbor_tokens(&state.db, &colonia, &reporter_email)
        .await
        .unwrap();

    assert_eq!(tokens, vec!["ExponentPushToken[vecino]".to_string()]);
}

#[tokio::test]
async fn la_limpieza_solo_borra_incompletos_viejos() {
    let Some(state) = test_state().await else { return };

    let old_incomplete = unique_email("viejo-incompleto");
    let old_complete = unique_email("viejo-completo");
    let recent_incomplete = unique_email("reciente");

    let old_incomplete_id = register_user(&state, &old_incomplete).await;
    let old_complete_id = register_user(&state, &old_complete).await;
    let recent_id = register_user(&state, &recent_incomplete).await;

    complete_profile(&state, &old_complete, &unique_colonia("napoles")).await;

    // Envejecer las dos cuentas "viejas" más allá de la ventana de retención
    for id in [old_incomplete_id, old_complete_id] {
        sqlx::query("UPDATE users SET created_at = NOW() - INTERVAL '25 hours' WHERE id = $1")
            .bind(id)
            .execute(&state.db)
            .await
            .unwrap();
    }

    let Json(body) = maintenance::cleanup_incomplete_users(State(state.clone()))
        .await
        .unwrap();
    assert!(body["deletedUsers"].as_u64().unwrap() >= 1);

    let survivors: Vec<Uuid> =
        sqlx::query_scalar("SELECT id FROM users WHERE id = ANY($1)")
            .bind(vec![old_incomplete_id, old_complete_id, recent_id])
            .fetch_all(&state.db)
            .await
            .unwrap();

    assert!(!survivors.contains(&old_incomplete_id), "el incompleto viejo debía borrarse");
    assert!(survivors.contains(&old_complete_id), "la cuenta completa debía quedar");
    assert!(survivors.contains(&recent_id), "el incompleto reciente debía quedar");
}
