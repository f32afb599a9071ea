use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use tracing::{info, warn};

use crate::algorithm::PoliticaConflicto;
use crate::api_json::UrlRequest;
use crate::auth::Capacidad;
use crate::config::{validar_url, ConfigPersistida};
use crate::gateway::{FormatoPost, GatewayClient};
use crate::server::AppState;

pub async fn config_handler(state: web::Data<AppState>) -> impl Responder {
    let cfg = &state.config;
    let activa = state.cliente().await.map(|c| c.url().to_string());
    let origen = if cfg.script_url.is_some() {
        "entorno"
    } else if activa.is_some() {
        "archivo"
    } else {
        "ejemplo"
    };
    HttpResponse::Ok().json(json!({
        "scriptUrl": activa,
        "origen": origen,
        "formatoPost": match cfg.formato_post {
            FormatoPost::Json => "json",
            FormatoPost::Formulario => "form",
        },
        "conflictos": match cfg.politica {
            PoliticaConflicto::SoloTitular => "titular",
            PoliticaConflicto::TitularYSuplentes => "todos",
        },
        "escuela": cfg.escuela,
        "planilla": cfg.planilla.as_ref().map(|p| p.display().to_string()),
        "protegido": cfg.token.is_some(),
    }))
}

/// Guarda la URL en `data/config.json`. Si `HORARIOS_SCRIPT_URL` está
/// definida, esa sigue teniendo prioridad y la guardada queda para después.
pub async fn config_url_handler(
    _cap: Capacidad,
    state: web::Data<AppState>,
    body: web::Json<UrlRequest>,
) -> impl Responder {
    let url = body.into_inner().script_url.trim().to_string();
    if let Err(e) = validar_url(&url) {
        return HttpResponse::BadRequest().json(json!({"error": e}));
    }
    let persistida = ConfigPersistida { script_url: Some(url.clone()) };
    if let Err(e) = persistida.guardar(&state.config.data_dir) {
        return HttpResponse::InternalServerError().json(json!({"error": e.to_string()}));
    }
    let activa = state.config.script_url.is_none();
    if activa {
        *state.remoto.write().await = Some(GatewayClient::new(url.clone(), state.config.formato_post));
        info!(%url, "URL de planilla actualizada");
    } else {
        warn!("URL guardada pero HORARIOS_SCRIPT_URL tiene prioridad");
    }
    HttpResponse::Ok().json(json!({"status": "ok", "scriptUrl": url, "activa": activa}))
}

pub async fn probar_conexion_handler(state: web::Data<AppState>) -> impl Responder {
    let Some(cliente) = state.cliente().await else {
        return HttpResponse::BadRequest().json(json!({"error": "no hay URL de planilla configurada"}));
    };
    match cliente.probar_conexion().await {
        Ok(n) => HttpResponse::Ok().json(json!({"ok": true, "docentes": n})),
        Err(e) => {
            warn!(error = %e, "prueba de conexión fallida");
            HttpResponse::BadGateway().json(json!({"ok": false, "error": e.to_string()}))
        }
    }
}
