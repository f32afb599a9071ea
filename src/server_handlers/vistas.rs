use actix_web::http::header;
use actix_web::{web, HttpResponse, Responder};
use chrono::Datelike;
use serde_json::json;

use crate::api_json::{respuesta_error, respuesta_error_excel};
use crate::excel::{exportar_bytes, NOMBRE_ARCHIVO};
use crate::server::AppState;
use crate::vistas::{estadisticas, render_html, vista_docente};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub async fn vista_docente_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let c = state.catalogo.read().await;
    match vista_docente(&c, &path.into_inner()) {
        Ok(v) => HttpResponse::Ok().json(v),
        Err(e) => respuesta_error(&e),
    }
}

pub async fn estadisticas_handler(state: web::Data<AppState>) -> impl Responder {
    let c = state.catalogo.read().await;
    HttpResponse::Ok().json(estadisticas(&c))
}

/// Libro .xlsx con una hoja por curso y por docente, como descarga.
pub async fn exportar_handler(state: web::Data<AppState>) -> impl Responder {
    let c = state.catalogo.read().await.clone();
    match web::block(move || exportar_bytes(&c)).await {
        Ok(Ok(bytes)) => HttpResponse::Ok()
            .content_type(XLSX_MIME)
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", NOMBRE_ARCHIVO),
            ))
            .body(bytes),
        Ok(Err(e)) => respuesta_error_excel(&e),
        Err(e) => HttpResponse::InternalServerError().json(json!({"error": format!("task join error: {}", e)})),
    }
}

pub async fn imprimir_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let c = state.catalogo.read().await;
    let anio = chrono::Local::now().year();
    match render_html(&c, &path.into_inner(), &state.config.escuela, anio) {
        Ok(html) => HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html),
        Err(e) => respuesta_error(&e),
    }
}
