//! Token de capacidad para las rutas que modifican datos.
//!
//! Con `HORARIOS_TOKEN` configurado, los handlers que reciben `Capacidad`
//! exigen `Authorization: Bearer <token>`; sin token las rutas quedan
//! abiertas (uso local).

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse};
use serde_json::json;
use tracing::debug;

use crate::server::AppState;

/// Prueba de que el pedido presentó el token (o de que no se exige ninguno).
#[derive(Debug, Clone, Copy)]
pub struct Capacidad;

fn token_presentado(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

pub fn verificar(req: &HttpRequest, esperado: Option<&str>) -> Result<Capacidad, actix_web::Error> {
    let Some(esperado) = esperado else {
        return Ok(Capacidad);
    };
    if token_presentado(req) == Some(esperado) {
        return Ok(Capacidad);
    }
    debug!(ruta = %req.path(), "pedido sin token válido");
    let resp = HttpResponse::Unauthorized().json(json!({"error": "se requiere un token válido (Authorization: Bearer ...)"}));
    Err(InternalError::from_response("token inválido", resp).into())
}

impl FromRequest for Capacidad {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let esperado = req
            .app_data::<web::Data<AppState>>()
            .and_then(|s| s.config.token.as_deref());
        ready(verificar(req, esperado))
    }
}
