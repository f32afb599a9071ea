use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use tracing::info;

use crate::api_json::{respuesta_error, AsignarRequest, CursoQuery};
use crate::auth::Capacidad;
use crate::gestion::{self, Entidad};
use crate::models::Bloque;
use crate::server::{cargar_segun_config, AppState};

pub async fn catalogo_handler(state: web::Data<AppState>) -> impl Responder {
    let c = state.catalogo.read().await;
    HttpResponse::Ok().json(&*c)
}

/// Vuelve a leer todo desde el origen configurado. Las sesiones abiertas
/// conservan su copia de trabajo; al confirmar verán la versión nueva.
pub async fn recargar_handler(_cap: Capacidad, state: web::Data<AppState>) -> impl Responder {
    let remoto = state.cliente().await;
    let nuevo = cargar_segun_config(&state.config, remoto.as_ref()).await;
    let mut c = state.catalogo.write().await;
    c.reemplazar(nuevo);
    info!(docentes = c.docentes.len(), bloques = c.bloques.len(), "catálogo recargado");
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "docentes": c.docentes.len(),
        "materias": c.materias.len(),
        "cursos": c.cursos.len(),
        "modulos": c.modulos.len(),
        "bloques": c.bloques.len(),
    }))
}

/// `GET /bloques?cursoId=`; sin curso devuelve todos.
pub async fn bloques_handler(state: web::Data<AppState>, query: web::Query<CursoQuery>) -> impl Responder {
    let c = state.catalogo.read().await;
    let bloques: Vec<&Bloque> = match query.curso_id.as_deref() {
        Some(curso) => c.bloques_de_curso(curso),
        None => c.bloques.iter().collect(),
    };
    HttpResponse::Ok().json(bloques)
}

pub async fn listar_handler<E: Entidad>(state: web::Data<AppState>) -> impl Responder {
    let c = state.catalogo.read().await;
    HttpResponse::Ok().json(E::coleccion(&c))
}

pub async fn crear_handler<E: Entidad>(_cap: Capacidad, state: web::Data<AppState>, body: web::Json<E>) -> impl Responder {
    let remoto = state.cliente().await;
    let mut c = state.catalogo.write().await;
    match gestion::crear(&mut c, remoto.as_ref(), body.into_inner()).await {
        Ok(e) => HttpResponse::Created().json(e),
        Err(e) => respuesta_error(&e),
    }
}

pub async fn actualizar_handler<E: Entidad>(
    _cap: Capacidad,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<E>,
) -> impl Responder {
    let id = path.into_inner();
    let remoto = state.cliente().await;
    let mut c = state.catalogo.write().await;
    match gestion::actualizar(&mut c, remoto.as_ref(), &id, body.into_inner()).await {
        Ok(e) => HttpResponse::Ok().json(e),
        Err(e) => respuesta_error(&e),
    }
}

pub async fn eliminar_handler<E: Entidad>(
    _cap: Capacidad,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    let remoto = state.cliente().await;
    let mut c = state.catalogo.write().await;
    match gestion::eliminar::<E>(&mut c, remoto.as_ref(), &id).await {
        Ok(e) => HttpResponse::Ok().json(json!({"status": "ok", "eliminado": e})),
        Err(e) => respuesta_error(&e),
    }
}

/// Alta o cambio de condición de un docente en una materia.
pub async fn asignar_handler(
    _cap: Capacidad,
    state: web::Data<AppState>,
    body: web::Json<AsignarRequest>,
) -> impl Responder {
    let req = body.into_inner();
    let remoto = state.cliente().await;
    let mut c = state.catalogo.write().await;
    match gestion::asignar(&mut c, remoto.as_ref(), &req.docente_id, &req.materia_id, req.condicion).await {
        Ok(a) => HttpResponse::Ok().json(a),
        Err(e) => respuesta_error(&e),
    }
}

pub async fn desasignar_handler(
    _cap: Capacidad,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    let remoto = state.cliente().await;
    let mut c = state.catalogo.write().await;
    match gestion::desasignar(&mut c, remoto.as_ref(), &id).await {
        Ok(a) => HttpResponse::Ok().json(json!({"status": "ok", "eliminado": a})),
        Err(e) => respuesta_error(&e),
    }
}
