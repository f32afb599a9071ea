// Sesiones del editor de grilla. Cada sesión es una copia de trabajo; nada
// llega al catálogo confirmado hasta `POST .../guardar`.

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::api_json::{
    respuesta_error, AbrirCeldaRequest, CrearSesionRequest, EstadoSesion, MoverRequest, SeleccionarCursoRequest,
    SesionCreada,
};
use crate::auth::Capacidad;
use crate::editor::{AlmacenLocal, EditorHorarios, FormularioCelda};
use crate::error::HorarioError;
use crate::server::AppState;

fn estado(sesion_id: &str, ed: &EditorHorarios) -> EstadoSesion {
    let abierta = ed.celda().is_some();
    EstadoSesion {
        sesion_id: sesion_id.to_string(),
        curso_id: ed.curso_id().to_string(),
        celda: ed.celda().cloned(),
        formulario: abierta.then(|| ed.formulario.clone()),
        docentes_disponibles: if abierta {
            ed.docentes_disponibles().into_iter().cloned().collect()
        } else {
            Vec::new()
        },
        mensaje_conflicto: ed.mensaje_conflicto().map(str::to_string),
        grilla: ed.grilla(),
    }
}

fn sesion_inexistente(id: &str) -> HttpResponse {
    respuesta_error(&HorarioError::no_encontrado("Sesión", id))
}

/// Busca la sesión y le aplica `f`; responde con el estado resultante.
async fn con_sesion<F>(state: &AppState, id: &str, f: F) -> HttpResponse
where
    F: FnOnce(&mut EditorHorarios) -> Result<(), HorarioError>,
{
    let mut sesiones = state.sesiones.lock().await;
    let Some(ed) = sesiones.get_mut(id) else {
        return sesion_inexistente(id);
    };
    match f(ed) {
        Ok(()) => HttpResponse::Ok().json(estado(id, ed)),
        Err(e) => respuesta_error(&e),
    }
}

pub async fn crear_sesion_handler(
    _cap: Capacidad,
    state: web::Data<AppState>,
    body: Option<web::Json<CrearSesionRequest>>,
) -> impl Responder {
    let req = body.map(|b| b.into_inner()).unwrap_or_default();
    let mut sesiones = state.sesiones.lock().await;
    let c = state.catalogo.read().await;
    if let Some(curso) = req.curso_id.as_deref() {
        if c.curso(curso).is_none() {
            return respuesta_error(&HorarioError::no_encontrado("Curso", curso));
        }
    }
    let sesion_id = Uuid::new_v4().simple().to_string();
    let mut ed = EditorHorarios::nuevo(&c, req.curso_id.as_deref(), state.config.politica);
    let etiqueta = sesion_id.clone();
    ed.set_on_guardado(move |curso| info!(sesion = %etiqueta, curso, "horario confirmado"));
    let curso_id = ed.curso_id().to_string();
    sesiones.insert(sesion_id.clone(), ed);
    info!(sesion = %sesion_id, curso = %curso_id, "sesión de edición abierta");
    HttpResponse::Created().json(SesionCreada { sesion_id, curso_id })
}

pub async fn cerrar_sesion_handler(_cap: Capacidad, state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match state.sesiones.lock().await.remove(&id) {
        Some(_) => HttpResponse::Ok().json(json!({"status": "ok"})),
        None => sesion_inexistente(&id),
    }
}

pub async fn grilla_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    con_sesion(&state, &path.into_inner(), |_| Ok(())).await
}

pub async fn seleccionar_curso_handler(
    _cap: Capacidad,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<SeleccionarCursoRequest>,
) -> impl Responder {
    let curso = body.into_inner().curso_id;
    con_sesion(&state, &path.into_inner(), |ed| ed.seleccionar_curso(&curso)).await
}

pub async fn abrir_celda_handler(
    _cap: Capacidad,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<AbrirCeldaRequest>,
) -> impl Responder {
    let req = body.into_inner();
    con_sesion(&state, &path.into_inner(), |ed| {
        ed.abrir_celda(req.dia, &req.modulo_id, req.grupo).map(|_| ())
    })
    .await
}

pub async fn cerrar_celda_handler(_cap: Capacidad, state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    con_sesion(&state, &path.into_inner(), |ed| {
        ed.cerrar_celda();
        ed.descartar_mensaje();
        Ok(())
    })
    .await
}

/// Guarda el formulario en la celda abierta. Ante un conflicto la respuesta
/// es 409 y el mensaje queda también en el estado de la sesión.
pub async fn guardar_celda_handler(
    _cap: Capacidad,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<FormularioCelda>,
) -> impl Responder {
    let id = path.into_inner();
    let mut sesiones = state.sesiones.lock().await;
    let Some(ed) = sesiones.get_mut(&id) else {
        return sesion_inexistente(&id);
    };
    ed.formulario = body.into_inner();
    match ed.guardar_celda() {
        Ok(bloque) => HttpResponse::Ok().json(json!({"bloque": bloque, "estado": estado(&id, ed)})),
        Err(e) => respuesta_error(&e),
    }
}

pub async fn quitar_bloque_handler(
    _cap: Capacidad,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (id, bloque_id) = path.into_inner();
    con_sesion(&state, &id, |ed| ed.quitar_bloque(&bloque_id).map(|_| ())).await
}

pub async fn mover_handler(
    _cap: Capacidad,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<MoverRequest>,
) -> impl Responder {
    let req = body.into_inner();
    con_sesion(&state, &path.into_inner(), |ed| ed.mover(&req.bloque_id, &req.destino)).await
}

/// Envía el horario del curso a la planilla (si hay) y lo confirma en el
/// catálogo compartido con control de versión.
pub async fn guardar_sesion_handler(_cap: Capacidad, state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let remoto = state.cliente().await;
    let mut sesiones = state.sesiones.lock().await;
    let Some(ed) = sesiones.get_mut(&id) else {
        return sesion_inexistente(&id);
    };
    let mut c = state.catalogo.write().await;
    let resultado = match remoto.as_ref() {
        Some(cliente) => ed.confirmar(&mut c, cliente).await,
        None => ed.confirmar(&mut c, &AlmacenLocal).await,
    };
    match resultado {
        Ok(version) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "cursoId": ed.curso_id(),
            "version": version,
        })),
        Err(e) => respuesta_error(&e),
    }
}
