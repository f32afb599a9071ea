//! Cuerpos de pedido y respuesta de la API JSON.
//!
//! Los nombres de campo siguen el mismo camelCase que la planilla
//! (`cursoId`, `diaIndex`, `moduloId`).

use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::editor::{CeldaEnEdicion, FormularioCelda, Grilla};
use crate::error::HorarioError;
use crate::excel::ExcelError;
use crate::models::{Condicion, Dia, Docente, Grupo};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursoQuery {
    pub curso_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrearSesionRequest {
    #[serde(default)]
    pub curso_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeleccionarCursoRequest {
    pub curso_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbrirCeldaRequest {
    #[serde(rename = "diaIndex")]
    pub dia: Dia,
    pub modulo_id: String,
    #[serde(default)]
    pub grupo: Option<Grupo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoverRequest {
    pub bloque_id: String,
    /// Id de celda destino: `cell-{cursoId}-{diaIndex}-{moduloId}`.
    pub destino: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsignarRequest {
    pub docente_id: String,
    pub materia_id: String,
    pub condicion: Condicion,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlRequest {
    pub script_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SesionCreada {
    pub sesion_id: String,
    pub curso_id: String,
}

/// Estado del editor que se devuelve después de cada operación.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstadoSesion {
    pub sesion_id: String,
    pub curso_id: String,
    pub celda: Option<CeldaEnEdicion>,
    pub formulario: Option<FormularioCelda>,
    /// Docentes ofrecidos en el formulario (solo con una celda abierta).
    pub docentes_disponibles: Vec<Docente>,
    pub mensaje_conflicto: Option<String>,
    pub grilla: Grilla,
}

/// `{"error": ..., "codigo": ...}` con el status que corresponde al error.
pub fn respuesta_error(e: &HorarioError) -> HttpResponse {
    let cuerpo = json!({"error": e.to_string(), "codigo": e.codigo()});
    match e {
        HorarioError::NoEncontrado { .. } => HttpResponse::NotFound().json(cuerpo),
        HorarioError::Conflicto { .. }
        | HorarioError::CeldaOcupada(_)
        | HorarioError::MismaCelda
        | HorarioError::VersionDesactualizada { .. } => HttpResponse::Conflict().json(cuerpo),
        HorarioError::RemotoFallido(_) => HttpResponse::BadGateway().json(cuerpo),
        _ => HttpResponse::BadRequest().json(cuerpo),
    }
}

pub fn respuesta_error_excel(e: &ExcelError) -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({"error": e.to_string()}))
}
