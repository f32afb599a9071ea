// Horario semanal de un docente, sobre todos los cursos.

use serde::Serialize;

use crate::error::HorarioError;
use crate::gateway::normalizar::modulo_ids_equivalentes;
use crate::models::{Condicion, Dia, TipoModulo};
use crate::store::Catalogo;
use crate::vistas::{describir_bloque, VistaBloque, SIN_DATO};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CondicionEnMateria {
    pub materia: String,
    pub condicion: Condicion,
    pub etiqueta: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HorasMateria {
    pub materia_id: String,
    pub materia: String,
    pub horas: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CeldaDocente {
    pub curso: String,
    pub bloque: VistaBloque,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilaDocente {
    pub modulo_id: String,
    pub titulo: String,
    pub horario: String,
    pub tipo: TipoModulo,
    /// Una entrada por día; `None` si está libre o es recreo.
    pub celdas: Vec<Option<CeldaDocente>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VistaDocente {
    pub docente_id: String,
    pub nombre: String,
    pub condiciones: Vec<CondicionEnMateria>,
    pub total_horas: usize,
    pub horas_por_materia: Vec<HorasMateria>,
    pub filas: Vec<FilaDocente>,
}

/// Cuenta los bloques donde el docente está a cargo (un bloque = una hora).
pub fn vista_docente(catalogo: &Catalogo, docente_id: &str) -> Result<VistaDocente, HorarioError> {
    let docente = catalogo
        .docente(docente_id)
        .ok_or_else(|| HorarioError::no_encontrado("Docente", docente_id))?;
    let propios: Vec<_> = catalogo.bloques.iter().filter(|b| b.titular_id() == docente_id).collect();

    let mut horas_por_materia: Vec<HorasMateria> = Vec::new();
    for b in &propios {
        match horas_por_materia.iter_mut().find(|h| h.materia_id == b.materia_id) {
            Some(h) => h.horas += 1,
            None => horas_por_materia.push(HorasMateria {
                materia_id: b.materia_id.clone(),
                materia: catalogo
                    .materia(&b.materia_id)
                    .map(|m| m.nombre.clone())
                    .unwrap_or_else(|| SIN_DATO.to_string()),
                horas: 1,
            }),
        }
    }

    let condiciones = catalogo
        .asignaciones
        .iter()
        .filter(|a| a.docente_id == docente_id)
        .map(|a| CondicionEnMateria {
            materia: catalogo
                .materia(&a.materia_id)
                .map(|m| m.nombre.clone())
                .unwrap_or_else(|| SIN_DATO.to_string()),
            condicion: a.condicion,
            etiqueta: a.condicion.etiqueta(),
        })
        .collect();

    let filas = catalogo
        .modulos_ordenados()
        .into_iter()
        .map(|m| FilaDocente {
            modulo_id: m.id.clone(),
            titulo: m.titulo(),
            horario: m.rango_horario(),
            tipo: m.tipo,
            celdas: Dia::TODOS
                .iter()
                .map(|&dia| {
                    if m.es_recreo() {
                        return None;
                    }
                    propios
                        .iter()
                        .find(|b| b.dia == dia && modulo_ids_equivalentes(&b.modulo_id, &m.id))
                        .map(|b| CeldaDocente {
                            curso: catalogo
                                .curso(&b.curso_id)
                                .map(|c| c.nombre.clone())
                                .unwrap_or_else(|| SIN_DATO.to_string()),
                            bloque: describir_bloque(catalogo, b),
                        })
                })
                .collect(),
        })
        .collect();

    Ok(VistaDocente {
        docente_id: docente.id.clone(),
        nombre: docente.nombre_completo(),
        condiciones,
        total_horas: propios.len(),
        horas_por_materia,
        filas,
    })
}
