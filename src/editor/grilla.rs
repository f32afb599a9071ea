// Modelo de render de la grilla días × módulos de un curso.

use serde::Serialize;

use crate::editor::celda::IdCelda;
use crate::models::{Bloque, Dia, Grupo, TipoModulo};
use crate::store::Catalogo;
use crate::vistas::{describir_bloque, VistaBloque};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grilla {
    pub curso_id: String,
    pub curso: String,
    pub dias: Vec<&'static str>,
    pub filas: Vec<FilaGrilla>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilaGrilla {
    pub modulo_id: String,
    pub titulo: String,
    pub horario: String,
    pub tipo: TipoModulo,
    pub celdas: Vec<CeldaGrilla>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "estado", rename_all = "snake_case")]
pub enum CeldaGrilla {
    /// Recreo: no admite bloques ni es destino de arrastre.
    Bloqueada,
    Vacia { id: IdCelda },
    Simple { id: IdCelda, bloque: VistaBloque },
    Dividida { id: IdCelda, grupo_a: EspacioGrupo, grupo_b: EspacioGrupo },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "estado", rename_all = "snake_case")]
pub enum EspacioGrupo {
    Ocupado { bloque: VistaBloque },
    /// Lugar libre de una materia dividida; al hacer clic se abre el editor
    /// apuntando a este grupo.
    Agregar { grupo: Grupo, etiqueta: String },
}

fn espacio(catalogo: &Catalogo, bloques: &[&Bloque], grupo: Grupo) -> EspacioGrupo {
    match bloques.iter().find(|b| b.grupo == Some(grupo)) {
        Some(b) => EspacioGrupo::Ocupado {
            bloque: describir_bloque(catalogo, b),
        },
        None => EspacioGrupo::Agregar {
            grupo,
            etiqueta: format!("Agregar Grupo {}", grupo),
        },
    }
}

fn celda(catalogo: &Catalogo, id: IdCelda, bloques: &[&Bloque]) -> CeldaGrilla {
    if bloques.iter().any(|b| b.grupo.is_some()) {
        return CeldaGrilla::Dividida {
            grupo_a: espacio(catalogo, bloques, Grupo::A),
            grupo_b: espacio(catalogo, bloques, Grupo::B),
            id,
        };
    }
    match bloques.first() {
        Some(b) => CeldaGrilla::Simple {
            bloque: describir_bloque(catalogo, b),
            id,
        },
        None => CeldaGrilla::Vacia { id },
    }
}

/// Recorre los módulos en orden cronológico; `en_celda` devuelve los bloques
/// de cada (día, módulo) del curso.
pub(crate) fn construir<'a, F>(catalogo: &Catalogo, curso_id: &str, en_celda: F) -> Grilla
where
    F: Fn(Dia, &str) -> Vec<&'a Bloque>,
{
    let filas = catalogo
        .modulos_ordenados()
        .into_iter()
        .map(|m| {
            let celdas = Dia::TODOS
                .iter()
                .map(|&dia| {
                    if m.es_recreo() {
                        CeldaGrilla::Bloqueada
                    } else {
                        celda(catalogo, IdCelda::new(curso_id, dia, m.id.clone()), &en_celda(dia, &m.id))
                    }
                })
                .collect();
            FilaGrilla {
                modulo_id: m.id.clone(),
                titulo: m.titulo(),
                horario: m.rango_horario(),
                tipo: m.tipo,
                celdas,
            }
        })
        .collect();
    Grilla {
        curso_id: curso_id.to_string(),
        curso: catalogo
            .curso(curso_id)
            .map(|c| c.nombre.clone())
            .unwrap_or_else(|| crate::vistas::SIN_DATO.to_string()),
        dias: Dia::TODOS.iter().map(|d| d.nombre()).collect(),
        filas,
    }
}
