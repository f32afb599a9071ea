// Detección de dobles asignaciones de docentes (mismo día y módulo).

use std::str::FromStr;

use crate::models::{Bloque, Dia};

/// Qué docentes de un bloque participan en la verificación de conflictos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PoliticaConflicto {
    /// Sólo el docente a cargo de cada bloque.
    #[default]
    SoloTitular,
    /// Docente a cargo y suplentes, en ambos lados de la comparación.
    TitularYSuplentes,
}

impl FromStr for PoliticaConflicto {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "titular" | "solo_titular" => Ok(PoliticaConflicto::SoloTitular),
            "todos" | "titular_y_suplentes" => Ok(PoliticaConflicto::TitularYSuplentes),
            otro => Err(format!("política de conflictos desconocida: '{}' (use titular|todos)", otro)),
        }
    }
}

impl PoliticaConflicto {
    fn docentes<'a>(self, b: &'a Bloque) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        match self {
            PoliticaConflicto::SoloTitular => Box::new(std::iter::once(b.titular_id())),
            PoliticaConflicto::TitularYSuplentes => Box::new(b.docente_ids()),
        }
    }
}

/// Lo que se quiere ubicar: docentes del bloque en un (día, módulo).
#[derive(Debug, Clone, Copy)]
pub struct Candidato<'a> {
    pub bloque: &'a Bloque,
    pub dia: Dia,
    pub modulo_id: &'a str,
}

/// Conflicto encontrado: el docente y el bloque que ya lo ocupa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictoDocente<'a> {
    pub docente_id: &'a str,
    pub bloque: &'a Bloque,
}

/// Recorre todos los bloques (todos los cursos) buscando otro bloque en el
/// mismo día y módulo que comparta docente con el candidato. `excluir` es el
/// id del bloque que se está reemplazando o moviendo.
pub fn buscar_conflicto<'a>(
    bloques: &'a [Bloque],
    candidato: Candidato<'_>,
    excluir: Option<&str>,
    politica: PoliticaConflicto,
) -> Option<ConflictoDocente<'a>> {
    let propios: Vec<&str> = politica.docentes(candidato.bloque).collect();
    for b in bloques {
        if b.dia != candidato.dia || b.modulo_id != candidato.modulo_id {
            continue;
        }
        if excluir.is_some_and(|id| id == b.id) {
            continue;
        }
        if let Some(d) = politica.docentes(b).find(|d| propios.contains(d)) {
            return Some(ConflictoDocente { docente_id: d, bloque: b });
        }
    }
    None
}

/// Pares de bloques que violan la regla de no doble asignación.
/// Útil para auditar datos cargados desde la planilla.
pub fn dobles_asignaciones(bloques: &[Bloque], politica: PoliticaConflicto) -> Vec<(&Bloque, &Bloque)> {
    let mut out = Vec::new();
    for (i, a) in bloques.iter().enumerate() {
        let da: Vec<&str> = politica.docentes(a).collect();
        for b in &bloques[i + 1..] {
            if a.dia == b.dia && a.modulo_id == b.modulo_id && politica.docentes(b).any(|d| da.contains(&d)) {
                out.push((a, b));
            }
        }
    }
    out
}
