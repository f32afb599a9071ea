// Horas asignadas por docente, curso y materia.

use serde::Serialize;
use std::collections::HashMap;

use crate::store::Catalogo;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Horas {
    pub id: String,
    pub nombre: String,
    pub horas: usize,
    /// Porcentaje sobre el total de bloques, con un decimal.
    pub porcentaje: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Estadisticas {
    pub total_bloques: usize,
    pub docentes_activos: usize,
    pub cursos_con_clases: usize,
    pub materias_en_grilla: usize,
    pub por_docente: Vec<Horas>,
    pub por_curso: Vec<Horas>,
    pub por_materia: Vec<Horas>,
}

fn porcentaje(horas: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((horas as f64 / total as f64) * 1000.0).round() / 10.0
}

/// Sólo entidades con al menos una hora, de mayor a menor; empates por nombre.
fn agrupar<'a>(conteo: &HashMap<&str, usize>, entidades: impl Iterator<Item = (&'a str, String)>, total: usize) -> Vec<Horas> {
    let mut v: Vec<Horas> = entidades
        .filter_map(|(id, nombre)| {
            let horas = conteo.get(id).copied().unwrap_or(0);
            (horas > 0).then(|| Horas {
                id: id.to_string(),
                nombre,
                horas,
                porcentaje: porcentaje(horas, total),
            })
        })
        .collect();
    v.sort_by(|a, b| b.horas.cmp(&a.horas).then_with(|| a.nombre.cmp(&b.nombre)));
    v
}

pub fn estadisticas(catalogo: &Catalogo) -> Estadisticas {
    let total = catalogo.bloques.len();
    let mut docentes: HashMap<&str, usize> = HashMap::new();
    let mut cursos: HashMap<&str, usize> = HashMap::new();
    let mut materias: HashMap<&str, usize> = HashMap::new();
    for b in &catalogo.bloques {
        *docentes.entry(b.titular_id()).or_default() += 1;
        *cursos.entry(b.curso_id.as_str()).or_default() += 1;
        *materias.entry(b.materia_id.as_str()).or_default() += 1;
    }

    let por_docente = agrupar(
        &docentes,
        catalogo.docentes.iter().map(|d| (d.id.as_str(), d.apellido.clone())),
        total,
    );
    let por_curso = agrupar(&cursos, catalogo.cursos.iter().map(|c| (c.id.as_str(), c.nombre.clone())), total);
    let por_materia = agrupar(
        &materias,
        catalogo.materias.iter().map(|m| (m.id.as_str(), m.nombre.clone())),
        total,
    );

    Estadisticas {
        total_bloques: total,
        docentes_activos: por_docente.len(),
        cursos_con_clases: por_curso.len(),
        materias_en_grilla: por_materia.len(),
        por_docente,
        por_curso,
        por_materia,
    }
}
