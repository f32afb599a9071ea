// Lectura de una copia local del libro que usa la planilla remota (mismas
// hojas y encabezados). Sirve para trabajar sin conexión.

use serde_json::{Map, Value};
use std::path::Path;
use tracing::{info, warn};

use crate::excel::io::{normalize_header, read_sheet};
use crate::excel::ExcelError;
use crate::gateway::wire;
use crate::store::Catalogo;

const CAMPOS: &[&str] = &[
    "id",
    "numero",
    "horaInicio",
    "horaFin",
    "tipo",
    "etiqueta",
    "nombre",
    "apellido",
    "tieneSubgrupos",
    "docenteIds",
    "division",
    "docenteId",
    "materiaId",
    "condicion",
    "cursoId",
    "diaIndex",
    "moduloId",
    "grupo",
];

fn campo_canonico(encabezado: &str) -> Option<&'static str> {
    let n = normalize_header(encabezado);
    CAMPOS.iter().copied().find(|c| c.to_lowercase() == n)
}

/// Filas de una hoja como objetos JSON con los nombres de campo del wire.
/// Las columnas con encabezado desconocido se ignoran.
pub fn registros(filas: &[Vec<String>]) -> Vec<Value> {
    let Some((encabezado, datos)) = filas.split_first() else {
        return Vec::new();
    };
    let columnas: Vec<Option<&'static str>> = encabezado.iter().map(|h| campo_canonico(h)).collect();
    datos
        .iter()
        .filter(|fila| fila.iter().any(|c| !c.is_empty()))
        .map(|fila| {
            let mut obj = Map::new();
            for (i, celda) in fila.iter().enumerate() {
                if let Some(Some(campo)) = columnas.get(i) {
                    if !celda.is_empty() {
                        obj.insert(campo.to_string(), Value::String(celda.clone()));
                    }
                }
            }
            Value::Object(obj)
        })
        .collect()
}

fn hoja<T, P: AsRef<Path>>(path: P, nombre: &str, f: fn(&Value) -> Option<T>) -> Result<Vec<T>, ExcelError> {
    match read_sheet(path, nombre)? {
        Some(filas) => Ok(registros(&filas).iter().filter_map(f).collect()),
        None => {
            warn!(hoja = nombre, "hoja ausente en el libro; se deja vacía");
            Ok(Vec::new())
        }
    }
}

/// Arma un catálogo a partir del libro. Las hojas faltantes quedan vacías.
pub fn leer_planilla<P: AsRef<Path>>(path: P) -> Result<Catalogo, ExcelError> {
    let p = path.as_ref();
    let mut modulos = hoja(p, "Modulos", wire::modulo_desde_wire)?;
    modulos.sort_by_key(|m| m.numero);
    let catalogo = Catalogo::new(
        hoja(p, "Docentes", wire::docente_desde_wire)?,
        hoja(p, "Materias", wire::materia_desde_wire)?,
        hoja(p, "Cursos", wire::curso_desde_wire)?,
        modulos,
        hoja(p, "DocenteMateriaAsignaciones", wire::asignacion_desde_wire)?,
        hoja(p, "Bloques", wire::bloque_desde_wire)?,
    );
    info!(
        archivo = %p.display(),
        docentes = catalogo.docentes.len(),
        bloques = catalogo.bloques.len(),
        "catálogo leído desde planilla local"
    );
    Ok(catalogo)
}
