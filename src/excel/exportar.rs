// Exportación a .xlsx: una hoja por curso y una por docente.

use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

use umya_spreadsheet::Spreadsheet;

use crate::excel::ExcelError;
use crate::gateway::normalizar::modulo_ids_equivalentes;
use crate::models::{Bloque, Dia};
use crate::store::Catalogo;
use crate::vistas::{describir_bloque, texto_celda, SIN_DATO};

pub const NOMBRE_ARCHIVO: &str = "Horarios.xlsx";
const MAX_NOMBRE_HOJA: usize = 31;

/// Tabla de una hoja: encabezado + una fila por módulo asignable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tabla {
    pub nombre: String,
    pub filas: Vec<Vec<String>>,
}

fn encabezado() -> Vec<String> {
    let mut v = vec!["Módulo".to_string(), "Horario".to_string()];
    v.extend(Dia::TODOS.iter().map(|d| d.nombre().to_string()));
    v
}

fn tabla<'a, F, T>(catalogo: &'a Catalogo, filtro: F, texto: T) -> Vec<Vec<String>>
where
    F: Fn(&Bloque) -> bool,
    T: Fn(&'a Bloque) -> String,
{
    let mut filas = vec![encabezado()];
    for m in catalogo.modulos_ordenados().into_iter().filter(|m| !m.es_recreo()) {
        let mut fila = vec![m.titulo(), m.rango_horario()];
        for dia in Dia::TODOS {
            let mut en_celda: Vec<&Bloque> = catalogo
                .bloques
                .iter()
                .filter(|b| b.dia == dia && modulo_ids_equivalentes(&b.modulo_id, &m.id) && filtro(*b))
                .collect();
            en_celda.sort_by_key(|b| b.grupo);
            let textos: Vec<String> = en_celda.into_iter().map(&texto).collect();
            fila.push(textos.join("\n\n"));
        }
        filas.push(fila);
    }
    filas
}

pub fn tabla_curso(catalogo: &Catalogo, curso_id: &str) -> Vec<Vec<String>> {
    tabla(
        catalogo,
        |b| b.curso_id == curso_id,
        |b| texto_celda(&describir_bloque(catalogo, b)),
    )
}

/// En la hoja del docente cada celda muestra materia y curso.
pub fn tabla_docente(catalogo: &Catalogo, docente_id: &str) -> Vec<Vec<String>> {
    tabla(
        catalogo,
        |b| b.titular_id() == docente_id,
        |b| {
            let materia = catalogo.materia(&b.materia_id).map(|m| m.nombre.as_str()).unwrap_or(SIN_DATO);
            let curso = catalogo.curso(&b.curso_id).map(|c| c.nombre.as_str()).unwrap_or(SIN_DATO);
            format!("{}\n{}", materia, curso)
        },
    )
}

/// Nombre de hoja válido y único: sin `°` ni `[]:*?/\`, a lo sumo 31
/// caracteres, con sufijo numérico si ya existe.
pub fn nombre_hoja(base: &str, usados: &mut HashSet<String>) -> String {
    let limpio: String = base
        .chars()
        .filter(|c| !matches!(c, '°' | '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .collect();
    let limpio = limpio.trim();
    let limpio = if limpio.is_empty() { "Hoja" } else { limpio };
    let recortar = |s: &str, max: usize| s.chars().take(max).collect::<String>().trim_end().to_string();

    let mut nombre = recortar(limpio, MAX_NOMBRE_HOJA);
    let mut n = 2;
    while usados.contains(&nombre.to_lowercase()) {
        let sufijo = format!(" ({})", n);
        nombre = format!("{}{}", recortar(limpio, MAX_NOMBRE_HOJA - sufijo.chars().count()), sufijo);
        n += 1;
    }
    usados.insert(nombre.to_lowercase());
    nombre
}

/// Todas las hojas del libro, cursos primero.
pub fn tablas(catalogo: &Catalogo) -> Vec<Tabla> {
    let mut usados = HashSet::new();
    let mut out = Vec::new();
    for c in &catalogo.cursos {
        out.push(Tabla {
            nombre: nombre_hoja(&c.nombre, &mut usados),
            filas: tabla_curso(catalogo, &c.id),
        });
    }
    for d in &catalogo.docentes {
        out.push(Tabla {
            nombre: nombre_hoja(&d.apellido, &mut usados),
            filas: tabla_docente(catalogo, &d.id),
        });
    }
    out
}

pub fn construir_libro(catalogo: &Catalogo) -> Result<Spreadsheet, ExcelError> {
    let mut book = umya_spreadsheet::new_file_empty_worksheet();
    for t in tablas(catalogo) {
        let hoja = book
            .new_sheet(&t.nombre)
            .map_err(|e| ExcelError::Escritura(format!("hoja '{}': {}", t.nombre, e)))?;
        for (r, fila) in t.filas.iter().enumerate() {
            for (c, valor) in fila.iter().enumerate() {
                let coord = (c as u32 + 1, r as u32 + 1);
                hoja.get_cell_mut(coord).set_value(valor.clone());
                if r == 0 {
                    hoja.get_style_mut(coord).get_font_mut().set_bold(true);
                } else if c >= 2 {
                    hoja.get_style_mut(coord).get_alignment_mut().set_wrap_text(true);
                }
            }
        }
        hoja.get_column_dimension_mut("A").set_width(10.0);
        hoja.get_column_dimension_mut("B").set_width(14.0);
        for col in ["C", "D", "E", "F", "G"] {
            hoja.get_column_dimension_mut(col).set_width(22.0);
        }
    }
    Ok(book)
}

pub fn exportar_a_archivo<P: AsRef<Path>>(catalogo: &Catalogo, path: P) -> Result<(), ExcelError> {
    let book = construir_libro(catalogo)?;
    umya_spreadsheet::writer::xlsx::write(&book, path.as_ref()).map_err(|e| ExcelError::Escritura(e.to_string()))
}

/// Libro completo en memoria, para devolverlo como descarga.
pub fn exportar_bytes(catalogo: &Catalogo) -> Result<Vec<u8>, ExcelError> {
    let book = construir_libro(catalogo)?;
    let mut buf = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut buf).map_err(|e| ExcelError::Escritura(e.to_string()))?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nombres_de_hoja_limpios_y_unicos() {
        let mut usados = HashSet::new();
        assert_eq!(nombre_hoja("1° 1°", &mut usados), "1 1");
        assert_eq!(nombre_hoja("1° 1°", &mut usados), "1 1 (2)");
        let largo = "x".repeat(40);
        assert_eq!(nombre_hoja(&largo, &mut usados).chars().count(), 31);
    }

    #[test]
    fn tabla_curso_omite_recreos() {
        let c = Catalogo::demo();
        let t = tabla_curso(&c, "c1");
        // encabezado + 8 módulos de clase
        assert_eq!(t.len(), 9);
        assert_eq!(t[1][2], "Matemática\nGarcía, C.");
    }
}
