use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

use crate::excel::ExcelError;

/// Convierte una celda de calamine a String. Los enteros guardados como
/// flotantes pierden el ".0"; las horas de Excel se devuelven como "HH:MM".
pub fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if (f.floor() - f).abs() < f64::EPSILON {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Data::Int(i) => format!("{}", i),
        Data::Bool(b) => format!("{}", b),
        Data::Empty | Data::Error(_) => String::new(),
        Data::DateTime(dt) => {
            // fracción del día -> hora
            let minutos = (dt.as_f64().fract() * 1440.0).round() as i64;
            format!("{:02}:{:02}", (minutos / 60) % 24, minutos % 60)
        }
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Normaliza encabezados eliminando espacios y pasando a minúsculas.
pub fn normalize_header(s: &str) -> String {
    s.to_lowercase().chars().filter(|c| !c.is_whitespace()).collect()
}

/// Nombres de las hojas del libro.
pub fn sheet_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>, ExcelError> {
    let workbook = open_workbook_auto(path)?;
    Ok(workbook.sheet_names().to_owned())
}

/// Lee una hoja completa como filas de texto. Devuelve `None` si la hoja no
/// existe (la búsqueda del nombre ignora mayúsculas).
pub fn read_sheet<P: AsRef<Path>>(path: P, sheet_name: &str) -> Result<Option<Vec<Vec<String>>>, ExcelError> {
    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names().to_owned();
    let Some(nombre) = names.iter().find(|s| s.eq_ignore_ascii_case(sheet_name)).cloned() else {
        return Ok(None);
    };
    let range = workbook.worksheet_range(&nombre)?;
    Ok(Some(
        range
            .rows()
            .map(|r| r.iter().map(cell_to_string).collect())
            .collect(),
    ))
}
