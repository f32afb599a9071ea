//! Módulo `excel` dividido en submódulos.
//!
//! - `io`: helpers de lectura con calamine
//! - `planilla`: lectura de una copia local del libro de la planilla remota
//! - `exportar`: libro .xlsx con una hoja por curso y una por docente

use thiserror::Error;

/// Helpers de IO y utilidades para parsing de Excel
pub mod io;

/// Lectura del libro local: `leer_planilla`
pub mod planilla;

/// Exportación: `exportar_bytes`, `exportar_a_archivo`
pub mod exportar;

#[derive(Debug, Error)]
pub enum ExcelError {
    #[error("no se pudo leer el libro: {0}")]
    Lectura(#[from] calamine::Error),
    #[error("no se pudo escribir el libro: {0}")]
    Escritura(String),
}

pub use exportar::{construir_libro, exportar_a_archivo, exportar_bytes, NOMBRE_ARCHIVO};
pub use planilla::leer_planilla;
