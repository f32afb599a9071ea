//! Errores del dominio de horarios.
//!
//! Las validaciones y los conflictos se detectan antes de mutar cualquier
//! estado; el llamador recibe el error y la grilla queda como estaba.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HorarioError {
    /// Un campo obligatorio del formulario quedó vacío.
    #[error("Falta completar el campo obligatorio: {0}")]
    CampoRequerido(&'static str),

    /// Materia con subgrupos sin grupo elegido.
    #[error("Seleccione el grupo (A o B) para la materia {0}")]
    GrupoRequerido(String),

    #[error("Se admiten como máximo {max} suplentes por bloque")]
    DemasiadosSuplentes { max: usize },

    #[error("El docente {0} aparece más de una vez en el bloque")]
    DocenteRepetido(String),

    #[error("La condición {0} no es válida para el docente a cargo (use titular o provisional)")]
    CondicionTitularInvalida(String),

    /// Doble asignación de un docente en el mismo día y módulo.
    #[error("{mensaje}")]
    Conflicto { docente_id: String, mensaje: String },

    #[error("El módulo {0} es un recreo y no admite clases")]
    ModuloRecreo(String),

    #[error("El módulo {0} no existe")]
    ModuloInexistente(String),

    #[error("El bloque ya se encuentra en esa celda")]
    MismaCelda,

    #[error("Destino inválido: {0}")]
    DestinoInvalido(String),

    #[error("La celda ya está ocupada: {0}")]
    CeldaOcupada(String),

    #[error("No hay ninguna celda abierta para editar")]
    SinCeldaEnEdicion,

    #[error("{entidad} no encontrado: {id}")]
    NoEncontrado { entidad: &'static str, id: String },

    /// Otro operador confirmó el horario del curso después de abrir esta sesión.
    #[error(
        "El horario del curso {curso_id} cambió (versión {actual}, se esperaba {esperada}); recargue antes de guardar"
    )]
    VersionDesactualizada {
        curso_id: String,
        esperada: u64,
        actual: u64,
    },

    /// El almacén remoto no confirmó la operación.
    #[error("No se pudo completar la operación en la planilla remota: {0}")]
    RemotoFallido(String),
}

impl HorarioError {
    pub fn no_encontrado(entidad: &'static str, id: impl Into<String>) -> Self {
        HorarioError::NoEncontrado {
            entidad,
            id: id.into(),
        }
    }

    /// Código estable para respuestas JSON.
    pub fn codigo(&self) -> &'static str {
        match self {
            HorarioError::CampoRequerido(_)
            | HorarioError::GrupoRequerido(_)
            | HorarioError::DemasiadosSuplentes { .. }
            | HorarioError::DocenteRepetido(_)
            | HorarioError::CondicionTitularInvalida(_) => "validacion",
            HorarioError::Conflicto { .. } => "conflicto",
            HorarioError::ModuloRecreo(_) => "modulo_recreo",
            HorarioError::ModuloInexistente(_) => "modulo_inexistente",
            HorarioError::MismaCelda => "misma_celda",
            HorarioError::DestinoInvalido(_) => "destino_invalido",
            HorarioError::CeldaOcupada(_) => "celda_ocupada",
            HorarioError::SinCeldaEnEdicion => "sin_celda",
            HorarioError::NoEncontrado { .. } => "no_encontrado",
            HorarioError::VersionDesactualizada { .. } => "version_desactualizada",
            HorarioError::RemotoFallido(_) => "remoto_fallido",
        }
    }
}
