//! Algoritmos puros sobre el conjunto de bloques.
//!
//! - `conflict`: verificación de doble asignación de docentes
//! - `horas`: parseo y formateo de horas "HH:MM"

pub mod conflict;
pub mod horas;

pub use conflict::{buscar_conflicto, dobles_asignaciones, Candidato, ConflictoDocente, PoliticaConflicto};
pub use horas::{hora_a_minutos, minutos_a_hora};
