use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HorarioError;
use crate::models::{Dia, Grupo};

/// Celda abierta en el diálogo de edición.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CeldaEnEdicion {
    #[serde(rename = "diaIndex")]
    pub dia: Dia,
    pub modulo_id: String,
    pub grupo: Option<Grupo>,
    /// Bloque cargado en el formulario al abrir la celda, si había uno.
    pub bloque_id: Option<String>,
}

/// Identificador de destino de arrastre: `cell-{cursoId}-{diaIndex}-{moduloId}`.
/// El id de módulo puede contener guiones; el de curso no.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdCelda {
    pub curso_id: String,
    pub dia: Dia,
    pub modulo_id: String,
}

impl IdCelda {
    pub fn new(curso_id: impl Into<String>, dia: Dia, modulo_id: impl Into<String>) -> Self {
        Self {
            curso_id: curso_id.into(),
            dia,
            modulo_id: modulo_id.into(),
        }
    }
}

impl fmt::Display for IdCelda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell-{}-{}-{}", self.curso_id, self.dia.index(), self.modulo_id)
    }
}

impl FromStr for IdCelda {
    type Err = HorarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalido = || HorarioError::DestinoInvalido(s.to_string());
        let partes: Vec<&str> = s.splitn(4, '-').collect();
        if partes.len() < 4 || partes[0] != "cell" {
            return Err(invalido());
        }
        let dia = partes[2]
            .parse::<i64>()
            .ok()
            .and_then(Dia::desde_index)
            .ok_or_else(invalido)?;
        if partes[1].is_empty() || partes[3].is_empty() {
            return Err(invalido());
        }
        Ok(IdCelda::new(partes[1], dia, partes[3]))
    }
}

impl Serialize for IdCelda {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IdCelda {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
