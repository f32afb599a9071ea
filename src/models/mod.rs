// Estructuras de datos principales

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::HorarioError;

/// Máximo de suplentes que acompañan al docente a cargo en un bloque.
pub const MAX_SUPLENTES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Docente {
    #[serde(default)]
    pub id: String,
    pub nombre: String,
    pub apellido: String,
}

impl Docente {
    /// "García, C." tal como aparece en las celdas de la grilla.
    pub fn nombre_corto(&self) -> String {
        match self.nombre.chars().next() {
            Some(inicial) => format!("{}, {}.", self.apellido, inicial),
            None => self.apellido.clone(),
        }
    }

    pub fn nombre_completo(&self) -> String {
        format!("{}, {}", self.apellido, self.nombre)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Materia {
    #[serde(default)]
    pub id: String,
    pub nombre: String,
    /// Materia de taller: cada celda se divide en Grupo A y Grupo B.
    #[serde(default)]
    pub tiene_subgrupos: bool,
    #[serde(default)]
    pub docente_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Curso {
    #[serde(default)]
    pub id: String,
    /// Ej: "1° 1°"
    pub nombre: String,
    #[serde(default)]
    pub division: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoModulo {
    Clase,
    Recreo,
    Teoria,
    Taller,
}

impl TipoModulo {
    /// Los recreos no admiten bloques.
    pub fn es_asignable(self) -> bool {
        !matches!(self, TipoModulo::Recreo)
    }

    pub fn etiqueta(self) -> &'static str {
        match self {
            TipoModulo::Clase => "Clase",
            TipoModulo::Recreo => "Recreo",
            TipoModulo::Teoria => "Teoría",
            TipoModulo::Taller => "Taller",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modulo {
    #[serde(default)]
    pub id: String,
    pub numero: i32,
    pub hora_inicio: String,
    pub hora_fin: String,
    pub tipo: TipoModulo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etiqueta: Option<String>,
}

impl Modulo {
    pub fn es_recreo(&self) -> bool {
        !self.tipo.es_asignable()
    }

    /// "07:30 – 08:15"
    pub fn rango_horario(&self) -> String {
        format!("{} – {}", self.hora_inicio, self.hora_fin)
    }

    /// Texto de la primera columna: "Mód. 3" o la etiqueta del recreo.
    pub fn titulo(&self) -> String {
        if self.es_recreo() {
            self.etiqueta.clone().unwrap_or_else(|| "Recreo".to_string())
        } else {
            format!("Mód. {}", self.numero)
        }
    }
}

/// Situación de revista de un docente en una materia.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condicion {
    Titular,
    TitularInterino,
    Suplente,
    Provisional,
}

impl Condicion {
    pub const TODAS: [Condicion; 4] = [
        Condicion::Titular,
        Condicion::TitularInterino,
        Condicion::Suplente,
        Condicion::Provisional,
    ];

    pub fn etiqueta(self) -> &'static str {
        match self {
            Condicion::Titular => "Titular",
            Condicion::TitularInterino => "Titular Interino",
            Condicion::Suplente => "Suplente",
            Condicion::Provisional => "Provisional",
        }
    }

    /// Abreviatura usada en la planilla impresa.
    pub fn abreviatura(self) -> &'static str {
        match self {
            Condicion::Titular => "T",
            Condicion::TitularInterino => "T.I",
            Condicion::Suplente => "S",
            Condicion::Provisional => "P",
        }
    }

    pub fn clave(self) -> &'static str {
        match self {
            Condicion::Titular => "titular",
            Condicion::TitularInterino => "titular_interino",
            Condicion::Suplente => "suplente",
            Condicion::Provisional => "provisional",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocenteMateriaAsignacion {
    #[serde(default)]
    pub id: String,
    pub docente_id: String,
    pub materia_id: String,
    pub condicion: Condicion,
}

/// Día hábil de la semana; se serializa como índice (0 = Lunes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Dia {
    Lunes,
    Martes,
    Miercoles,
    Jueves,
    Viernes,
}

impl Dia {
    pub const TODOS: [Dia; 5] = [Dia::Lunes, Dia::Martes, Dia::Miercoles, Dia::Jueves, Dia::Viernes];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn desde_index(i: i64) -> Option<Dia> {
        match i {
            0 => Some(Dia::Lunes),
            1 => Some(Dia::Martes),
            2 => Some(Dia::Miercoles),
            3 => Some(Dia::Jueves),
            4 => Some(Dia::Viernes),
            _ => None,
        }
    }

    pub fn nombre(self) -> &'static str {
        match self {
            Dia::Lunes => "Lunes",
            Dia::Martes => "Martes",
            Dia::Miercoles => "Miércoles",
            Dia::Jueves => "Jueves",
            Dia::Viernes => "Viernes",
        }
    }
}

impl TryFrom<u8> for Dia {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Dia::desde_index(value as i64).ok_or_else(|| format!("diaIndex fuera de rango: {}", value))
    }
}

impl From<Dia> for u8 {
    fn from(d: Dia) -> u8 {
        d.index()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grupo {
    A,
    B,
}

impl Grupo {
    pub const AMBOS: [Grupo; 2] = [Grupo::A, Grupo::B];

    pub fn letra(self) -> &'static str {
        match self {
            Grupo::A => "A",
            Grupo::B => "B",
        }
    }
}

impl fmt::Display for Grupo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letra())
    }
}

/// Un docente dentro de un bloque. Sin `condicion` explícita, la condición se
/// toma de la tabla docente-materia.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocenteAsignacion {
    pub docente_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condicion: Option<Condicion>,
}

impl DocenteAsignacion {
    pub fn new(docente_id: impl Into<String>, condicion: Option<Condicion>) -> Self {
        Self {
            docente_id: docente_id.into(),
            condicion,
        }
    }
}

/// Docente a cargo más hasta dos suplentes, en orden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "DocentesBloqueSinValidar")]
pub struct DocentesBloque {
    titular: DocenteAsignacion,
    suplentes: Vec<DocenteAsignacion>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocentesBloqueSinValidar {
    titular: DocenteAsignacion,
    #[serde(default)]
    suplentes: Vec<DocenteAsignacion>,
}

impl TryFrom<DocentesBloqueSinValidar> for DocentesBloque {
    type Error = HorarioError;

    fn try_from(raw: DocentesBloqueSinValidar) -> Result<Self, Self::Error> {
        DocentesBloque::new(raw.titular, raw.suplentes)
    }
}

impl DocentesBloque {
    pub fn new(titular: DocenteAsignacion, suplentes: Vec<DocenteAsignacion>) -> Result<Self, HorarioError> {
        if titular.docente_id.trim().is_empty() {
            return Err(HorarioError::CampoRequerido("docente"));
        }
        if suplentes.len() > MAX_SUPLENTES {
            return Err(HorarioError::DemasiadosSuplentes { max: MAX_SUPLENTES });
        }
        let mut vistos: Vec<&str> = vec![titular.docente_id.as_str()];
        for s in &suplentes {
            if vistos.contains(&s.docente_id.as_str()) {
                return Err(HorarioError::DocenteRepetido(s.docente_id.clone()));
            }
            vistos.push(s.docente_id.as_str());
        }
        Ok(Self { titular, suplentes })
    }

    /// Bloque con un único docente y sin condición explícita.
    pub fn solo(docente_id: impl Into<String>) -> Self {
        Self {
            titular: DocenteAsignacion::new(docente_id, None),
            suplentes: Vec::new(),
        }
    }

    pub fn titular(&self) -> &DocenteAsignacion {
        &self.titular
    }

    pub fn suplentes(&self) -> &[DocenteAsignacion] {
        &self.suplentes
    }

    /// Titular primero, luego suplentes.
    pub fn todos(&self) -> impl Iterator<Item = &DocenteAsignacion> {
        std::iter::once(&self.titular).chain(self.suplentes.iter())
    }
}

/// Una clase asignada a una celda (curso, día, módulo, grupo).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bloque {
    pub id: String,
    pub curso_id: String,
    #[serde(rename = "diaIndex")]
    pub dia: Dia,
    pub modulo_id: String,
    pub materia_id: String,
    pub docentes: DocentesBloque,
    #[serde(default)]
    pub grupo: Option<Grupo>,
}

impl Bloque {
    pub fn titular_id(&self) -> &str {
        &self.docentes.titular().docente_id
    }

    pub fn docente_ids(&self) -> impl Iterator<Item = &str> {
        self.docentes.todos().map(|d| d.docente_id.as_str())
    }
}
