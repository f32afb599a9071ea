use serde::{Deserialize, Serialize};

use crate::error::HorarioError;
use crate::models::{Bloque, Condicion, DocenteAsignacion, DocentesBloque, Grupo};

/// Campos del diálogo de asignación de una celda.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormularioCelda {
    #[serde(default)]
    pub materia_id: String,
    #[serde(default)]
    pub titular_id: String,
    /// Sólo titular o provisional; vacío = tomar de la tabla docente-materia.
    #[serde(default)]
    pub condicion_titular: Option<Condicion>,
    #[serde(default)]
    pub suplentes: Vec<String>,
    #[serde(default)]
    pub grupo: Option<Grupo>,
}

impl FormularioCelda {
    pub fn desde_bloque(b: &Bloque) -> Self {
        let condicion_titular = b
            .docentes
            .titular()
            .condicion
            .filter(|c| matches!(c, Condicion::Titular | Condicion::Provisional));
        FormularioCelda {
            materia_id: b.materia_id.clone(),
            titular_id: b.titular_id().to_string(),
            condicion_titular,
            suplentes: b.docentes.suplentes().iter().map(|s| s.docente_id.clone()).collect(),
            grupo: b.grupo,
        }
    }

    /// Arma los docentes del bloque validando titular, condición y suplentes.
    /// Los suplentes conservan la condición que ya tenían en `anterior`.
    pub fn docentes(&self, anterior: Option<&DocentesBloque>) -> Result<DocentesBloque, HorarioError> {
        let titular_id = self.titular_id.trim();
        if titular_id.is_empty() {
            return Err(HorarioError::CampoRequerido("docente"));
        }
        if let Some(c) = self.condicion_titular {
            if !matches!(c, Condicion::Titular | Condicion::Provisional) {
                return Err(HorarioError::CondicionTitularInvalida(c.clave().to_string()));
            }
        }
        let suplentes = self
            .suplentes
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| {
                let previa = anterior
                    .and_then(|d| d.suplentes().iter().find(|x| x.docente_id == s))
                    .and_then(|x| x.condicion);
                DocenteAsignacion::new(s, previa)
            })
            .collect();
        DocentesBloque::new(DocenteAsignacion::new(titular_id, self.condicion_titular), suplentes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rechaza_condicion_suplente_para_el_titular() {
        let f = FormularioCelda {
            materia_id: "mat1".into(),
            titular_id: "d1".into(),
            condicion_titular: Some(Condicion::Suplente),
            ..Default::default()
        };
        assert_eq!(f.docentes(None).unwrap_err().codigo(), "validacion");
    }

    #[test]
    fn ignora_suplentes_vacios() {
        let f = FormularioCelda {
            titular_id: "d1".into(),
            suplentes: vec!["".into(), "d2".into()],
            ..Default::default()
        };
        let d = f.docentes(None).unwrap();
        assert_eq!(d.suplentes().len(), 1);
    }
}
