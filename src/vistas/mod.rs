//! Proyecciones de sólo lectura sobre el catálogo: vista por docente,
//! estadísticas y planilla imprimible. Todas son funciones puras.

pub mod docente;
pub mod estadisticas;
pub mod imprimible;

use serde::Serialize;

use crate::models::{Bloque, Condicion, Grupo};
use crate::store::Catalogo;

pub use docente::{vista_docente, VistaDocente};
pub use estadisticas::{estadisticas, Estadisticas};
pub use imprimible::render_html;

/// Marcador para referencias colgantes (materia o docente eliminados).
pub const SIN_DATO: &str = "—";
pub const SIN_CONDICION: &str = "Sin especificar";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VistaDocenteBloque {
    pub docente_id: String,
    pub nombre: String,
    pub condicion: Option<Condicion>,
    pub condicion_etiqueta: String,
}

/// Un bloque listo para mostrar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VistaBloque {
    pub bloque_id: String,
    pub materia: String,
    pub titular: VistaDocenteBloque,
    pub suplentes: Vec<VistaDocenteBloque>,
    pub grupo: Option<Grupo>,
}

fn describir_docente(catalogo: &Catalogo, docente_id: &str, explicita: Option<Condicion>, materia_id: &str) -> VistaDocenteBloque {
    let condicion = explicita.or_else(|| catalogo.condicion_de(docente_id, materia_id));
    VistaDocenteBloque {
        docente_id: docente_id.to_string(),
        nombre: catalogo
            .docente(docente_id)
            .map(|d| d.nombre_corto())
            .unwrap_or_else(|| SIN_DATO.to_string()),
        condicion,
        condicion_etiqueta: condicion.map(|c| c.etiqueta()).unwrap_or(SIN_CONDICION).to_string(),
    }
}

/// Resuelve nombres y condiciones. La condición que no está en el bloque se
/// busca en la tabla docente-materia; si tampoco está, queda sin especificar.
pub fn describir_bloque(catalogo: &Catalogo, b: &Bloque) -> VistaBloque {
    let titular = b.docentes.titular();
    VistaBloque {
        bloque_id: b.id.clone(),
        materia: catalogo
            .materia(&b.materia_id)
            .map(|m| m.nombre.clone())
            .unwrap_or_else(|| SIN_DATO.to_string()),
        titular: describir_docente(catalogo, &titular.docente_id, titular.condicion, &b.materia_id),
        suplentes: b
            .docentes
            .suplentes()
            .iter()
            .map(|s| describir_docente(catalogo, &s.docente_id, s.condicion, &b.materia_id))
            .collect(),
        grupo: b.grupo,
    }
}

/// Texto de celda para exportar: "Materia\nApellido, N." y el grupo si hay.
pub fn texto_celda(v: &VistaBloque) -> String {
    let mut s = format!("{}\n{}", v.materia, v.titular.nombre);
    if let Some(g) = v.grupo {
        s.push_str(&format!("\nGrupo {}", g));
    }
    s
}
