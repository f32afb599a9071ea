//! Catálogo en memoria: la copia confirmada de las seis colecciones.
//!
//! Cada curso lleva un número de versión que avanza con cada confirmación;
//! las sesiones de edición guardan la versión con la que empezaron y el
//! catálogo rechaza confirmaciones hechas sobre una versión vieja.

pub mod demo;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::algorithm::hora_a_minutos;
use crate::error::HorarioError;
use crate::gateway::normalizar::resolver_modulo_id;
use crate::models::*;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalogo {
    pub docentes: Vec<Docente>,
    pub materias: Vec<Materia>,
    pub cursos: Vec<Curso>,
    pub modulos: Vec<Modulo>,
    pub asignaciones: Vec<DocenteMateriaAsignacion>,
    pub bloques: Vec<Bloque>,
    #[serde(skip)]
    versiones: HashMap<String, u64>,
}

impl Catalogo {
    pub fn new(
        docentes: Vec<Docente>,
        materias: Vec<Materia>,
        cursos: Vec<Curso>,
        modulos: Vec<Modulo>,
        asignaciones: Vec<DocenteMateriaAsignacion>,
        bloques: Vec<Bloque>,
    ) -> Self {
        let mut c = Catalogo {
            docentes,
            materias,
            cursos,
            modulos,
            asignaciones,
            bloques,
            versiones: HashMap::new(),
        };
        c.normalizar_bloques();
        c
    }

    /// Conjunto fijo de ejemplo.
    pub fn demo() -> Self {
        Catalogo::new(
            demo::docentes(),
            demo::materias(),
            demo::cursos(),
            demo::modulos(),
            demo::asignaciones(),
            demo::bloques(),
        )
    }

    /// Lleva el `moduloId` de cada bloque al id canónico del módulo y descarta
    /// los bloques que apuntan a un recreo. Los ids que no se pueden resolver
    /// se conservan tal cual.
    pub fn normalizar_bloques(&mut self) {
        let modulos = &self.modulos;
        let antes = self.bloques.len();
        self.bloques.retain_mut(|b| match resolver_modulo_id(&b.modulo_id, modulos) {
            Some(m) if m.es_recreo() => false,
            Some(m) => {
                if m.id != b.modulo_id {
                    debug!(bloque = %b.id, de = %b.modulo_id, a = %m.id, "moduloId normalizado");
                    b.modulo_id = m.id.clone();
                }
                true
            }
            None => true,
        });
        let descartados = antes - self.bloques.len();
        if descartados > 0 {
            warn!(descartados, "bloques asignados a recreos descartados");
        }
    }

    /// `normalizar_bloques` sobre el catálogo confirmado: los cursos que
    /// pierden bloques avanzan de versión, así ninguna sesión abierta los
    /// vuelve a confirmar sobre un recreo.
    pub fn descartar_bloques_en_recreos(&mut self) -> usize {
        let antes: Vec<(String, String)> = self.bloques.iter().map(|b| (b.id.clone(), b.curso_id.clone())).collect();
        self.normalizar_bloques();
        let quedan: HashSet<&str> = self.bloques.iter().map(|b| b.id.as_str()).collect();
        let mut cursos: HashSet<String> = HashSet::new();
        let mut descartados = 0;
        for (id, curso) in antes {
            if !quedan.contains(id.as_str()) {
                descartados += 1;
                cursos.insert(curso);
            }
        }
        for curso in cursos {
            *self.versiones.entry(curso).or_insert(0) += 1;
        }
        descartados
    }

    pub fn docente(&self, id: &str) -> Option<&Docente> {
        self.docentes.iter().find(|d| d.id == id)
    }

    pub fn materia(&self, id: &str) -> Option<&Materia> {
        self.materias.iter().find(|m| m.id == id)
    }

    pub fn curso(&self, id: &str) -> Option<&Curso> {
        self.cursos.iter().find(|c| c.id == id)
    }

    pub fn modulo(&self, id: &str) -> Option<&Modulo> {
        self.modulos.iter().find(|m| m.id == id)
    }

    /// Búsqueda tolerante (espacios, número ordinal, prefijo `mod`).
    pub fn resolver_modulo(&self, id: &str) -> Option<&Modulo> {
        resolver_modulo_id(id, &self.modulos)
    }

    /// Condición del docente en la materia según la tabla docente-materia.
    pub fn condicion_de(&self, docente_id: &str, materia_id: &str) -> Option<Condicion> {
        self.asignaciones
            .iter()
            .find(|a| a.docente_id == docente_id && a.materia_id == materia_id)
            .map(|a| a.condicion)
    }

    /// Docentes habilitados para una materia (los que tienen asignación).
    pub fn docentes_de_materia(&self, materia_id: &str) -> Vec<&Docente> {
        self.docentes
            .iter()
            .filter(|d| self.asignaciones.iter().any(|a| a.docente_id == d.id && a.materia_id == materia_id))
            .collect()
    }

    /// Módulos por hora de inicio; los que no tienen hora legible van al final
    /// ordenados por número.
    pub fn modulos_ordenados(&self) -> Vec<&Modulo> {
        let mut v: Vec<&Modulo> = self.modulos.iter().collect();
        v.sort_by_key(|m| (hora_a_minutos(&m.hora_inicio).unwrap_or(i32::MAX), m.numero));
        v
    }

    pub fn bloques_de_curso(&self, curso_id: &str) -> Vec<&Bloque> {
        self.bloques.iter().filter(|b| b.curso_id == curso_id).collect()
    }

    pub fn version_curso(&self, curso_id: &str) -> u64 {
        self.versiones.get(curso_id).copied().unwrap_or(0)
    }

    /// Reemplaza los bloques confirmados del curso. Falla si otra sesión
    /// confirmó el curso después de `version_base`.
    pub fn confirmar_curso(&mut self, curso_id: &str, bloques: Vec<Bloque>, version_base: u64) -> Result<u64, HorarioError> {
        let actual = self.version_curso(curso_id);
        if actual != version_base {
            return Err(HorarioError::VersionDesactualizada {
                curso_id: curso_id.to_string(),
                esperada: version_base,
                actual,
            });
        }
        self.bloques.retain(|b| b.curso_id != curso_id);
        self.bloques.extend(bloques.into_iter().filter(|b| b.curso_id == curso_id));
        let nueva = actual + 1;
        self.versiones.insert(curso_id.to_string(), nueva);
        info!(curso = %curso_id, version = nueva, "horario del curso confirmado");
        Ok(nueva)
    }

    /// Sustituye todo el contenido por un catálogo recargado. Los cursos cuyo
    /// horario cambió avanzan de versión, así las sesiones abiertas no pisan
    /// datos más nuevos.
    pub fn reemplazar(&mut self, nuevo: Catalogo) {
        let mut versiones = std::mem::take(&mut self.versiones);
        let cursos: HashSet<&str> = self
            .bloques
            .iter()
            .chain(nuevo.bloques.iter())
            .map(|b| b.curso_id.as_str())
            .collect();
        for curso in cursos {
            let antes: Vec<&Bloque> = self.bloques.iter().filter(|b| b.curso_id == curso).collect();
            let despues: Vec<&Bloque> = nuevo.bloques.iter().filter(|b| b.curso_id == curso).collect();
            if antes != despues {
                *versiones.entry(curso.to_string()).or_insert(0) += 1;
            }
        }
        *self = Catalogo { versiones, ..nuevo };
    }
}
