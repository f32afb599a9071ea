//! Editor de la grilla de horarios de un curso.
//!
//! Trabaja sobre una copia de todos los bloques (de todos los cursos, para
//! poder detectar conflictos entre cursos). Nada se persiste hasta
//! `guardar_todo`/`confirmar`. Toda validación ocurre antes de mutar: ante un
//! error la copia de trabajo queda exactamente como estaba.

mod celda;
mod formulario;
mod grilla;

pub use celda::{CeldaEnEdicion, IdCelda};
pub use formulario::FormularioCelda;
pub use grilla::{CeldaGrilla, EspacioGrupo, FilaGrilla, Grilla};

use std::collections::HashMap;
use std::future::Future;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::algorithm::{buscar_conflicto, Candidato, PoliticaConflicto};
use crate::error::HorarioError;
use crate::gateway::normalizar::modulo_ids_equivalentes;
use crate::models::{Bloque, Dia, Docente, Grupo, Modulo};
use crate::store::Catalogo;

pub const MENSAJE_CONFLICTO_CELDA: &str = "El docente ya tiene asignada otra clase en este módulo y día.";

/// Destino del "guardar todo": recibe el conjunto completo de bloques del curso.
pub trait AlmacenHorarios {
    fn guardar_horario(&self, curso_id: &str, bloques: &[Bloque]) -> impl Future<Output = bool> + Send;
}

/// Almacén sin planilla remota: siempre acepta.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlmacenLocal;

impl AlmacenHorarios for AlmacenLocal {
    async fn guardar_horario(&self, curso_id: &str, bloques: &[Bloque]) -> bool {
        debug!(curso = %curso_id, cantidad = bloques.len(), "guardado local");
        true
    }
}

type HookGuardado = Box<dyn FnMut(&str) + Send>;

pub struct EditorHorarios {
    catalogo: Catalogo,
    bloques: Vec<Bloque>,
    curso_id: String,
    celda: Option<CeldaEnEdicion>,
    pub formulario: FormularioCelda,
    mensaje_conflicto: Option<String>,
    politica: PoliticaConflicto,
    on_guardado: Option<HookGuardado>,
    versiones_base: HashMap<String, u64>,
}

fn nuevo_id_bloque() -> String {
    format!("b_{}", Uuid::new_v4().simple())
}

/// Un bloque con `grupo` puede convivir en la celda con otro del grupo
/// contrario; uno sin grupo no convive con nada.
fn ocupa(grupo: Option<Grupo>, otro: &Bloque) -> bool {
    match (grupo, otro.grupo) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

impl EditorHorarios {
    /// Toma una instantánea del catálogo. Sin `curso_id` se elige el primer curso.
    pub fn nuevo(catalogo: &Catalogo, curso_id: Option<&str>, politica: PoliticaConflicto) -> Self {
        let mut snapshot = catalogo.clone();
        let bloques = std::mem::take(&mut snapshot.bloques);
        let curso_id = curso_id
            .map(str::to_string)
            .or_else(|| snapshot.cursos.first().map(|c| c.id.clone()))
            .unwrap_or_default();
        let versiones_base = snapshot
            .cursos
            .iter()
            .map(|c| (c.id.clone(), catalogo.version_curso(&c.id)))
            .collect();
        EditorHorarios {
            catalogo: snapshot,
            bloques,
            curso_id,
            celda: None,
            formulario: FormularioCelda::default(),
            mensaje_conflicto: None,
            politica,
            on_guardado: None,
            versiones_base,
        }
    }

    /// Se invoca con el id del curso después de cada guardado exitoso.
    pub fn set_on_guardado(&mut self, hook: impl FnMut(&str) + Send + 'static) {
        self.on_guardado = Some(Box::new(hook));
    }

    pub fn curso_id(&self) -> &str {
        &self.curso_id
    }

    pub fn celda(&self) -> Option<&CeldaEnEdicion> {
        self.celda.as_ref()
    }

    pub fn mensaje_conflicto(&self) -> Option<&str> {
        self.mensaje_conflicto.as_deref()
    }

    pub fn descartar_mensaje(&mut self) {
        self.mensaje_conflicto = None;
    }

    pub fn politica(&self) -> PoliticaConflicto {
        self.politica
    }

    /// Copia de trabajo completa (todos los cursos).
    pub fn bloques(&self) -> &[Bloque] {
        &self.bloques
    }

    pub fn bloques_del_curso(&self) -> Vec<Bloque> {
        self.bloques
            .iter()
            .filter(|b| b.curso_id == self.curso_id)
            .cloned()
            .collect()
    }

    pub fn seleccionar_curso(&mut self, curso_id: &str) -> Result<(), HorarioError> {
        if self.catalogo.curso(curso_id).is_none() {
            return Err(HorarioError::no_encontrado("Curso", curso_id));
        }
        self.curso_id = curso_id.to_string();
        self.cerrar_celda();
        self.mensaje_conflicto = None;
        Ok(())
    }

    /// Bloques del curso seleccionado en una celda, ordenados por grupo. El id
    /// de módulo se compara de forma tolerante (espacios, prefijo `mod`).
    pub fn bloques_en_celda(&self, dia: Dia, modulo_id: &str) -> Vec<&Bloque> {
        let mut v: Vec<&Bloque> = self
            .bloques
            .iter()
            .filter(|b| b.curso_id == self.curso_id && b.dia == dia && modulo_ids_equivalentes(&b.modulo_id, modulo_id))
            .collect();
        v.sort_by_key(|b| b.grupo);
        v
    }

    fn modulo_asignable(&self, modulo_id: &str) -> Result<&Modulo, HorarioError> {
        let m = self
            .catalogo
            .resolver_modulo(modulo_id)
            .ok_or_else(|| HorarioError::ModuloInexistente(modulo_id.to_string()))?;
        if m.es_recreo() {
            return Err(HorarioError::ModuloRecreo(m.id.clone()));
        }
        Ok(m)
    }

    /// Abre el diálogo de una celda. Con `grupo` se carga el bloque de ese
    /// grupo; sin él, el primero de la celda.
    pub fn abrir_celda(&mut self, dia: Dia, modulo_id: &str, grupo: Option<Grupo>) -> Result<&FormularioCelda, HorarioError> {
        let modulo_id = self.modulo_asignable(modulo_id)?.id.clone();
        let en_celda = self.bloques_en_celda(dia, &modulo_id);
        let existente = match grupo {
            Some(g) => en_celda
                .iter()
                .find(|b| b.grupo == Some(g))
                .or_else(|| en_celda.iter().find(|b| b.grupo.is_none())),
            None => en_celda.first(),
        }
        .copied();

        let formulario = match existente {
            Some(b) => FormularioCelda::desde_bloque(b),
            None => FormularioCelda {
                grupo,
                ..Default::default()
            },
        };
        let celda = CeldaEnEdicion {
            dia,
            modulo_id,
            grupo: existente.and_then(|b| b.grupo).or(grupo),
            bloque_id: existente.map(|b| b.id.clone()),
        };
        debug!(?celda, "celda abierta");
        self.celda = Some(celda);
        self.formulario = formulario;
        self.mensaje_conflicto = None;
        Ok(&self.formulario)
    }

    pub fn cerrar_celda(&mut self) {
        self.celda = None;
        self.formulario = FormularioCelda::default();
    }

    /// Docentes que se ofrecen en el formulario: los asignados a la materia
    /// elegida, o todos si todavía no hay materia.
    pub fn docentes_disponibles(&self) -> Vec<&Docente> {
        if self.formulario.materia_id.is_empty() {
            self.catalogo.docentes.iter().collect()
        } else {
            self.catalogo.docentes_de_materia(&self.formulario.materia_id)
        }
    }

    /// Valida el formulario, verifica conflictos y crea o reemplaza el bloque.
    /// El id se conserva al editar; los bloques del otro grupo no se tocan.
    pub fn guardar_celda(&mut self) -> Result<Bloque, HorarioError> {
        let celda = self.celda.clone().ok_or(HorarioError::SinCeldaEnEdicion)?;
        let f = &self.formulario;

        if f.materia_id.trim().is_empty() {
            return Err(HorarioError::CampoRequerido("materia"));
        }
        let materia = self
            .catalogo
            .materia(f.materia_id.trim())
            .ok_or_else(|| HorarioError::no_encontrado("Materia", f.materia_id.trim()))?;
        if f.titular_id.trim().is_empty() {
            return Err(HorarioError::CampoRequerido("docente"));
        }
        if self.catalogo.docente(f.titular_id.trim()).is_none() {
            return Err(HorarioError::no_encontrado("Docente", f.titular_id.trim()));
        }
        let grupo = if materia.tiene_subgrupos {
            Some(f.grupo.or(celda.grupo).ok_or_else(|| HorarioError::GrupoRequerido(materia.nombre.clone()))?)
        } else {
            None
        };

        let en_celda = self.bloques_en_celda(celda.dia, &celda.modulo_id);
        let reemplazado: Option<&Bloque> = celda
            .bloque_id
            .as_deref()
            .and_then(|id| en_celda.iter().find(|b| b.id == id))
            .or_else(|| en_celda.iter().find(|b| b.grupo == grupo))
            .copied();
        if let Some(ocupante) = en_celda
            .iter()
            .filter(|b| reemplazado.is_none_or(|r| r.id != b.id))
            .find(|b| ocupa(grupo, b))
        {
            return Err(HorarioError::CeldaOcupada(format!(
                "{} {} ya tiene el bloque {}",
                celda.dia.nombre(),
                celda.modulo_id,
                ocupante.id
            )));
        }

        let docentes = f.docentes(reemplazado.map(|b| &b.docentes))?;
        let nuevo = Bloque {
            id: reemplazado.map(|b| b.id.clone()).unwrap_or_else(nuevo_id_bloque),
            curso_id: self.curso_id.clone(),
            dia: celda.dia,
            modulo_id: celda.modulo_id.clone(),
            materia_id: materia.id.clone(),
            docentes,
            grupo,
        };

        if let Some(c) = buscar_conflicto(
            &self.bloques,
            Candidato {
                bloque: &nuevo,
                dia: nuevo.dia,
                modulo_id: &nuevo.modulo_id,
            },
            reemplazado.map(|b| b.id.as_str()),
            self.politica,
        ) {
            let docente_id = c.docente_id.to_string();
            warn!(docente = %docente_id, bloque = %c.bloque.id, "conflicto al guardar celda");
            self.mensaje_conflicto = Some(MENSAJE_CONFLICTO_CELDA.to_string());
            return Err(HorarioError::Conflicto {
                docente_id,
                mensaje: MENSAJE_CONFLICTO_CELDA.to_string(),
            });
        }

        match self.bloques.iter().position(|b| b.id == nuevo.id) {
            Some(i) => self.bloques[i] = nuevo.clone(),
            None => self.bloques.push(nuevo.clone()),
        }
        debug!(bloque = %nuevo.id, "celda guardada");
        self.mensaje_conflicto = None;
        self.cerrar_celda();
        Ok(nuevo)
    }

    /// Quita un bloque de la copia de trabajo; se persiste con el próximo guardado.
    pub fn quitar_bloque(&mut self, bloque_id: &str) -> Result<Bloque, HorarioError> {
        let i = self
            .bloques
            .iter()
            .position(|b| b.id == bloque_id)
            .ok_or_else(|| HorarioError::no_encontrado("Bloque", bloque_id))?;
        Ok(self.bloques.remove(i))
    }

    /// Arrastre de un bloque a otra celda del mismo curso. Cambia día y módulo
    /// del bloque en su lugar (mismo id).
    pub fn mover(&mut self, bloque_id: &str, destino: &str) -> Result<(), HorarioError> {
        let idx = self
            .bloques
            .iter()
            .position(|b| b.id == bloque_id)
            .ok_or_else(|| HorarioError::no_encontrado("Bloque", bloque_id))?;
        let destino: IdCelda = destino.parse()?;
        let origen = &self.bloques[idx];
        if destino.curso_id != origen.curso_id {
            return Err(HorarioError::DestinoInvalido(format!(
                "el bloque pertenece al curso {} y no puede moverse a {}",
                origen.curso_id, destino.curso_id
            )));
        }
        let modulo_id = self.modulo_asignable(&destino.modulo_id)?.id.clone();
        let origen = &self.bloques[idx];
        if origen.dia == destino.dia && modulo_ids_equivalentes(&origen.modulo_id, &modulo_id) {
            return Err(HorarioError::MismaCelda);
        }

        if let Some(c) = buscar_conflicto(
            &self.bloques,
            Candidato {
                bloque: origen,
                dia: destino.dia,
                modulo_id: &modulo_id,
            },
            Some(bloque_id),
            self.politica,
        ) {
            let docente_id = c.docente_id.to_string();
            let nombre = self
                .catalogo
                .docente(&docente_id)
                .map(|d| d.apellido.clone())
                .unwrap_or_else(|| docente_id.clone());
            let mensaje = format!("Conflicto: {} ya tiene clase en ese módulo.", nombre);
            warn!(docente = %docente_id, bloque = %bloque_id, "conflicto al mover bloque");
            self.mensaje_conflicto = Some(mensaje.clone());
            return Err(HorarioError::Conflicto { docente_id, mensaje });
        }

        let grupo = origen.grupo;
        if let Some(ocupante) = self
            .bloques
            .iter()
            .filter(|b| {
                b.id != bloque_id
                    && b.curso_id == destino.curso_id
                    && b.dia == destino.dia
                    && modulo_ids_equivalentes(&b.modulo_id, &modulo_id)
            })
            .find(|b| ocupa(grupo, b))
        {
            return Err(HorarioError::CeldaOcupada(format!("{} ya ocupa {}", ocupante.id, destino)));
        }

        let b = &mut self.bloques[idx];
        b.dia = destino.dia;
        b.modulo_id = modulo_id;
        debug!(bloque = %bloque_id, destino = %destino, "bloque movido");
        self.mensaje_conflicto = None;
        Ok(())
    }

    /// Envía todos los bloques del curso seleccionado como reemplazo completo.
    /// Si falla, la copia de trabajo queda intacta y no se avisa al host.
    pub async fn guardar_todo<A: AlmacenHorarios>(&mut self, almacen: &A) -> bool {
        let bloques = self.bloques_del_curso();
        let ok = almacen.guardar_horario(&self.curso_id, &bloques).await;
        if ok {
            info!(curso = %self.curso_id, cantidad = bloques.len(), "horario guardado");
            self.notificar_guardado();
        } else {
            warn!(curso = %self.curso_id, "no se pudo guardar el horario");
        }
        ok
    }

    /// Guardado con control de versión: verifica que nadie haya confirmado el
    /// curso desde que empezó la sesión y que sus docentes sigan libres en los
    /// horarios confirmados de los demás cursos. Lo envía al almacén y recién
    /// entonces lo confirma en el catálogo.
    pub async fn confirmar<A: AlmacenHorarios>(&mut self, catalogo: &mut Catalogo, almacen: &A) -> Result<u64, HorarioError> {
        let base = self.version_base(&self.curso_id);
        let actual = catalogo.version_curso(&self.curso_id);
        if actual != base {
            return Err(HorarioError::VersionDesactualizada {
                curso_id: self.curso_id.clone(),
                esperada: base,
                actual,
            });
        }
        let bloques = self.bloques_del_curso();
        // la copia de trabajo puede ser vieja para los otros cursos
        let ajenos: Vec<Bloque> = catalogo
            .bloques
            .iter()
            .filter(|b| b.curso_id != self.curso_id)
            .cloned()
            .collect();
        for b in &bloques {
            let candidato = Candidato {
                bloque: b,
                dia: b.dia,
                modulo_id: &b.modulo_id,
            };
            if let Some(c) = buscar_conflicto(&ajenos, candidato, None, self.politica) {
                let docente_id = c.docente_id.to_string();
                warn!(docente = %docente_id, bloque = %b.id, otro = %c.bloque.id, "conflicto con un horario ya confirmado");
                self.mensaje_conflicto = Some(MENSAJE_CONFLICTO_CELDA.to_string());
                return Err(HorarioError::Conflicto {
                    docente_id,
                    mensaje: MENSAJE_CONFLICTO_CELDA.to_string(),
                });
            }
        }
        if !almacen.guardar_horario(&self.curso_id, &bloques).await {
            return Err(HorarioError::RemotoFallido(format!("saveBloques del curso {}", self.curso_id)));
        }
        let nueva = catalogo.confirmar_curso(&self.curso_id, bloques, base)?;
        self.versiones_base.insert(self.curso_id.clone(), nueva);
        self.notificar_guardado();
        Ok(nueva)
    }

    pub fn version_base(&self, curso_id: &str) -> u64 {
        self.versiones_base.get(curso_id).copied().unwrap_or(0)
    }

    fn notificar_guardado(&mut self) {
        if let Some(hook) = self.on_guardado.as_mut() {
            hook(&self.curso_id);
        }
    }

    /// Modelo de render del curso seleccionado.
    pub fn grilla(&self) -> Grilla {
        grilla::construir(&self.catalogo, &self.curso_id, |dia, modulo_id| self.bloques_en_celda(dia, modulo_id))
    }
}
