//! Altas, bajas y modificaciones de docentes, materias, cursos, módulos y
//! asignaciones docente-materia.
//!
//! Con planilla configurada: el alta es optimista (si la planilla falla se
//! conserva el registro local); modificación y baja exigen confirmación
//! remota y, si falla, el catálogo no cambia. Las bajas no propagan: los
//! bloques que referencian al registro borrado quedan colgando y las vistas
//! los muestran con "—".

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::HorarioError;
use crate::gateway::{wire, GatewayClient};
use crate::models::{Condicion, Curso, Docente, DocenteMateriaAsignacion, Materia, Modulo};
use crate::store::Catalogo;

pub trait Entidad: Clone + Serialize + DeserializeOwned + Sized {
    /// Nombre para mensajes ("Docente").
    const NOMBRE: &'static str;
    /// Sufijo de las acciones de la planilla (`create{ACCION}`).
    const ACCION: &'static str;
    const PREFIJO_ID: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn validar(&self) -> Result<(), HorarioError>;
    fn coleccion(c: &Catalogo) -> &[Self];
    fn coleccion_mut(c: &mut Catalogo) -> &mut Vec<Self>;
    fn desde_wire(v: &Value) -> Option<Self>;

    /// Ajustes del catálogo después de modificar la colección.
    fn despues_de_cambio(_c: &mut Catalogo) {}
}

fn requerido(valor: &str, campo: &'static str) -> Result<(), HorarioError> {
    if valor.trim().is_empty() {
        Err(HorarioError::CampoRequerido(campo))
    } else {
        Ok(())
    }
}

impl Entidad for Docente {
    const NOMBRE: &'static str = "Docente";
    const ACCION: &'static str = "Docente";
    const PREFIJO_ID: &'static str = "d_";

    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
    fn validar(&self) -> Result<(), HorarioError> {
        requerido(&self.nombre, "nombre")?;
        requerido(&self.apellido, "apellido")
    }
    fn coleccion(c: &Catalogo) -> &[Self] {
        &c.docentes
    }
    fn coleccion_mut(c: &mut Catalogo) -> &mut Vec<Self> {
        &mut c.docentes
    }
    fn desde_wire(v: &Value) -> Option<Self> {
        wire::docente_desde_wire(v)
    }
}

impl Entidad for Materia {
    const NOMBRE: &'static str = "Materia";
    const ACCION: &'static str = "Materia";
    const PREFIJO_ID: &'static str = "mat_";

    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
    fn validar(&self) -> Result<(), HorarioError> {
        requerido(&self.nombre, "nombre")
    }
    fn coleccion(c: &Catalogo) -> &[Self] {
        &c.materias
    }
    fn coleccion_mut(c: &mut Catalogo) -> &mut Vec<Self> {
        &mut c.materias
    }
    fn desde_wire(v: &Value) -> Option<Self> {
        wire::materia_desde_wire(v)
    }
}

impl Entidad for Curso {
    const NOMBRE: &'static str = "Curso";
    const ACCION: &'static str = "Curso";
    const PREFIJO_ID: &'static str = "c_";

    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
    fn validar(&self) -> Result<(), HorarioError> {
        requerido(&self.nombre, "nombre")
    }
    fn coleccion(c: &Catalogo) -> &[Self] {
        &c.cursos
    }
    fn coleccion_mut(c: &mut Catalogo) -> &mut Vec<Self> {
        &mut c.cursos
    }
    fn desde_wire(v: &Value) -> Option<Self> {
        wire::curso_desde_wire(v)
    }
}

impl Entidad for Modulo {
    const NOMBRE: &'static str = "Módulo";
    const ACCION: &'static str = "Modulo";
    const PREFIJO_ID: &'static str = "mod_";

    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
    fn validar(&self) -> Result<(), HorarioError> {
        requerido(&self.hora_inicio, "horaInicio")?;
        requerido(&self.hora_fin, "horaFin")
    }
    fn coleccion(c: &Catalogo) -> &[Self] {
        &c.modulos
    }
    fn coleccion_mut(c: &mut Catalogo) -> &mut Vec<Self> {
        &mut c.modulos
    }
    fn desde_wire(v: &Value) -> Option<Self> {
        wire::modulo_desde_wire(v)
    }
    /// La lista de módulos se mantiene ordenada por número y un módulo que
    /// pasó a ser recreo se queda sin clases.
    fn despues_de_cambio(c: &mut Catalogo) {
        c.modulos.sort_by_key(|m| m.numero);
        c.descartar_bloques_en_recreos();
    }
}

impl Entidad for DocenteMateriaAsignacion {
    const NOMBRE: &'static str = "Asignación";
    const ACCION: &'static str = "DocenteMateriaAsignacion";
    const PREFIJO_ID: &'static str = "dma_";

    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
    fn validar(&self) -> Result<(), HorarioError> {
        requerido(&self.docente_id, "docenteId")?;
        requerido(&self.materia_id, "materiaId")
    }
    fn coleccion(c: &Catalogo) -> &[Self] {
        &c.asignaciones
    }
    fn coleccion_mut(c: &mut Catalogo) -> &mut Vec<Self> {
        &mut c.asignaciones
    }
    fn desde_wire(v: &Value) -> Option<Self> {
        wire::asignacion_desde_wire(v)
    }
    /// `docenteIds` de cada materia refleja la tabla de asignaciones.
    fn despues_de_cambio(c: &mut Catalogo) {
        let asignaciones = &c.asignaciones;
        for m in c.materias.iter_mut() {
            m.docente_ids = asignaciones
                .iter()
                .filter(|a| a.materia_id == m.id)
                .map(|a| a.docente_id.clone())
                .fold(Vec::new(), |mut acc, d| {
                    if !acc.contains(&d) {
                        acc.push(d);
                    }
                    acc
                });
        }
    }
}

fn a_wire<E: Entidad>(e: &E) -> Result<Value, HorarioError> {
    serde_json::to_value(e).map_err(|err| HorarioError::RemotoFallido(err.to_string()))
}

pub fn nuevo_id<E: Entidad>() -> String {
    format!("{}{}", E::PREFIJO_ID, Uuid::new_v4().simple())
}

/// Alta. El id se genera acá; si la planilla devuelve el registro creado se
/// usa esa versión.
pub async fn crear<E: Entidad>(catalogo: &mut Catalogo, remoto: Option<&GatewayClient>, mut e: E) -> Result<E, HorarioError> {
    e.validar()?;
    e.set_id(nuevo_id::<E>());
    if let Some(cliente) = remoto {
        match cliente.crear(E::ACCION, a_wire(&e)?).await.as_ref().and_then(E::desde_wire) {
            Some(confirmado) => e = confirmado,
            None => warn!(entidad = E::NOMBRE, id = e.id(), "la planilla no confirmó el alta; se conserva el registro local"),
        }
    }
    E::coleccion_mut(catalogo).push(e.clone());
    E::despues_de_cambio(catalogo);
    info!(entidad = E::NOMBRE, id = e.id(), "alta");
    Ok(e)
}

pub async fn actualizar<E: Entidad>(
    catalogo: &mut Catalogo,
    remoto: Option<&GatewayClient>,
    id: &str,
    mut e: E,
) -> Result<E, HorarioError> {
    e.set_id(id.to_string());
    e.validar()?;
    let pos = E::coleccion(catalogo)
        .iter()
        .position(|x| x.id() == id)
        .ok_or_else(|| HorarioError::no_encontrado(E::NOMBRE, id))?;
    if let Some(cliente) = remoto {
        if cliente.actualizar(E::ACCION, a_wire(&e)?).await.is_none() {
            return Err(HorarioError::RemotoFallido(format!("update{} {}", E::ACCION, id)));
        }
    }
    E::coleccion_mut(catalogo)[pos] = e.clone();
    E::despues_de_cambio(catalogo);
    info!(entidad = E::NOMBRE, id, "modificación");
    Ok(e)
}

pub async fn eliminar<E: Entidad>(catalogo: &mut Catalogo, remoto: Option<&GatewayClient>, id: &str) -> Result<E, HorarioError> {
    let pos = E::coleccion(catalogo)
        .iter()
        .position(|x| x.id() == id)
        .ok_or_else(|| HorarioError::no_encontrado(E::NOMBRE, id))?;
    if let Some(cliente) = remoto {
        if !cliente.eliminar(E::ACCION, id).await {
            return Err(HorarioError::RemotoFallido(format!("delete{} {}", E::ACCION, id)));
        }
    }
    let e = E::coleccion_mut(catalogo).remove(pos);
    E::despues_de_cambio(catalogo);
    info!(entidad = E::NOMBRE, id, "baja");
    Ok(e)
}

/// Asigna un docente a una materia con una condición. Si el par ya existe,
/// cambia la condición.
pub async fn asignar(
    catalogo: &mut Catalogo,
    remoto: Option<&GatewayClient>,
    docente_id: &str,
    materia_id: &str,
    condicion: Condicion,
) -> Result<DocenteMateriaAsignacion, HorarioError> {
    if catalogo.docente(docente_id).is_none() {
        return Err(HorarioError::no_encontrado("Docente", docente_id));
    }
    if catalogo.materia(materia_id).is_none() {
        return Err(HorarioError::no_encontrado("Materia", materia_id));
    }
    let existente = catalogo
        .asignaciones
        .iter()
        .find(|a| a.docente_id == docente_id && a.materia_id == materia_id)
        .cloned();
    match existente {
        Some(a) => {
            let id = a.id.clone();
            actualizar(catalogo, remoto, &id, DocenteMateriaAsignacion { condicion, ..a }).await
        }
        None => {
            let nueva = DocenteMateriaAsignacion {
                id: String::new(),
                docente_id: docente_id.to_string(),
                materia_id: materia_id.to_string(),
                condicion,
            };
            crear(catalogo, remoto, nueva).await
        }
    }
}

pub async fn desasignar(
    catalogo: &mut Catalogo,
    remoto: Option<&GatewayClient>,
    asignacion_id: &str,
) -> Result<DocenteMateriaAsignacion, HorarioError> {
    eliminar(catalogo, remoto, asignacion_id).await
}
