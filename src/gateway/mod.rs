//! Cliente de la planilla remota (Apps Script publicado como web app).
//!
//! GET con `?action=…` para lecturas y POST `{action, …}` para escrituras. Los
//! errores de transporte no salen de este módulo: las lecturas devuelven
//! `None` y el llamador usa los datos de ejemplo o los que ya tenía; las
//! escrituras devuelven `false`/`None`.

pub mod normalizar;
pub mod wire;

use serde_json::{json, Map, Value};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::editor::AlmacenHorarios;
use crate::models::{Bloque, Curso, Docente, DocenteMateriaAsignacion, Materia, Modulo};
use crate::store::{demo, Catalogo};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("error de red: {0}")]
    Transporte(#[from] reqwest::Error),
    #[error("la planilla respondió con estado {0}")]
    Estado(reqwest::StatusCode),
    #[error("respuesta no es JSON válido: {0}")]
    Decodificacion(#[from] serde_json::Error),
    #[error("la planilla devolvió un error: {0}")]
    Remoto(String),
    #[error("la respuesta no tiene la forma esperada para {0}")]
    Forma(&'static str),
}

/// Cómo se codifica el cuerpo de los POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatoPost {
    /// `{"action": …, …campos}` como JSON.
    #[default]
    Json,
    /// `action=…&body=<json>` como formulario; evita el preflight CORS.
    Formulario,
}

impl FromStr for FormatoPost {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(FormatoPost::Json),
            "form" | "formulario" => Ok(FormatoPost::Formulario),
            otro => Err(format!("formato de POST desconocido: '{}' (use json|form)", otro)),
        }
    }
}

/// Tope por pedido. Los handlers esperan a la planilla con locks tomados.
pub const TIMEOUT_PLANILLA: Duration = Duration::from_secs(20);

#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    url: String,
    formato: FormatoPost,
    timeout: Duration,
}

impl GatewayClient {
    pub fn new(url: impl Into<String>, formato: FormatoPost) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            formato,
            timeout: TIMEOUT_PLANILLA,
        }
    }

    pub fn con_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Decodifica el cuerpo y convierte `{error: …}` en `GatewayError::Remoto`.
    async fn decodificar(resp: reqwest::Response) -> Result<Value, GatewayError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(GatewayError::Estado(status));
        }
        let texto = resp.text().await?;
        let valor: Value = serde_json::from_str(&texto)?;
        if let Some(err) = valor.get("error").filter(|e| !e.is_null()) {
            let msg = err.as_str().map(str::to_string).unwrap_or_else(|| err.to_string());
            return Err(GatewayError::Remoto(msg));
        }
        Ok(valor)
    }

    pub async fn pedir(&self, action: &str, params: &[(&str, &str)]) -> Result<Value, GatewayError> {
        let mut query: Vec<(&str, &str)> = vec![("action", action)];
        query.extend_from_slice(params);
        debug!(action, "GET planilla");
        let resp = self
            .http
            .get(&self.url)
            .query(&query)
            .timeout(self.timeout)
            .send()
            .await?;
        Self::decodificar(resp).await
    }

    pub async fn enviar(&self, action: &str, body: Value) -> Result<Value, GatewayError> {
        debug!(action, formato = ?self.formato, "POST planilla");
        let req = match self.formato {
            FormatoPost::Json => {
                let mut obj = match body {
                    Value::Object(m) => m,
                    _ => Map::new(),
                };
                obj.insert("action".to_string(), json!(action));
                self.http.post(&self.url).json(&Value::Object(obj))
            }
            FormatoPost::Formulario => {
                let cuerpo = body.to_string();
                self.http.post(&self.url).form(&[("action", action), ("body", cuerpo.as_str())])
            }
        };
        let resp = req.timeout(self.timeout).send().await?;
        Self::decodificar(resp).await
    }

    /// Lectura: `None` ante cualquier falla.
    pub async fn get_json(&self, action: &str, params: &[(&str, &str)]) -> Option<Value> {
        match self.pedir(action, params).await {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(action, error = %e, "lectura de la planilla fallida");
                None
            }
        }
    }

    /// Escritura: `None` ante cualquier falla o respuesta `{error}`.
    pub async fn post(&self, action: &str, body: Value) -> Option<Value> {
        match self.enviar(action, body).await {
            Ok(v) => Some(v),
            Err(e) => {
                error!(action, error = %e, "escritura en la planilla fallida");
                None
            }
        }
    }

    async fn obtener<T>(&self, action: &str, params: &[(&str, &str)], f: fn(&Value) -> Option<T>) -> Option<Vec<T>> {
        let v = self.get_json(action, params).await?;
        let out = wire::coleccion(&v, f);
        if out.is_none() {
            warn!(action, "la planilla no devolvió un arreglo");
        }
        out
    }

    pub async fn obtener_modulos(&self) -> Option<Vec<Modulo>> {
        let mut modulos = self.obtener("getModulos", &[], wire::modulo_desde_wire).await?;
        modulos.sort_by_key(|m| m.numero);
        Some(modulos)
    }

    pub async fn obtener_materias(&self) -> Option<Vec<Materia>> {
        self.obtener("getMaterias", &[], wire::materia_desde_wire).await
    }

    pub async fn obtener_docentes(&self) -> Option<Vec<Docente>> {
        self.obtener("getDocentes", &[], wire::docente_desde_wire).await
    }

    pub async fn obtener_asignaciones(&self) -> Option<Vec<DocenteMateriaAsignacion>> {
        self.obtener("getDocenteMateriaAsignaciones", &[], wire::asignacion_desde_wire).await
    }

    pub async fn obtener_cursos(&self) -> Option<Vec<Curso>> {
        self.obtener("getCursos", &[], wire::curso_desde_wire).await
    }

    pub async fn obtener_bloques(&self, curso_id: &str) -> Option<Vec<Bloque>> {
        self.obtener("getBloques", &[("cursoId", curso_id)], wire::bloque_desde_wire).await
    }

    pub async fn obtener_todos_los_bloques(&self) -> Option<Vec<Bloque>> {
        self.obtener("getAllBloques", &[], wire::bloque_desde_wire).await
    }

    /// Reemplaza en la planilla los bloques del curso.
    pub async fn guardar_bloques(&self, curso_id: &str, bloques: &[Bloque]) -> bool {
        let registros: Vec<Value> = bloques.iter().map(wire::bloque_a_wire).collect();
        let ok = self
            .post("saveBloques", json!({"cursoId": curso_id, "bloques": registros}))
            .await
            .is_some();
        if ok {
            info!(curso = %curso_id, cantidad = bloques.len(), "bloques guardados en la planilla");
        }
        ok
    }

    /// `create{Entidad}`: devuelve el registro que confirmó la planilla.
    pub async fn crear(&self, entidad: &str, registro: Value) -> Option<Value> {
        self.post(&format!("create{}", entidad), registro).await
    }

    pub async fn actualizar(&self, entidad: &str, registro: Value) -> Option<Value> {
        self.post(&format!("update{}", entidad), registro).await
    }

    pub async fn eliminar(&self, entidad: &str, id: &str) -> bool {
        self.post(&format!("delete{}", entidad), json!({"id": id})).await.is_some()
    }

    /// Prueba de conexión: pide los docentes y devuelve cuántos hay.
    pub async fn probar_conexion(&self) -> Result<usize, GatewayError> {
        let v = self.pedir("getDocentes", &[]).await?;
        match v {
            Value::Array(items) => Ok(items.len()),
            _ => Err(GatewayError::Forma("getDocentes")),
        }
    }
}

impl AlmacenHorarios for GatewayClient {
    async fn guardar_horario(&self, curso_id: &str, bloques: &[Bloque]) -> bool {
        self.guardar_bloques(curso_id, bloques).await
    }
}

fn o_demo<T>(coleccion: &str, datos: Option<Vec<T>>, demo: fn() -> Vec<T>) -> Vec<T> {
    datos.unwrap_or_else(|| {
        warn!(coleccion, "usando datos de ejemplo");
        demo()
    })
}

/// Carga las seis colecciones en paralelo. Cada una cae por separado a los
/// datos de ejemplo si su descarga falla; sin cliente, todo es de ejemplo.
pub async fn cargar_catalogo(remoto: Option<&GatewayClient>) -> Catalogo {
    let Some(cliente) = remoto else {
        info!("sin planilla configurada; usando datos de ejemplo");
        return Catalogo::demo();
    };
    let (modulos, materias, docentes, asignaciones, cursos, bloques) = tokio::join!(
        cliente.obtener_modulos(),
        cliente.obtener_materias(),
        cliente.obtener_docentes(),
        cliente.obtener_asignaciones(),
        cliente.obtener_cursos(),
        cliente.obtener_todos_los_bloques(),
    );
    let catalogo = Catalogo::new(
        o_demo("docentes", docentes, demo::docentes),
        o_demo("materias", materias, demo::materias),
        o_demo("cursos", cursos, demo::cursos),
        o_demo("modulos", modulos, demo::modulos),
        o_demo("asignaciones", asignaciones, demo::asignaciones),
        o_demo("bloques", bloques, demo::bloques),
    );
    info!(
        docentes = catalogo.docentes.len(),
        cursos = catalogo.cursos.len(),
        bloques = catalogo.bloques.len(),
        "catálogo cargado desde la planilla"
    );
    catalogo
}
