//! Configuración desde variables de entorno (y `.env`, cargado en `main`).
//!
//! | Variable | Default |
//! |---|---|
//! | `HORARIOS_BIND` | `127.0.0.1:8080` |
//! | `HORARIOS_SCRIPT_URL` | sin valor: se usa `data/config.json` o los datos de ejemplo |
//! | `HORARIOS_POST_FORMATO` | `json` (`json`\|`form`) |
//! | `HORARIOS_TOKEN` | sin valor: rutas de escritura abiertas |
//! | `HORARIOS_PLANILLA` | libro .xlsx local opcional |
//! | `HORARIOS_ESCUELA` | encabezado de la planilla imprimible |
//! | `HORARIOS_DATA_DIR` | `data` |
//! | `HORARIOS_CONFLICTOS` | `titular` (`titular`\|`todos`) |

use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::algorithm::PoliticaConflicto;
use crate::gateway::FormatoPost;

pub const BIND_POR_DEFECTO: &str = "127.0.0.1:8080";
pub const ESCUELA_POR_DEFECTO: &str = "Escuela de Educación Secundaria Técnica";
const ARCHIVO_CONFIG: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {var}: {reason}")]
    InvalidEnvValue { var: String, reason: String },
    #[error("no se pudo guardar la configuración: {0}")]
    Persistencia(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub script_url: Option<String>,
    pub formato_post: FormatoPost,
    pub token: Option<String>,
    pub planilla: Option<PathBuf>,
    pub escuela: String,
    pub data_dir: PathBuf,
    pub politica: PoliticaConflicto,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind: BIND_POR_DEFECTO.to_string(),
            script_url: None,
            formato_post: FormatoPost::default(),
            token: None,
            planilla: None,
            escuela: ESCUELA_POR_DEFECTO.to_string(),
            data_dir: PathBuf::from("data"),
            politica: PoliticaConflicto::default(),
        }
    }
}

fn var(nombre: &str) -> Option<String> {
    std::env::var(nombre).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parsear<T: std::str::FromStr<Err = String>>(nombre: &str) -> Result<Option<T>, ConfigError> {
    match var(nombre) {
        Some(v) => v
            .parse::<T>()
            .map(Some)
            .map_err(|reason| ConfigError::InvalidEnvValue { var: nombre.to_string(), reason }),
        None => Ok(None),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let d = Config::default();
        let script_url = var("HORARIOS_SCRIPT_URL");
        if let Some(url) = &script_url {
            validar_url(url).map_err(|reason| ConfigError::InvalidEnvValue {
                var: "HORARIOS_SCRIPT_URL".to_string(),
                reason,
            })?;
        }
        Ok(Config {
            bind: var("HORARIOS_BIND").unwrap_or(d.bind),
            script_url,
            formato_post: parsear("HORARIOS_POST_FORMATO")?.unwrap_or(d.formato_post),
            token: var("HORARIOS_TOKEN"),
            planilla: var("HORARIOS_PLANILLA").map(PathBuf::from),
            escuela: var("HORARIOS_ESCUELA").unwrap_or(d.escuela),
            data_dir: var("HORARIOS_DATA_DIR").map(PathBuf::from).unwrap_or(d.data_dir),
            politica: parsear("HORARIOS_CONFLICTOS")?.unwrap_or(d.politica),
        })
    }

    /// URL de la planilla: la variable de entorno tiene prioridad sobre la
    /// guardada en `data/config.json`.
    pub fn url_efectiva(&self) -> Option<String> {
        self.script_url
            .clone()
            .or_else(|| ConfigPersistida::cargar(&self.data_dir).script_url)
    }
}

/// Validación mínima: http(s) y con host.
pub fn validar_url(url: &str) -> Result<(), String> {
    let u = url.trim();
    let resto = u
        .strip_prefix("https://")
        .or_else(|| u.strip_prefix("http://"))
        .ok_or_else(|| format!("'{}' no es una URL http(s)", u))?;
    if resto.is_empty() || resto.starts_with('/') {
        return Err(format!("'{}' no tiene host", u));
    }
    Ok(())
}

/// Preferencias guardadas desde la API (`POST /config/url`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPersistida {
    #[serde(default)]
    pub script_url: Option<String>,
}

impl ConfigPersistida {
    pub fn ruta(data_dir: &Path) -> PathBuf {
        data_dir.join(ARCHIVO_CONFIG)
    }

    /// Archivo ausente o inválido equivale a configuración vacía.
    pub fn cargar(data_dir: &Path) -> Self {
        let ruta = Self::ruta(data_dir);
        match std::fs::read_to_string(&ruta) {
            Ok(contenido) if !contenido.trim().is_empty() => serde_json::from_str(&contenido).unwrap_or_else(|e| {
                warn!(archivo = %ruta.display(), error = %e, "config.json inválido; se ignora");
                ConfigPersistida::default()
            }),
            _ => ConfigPersistida::default(),
        }
    }

    pub fn guardar(&self, data_dir: &Path) -> Result<(), ConfigError> {
        create_dir_all(data_dir).map_err(|e| ConfigError::Persistencia(e.to_string()))?;
        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Persistencia(e.to_string()))?;
        let mut f = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(Self::ruta(data_dir))
            .map_err(|e| ConfigError::Persistencia(e.to_string()))?;
        f.write_all(json.as_bytes())
            .map_err(|e| ConfigError::Persistencia(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valida_urls() {
        assert!(validar_url("https://script.google.com/macros/s/x/exec").is_ok());
        assert!(validar_url("ftp://x").is_err());
        assert!(validar_url("https://").is_err());
    }
}
