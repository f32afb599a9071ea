//! Adaptador de normalización para los datos que devuelve la planilla.
//!
//! La planilla remota devuelve ids de módulo con espacios o en formatos
//! heredados, horas serializadas como fechas ISO y tipos de módulo escritos a
//! mano. Todo lo tolerante vive acá; el núcleo sólo trabaja con ids canónicos.

use chrono::{DateTime, Timelike};

use crate::algorithm::{hora_a_minutos, minutos_a_hora};
use crate::models::{Condicion, Modulo, TipoModulo};

/// Offset del proyecto de Apps Script respecto de UTC (UTC-8): una celda
/// 07:40 llega como `1899-12-30T15:40:00.000Z`.
pub const OFFSET_APPS_SCRIPT_MINUTOS: i32 = -480;

/// Devuelve siempre "HH:MM" cuando puede interpretar el valor; si no, lo
/// devuelve tal cual.
pub fn formatear_hora(valor: &str) -> String {
    let valor = valor.trim();
    if valor.is_empty() {
        return String::new();
    }
    if valor.contains('T') {
        if let Ok(fecha) = DateTime::parse_from_rfc3339(valor) {
            let utc = fecha.naive_utc();
            let total = (utc.hour() * 60 + utc.minute()) as i32 + OFFSET_APPS_SCRIPT_MINUTOS;
            return minutos_a_hora(total);
        }
    }
    if let Some(min) = hora_a_minutos(valor) {
        return minutos_a_hora(min);
    }
    let partes: Vec<&str> = valor.split(':').collect();
    if partes.len() >= 2 {
        return format!("{:0>2}:{:0>2}", partes[0].trim(), partes[1].trim());
    }
    valor.to_string()
}

/// Interpreta el `tipo` de un módulo sin distinguir mayúsculas ni tildes
/// habituales. Si el texto no es reconocible, busca "recreo" en la etiqueta o
/// el id; por defecto es una clase.
pub fn normalizar_tipo(tipo: &str, etiqueta: Option<&str>, id: &str) -> TipoModulo {
    let t = tipo.trim().to_lowercase();
    if t.contains("recreo") {
        return TipoModulo::Recreo;
    }
    if t.contains("taller") {
        return TipoModulo::Taller;
    }
    match t.as_str() {
        "clase" => TipoModulo::Clase,
        "teoria" | "teoría" | "teória" => TipoModulo::Teoria,
        _ => {
            let pista = format!("{} {}", etiqueta.unwrap_or(""), id).to_lowercase();
            if pista.contains("recreo") {
                TipoModulo::Recreo
            } else {
                TipoModulo::Clase
            }
        }
    }
}

/// Condición escrita a mano en la planilla ("Titular Interino", "SUPLENTE").
pub fn normalizar_condicion(valor: &str) -> Option<Condicion> {
    let v: String = valor
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() || c == '-' { '_' } else { c })
        .collect();
    match v.as_str() {
        "titular" | "t" => Some(Condicion::Titular),
        "titular_interino" | "t.i" | "ti" => Some(Condicion::TitularInterino),
        "suplente" | "s" => Some(Condicion::Suplente),
        "provisional" | "p" => Some(Condicion::Provisional),
        _ => None,
    }
}

fn primer_token(s: &str) -> &str {
    s.split_whitespace().next().unwrap_or("")
}

fn es_prefijo_estructurado(token: &str) -> bool {
    token.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("mod"))
}

/// Resuelve el id de módulo que trae un bloque contra los módulos cargados:
/// exacto, recortado, número ordinal ("2" → módulo número 2) y por último el
/// primer token cuando ambos usan el formato `mod…`. Devuelve `None` si nada
/// coincide.
pub fn resolver_modulo_id<'a>(id: &str, modulos: &'a [Modulo]) -> Option<&'a Modulo> {
    if let Some(m) = modulos.iter().find(|m| m.id == id) {
        return Some(m);
    }
    let recortado = id.trim();
    if let Some(m) = modulos.iter().find(|m| m.id.trim() == recortado) {
        return Some(m);
    }
    if let Ok(n) = recortado.parse::<i32>() {
        if let Some(m) = modulos.iter().find(|m| m.numero == n) {
            return Some(m);
        }
    }
    let token = primer_token(id);
    if es_prefijo_estructurado(token) {
        return modulos.iter().find(|m| primer_token(&m.id) == token);
    }
    None
}

/// Comparación tolerante de ids de módulo usada para ubicar bloques en una
/// celda. Determinística y simétrica.
pub fn modulo_ids_equivalentes(a: &str, b: &str) -> bool {
    if a == b || a.trim() == b.trim() {
        return true;
    }
    let (ta, tb) = (primer_token(a), primer_token(b));
    es_prefijo_estructurado(ta) && es_prefijo_estructurado(tb) && ta == tb
}
