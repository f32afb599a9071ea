//! Registros tal como viajan hacia y desde la planilla.
//!
//! La lectura es tolerante: celdas numéricas donde se esperaba texto,
//! booleanos escritos como "TRUE", listas separadas por comas. Un registro sin
//! id o con datos irrecuperables se descarta (con `warn!`) en lugar de cortar
//! la carga.

use serde_json::{json, Map, Value};
use tracing::warn;

use crate::gateway::normalizar::{formatear_hora, normalizar_condicion, normalizar_tipo};
use crate::models::{
    Bloque, Curso, Dia, Docente, DocenteAsignacion, DocenteMateriaAsignacion, DocentesBloque, Grupo, Materia, Modulo,
    MAX_SUPLENTES,
};

/// Texto de un campo; números y booleanos se convierten, ausente es "".
pub fn texto(v: &Value, campo: &str) -> String {
    match v.get(campo) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

pub fn texto_opcional(v: &Value, campo: &str) -> Option<String> {
    let t = texto(v, campo);
    if t.is_empty() { None } else { Some(t) }
}

pub fn numero(v: &Value, campo: &str) -> Option<i64> {
    match v.get(campo)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

pub fn booleano(v: &Value, campo: &str) -> bool {
    match v.get(campo) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "si" | "sí" | "x"),
        _ => false,
    }
}

pub fn lista(v: &Value, campo: &str) -> Vec<String> {
    match v.get(campo) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|i| match i {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn con_id(v: &Value, coleccion: &str) -> Option<String> {
    let id = texto(v, "id");
    if id.is_empty() {
        warn!(coleccion, "registro sin id descartado");
        None
    } else {
        Some(id)
    }
}

pub fn docente_desde_wire(v: &Value) -> Option<Docente> {
    Some(Docente {
        id: con_id(v, "docentes")?,
        nombre: texto(v, "nombre"),
        apellido: texto(v, "apellido"),
    })
}

pub fn materia_desde_wire(v: &Value) -> Option<Materia> {
    Some(Materia {
        id: con_id(v, "materias")?,
        nombre: texto(v, "nombre"),
        tiene_subgrupos: booleano(v, "tieneSubgrupos"),
        docente_ids: lista(v, "docenteIds"),
    })
}

pub fn curso_desde_wire(v: &Value) -> Option<Curso> {
    Some(Curso {
        id: con_id(v, "cursos")?,
        nombre: texto(v, "nombre"),
        division: texto(v, "division"),
    })
}

pub fn modulo_desde_wire(v: &Value) -> Option<Modulo> {
    let id = con_id(v, "modulos")?;
    let etiqueta = texto_opcional(v, "etiqueta");
    let tipo = normalizar_tipo(&texto(v, "tipo"), etiqueta.as_deref(), &id);
    let numero = match numero(v, "numero").map(i32::try_from) {
        Some(Ok(n)) => n,
        Some(Err(_)) => {
            warn!(modulo = %id, "número de módulo fuera de rango; se usa 0");
            0
        }
        None => 0,
    };
    Some(Modulo {
        numero,
        hora_inicio: formatear_hora(&texto(v, "horaInicio")),
        hora_fin: formatear_hora(&texto(v, "horaFin")),
        tipo,
        etiqueta,
        id,
    })
}

pub fn asignacion_desde_wire(v: &Value) -> Option<DocenteMateriaAsignacion> {
    let id = con_id(v, "asignaciones")?;
    let crudo = texto(v, "condicion");
    let Some(condicion) = normalizar_condicion(&crudo) else {
        warn!(%id, condicion = %crudo, "asignación con condición desconocida descartada");
        return None;
    };
    Some(DocenteMateriaAsignacion {
        id,
        docente_id: texto(v, "docenteId"),
        materia_id: texto(v, "materiaId"),
        condicion,
    })
}

fn grupo_desde_texto(s: &str) -> Option<Grupo> {
    match s.trim().to_uppercase().as_str() {
        "A" => Some(Grupo::A),
        "B" => Some(Grupo::B),
        _ => None,
    }
}

/// Convierte el par heredado `docenteId` + `docentes[]` en la representación
/// única del núcleo. La condición del docente a cargo sólo se toma del campo
/// `condicion` de nivel superior: la planilla completa `docentes[0]` siempre con
/// "titular", sin importar la condición real.
pub fn bloque_desde_wire(v: &Value) -> Option<Bloque> {
    let id = con_id(v, "bloques")?;
    let Some(dia) = numero(v, "diaIndex").and_then(Dia::desde_index) else {
        warn!(%id, "bloque con diaIndex inválido descartado");
        return None;
    };

    let mut entradas: Vec<DocenteAsignacion> = match v.get("docentes") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|d| {
                let docente_id = texto(d, "docenteId");
                if docente_id.is_empty() {
                    return None;
                }
                let condicion = normalizar_condicion(&texto(d, "condicion"));
                Some(DocenteAsignacion::new(docente_id, condicion))
            })
            .collect(),
        _ => Vec::new(),
    };
    let docente_id = texto(v, "docenteId");
    if entradas.is_empty() {
        if docente_id.is_empty() {
            warn!(%id, "bloque sin docente descartado");
            return None;
        }
        entradas.push(DocenteAsignacion::new(docente_id, None));
    }

    let mut titular = entradas.remove(0);
    titular.condicion = normalizar_condicion(&texto(v, "condicion"));
    let mut suplentes: Vec<DocenteAsignacion> = Vec::new();
    for s in entradas {
        if s.docente_id == titular.docente_id || suplentes.iter().any(|x| x.docente_id == s.docente_id) {
            continue;
        }
        if suplentes.len() == MAX_SUPLENTES {
            warn!(%id, "bloque con más de {} suplentes; se ignoran los restantes", MAX_SUPLENTES);
            break;
        }
        suplentes.push(s);
    }
    let docentes = match DocentesBloque::new(titular, suplentes) {
        Ok(d) => d,
        Err(e) => {
            warn!(%id, error = %e, "bloque con docentes inválidos descartado");
            return None;
        }
    };

    Some(Bloque {
        id,
        curso_id: texto(v, "cursoId"),
        dia,
        modulo_id: texto(v, "moduloId"),
        materia_id: texto(v, "materiaId"),
        docentes,
        grupo: grupo_desde_texto(&texto(v, "grupo")),
    })
}

/// Registro plano para `saveBloques`: `docenteId` con el docente a cargo y
/// `docentes[]` con todos, en orden.
pub fn bloque_a_wire(b: &Bloque) -> Value {
    let docentes: Vec<Value> = b
        .docentes
        .todos()
        .map(|d| match d.condicion {
            Some(c) => json!({"docenteId": d.docente_id, "condicion": c.clave()}),
            None => json!({"docenteId": d.docente_id}),
        })
        .collect();
    let mut obj = Map::new();
    obj.insert("id".into(), json!(b.id));
    obj.insert("cursoId".into(), json!(b.curso_id));
    obj.insert("diaIndex".into(), json!(b.dia.index()));
    obj.insert("moduloId".into(), json!(b.modulo_id));
    obj.insert("materiaId".into(), json!(b.materia_id));
    obj.insert("docenteId".into(), json!(b.titular_id()));
    obj.insert("docentes".into(), Value::Array(docentes));
    obj.insert("grupo".into(), b.grupo.map(|g| json!(g.letra())).unwrap_or(Value::Null));
    if let Some(c) = b.docentes.titular().condicion {
        obj.insert("condicion".into(), json!(c.clave()));
    }
    Value::Object(obj)
}

/// Convierte un arreglo JSON con `f` descartando los registros inválidos.
pub fn coleccion<T>(v: &Value, f: fn(&Value) -> Option<T>) -> Option<Vec<T>> {
    match v {
        Value::Array(items) => Some(items.iter().filter_map(f).collect()),
        _ => None,
    }
}
