// Datos de ejemplo usados cuando no hay planilla configurada (o cuando una
// colección no se pudo descargar).

use crate::models::*;

fn modulo(id: &str, numero: i32, inicio: &str, fin: &str, tipo: TipoModulo) -> Modulo {
    Modulo {
        id: id.to_string(),
        numero,
        hora_inicio: inicio.to_string(),
        hora_fin: fin.to_string(),
        tipo,
        etiqueta: if tipo == TipoModulo::Recreo { Some("Recreo".to_string()) } else { None },
    }
}

pub fn modulos() -> Vec<Modulo> {
    use TipoModulo::*;
    vec![
        modulo("m1", 1, "07:30", "08:15", Clase),
        modulo("m2", 2, "08:15", "09:00", Clase),
        modulo("m3", 3, "09:00", "09:45", Teoria),
        modulo("recreo1", 0, "09:45", "10:00", Recreo),
        modulo("m4", 4, "10:00", "10:45", Taller),
        modulo("m5", 5, "10:45", "11:30", Clase),
        modulo("m6", 6, "11:30", "12:15", Teoria),
        modulo("recreo2", 0, "12:15", "12:30", Recreo),
        modulo("m7", 7, "12:30", "13:15", Taller),
        modulo("m8", 8, "13:15", "14:00", Clase),
    ]
}

pub fn materias() -> Vec<Materia> {
    let m = |id: &str, nombre: &str, docentes: &[&str], subgrupos: bool| Materia {
        id: id.to_string(),
        nombre: nombre.to_string(),
        tiene_subgrupos: subgrupos,
        docente_ids: docentes.iter().map(|d| d.to_string()).collect(),
    };
    vec![
        m("mat1", "Matemática", &["d1", "d2"], false),
        m("mat2", "Lengua y Literatura", &["d3"], false),
        m("mat3", "Física", &["d1", "d4"], false),
        m("mat4", "Química", &["d4"], false),
        m("mat5", "Historia", &["d5"], false),
        m("mat6", "Inglés", &["d6"], false),
        m("mat7", "Ed. Física", &["d7"], false),
        m("mat8", "Tecnología", &["d2", "d8"], true),
        m("mat9", "Informática", &["d8"], true),
        m("mat10", "Dibujo Técnico", &["d9"], false),
    ]
}

pub fn docentes() -> Vec<Docente> {
    [
        ("d1", "Carlos", "García"),
        ("d2", "Laura", "Martínez"),
        ("d3", "Sofía", "López"),
        ("d4", "Marcos", "Rodríguez"),
        ("d5", "Ana", "Fernández"),
        ("d6", "Jorge", "Sánchez"),
        ("d7", "Patricia", "González"),
        ("d8", "Diego", "Pérez"),
        ("d9", "Valeria", "Torres"),
    ]
    .into_iter()
    .map(|(id, nombre, apellido)| Docente {
        id: id.to_string(),
        nombre: nombre.to_string(),
        apellido: apellido.to_string(),
    })
    .collect()
}

/// Un docente puede ser titular en una materia y suplente en otra.
pub fn asignaciones() -> Vec<DocenteMateriaAsignacion> {
    use Condicion::*;
    [
        ("dma1", "d1", "mat1", Titular),
        ("dma2", "d1", "mat3", Suplente),
        ("dma3", "d2", "mat1", Suplente),
        ("dma4", "d2", "mat8", Titular),
        ("dma5", "d3", "mat2", Suplente),
        ("dma6", "d4", "mat3", Titular),
        ("dma7", "d4", "mat4", Provisional),
        ("dma8", "d5", "mat5", Provisional),
        ("dma9", "d6", "mat6", Titular),
        ("dma10", "d7", "mat7", Suplente),
        ("dma11", "d8", "mat8", Titular),
        ("dma12", "d8", "mat9", Suplente),
        ("dma13", "d9", "mat10", Provisional),
    ]
    .into_iter()
    .map(|(id, docente, materia, condicion)| DocenteMateriaAsignacion {
        id: id.to_string(),
        docente_id: docente.to_string(),
        materia_id: materia.to_string(),
        condicion,
    })
    .collect()
}

pub fn cursos() -> Vec<Curso> {
    [
        ("c1", "1° 1°", "Primera"),
        ("c2", "1° 2°", "Segunda"),
        ("c3", "2° 1°", "Primera"),
        ("c4", "2° 2°", "Segunda"),
        ("c5", "3° 1°", "Primera"),
        ("c6", "3° 2°", "Segunda"),
        ("c7", "4° 1°", "Primera"),
        ("c8", "5° 1°", "Primera"),
        ("c9", "6° 1°", "Primera"),
    ]
    .into_iter()
    .map(|(id, nombre, division)| Curso {
        id: id.to_string(),
        nombre: nombre.to_string(),
        division: division.to_string(),
    })
    .collect()
}

pub fn bloques() -> Vec<Bloque> {
    [
        ("b1", Dia::Lunes, "m1", "mat1", "d1", None),
        ("b2", Dia::Lunes, "m2", "mat2", "d3", None),
        ("b3", Dia::Martes, "m1", "mat3", "d4", None),
        ("b4", Dia::Martes, "m2", "mat4", "d4", None),
        ("b5", Dia::Miercoles, "m1", "mat5", "d5", None),
        ("b6", Dia::Miercoles, "m4", "mat6", "d6", None),
        ("b7", Dia::Jueves, "m1", "mat7", "d7", None),
        ("b8", Dia::Viernes, "m1", "mat8", "d8", Some(Grupo::A)),
        // Informática tiene subgrupos; el bloque de ejemplo va en el Grupo A
        ("b9", Dia::Viernes, "m2", "mat9", "d8", Some(Grupo::A)),
    ]
    .into_iter()
    .map(|(id, dia, modulo, materia, docente, grupo)| Bloque {
        id: id.to_string(),
        curso_id: "c1".to_string(),
        dia,
        modulo_id: modulo.to_string(),
        materia_id: materia.to_string(),
        docentes: DocentesBloque::solo(docente),
        grupo,
    })
    .collect()
}
