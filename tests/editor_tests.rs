use std::sync::{Arc, Mutex};

use horarios::algorithm::{dobles_asignaciones, PoliticaConflicto};
use horarios::editor::{
    AlmacenHorarios, AlmacenLocal, CeldaGrilla, EditorHorarios, EspacioGrupo, FormularioCelda, MENSAJE_CONFLICTO_CELDA,
};
use horarios::models::{Bloque, Condicion, Dia, Grupo};
use horarios::store::Catalogo;
use horarios::vistas::describir_bloque;
use horarios::HorarioError;

struct AlmacenFallido;

impl AlmacenHorarios for AlmacenFallido {
    async fn guardar_horario(&self, _curso_id: &str, _bloques: &[Bloque]) -> bool {
        false
    }
}

fn editor(curso: &str) -> EditorHorarios {
    EditorHorarios::nuevo(&Catalogo::demo(), Some(curso), PoliticaConflicto::default())
}

fn formulario(materia: &str, titular: &str, grupo: Option<Grupo>) -> FormularioCelda {
    FormularioCelda {
        materia_id: materia.to_string(),
        titular_id: titular.to_string(),
        grupo,
        ..Default::default()
    }
}

fn asignar(ed: &mut EditorHorarios, dia: Dia, modulo: &str, f: FormularioCelda) -> Result<Bloque, HorarioError> {
    ed.abrir_celda(dia, modulo, f.grupo)?;
    ed.formulario = f;
    ed.guardar_celda()
}

#[test]
fn test_docente_ocupado_en_otro_curso_se_rechaza() {
    // d1 ya da Matemática en 1° 1° el lunes en el módulo 1
    let mut ed = editor("c2");
    let antes = ed.bloques().to_vec();
    let err = asignar(&mut ed, Dia::Lunes, "m1", formulario("mat1", "d1", None)).unwrap_err();
    assert!(matches!(err, HorarioError::Conflicto { ref docente_id, .. } if docente_id == "d1"));
    assert_eq!(ed.mensaje_conflicto(), Some(MENSAJE_CONFLICTO_CELDA));
    assert_eq!(ed.bloques(), antes.as_slice());
    ed.descartar_mensaje();
    assert_eq!(ed.mensaje_conflicto(), None);
}

#[test]
fn test_guardar_celda_dos_veces_no_duplica() {
    let mut ed = editor("c2");
    let total = ed.bloques().len();
    let creado = asignar(&mut ed, Dia::Lunes, "m1", formulario("mat1", "d2", None)).expect("Debe guardar el bloque");
    assert!(creado.id.starts_with("b_"));
    assert_eq!(ed.bloques().len(), total + 1);
    assert!(ed.celda().is_none(), "la celda se cierra al guardar");

    let form = ed.abrir_celda(Dia::Lunes, "m1", None).expect("Debe abrir la celda").clone();
    assert_eq!(form.materia_id, "mat1");
    assert_eq!(form.titular_id, "d2");
    let de_nuevo = ed.guardar_celda().expect("Debe volver a guardar");
    assert_eq!(de_nuevo.id, creado.id);
    assert_eq!(ed.bloques().len(), total + 1);
    assert!(dobles_asignaciones(ed.bloques(), PoliticaConflicto::SoloTitular).is_empty());
}

#[test]
fn test_editar_conserva_id_y_cambia_docente() {
    let mut ed = editor("c1");
    let b = asignar(&mut ed, Dia::Lunes, "m1", formulario("mat1", "d2", None)).expect("Debe editar b1");
    assert_eq!(b.id, "b1");
    assert_eq!(b.titular_id(), "d2");
    assert_eq!(ed.bloques_en_celda(Dia::Lunes, "m1").len(), 1);
}

#[test]
fn test_campos_obligatorios() {
    let mut ed = editor("c2");
    assert_eq!(
        asignar(&mut ed, Dia::Lunes, "m1", formulario("", "d2", None)),
        Err(HorarioError::CampoRequerido("materia"))
    );
    assert_eq!(
        asignar(&mut ed, Dia::Lunes, "m1", formulario("mat1", " ", None)),
        Err(HorarioError::CampoRequerido("docente"))
    );
    // Tecnología tiene subgrupos: sin grupo no se puede guardar
    let err = asignar(&mut ed, Dia::Lunes, "m4", formulario("mat8", "d2", None)).unwrap_err();
    assert!(matches!(err, HorarioError::GrupoRequerido(_)));
    assert!(ed.bloques_en_celda(Dia::Lunes, "m4").is_empty());
}

#[test]
fn test_guardar_sin_celda_abierta() {
    let mut ed = editor("c1");
    ed.formulario = formulario("mat1", "d2", None);
    assert_eq!(ed.guardar_celda(), Err(HorarioError::SinCeldaEnEdicion));
}

#[test]
fn test_grupos_a_y_b_conviven() {
    let mut ed = editor("c2");
    let a = asignar(&mut ed, Dia::Lunes, "m4", formulario("mat8", "d2", Some(Grupo::A))).expect("Debe guardar grupo A");
    let b = asignar(&mut ed, Dia::Lunes, "m4", formulario("mat8", "d8", Some(Grupo::B))).expect("Debe guardar grupo B");
    assert_ne!(a.id, b.id);
    let ids: Vec<&str> = ed.bloques_en_celda(Dia::Lunes, "m4").iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec![a.id.as_str(), b.id.as_str()]);

    // reabrir el grupo A edita el mismo bloque
    let a2 = asignar(&mut ed, Dia::Lunes, "m4", formulario("mat8", "d1", Some(Grupo::A))).expect("Debe editar grupo A");
    assert_eq!(a2.id, a.id);
    assert_eq!(ed.bloques_en_celda(Dia::Lunes, "m4").len(), 2);

    // una materia sin grupos no entra en una celda dividida
    let err = asignar(&mut ed, Dia::Lunes, "m4", formulario("mat2", "d3", None)).unwrap_err();
    assert!(matches!(err, HorarioError::CeldaOcupada(_)));

    // al quitar el grupo A queda el B y reaparece el lugar para agregar A
    ed.quitar_bloque(&a.id).expect("Debe quitar el grupo A");
    let grilla = ed.grilla();
    let fila = grilla.filas.iter().find(|f| f.modulo_id == "m4").expect("Debe existir la fila m4");
    match &fila.celdas[Dia::Lunes.index() as usize] {
        CeldaGrilla::Dividida { grupo_a, grupo_b, .. } => {
            assert!(matches!(grupo_a, EspacioGrupo::Agregar { grupo: Grupo::A, etiqueta } if etiqueta == "Agregar Grupo A"));
            assert!(matches!(grupo_b, EspacioGrupo::Ocupado { bloque } if bloque.bloque_id == b.id));
        }
        otra => panic!("se esperaba celda dividida, hubo {:?}", otra),
    }
}

#[test]
fn test_recreo_no_admite_bloques() {
    let mut ed = editor("c1");
    assert!(matches!(ed.abrir_celda(Dia::Lunes, "recreo1", None), Err(HorarioError::ModuloRecreo(_))));
    assert!(matches!(ed.mover("b1", "cell-c1-0-recreo2"), Err(HorarioError::ModuloRecreo(_))));
    let grilla = ed.grilla();
    let fila = grilla.filas.iter().find(|f| f.modulo_id == "recreo1").expect("Debe existir la fila de recreo");
    assert!(fila.celdas.iter().all(|c| *c == CeldaGrilla::Bloqueada));
}

#[test]
fn test_ids_de_modulo_con_espacios_resuelven_igual() {
    let ed = editor("c1");
    let a: Vec<&str> = ed.bloques_en_celda(Dia::Lunes, "m1").iter().map(|b| b.id.as_str()).collect();
    let b: Vec<&str> = ed.bloques_en_celda(Dia::Lunes, " m1 ").iter().map(|b| b.id.as_str()).collect();
    assert_eq!(a, vec!["b1"]);
    assert_eq!(a, b);
}

#[test]
fn test_mover_bloque_a_celda_libre() {
    let mut ed = editor("c1");
    let total = ed.bloques().len();
    ed.mover("b1", "cell-c1-1-m3").expect("Debe mover b1");
    let b1 = ed.bloques().iter().find(|b| b.id == "b1").expect("b1 sigue existiendo");
    assert_eq!(b1.dia, Dia::Martes);
    assert_eq!(b1.modulo_id, "m3");
    assert_eq!(ed.bloques().len(), total);
    assert!(ed.bloques_en_celda(Dia::Lunes, "m1").is_empty());
}

#[test]
fn test_mover_rechazos() {
    let mut ed = editor("c1");
    assert_eq!(ed.mover("b1", "cell-c1-0-m1"), Err(HorarioError::MismaCelda));
    assert!(matches!(ed.mover("b1", "cell-c1-1-m1"), Err(HorarioError::CeldaOcupada(_))));
    assert!(matches!(ed.mover("b1", "cell-c2-1-m3"), Err(HorarioError::DestinoInvalido(_))));
    assert!(matches!(ed.mover("b1", "cualquier-cosa"), Err(HorarioError::DestinoInvalido(_))));
    assert!(matches!(ed.mover("nada", "cell-c1-1-m3"), Err(HorarioError::NoEncontrado { .. })));
    assert!(matches!(ed.mover("b1", "cell-c1-1-m99"), Err(HorarioError::ModuloInexistente(_))));
}

#[test]
fn test_mover_con_conflicto_de_docente() {
    let mut ed = editor("c2");
    asignar(&mut ed, Dia::Martes, "m5", formulario("mat1", "d1", None)).expect("Debe asignar d1 en 1° 2°");
    ed.seleccionar_curso("c1").expect("Debe cambiar de curso");
    let err = ed.mover("b1", "cell-c1-1-m5").unwrap_err();
    match err {
        HorarioError::Conflicto { docente_id, mensaje } => {
            assert_eq!(docente_id, "d1");
            assert_eq!(mensaje, "Conflicto: García ya tiene clase en ese módulo.");
        }
        otro => panic!("se esperaba conflicto, hubo {:?}", otro),
    }
    let b1 = ed.bloques().iter().find(|b| b.id == "b1").expect("b1 sigue existiendo");
    assert_eq!((b1.dia, b1.modulo_id.as_str()), (Dia::Lunes, "m1"));
}

#[test]
fn test_suplente_ocupado_solo_bloquea_con_politica_todos() {
    let catalogo = Catalogo::demo();
    // d3 da Lengua en 1° 1° el lunes en m2; en 1° 2° figura como suplente
    let mut form = formulario("mat1", "d2", None);
    form.suplentes = vec!["d3".to_string()];

    let mut ed = EditorHorarios::nuevo(&catalogo, Some("c2"), PoliticaConflicto::SoloTitular);
    assert!(asignar(&mut ed, Dia::Lunes, "m2", form.clone()).is_ok());

    let mut estricto = EditorHorarios::nuevo(&catalogo, Some("c2"), PoliticaConflicto::TitularYSuplentes);
    let err = asignar(&mut estricto, Dia::Lunes, "m2", form).unwrap_err();
    assert!(matches!(err, HorarioError::Conflicto { ref docente_id, .. } if docente_id == "d3"));
}

#[tokio::test]
async fn test_condicion_sale_de_la_tabla_docente_materia() {
    let mut catalogo = Catalogo::demo();
    let mut ed = EditorHorarios::nuevo(&catalogo, Some("c2"), PoliticaConflicto::default());
    let b = asignar(&mut ed, Dia::Lunes, "m3", formulario("mat1", "d1", None)).expect("Debe asignar d1");
    ed.confirmar(&mut catalogo, &AlmacenLocal).await.expect("Debe confirmar");

    let guardado = catalogo.bloques.iter().find(|x| x.id == b.id).expect("Debe estar confirmado");
    let vista = describir_bloque(&catalogo, guardado);
    assert_eq!(vista.titular.docente_id, "d1");
    assert_eq!(vista.titular.condicion, Some(Condicion::Titular));
    assert_eq!(vista.titular.nombre, "García, C.");
}

#[tokio::test]
async fn test_guardar_todo_avisa_al_host() {
    let avisos = Arc::new(Mutex::new(Vec::<String>::new()));
    let mut ed = editor("c1");
    let registro = avisos.clone();
    ed.set_on_guardado(move |curso| registro.lock().expect("lock").push(curso.to_string()));

    assert!(!ed.guardar_todo(&AlmacenFallido).await);
    assert!(avisos.lock().expect("lock").is_empty());

    assert!(ed.guardar_todo(&AlmacenLocal).await);
    assert_eq!(*avisos.lock().expect("lock"), vec!["c1".to_string()]);
}

#[tokio::test]
async fn test_confirmar_detecta_version_vieja() {
    let mut catalogo = Catalogo::demo();
    let mut primero = EditorHorarios::nuevo(&catalogo, Some("c1"), PoliticaConflicto::default());
    let mut segundo = EditorHorarios::nuevo(&catalogo, Some("c1"), PoliticaConflicto::default());

    primero.quitar_bloque("b2").expect("Debe quitar b2");
    assert_eq!(primero.confirmar(&mut catalogo, &AlmacenLocal).await, Ok(1));
    assert_eq!(catalogo.bloques_de_curso("c1").len(), 8);
    assert_eq!(primero.version_base("c1"), 1);

    segundo.quitar_bloque("b3").expect("Debe quitar b3");
    let err = segundo.confirmar(&mut catalogo, &AlmacenLocal).await.unwrap_err();
    assert_eq!(
        err,
        HorarioError::VersionDesactualizada {
            curso_id: "c1".to_string(),
            esperada: 0,
            actual: 1
        }
    );
    assert!(catalogo.bloques.iter().any(|b| b.id == "b3"));
}

#[tokio::test]
async fn test_dos_sesiones_no_pueden_reservar_al_mismo_docente() {
    let mut catalogo = Catalogo::demo();
    let mut primero = EditorHorarios::nuevo(&catalogo, Some("c1"), PoliticaConflicto::default());
    let mut segundo = EditorHorarios::nuevo(&catalogo, Some("c2"), PoliticaConflicto::default());

    // cada sesión ve a d1 libre el viernes en el módulo 8
    asignar(&mut primero, Dia::Viernes, "m8", formulario("mat1", "d1", None)).expect("Debe guardar en c1");
    asignar(&mut segundo, Dia::Viernes, "m8", formulario("mat1", "d1", None)).expect("Debe guardar en c2");

    assert_eq!(primero.confirmar(&mut catalogo, &AlmacenLocal).await, Ok(1));
    let antes = catalogo.clone();
    let err = segundo.confirmar(&mut catalogo, &AlmacenLocal).await.unwrap_err();
    assert!(matches!(err, HorarioError::Conflicto { ref docente_id, .. } if docente_id == "d1"));
    assert_eq!(segundo.mensaje_conflicto(), Some(MENSAJE_CONFLICTO_CELDA));
    assert_eq!(catalogo, antes);
    assert_eq!(catalogo.version_curso("c2"), 0);
    assert!(dobles_asignaciones(&catalogo.bloques, PoliticaConflicto::SoloTitular).is_empty());
}

#[tokio::test]
async fn test_confirmar_con_almacen_caido_no_toca_el_catalogo() {
    let mut catalogo = Catalogo::demo();
    let antes = catalogo.clone();
    let mut ed = EditorHorarios::nuevo(&catalogo, Some("c1"), PoliticaConflicto::default());
    ed.quitar_bloque("b1").expect("Debe quitar b1");
    let err = ed.confirmar(&mut catalogo, &AlmacenFallido).await.unwrap_err();
    assert_eq!(err.codigo(), "remoto_fallido");
    assert_eq!(catalogo, antes);
    assert_eq!(ed.bloques().len(), antes.bloques.len() - 1);
}
