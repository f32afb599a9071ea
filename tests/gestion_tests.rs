use horarios::gateway::{FormatoPost, GatewayClient};
use horarios::gestion::{actualizar, asignar, crear, desasignar, eliminar};
use horarios::models::{Condicion, Curso, Docente, DocenteMateriaAsignacion, Modulo, TipoModulo};
use horarios::store::Catalogo;
use horarios::vistas::{describir_bloque, estadisticas};
use horarios::HorarioError;

fn docente(nombre: &str, apellido: &str) -> Docente {
    Docente {
        id: String::new(),
        nombre: nombre.to_string(),
        apellido: apellido.to_string(),
    }
}

#[tokio::test]
async fn test_alta_genera_id() {
    let mut c = Catalogo::demo();
    let d = crear(&mut c, None, docente("Ana", "Paz")).await.expect("Debe crear el docente");
    assert!(d.id.starts_with("d_"));
    assert_eq!(c.docentes.len(), 10);
    assert_eq!(c.docente(&d.id).map(|d| d.apellido.as_str()), Some("Paz"));
}

#[tokio::test]
async fn test_alta_valida_campos() {
    let mut c = Catalogo::demo();
    let err = crear(&mut c, None, docente("Ana", "  ")).await.expect_err("Debe rechazar");
    assert!(matches!(err, HorarioError::CampoRequerido("apellido")));
    let curso = Curso { id: String::new(), nombre: String::new(), division: "Única".into() };
    assert!(crear(&mut c, None, curso).await.is_err());
    assert_eq!(c.cursos.len(), Catalogo::demo().cursos.len());
}

#[tokio::test]
async fn test_modificar_conserva_id() {
    let mut c = Catalogo::demo();
    let d = actualizar(&mut c, None, "d1", docente("Carlos Alberto", "García"))
        .await
        .expect("Debe modificar");
    assert_eq!(d.id, "d1");
    assert_eq!(c.docente("d1").map(|d| d.nombre.as_str()), Some("Carlos Alberto"));
    let err = actualizar(&mut c, None, "d99", docente("X", "Y")).await.expect_err("Debe fallar");
    assert!(matches!(err, HorarioError::NoEncontrado { .. }));
}

#[tokio::test]
async fn test_modulos_quedan_ordenados() {
    let mut c = Catalogo::demo();
    let nuevo = Modulo {
        id: String::new(),
        numero: 9,
        hora_inicio: "14:00".into(),
        hora_fin: "14:45".into(),
        tipo: TipoModulo::Clase,
        etiqueta: None,
    };
    crear(&mut c, None, nuevo).await.expect("Debe crear el módulo");
    let cambiado = Modulo {
        numero: 0,
        ..c.modulo("m8").cloned().expect("Debe estar m8")
    };
    actualizar(&mut c, None, "m8", cambiado).await.expect("Debe modificar");
    let numeros: Vec<i32> = c.modulos.iter().map(|m| m.numero).collect();
    let mut ordenados = numeros.clone();
    ordenados.sort();
    assert_eq!(numeros, ordenados);
    assert_eq!(c.modulos.last().map(|m| m.numero), Some(9));
}

#[tokio::test]
async fn test_modulo_que_pasa_a_recreo_pierde_sus_clases() {
    let mut c = Catalogo::demo();
    let recreo = Modulo {
        tipo: TipoModulo::Recreo,
        ..c.modulo("m1").cloned().expect("Debe estar m1")
    };
    actualizar(&mut c, None, "m1", recreo).await.expect("Debe modificar");
    assert!(c.bloques.iter().all(|b| b.modulo_id != "m1"));
    assert_eq!(estadisticas(&c).total_bloques, 4);
    // las sesiones abiertas sobre 1° 1° quedan desactualizadas
    assert_eq!(c.version_curso("c1"), 1);
    assert_eq!(c.version_curso("c2"), 0);
}

#[tokio::test]
async fn test_baja_deja_referencias_colgando() {
    let mut c = Catalogo::demo();
    eliminar::<Docente>(&mut c, None, "d1").await.expect("Debe eliminar");
    assert!(c.docente("d1").is_none());
    // el bloque sigue y se muestra con el marcador
    let b1 = c.bloques.iter().find(|b| b.id == "b1").expect("Debe seguir b1");
    assert_eq!(describir_bloque(&c, b1).titular.nombre, "—");
    assert!(eliminar::<Docente>(&mut c, None, "d1").await.is_err());
}

#[tokio::test]
async fn test_asignar_actualiza_docentes_de_la_materia() {
    let mut c = Catalogo::demo();
    let a = asignar(&mut c, None, "d9", "mat1", Condicion::Suplente)
        .await
        .expect("Debe asignar");
    assert!(a.id.starts_with("dma_"));
    let mat1 = c.materia("mat1").expect("Debe estar mat1");
    assert_eq!(mat1.docente_ids, vec!["d1", "d2", "d9"]);
    assert_eq!(c.condicion_de("d9", "mat1"), Some(Condicion::Suplente));

    // el mismo par cambia la condición en lugar de duplicar
    let total = c.asignaciones.len();
    let b = asignar(&mut c, None, "d9", "mat1", Condicion::Titular)
        .await
        .expect("Debe reasignar");
    assert_eq!(b.id, a.id);
    assert_eq!(c.asignaciones.len(), total);
    assert_eq!(c.condicion_de("d9", "mat1"), Some(Condicion::Titular));

    desasignar(&mut c, None, &a.id).await.expect("Debe desasignar");
    let mat1 = c.materia("mat1").expect("Debe estar mat1");
    assert_eq!(mat1.docente_ids, vec!["d1", "d2"]);
}

#[tokio::test]
async fn test_asignar_exige_docente_y_materia() {
    let mut c = Catalogo::demo();
    assert!(matches!(
        asignar(&mut c, None, "d99", "mat1", Condicion::Titular).await,
        Err(HorarioError::NoEncontrado { entidad: "Docente", .. })
    ));
    assert!(matches!(
        asignar(&mut c, None, "d1", "mat99", Condicion::Titular).await,
        Err(HorarioError::NoEncontrado { entidad: "Materia", .. })
    ));
}

#[tokio::test]
async fn test_alta_optimista_si_la_planilla_falla() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server.mock("POST", "/").with_status(500).create_async().await;
    let cliente = GatewayClient::new(server.url(), FormatoPost::Json);
    let mut c = Catalogo::demo();
    let d = crear(&mut c, Some(&cliente), docente("Ana", "Paz")).await.expect("Debe crear igual");
    assert!(c.docente(&d.id).is_some());
}

#[tokio::test]
async fn test_modificar_y_borrar_exigen_confirmacion_remota() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_body(r#"{"error": "fila bloqueada"}"#)
        .create_async()
        .await;
    let cliente = GatewayClient::new(server.url(), FormatoPost::Json);
    let mut c = Catalogo::demo();
    let antes = c.clone();

    let err = actualizar(&mut c, Some(&cliente), "d1", docente("Otro", "Nombre"))
        .await
        .expect_err("Debe fallar");
    assert_eq!(err.codigo(), "remoto_fallido");
    let err = eliminar::<DocenteMateriaAsignacion>(&mut c, Some(&cliente), "dma1")
        .await
        .expect_err("Debe fallar");
    assert!(matches!(err, HorarioError::RemotoFallido(_)));
    assert_eq!(c, antes);
}
