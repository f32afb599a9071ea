use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use horarios::config::Config;
use horarios::server::{configurar_rutas, AppState};
use horarios::store::Catalogo;
use serde_json::{json, Value};
use tempfile::TempDir;

fn estado(token: Option<&str>) -> (TempDir, web::Data<AppState>) {
    let dir = tempfile::tempdir().expect("Debe crear el directorio");
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        token: token.map(str::to_string),
        ..Default::default()
    };
    (dir, web::Data::new(AppState::new(config, Catalogo::demo())))
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(App::new().app_data($state.clone()).configure(configurar_rutas)).await
    };
}

#[actix_web::test]
async fn test_catalogo_y_bloques_por_curso() {
    let (_dir, state) = estado(None);
    let app = app!(state);

    let req = test::TestRequest::get().uri("/catalogo").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["docentes"].as_array().map(Vec::len), Some(9));
    assert_eq!(body["modulos"][3]["tipo"], "recreo");

    let req = test::TestRequest::get().uri("/bloques?cursoId=c2").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!([]));

    let req = test::TestRequest::get().uri("/bloques?cursoId=c1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().map(Vec::len), Some(9));
}

#[actix_web::test]
async fn test_flujo_del_editor() {
    let (_dir, state) = estado(None);
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/editor/sesiones")
        .set_json(json!({"cursoId": "c2"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let creada: Value = test::read_body_json(resp).await;
    let sesion = creada["sesionId"].as_str().expect("Debe tener id").to_string();
    assert_eq!(creada["cursoId"], "c2");

    let req = test::TestRequest::post()
        .uri(&format!("/editor/sesiones/{}/celdas/abrir", sesion))
        .set_json(json!({"diaIndex": 2, "moduloId": "m3"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["celda"]["moduloId"], "m3");
    assert!(body["docentesDisponibles"].as_array().is_some_and(|d| !d.is_empty()));

    let req = test::TestRequest::post()
        .uri(&format!("/editor/sesiones/{}/celdas/guardar", sesion))
        .set_json(json!({"materiaId": "mat2", "titularId": "d3"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["bloque"]["cursoId"], "c2");

    // todavía no está confirmado
    let req = test::TestRequest::get().uri("/bloques?cursoId=c2").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!([]));

    let req = test::TestRequest::post()
        .uri(&format!("/editor/sesiones/{}/guardar", sesion))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], 1);

    let req = test::TestRequest::get().uri("/bloques?cursoId=c2").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let req = test::TestRequest::delete()
        .uri(&format!("/editor/sesiones/{}", sesion))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    let req = test::TestRequest::get()
        .uri(&format!("/editor/sesiones/{}/grilla", sesion))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_conflicto_de_docente_es_409() {
    let (_dir, state) = estado(None);
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/editor/sesiones")
        .set_json(json!({"cursoId": "c2"}))
        .to_request();
    let creada: Value = test::call_and_read_body_json(&app, req).await;
    let sesion = creada["sesionId"].as_str().expect("Debe tener id").to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/editor/sesiones/{}/celdas/abrir", sesion))
        .set_json(json!({"diaIndex": 0, "moduloId": "m1"}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri(&format!("/editor/sesiones/{}/celdas/guardar", sesion))
        .set_json(json!({"materiaId": "mat1", "titularId": "d1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["codigo"], "conflicto");
}

#[actix_web::test]
async fn test_sesion_con_curso_inexistente() {
    let (_dir, state) = estado(None);
    let app = app!(state);
    let req = test::TestRequest::post()
        .uri("/editor/sesiones")
        .set_json(json!({"cursoId": "c99"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_token_protege_las_escrituras() {
    let (_dir, state) = estado(Some("secreto"));
    let app = app!(state);

    let nuevo = json!({"nombre": "Ana", "apellido": "Paz"});
    let req = test::TestRequest::post().uri("/docentes").set_json(&nuevo).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/docentes")
        .insert_header((header::AUTHORIZATION, "Bearer secreto"))
        .set_json(&nuevo)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let creado: Value = test::read_body_json(resp).await;
    assert!(creado["id"].as_str().is_some_and(|id| id.starts_with("d_")));

    // las lecturas siguen abiertas
    let req = test::TestRequest::get().uri("/docentes").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().map(Vec::len), Some(10));
}

#[actix_web::test]
async fn test_abm_de_asignaciones() {
    let (_dir, state) = estado(None);
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/asignaciones")
        .set_json(json!({"docenteId": "d9", "materiaId": "mat1", "condicion": "titular_interino"}))
        .to_request();
    let a: Value = test::call_and_read_body_json(&app, req).await;
    let id = a["id"].as_str().expect("Debe tener id").to_string();

    let req = test::TestRequest::get().uri("/materias").to_request();
    let materias: Value = test::call_and_read_body_json(&app, req).await;
    let mat1 = materias
        .as_array()
        .and_then(|m| m.iter().find(|m| m["id"] == "mat1"))
        .expect("Debe estar mat1");
    assert_eq!(mat1["docenteIds"], json!(["d1", "d2", "d9"]));

    let req = test::TestRequest::delete().uri(&format!("/asignaciones/{}", id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    let req = test::TestRequest::delete().uri(&format!("/asignaciones/{}", id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_vistas_y_descargas() {
    let (_dir, state) = estado(None);
    let app = app!(state);

    let req = test::TestRequest::get().uri("/vistas/docentes/d4").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["totalHoras"], 2);

    let req = test::TestRequest::get().uri("/estadisticas").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["totalBloques"], 9);

    let req = test::TestRequest::get().uri("/exportar").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    );
    let disposicion = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposicion.contains("Horarios.xlsx"));

    let req = test::TestRequest::get().uri("/imprimir/c1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&html).contains("Curso 1° 1°"));

    let req = test::TestRequest::get().uri("/imprimir/c99").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_config_guarda_la_url() {
    let (dir, state) = estado(None);
    let app = app!(state);

    let req = test::TestRequest::get().uri("/config").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["origen"], "ejemplo");
    assert_eq!(body["protegido"], false);

    let req = test::TestRequest::get().uri("/config/probar").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/config/url")
        .set_json(json!({"scriptUrl": "ftp://x"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let url = "https://script.google.com/macros/s/abc/exec";
    let req = test::TestRequest::post()
        .uri("/config/url")
        .set_json(json!({"scriptUrl": url}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["activa"], true);
    assert!(dir.path().join("config.json").exists());

    let req = test::TestRequest::get().uri("/config").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["scriptUrl"], url);
    assert_eq!(body["origen"], "archivo");
}
