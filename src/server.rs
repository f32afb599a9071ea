use std::collections::HashMap;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::algorithm::dobles_asignaciones;
use crate::config::Config;
use crate::editor::EditorHorarios;
use crate::excel::leer_planilla;
use crate::gateway::{cargar_catalogo, GatewayClient};
use crate::models::{Curso, Docente, DocenteMateriaAsignacion, Materia, Modulo};
use crate::server_handlers::*;
use crate::store::Catalogo;

/// Estado compartido entre workers.
///
/// Orden de locks cuando se necesitan varios: `sesiones`, luego `catalogo`.
pub struct AppState {
    pub config: Config,
    /// Copia confirmada: lo que ven las vistas y desde donde arrancan las sesiones.
    pub catalogo: RwLock<Catalogo>,
    /// Sesiones del editor (copias de trabajo) por id.
    pub sesiones: Mutex<HashMap<String, EditorHorarios>>,
    pub remoto: RwLock<Option<GatewayClient>>,
}

impl AppState {
    pub fn new(config: Config, catalogo: Catalogo) -> Self {
        let remoto = config
            .url_efectiva()
            .map(|url| GatewayClient::new(url, config.formato_post));
        AppState {
            config,
            catalogo: RwLock::new(catalogo),
            sesiones: Mutex::new(HashMap::new()),
            remoto: RwLock::new(remoto),
        }
    }

    /// Cliente de la planilla, si hay una URL configurada.
    pub async fn cliente(&self) -> Option<GatewayClient> {
        self.remoto.read().await.clone()
    }
}

/// Origen de los datos: planilla remota si hay URL, si no el libro local
/// (`HORARIOS_PLANILLA`), si no los datos de ejemplo.
pub async fn cargar_segun_config(config: &Config, remoto: Option<&GatewayClient>) -> Catalogo {
    let catalogo = match (remoto, config.planilla.clone()) {
        (Some(_), _) | (None, None) => cargar_catalogo(remoto).await,
        (None, Some(path)) => match tokio::task::spawn_blocking(move || leer_planilla(path)).await {
            Ok(Ok(c)) => c,
            Ok(Err(e)) => {
                warn!(error = %e, "no se pudo leer la planilla local; usando datos de ejemplo");
                Catalogo::demo()
            }
            Err(e) => {
                warn!(error = %e, "lectura de planilla interrumpida; usando datos de ejemplo");
                Catalogo::demo()
            }
        },
    };
    // la planilla puede traer dobles asignaciones cargadas a mano
    for (a, b) in dobles_asignaciones(&catalogo.bloques, config.politica) {
        warn!(
            bloque = %a.id,
            otro = %b.id,
            dia = a.dia.nombre(),
            modulo = %a.modulo_id,
            "docente con dos clases en el mismo módulo"
        );
    }
    catalogo
}

/// Rutas de la API; `run_server` y los tests las montan igual.
pub fn configurar_rutas(cfg: &mut web::ServiceConfig) {
    cfg.route("/help", web::get().to(help_handler))
        .route("/catalogo", web::get().to(catalogo_handler))
        .route("/recargar", web::post().to(recargar_handler))
        .route("/bloques", web::get().to(bloques_handler))
        // ABM
        .route("/docentes", web::get().to(listar_handler::<Docente>))
        .route("/docentes", web::post().to(crear_handler::<Docente>))
        .route("/docentes/{id}", web::put().to(actualizar_handler::<Docente>))
        .route("/docentes/{id}", web::delete().to(eliminar_handler::<Docente>))
        .route("/materias", web::get().to(listar_handler::<Materia>))
        .route("/materias", web::post().to(crear_handler::<Materia>))
        .route("/materias/{id}", web::put().to(actualizar_handler::<Materia>))
        .route("/materias/{id}", web::delete().to(eliminar_handler::<Materia>))
        .route("/cursos", web::get().to(listar_handler::<Curso>))
        .route("/cursos", web::post().to(crear_handler::<Curso>))
        .route("/cursos/{id}", web::put().to(actualizar_handler::<Curso>))
        .route("/cursos/{id}", web::delete().to(eliminar_handler::<Curso>))
        .route("/modulos", web::get().to(listar_handler::<Modulo>))
        .route("/modulos", web::post().to(crear_handler::<Modulo>))
        .route("/modulos/{id}", web::put().to(actualizar_handler::<Modulo>))
        .route("/modulos/{id}", web::delete().to(eliminar_handler::<Modulo>))
        .route("/asignaciones", web::get().to(listar_handler::<DocenteMateriaAsignacion>))
        .route("/asignaciones", web::post().to(asignar_handler))
        .route("/asignaciones/{id}", web::put().to(actualizar_handler::<DocenteMateriaAsignacion>))
        .route("/asignaciones/{id}", web::delete().to(desasignar_handler))
        // editor
        .route("/editor/sesiones", web::post().to(crear_sesion_handler))
        .route("/editor/sesiones/{id}", web::delete().to(cerrar_sesion_handler))
        .route("/editor/sesiones/{id}/grilla", web::get().to(grilla_handler))
        .route("/editor/sesiones/{id}/curso", web::post().to(seleccionar_curso_handler))
        .route("/editor/sesiones/{id}/celdas/abrir", web::post().to(abrir_celda_handler))
        .route("/editor/sesiones/{id}/celdas/cerrar", web::post().to(cerrar_celda_handler))
        .route("/editor/sesiones/{id}/celdas/guardar", web::post().to(guardar_celda_handler))
        .route("/editor/sesiones/{id}/bloques/{bloque_id}", web::delete().to(quitar_bloque_handler))
        .route("/editor/sesiones/{id}/mover", web::post().to(mover_handler))
        .route("/editor/sesiones/{id}/guardar", web::post().to(guardar_sesion_handler))
        // vistas
        .route("/vistas/docentes/{id}", web::get().to(vista_docente_handler))
        .route("/estadisticas", web::get().to(estadisticas_handler))
        .route("/exportar", web::get().to(exportar_handler))
        .route("/imprimir/{curso_id}", web::get().to(imprimir_handler))
        // configuración
        .route("/config", web::get().to(config_handler))
        .route("/config/url", web::post().to(config_url_handler))
        .route("/config/probar", web::get().to(probar_conexion_handler));
}

pub async fn run_server(config: Config, catalogo: Catalogo) -> std::io::Result<()> {
    let bind = config.bind.clone();
    let state = web::Data::new(AppState::new(config, catalogo));
    info!(%bind, "escuchando");
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .configure(configurar_rutas)
    })
    .bind(bind)?
    .run()
    .await
}
