use actix_web::{HttpResponse, Responder};
use serde_json::json;

use crate::editor::FormularioCelda;
use crate::models::Grupo;

pub async fn help_handler() -> impl Responder {
    let formulario = FormularioCelda {
        materia_id: "mat8".to_string(),
        titular_id: "d2".to_string(),
        condicion_titular: None,
        suplentes: vec!["d8".to_string()],
        grupo: Some(Grupo::A),
    };

    let help = json!({
        "description": "API de horarios escolares. Las rutas de escritura piden 'Authorization: Bearer <token>' cuando HORARIOS_TOKEN está definido.",
        "catalogo": ["GET /catalogo", "POST /recargar", "GET /bloques?cursoId=c1"],
        "abm": "GET|POST /docentes, PUT|DELETE /docentes/{id} (igual para /materias, /cursos, /modulos, /asignaciones)",
        "asignar_example": {"docenteId": "d1", "materiaId": "mat1", "condicion": "titular_interino"},
        "editor": [
            "POST /editor/sesiones {cursoId}",
            "GET /editor/sesiones/{id}/grilla",
            "POST /editor/sesiones/{id}/curso {cursoId}",
            "POST /editor/sesiones/{id}/celdas/abrir {diaIndex, moduloId, grupo?}",
            "POST /editor/sesiones/{id}/celdas/cerrar",
            "POST /editor/sesiones/{id}/celdas/guardar (formulario)",
            "DELETE /editor/sesiones/{id}/bloques/{bloqueId}",
            "POST /editor/sesiones/{id}/mover {bloqueId, destino: 'cell-{cursoId}-{diaIndex}-{moduloId}'}",
            "POST /editor/sesiones/{id}/guardar",
            "DELETE /editor/sesiones/{id}"
        ],
        "formulario_example": formulario,
        "vistas": ["GET /vistas/docentes/{id}", "GET /estadisticas", "GET /exportar", "GET /imprimir/{cursoId}"],
        "config": ["GET /config", "POST /config/url {scriptUrl}", "GET /config/probar"],
        "note": "diaIndex: 0 = Lunes ... 4 = Viernes. Los módulos de recreo no admiten bloques."
    });

    HttpResponse::Ok().json(help)
}
