// Planilla imprimible de un curso en HTML estático.

use std::fmt::Write;

use crate::error::HorarioError;
use crate::gateway::normalizar::{formatear_hora, modulo_ids_equivalentes};
use crate::models::{Condicion, Dia, Grupo};
use crate::store::Catalogo;
use crate::vistas::{describir_bloque, VistaDocenteBloque, SIN_DATO};

const VERDE: &str = "#0B6B2E";
const DORADO: &str = "#D4AF37";

fn escapar(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn color_condicion(c: Option<Condicion>) -> &'static str {
    match c {
        Some(Condicion::Titular) => "#1e40af",
        Some(Condicion::TitularInterino) => "#92400e",
        Some(Condicion::Suplente) => "#166534",
        Some(Condicion::Provisional) => "#991b1b",
        None => "#374151",
    }
}

fn color_grupo(g: Grupo) -> &'static str {
    match g {
        Grupo::A => "#92400e",
        Grupo::B => "#5b21b6",
    }
}

fn linea_docente(html: &mut String, d: &VistaDocenteBloque) {
    // los docentes inexistentes no se imprimen
    if d.nombre == SIN_DATO {
        return;
    }
    let abrev = d.condicion.map(|c| c.abreviatura()).unwrap_or("?");
    let _ = write!(
        html,
        "<p class=\"docente\" style=\"color:{}\">{} <small>({})</small></p>",
        color_condicion(d.condicion),
        escapar(&d.nombre),
        abrev
    );
}

/// Documento HTML listo para imprimir: encabezado con la escuela y el curso,
/// grilla con abreviaturas de condición (T, T.I, S, P) y pie con el año.
pub fn render_html(catalogo: &Catalogo, curso_id: &str, escuela: &str, anio: i32) -> Result<String, HorarioError> {
    let curso = catalogo
        .curso(curso_id)
        .ok_or_else(|| HorarioError::no_encontrado("Curso", curso_id))?;

    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n<title>Horario {curso}</title>\n\
<style>\nbody{{font-family:serif;margin:24px}}\nh1{{color:{VERDE};text-align:center;margin:0}}\n\
.sub{{text-align:center;color:#555}}\nh2{{color:{VERDE};text-align:center;border-bottom:2px solid {DORADO}}}\n\
table{{width:100%;border-collapse:collapse;font-size:12px}}\nth{{background:{VERDE};color:#fff;padding:6px}}\n\
td{{border:1px solid #ccc;padding:4px;vertical-align:top}}\ntr.recreo{{background:#FBF3D5}}\n\
p{{margin:0}}\n.materia{{font-weight:bold}}\nfooter{{display:flex;justify-content:space-between;color:#777;font-size:11px;margin-top:12px}}\n\
@media print{{body{{margin:0}}}}\n</style>\n</head>\n<body>\n",
        curso = escapar(&curso.nombre),
    );
    let _ = write!(
        html,
        "<h1>{}</h1>\n<p class=\"sub\">Sistema de Horarios Oficiales</p>\n<h2>Horario – Curso {}</h2>\n",
        escapar(escuela),
        escapar(&curso.nombre)
    );

    html.push_str("<table>\n<thead><tr><th>Módulo</th>");
    for d in Dia::TODOS {
        let _ = write!(html, "<th>{}</th>", d.nombre());
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for m in catalogo.modulos_ordenados() {
        let horario = format!("{} – {}", formatear_hora(&m.hora_inicio), formatear_hora(&m.hora_fin));
        if m.es_recreo() {
            let _ = write!(
                html,
                "<tr class=\"recreo\"><td><b>{}</b><br>{}</td>",
                escapar(&m.titulo()),
                horario
            );
            for _ in Dia::TODOS {
                let _ = write!(html, "<td style=\"text-align:center;color:{DORADO}\">—</td>");
            }
            html.push_str("</tr>\n");
            continue;
        }
        let _ = write!(html, "<tr><td><b>{}</b><br>{}</td>", escapar(&m.titulo()), horario);
        for dia in Dia::TODOS {
            html.push_str("<td>");
            let mut en_celda: Vec<_> = catalogo
                .bloques
                .iter()
                .filter(|b| b.curso_id == curso_id && b.dia == dia && modulo_ids_equivalentes(&b.modulo_id, &m.id))
                .collect();
            en_celda.sort_by_key(|b| b.grupo);
            for (i, b) in en_celda.into_iter().enumerate() {
                if i > 0 {
                    html.push_str("<hr>");
                }
                let v = describir_bloque(catalogo, b);
                let _ = write!(html, "<p class=\"materia\">{}", escapar(&v.materia));
                if let Some(g) = v.grupo {
                    let _ = write!(html, " <span style=\"color:{}\">(Gr. {})</span>", color_grupo(g), g);
                }
                html.push_str("</p>");
                linea_docente(&mut html, &v.titular);
                for s in &v.suplentes {
                    linea_docente(&mut html, s);
                }
            }
            html.push_str("</td>");
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    let _ = write!(
        html,
        "<footer><span>Dirección General de Cultura y Educación – Prov. de Buenos Aires</span><span>Año {}</span></footer>\n</body>\n</html>\n",
        anio
    );
    Ok(html)
}
