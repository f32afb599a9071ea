use horarios::gateway::normalizar::{
    formatear_hora, modulo_ids_equivalentes, normalizar_condicion, normalizar_tipo, resolver_modulo_id,
};
use horarios::models::{Condicion, TipoModulo};
use horarios::store::demo;

#[test]
fn test_formatear_hora() {
    assert_eq!(formatear_hora("7:30"), "07:30");
    assert_eq!(formatear_hora(" 08:15:00 "), "08:15");
    // la planilla serializa las horas como fechas de 1899 en UTC
    assert_eq!(formatear_hora("1899-12-30T15:40:00.000Z"), "07:40");
    assert_eq!(formatear_hora("1899-12-30T03:00:00.000Z"), "19:00");
    assert_eq!(formatear_hora(""), "");
    assert_eq!(formatear_hora("mañana"), "mañana");
    // una celda corrida de la planilla se devuelve tal cual
    assert_eq!(formatear_hora("7°3"), "7°3");
    assert_eq!(formatear_hora("1é2"), "1é2");
}

#[test]
fn test_modulo_con_hora_ilegible_va_al_final() {
    let mut c = horarios::store::Catalogo::demo();
    if let Some(m) = c.modulos.iter_mut().find(|m| m.id == "m1") {
        m.hora_inicio = "7°3".to_string();
    }
    let ids: Vec<&str> = c.modulos_ordenados().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids.last().copied(), Some("m1"));
    assert_eq!(ids.len(), c.modulos.len());
}

#[test]
fn test_normalizar_condicion() {
    assert_eq!(normalizar_condicion("Titular Interino"), Some(Condicion::TitularInterino));
    assert_eq!(normalizar_condicion("titular-interino"), Some(Condicion::TitularInterino));
    assert_eq!(normalizar_condicion("SUPLENTE"), Some(Condicion::Suplente));
    assert_eq!(normalizar_condicion("P"), Some(Condicion::Provisional));
    assert_eq!(normalizar_condicion(""), None);
    assert_eq!(normalizar_condicion("interino"), None);
}

#[test]
fn test_normalizar_tipo() {
    assert_eq!(normalizar_tipo("TALLER", None, "m4"), TipoModulo::Taller);
    assert_eq!(normalizar_tipo("Teoría", None, "m3"), TipoModulo::Teoria);
    assert_eq!(normalizar_tipo("", Some("Recreo largo"), "x"), TipoModulo::Recreo);
    assert_eq!(normalizar_tipo("", None, "recreo2"), TipoModulo::Recreo);
    assert_eq!(normalizar_tipo("otro", None, "m9"), TipoModulo::Clase);
}

#[test]
fn test_resolver_modulo_id() {
    let modulos = demo::modulos();
    let id = |s: &str| resolver_modulo_id(s, &modulos).map(|m| m.id.as_str());
    assert_eq!(id("m2"), Some("m2"));
    assert_eq!(id(" m2 "), Some("m2"));
    assert_eq!(id("5"), Some("m5"));
    assert_eq!(id("m99"), None);
    assert_eq!(id("mod3 teoria"), None);
}

#[test]
fn test_resolver_por_prefijo_mod() {
    let mut modulos = demo::modulos();
    modulos[0].id = "mod1 07:30".to_string();
    let m = resolver_modulo_id("mod1 otra", &modulos).expect("Debe resolver por el primer token");
    assert_eq!(m.numero, 1);
}

#[test]
fn test_ids_equivalentes_es_simetrica() {
    let pares = [("m1", " m1"), ("mod2 a", "mod2 b"), ("m1", "m2"), ("x y", "x z")];
    for (a, b) in pares {
        assert_eq!(modulo_ids_equivalentes(a, b), modulo_ids_equivalentes(b, a));
    }
    assert!(modulo_ids_equivalentes("m1", " m1"));
    assert!(modulo_ids_equivalentes("mod2 a", "mod2 b"));
    assert!(!modulo_ids_equivalentes("x y", "x z"));
}
