// Parseo tolerante de horas a minutos desde medianoche.

/// Convierte "07:30", "7:30", "0730", "07.30", "07:30:00" o "7:30 AM" a minutos.
/// Devuelve `None` si el texto no se puede interpretar.
pub fn hora_a_minutos(t: &str) -> Option<i32> {
    let mut tok = t.trim().to_uppercase().replace('.', ":");
    let pm = tok.ends_with("PM");
    tok = tok.replace("AM", "").replace("PM", "").trim().to_string();
    if tok.len() == 4 && tok.bytes().all(|b| b.is_ascii_digit()) {
        tok = format!("{}:{}", &tok[..2], &tok[2..]);
    }
    let parts: Vec<&str> = tok.split(':').collect();
    // "H:MM" o "H:MM:SS"; los segundos se ignoran
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }
    let mut hh = parts[0].trim().parse::<i32>().ok()?;
    let mm = parts[1].trim().parse::<i32>().ok()?;
    if !(0..60).contains(&mm) || !(0..24).contains(&hh) {
        return None;
    }
    if pm && hh < 12 {
        hh += 12;
    }
    Some(hh * 60 + mm)
}

/// "HH:MM" con ceros a la izquierda.
pub fn minutos_a_hora(min: i32) -> String {
    format!("{:02}:{:02}", min.div_euclid(60).rem_euclid(24), min.rem_euclid(60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acepta_formatos_habituales() {
        assert_eq!(hora_a_minutos("07:30"), Some(450));
        assert_eq!(hora_a_minutos(" 7:30 "), Some(450));
        assert_eq!(hora_a_minutos("0730"), Some(450));
        assert_eq!(hora_a_minutos("15:40:00"), Some(940));
        assert_eq!(hora_a_minutos("3:40 PM"), Some(940));
        assert_eq!(hora_a_minutos("nada"), None);
        assert_eq!(hora_a_minutos("25:00"), None);
    }

    #[test]
    fn texto_con_caracteres_multibyte_no_es_hora() {
        assert_eq!(hora_a_minutos("7°3"), None);
        assert_eq!(hora_a_minutos("1é2"), None);
        assert_eq!(hora_a_minutos("7°30"), None);
        assert_eq!(hora_a_minutos("ñ:30"), None);
    }

    #[test]
    fn minutos_a_hora_rellena() {
        assert_eq!(minutos_a_hora(450), "07:30");
        assert_eq!(minutos_a_hora(940), "15:40");
    }
}
