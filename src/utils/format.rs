use chrono::{DateTime, NaiveDateTime, Utc};

use crate::config::EXPLORER_TX_BASE;

#[cfg(feature = "web")]
pub fn pad2(n: i32) -> String {
    if n < 10 {
        format!("0{}", n)
    } else {
        n.to_string()
    }
}

/// Accepts RFC 3339 and the backend's naive ISO form (no offset, read as UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
}

/// HH:MM:SS in the browser's local time zone.
#[cfg(feature = "web")]
pub fn format_clock(ms: i64) -> String {
    use js_sys::Date;
    let d = Date::new(&wasm_bindgen::JsValue::from_f64(ms as f64));
    if d.get_time().is_nan() {
        return String::new();
    }
    format!(
        "{}:{}:{}",
        pad2(d.get_hours() as i32),
        pad2(d.get_minutes() as i32),
        pad2(d.get_seconds() as i32)
    )
}

#[cfg(not(feature = "web"))]
pub fn format_clock(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Empty for a missing value; otherwise the shortest form (`9`, `8.5`).
pub fn format_cell(v: Option<f64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

/// Explorer link for a transaction; `None` when there is nothing to link.
pub fn tx_url(tx_hash: Option<&str>) -> Option<String> {
    match tx_hash {
        Some(h) if !h.is_empty() => Some(format!("{EXPLORER_TX_BASE}{h}")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_render_like_the_wire_value() {
        assert_eq!(format_cell(Some(9.0)), "9");
        assert_eq!(format_cell(Some(8.5)), "8.5");
        assert_eq!(format_cell(Some(-5.25)), "-5.25");
        assert_eq!(format_cell(None), "");
    }

    #[test]
    fn parses_backend_timestamps() {
        let a = parse_timestamp("2024-05-01T10:00:00.123456Z").unwrap();
        let b = parse_timestamp("2024-05-01T10:00:00.123456").unwrap();
        assert_eq!(a, b);
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn clock_is_hh_mm_ss() {
        let ms = parse_timestamp("2024-05-01T07:08:09Z")
            .unwrap()
            .timestamp_millis();
        assert_eq!(format_clock(ms), "07:08:09");
    }

    #[test]
    fn tx_links_need_a_hash() {
        assert_eq!(
            tx_url(Some("0xabc")).as_deref(),
            Some("https://sepolia.etherscan.io/tx/0xabc")
        );
        assert_eq!(tx_url(Some("")), None);
        assert_eq!(tx_url(None), None);
    }
}
