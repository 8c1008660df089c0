use chrono::{DateTime, Utc};

/// Fecha corta al estilo ru-RU (`dd.mm.yyyy`)
pub fn format_date(value: &DateTime<Utc>) -> String {
    value.format("%d.%m.%Y").to_string()
}

pub fn format_optional_date(value: Option<&DateTime<Utc>>) -> String {
    value
        .map(format_date)
        .unwrap_or_else(|| crate::utils::EMPTY_PLACEHOLDER.to_string())
}

/// Tamaño legible de un adjunto
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
