// ============================================================================
// MAP VIEWMODEL - Popups de marcadores
// ============================================================================

/// Popup de un vehículo en movimiento: "Vehicle <id><br>Speed: <speed> km/h"
pub fn location_popup(vehicle_id: &str, speed: f64) -> String {
    format!("Vehicle {}<br>Speed: {} km/h", escape_html(vehicle_id), speed)
}

/// El vehicle_id viene del servidor y termina en innerHTML del popup
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
