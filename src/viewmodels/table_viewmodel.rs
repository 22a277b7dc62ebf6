// ============================================================================
// TABLE VIEWMODEL - Registros JSON -> filas de tabla
// ============================================================================
// SOLO preparación de datos - Sin DOM. Los campos ausentes o con tipo raro
// se muestran como celdas vacías, nunca fallan.
// ============================================================================

use serde_json::Value;

use crate::models::ResourceKind;

/// Celda de tabla
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    /// Badge con clase bootstrap bg-<color>
    Badge { text: String, color: &'static str },
}

impl Cell {
    pub fn text(&self) -> &str {
        match self {
            Cell::Text(text) => text,
            Cell::Badge { text, .. } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

/// Lo que muestra una vista de listado
#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    Empty(&'static str),
    Table(TableModel),
}

pub fn empty_message(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Vehicles => "No vehicles registered yet.",
        ResourceKind::Cargo => "No cargo registered yet.",
        ResourceKind::Routes => "No routes created yet.",
        ResourceKind::Users => "No users found.",
    }
}

pub fn list_view(kind: ResourceKind, records: &[Value]) -> ListView {
    if records.is_empty() {
        return ListView::Empty(empty_message(kind));
    }
    let table = match kind {
        ResourceKind::Vehicles => TableModel {
            headers: vec!["License Plate", "Make/Model", "Year", "Capacity", "Fuel Type", "Status"],
            rows: records.iter().map(vehicle_row).collect(),
        },
        ResourceKind::Cargo => TableModel {
            headers: vec!["Description", "Weight", "Volume", "Type", "Priority", "Status"],
            rows: records.iter().map(cargo_row).collect(),
        },
        ResourceKind::Routes => TableModel {
            headers: vec!["Source", "Destination", "Distance", "Duration", "Status"],
            rows: records.iter().map(route_row).collect(),
        },
        ResourceKind::Users => TableModel {
            headers: vec!["Username", "Email", "Role", "Created"],
            rows: records.iter().map(user_row).collect(),
        },
    };
    ListView::Table(table)
}

fn vehicle_row(vehicle: &Value) -> Vec<Cell> {
    let make_model = format!("{} {}", field_text(vehicle, "make"), field_text(vehicle, "model"));
    vec![
        Cell::Text(field_text(vehicle, "license_plate")),
        Cell::Text(make_model.trim().to_string()),
        Cell::Text(field_text(vehicle, "year")),
        Cell::Text(with_unit(vehicle, "capacity", "kg")),
        Cell::Text(field_text(vehicle, "fuel_type")),
        status_badge(vehicle),
    ]
}

fn cargo_row(item: &Value) -> Vec<Cell> {
    let priority = field_text(item, "priority");
    vec![
        Cell::Text(field_text(item, "description")),
        Cell::Text(with_unit(item, "weight", "kg")),
        Cell::Text(with_unit(item, "volume", "m³")),
        Cell::Text(field_text(item, "cargo_type")),
        Cell::Badge { color: priority_color(&priority), text: priority },
        status_badge(item),
    ]
}

fn route_row(route: &Value) -> Vec<Cell> {
    // 0 o ausente = N/A
    let distance = positive_number(route, "estimated_distance")
        .map(|km| format!("{:.2} km", km))
        .unwrap_or_else(|| "N/A".to_string());
    let duration = positive_number(route, "estimated_duration")
        .map(|seconds| format!("{} min", (seconds / 60.0).round()))
        .unwrap_or_else(|| "N/A".to_string());
    vec![
        Cell::Text(field_text(route, "source_address")),
        Cell::Text(field_text(route, "destination_address")),
        Cell::Text(distance),
        Cell::Text(duration),
        status_badge(route),
    ]
}

fn user_row(user: &Value) -> Vec<Cell> {
    vec![
        Cell::Text(field_text(user, "username")),
        Cell::Text(field_text(user, "email")),
        Cell::Badge { text: field_text(user, "role"), color: "info" },
        Cell::Text(created_date(&field_text(user, "created_at"))),
    ]
}

fn status_badge(record: &Value) -> Cell {
    let status = field_text(record, "status");
    Cell::Badge { color: status_color(&status), text: status }
}

/// Valor de un campo como texto; null/ausente/objeto = ""
pub fn field_text(record: &Value, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn with_unit(record: &Value, key: &str, unit: &str) -> String {
    let value = field_text(record, key);
    if value.is_empty() {
        value
    } else {
        format!("{} {}", value, unit)
    }
}

fn positive_number(record: &Value, key: &str) -> Option<f64> {
    record.get(key).and_then(Value::as_f64).filter(|n| *n != 0.0)
}

/// "2024-03-05T10:00:00Z" -> "2024-03-05"
pub fn created_date(raw: &str) -> String {
    if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%Y-%m-%d").to_string();
    }
    raw.split('T').next().unwrap_or_default().to_string()
}

pub fn status_color(status: &str) -> &'static str {
    match normalize(status).as_str() {
        "available" | "completed" | "delivered" => "success",
        "inuse" | "inprogress" | "assigned" | "intransit" => "warning",
        "maintenance" | "outofservice" | "cancelled" => "danger",
        "planned" | "pending" => "info",
        _ => "secondary",
    }
}

pub fn priority_color(priority: &str) -> &'static str {
    match normalize(priority).as_str() {
        "urgent" => "danger",
        "high" => "warning",
        "medium" => "info",
        "low" => "success",
        _ => "secondary",
    }
}

/// "InProgress", "in_progress", "inprogress" -> "inprogress"
pub fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_vehicle_list_shows_message_not_table() {
        assert_eq!(
            list_view(ResourceKind::Vehicles, &[]),
            ListView::Empty("No vehicles registered yet.")
        );
        assert_eq!(list_view(ResourceKind::Users, &[]), ListView::Empty("No users found."));
    }

    #[test]
    fn vehicle_rows_format_units_and_badges() {
        let records = vec![json!({
            "license_plate": "AB-123-CD",
            "make": "Volvo",
            "model": "FH16",
            "year": 2021,
            "capacity": 18000.5,
            "fuel_type": "diesel",
            "status": "Available"
        })];
        let ListView::Table(table) = list_view(ResourceKind::Vehicles, &records) else {
            panic!("expected a table");
        };
        assert_eq!(table.headers.len(), 6);
        let row = &table.rows[0];
        assert_eq!(row[1].text(), "Volvo FH16");
        assert_eq!(row[2].text(), "2021");
        assert_eq!(row[3].text(), "18000.5 kg");
        assert_eq!(row[5], Cell::Badge { text: "Available".to_string(), color: "success" });
    }

    #[test]
    fn missing_fields_render_as_empty_cells() {
        let ListView::Table(table) = list_view(ResourceKind::Cargo, &[json!({"description": 42})]) else {
            panic!("expected a table");
        };
        let row = &table.rows[0];
        assert_eq!(row[0].text(), "42");
        assert_eq!(row[1].text(), "");
        assert_eq!(row[4], Cell::Badge { text: String::new(), color: "secondary" });
    }

    #[test]
    fn route_distance_and_duration_fall_back_to_na() {
        let records = vec![
            json!({"source_address": "A", "destination_address": "B",
                   "estimated_distance": 12.3456, "estimated_duration": 1530, "status": "inprogress"}),
            json!({"source_address": "C", "destination_address": "D",
                   "estimated_distance": 0.0, "status": "planned"}),
        ];
        let ListView::Table(table) = list_view(ResourceKind::Routes, &records) else {
            panic!("expected a table");
        };
        assert_eq!(table.rows[0][2].text(), "12.35 km");
        assert_eq!(table.rows[0][3].text(), "26 min");
        assert_eq!(table.rows[1][2].text(), "N/A");
        assert_eq!(table.rows[1][3].text(), "N/A");
    }

    #[test]
    fn user_created_column_shows_date_only() {
        assert_eq!(created_date("2024-03-05T10:20:30.123456Z"), "2024-03-05");
        assert_eq!(created_date("2024-03-05"), "2024-03-05");
        assert_eq!(created_date(""), "");
    }

    #[test]
    fn colours_ignore_case_and_separators() {
        assert_eq!(status_color("InProgress"), "warning");
        assert_eq!(status_color("out_of_service"), "danger");
        assert_eq!(status_color("pending"), "info");
        assert_eq!(status_color("???"), "secondary");
        assert_eq!(priority_color("Urgent"), "danger");
        assert_eq!(priority_color("low"), "success");
    }
}
