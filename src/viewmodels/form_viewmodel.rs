// ============================================================================
// FORM VIEWMODEL - Dropdowns y payloads de creación
// ============================================================================
// Sin validación propia: los campos numéricos vacíos viajan como null y el
// backend decide. La única comprobación es que las opciones elegidas en el
// formulario de ruta sigan existiendo al enviar.
// ============================================================================

use std::collections::HashMap;

use serde_json::Value;

use crate::error::ApiError;
use crate::models::{
    CreateCargoRequest, CreateRouteRequest, CreateUserRequest, CreateVehicleRequest, ResourceKind,
    SessionUser,
};
use crate::services::ApiClient;
use crate::viewmodels::table_viewmodel::{field_text, normalize};

/// Opción de un <select>
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Valores crudos de un formulario, por nombre de campo
#[derive(Debug, Clone, Default)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.0.insert(name.to_string(), value.to_string());
    }

    pub fn text(&self, name: &str) -> String {
        self.0.get(name).cloned().unwrap_or_default()
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(|raw| raw.trim().parse::<f64>().ok()).filter(|n| n.is_finite())
    }

    pub fn integer(&self, name: &str) -> Option<i32> {
        self.number(name).map(|n| n.trunc() as i32)
    }

    /// Leer los campos del formulario de `kind` con `read` (en el navegador, el DOM)
    pub fn capture<F>(kind: ResourceKind, read: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        let mut fields = Self::new();
        for &id in field_ids(kind) {
            fields.insert(id, &read(id));
        }
        fields
    }
}

/// Campos de cada formulario (id del input en el DOM)
pub const VEHICLE_FIELDS: [&str; 6] = ["licensePlate", "make", "model", "year", "capacity", "fuelType"];
pub const CARGO_FIELDS: [&str; 5] = ["cargoDescription", "cargoWeight", "cargoVolume", "cargoType", "cargoPriority"];
pub const ROUTE_FIELDS: [&str; 9] = [
    "sourceAddress", "sourceLat", "sourceLng", "destAddress", "destLat", "destLng",
    "routeVehicle", "routeDriver", "routeCargo",
];
pub const USER_FIELDS: [&str; 4] = ["userUsername", "userEmail", "userPassword", "userRole"];

pub fn field_ids(kind: ResourceKind) -> &'static [&'static str] {
    match kind {
        ResourceKind::Vehicles => &VEHICLE_FIELDS,
        ResourceKind::Cargo => &CARGO_FIELDS,
        ResourceKind::Routes => &ROUTE_FIELDS,
        ResourceKind::Users => &USER_FIELDS,
    }
}

/// Id del <form> de alta de `kind`
pub fn form_element_id(kind: ResourceKind) -> String {
    format!("{}Form", kind.singular())
}

pub fn vehicle_request(fields: &FormFields) -> CreateVehicleRequest {
    CreateVehicleRequest {
        license_plate: fields.text("licensePlate"),
        make: fields.text("make"),
        model: fields.text("model"),
        year: fields.integer("year"),
        capacity: fields.number("capacity"),
        fuel_type: fields.text("fuelType"),
    }
}

/// Remitente y destinatario = usuario conectado
pub fn cargo_request(fields: &FormFields, user: &SessionUser) -> CreateCargoRequest {
    CreateCargoRequest {
        description: fields.text("cargoDescription"),
        weight: fields.number("cargoWeight"),
        volume: fields.number("cargoVolume"),
        cargo_type: fields.text("cargoType"),
        priority: fields.text("cargoPriority"),
        shipper_id: user.id.clone(),
        consignee_id: user.id.clone(),
    }
}

pub fn route_request(fields: &FormFields) -> CreateRouteRequest {
    CreateRouteRequest {
        source_address: fields.text("sourceAddress"),
        source_lat: fields.number("sourceLat"),
        source_lng: fields.number("sourceLng"),
        destination_address: fields.text("destAddress"),
        destination_lat: fields.number("destLat"),
        destination_lng: fields.number("destLng"),
        vehicle_id: fields.text("routeVehicle"),
        driver_id: fields.text("routeDriver"),
        cargo_id: fields.text("routeCargo"),
    }
}

pub fn user_request(fields: &FormFields) -> CreateUserRequest {
    CreateUserRequest {
        username: fields.text("userUsername"),
        email: fields.text("userEmail"),
        password: fields.text("userPassword"),
        role: fields.text("userRole"),
    }
}

/// Alerta tras un alta correcta
pub fn success_message(kind: ResourceKind) -> String {
    match kind {
        ResourceKind::Routes => "Route created successfully!".to_string(),
        _ => format!("{} saved successfully!", capitalize(kind.singular())),
    }
}

/// Alerta tras un alta fallida
pub fn failure_message(kind: ResourceKind) -> String {
    match kind {
        ResourceKind::Routes => "Failed to create route. Please try again.".to_string(),
        _ => format!("Failed to save {}. Please try again.", kind.singular()),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Opciones de los tres dropdowns del formulario de rutas
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteFormOptions {
    pub vehicles: Vec<SelectOption>,
    pub drivers: Vec<SelectOption>,
    pub cargo: Vec<SelectOption>,
}

impl RouteFormOptions {
    pub fn from_snapshots(vehicles: &[Value], users: &[Value], cargo: &[Value]) -> Self {
        Self {
            vehicles: vehicles
                .iter()
                .map(|v| SelectOption {
                    value: field_text(v, "id"),
                    label: format!(
                        "{} - {} {}",
                        field_text(v, "license_plate"),
                        field_text(v, "make"),
                        field_text(v, "model")
                    ),
                })
                .collect(),
            drivers: users
                .iter()
                .filter(|u| field_text(u, "role") == "Driver")
                .map(|u| SelectOption {
                    value: field_text(u, "id"),
                    label: field_text(u, "username"),
                })
                .collect(),
            cargo: cargo
                .iter()
                .filter(|c| normalize(&field_text(c, "status")) == "pending")
                .map(|c| SelectOption {
                    value: field_text(c, "id"),
                    label: field_text(c, "description"),
                })
                .collect(),
        }
    }

    /// Tres GET en paralelo (vehículos, usuarios, carga)
    pub async fn load(api: &ApiClient) -> Result<Self, ApiError> {
        let (vehicles, users, cargo) = futures::join!(
            api.list(ResourceKind::Vehicles),
            api.list(ResourceKind::Users),
            api.list(ResourceKind::Cargo),
        );
        Ok(Self::from_snapshots(&vehicles?, &users?, &cargo?))
    }

    /// Comprobar que lo elegido sigue en las listas actuales.
    /// Una selección vacía se deja pasar: el backend la rechazará.
    pub fn check_selection(&self, request: &CreateRouteRequest) -> Result<(), String> {
        let checks = [
            ("vehicle", &request.vehicle_id, &self.vehicles),
            ("driver", &request.driver_id, &self.drivers),
            ("cargo", &request.cargo_id, &self.cargo),
        ];
        for (label, selected, options) in checks {
            if !selected.is_empty() && !options.iter().any(|o| &o.value == selected) {
                return Err(format!(
                    "The selected {} is no longer available. Please choose again.",
                    label
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use serde_json::json;

    #[test]
    fn alert_texts_follow_resource_kind() {
        assert_eq!(success_message(ResourceKind::Vehicles), "Vehicle saved successfully!");
        assert_eq!(success_message(ResourceKind::Routes), "Route created successfully!");
        assert_eq!(failure_message(ResourceKind::Cargo), "Failed to save cargo. Please try again.");
        assert_eq!(failure_message(ResourceKind::Routes), "Failed to create route. Please try again.");
    }

    #[test]
    fn capture_reads_only_the_fields_of_that_form() {
        let typed = FormFields::capture(ResourceKind::Cargo, |id| match id {
            "cargoDescription" => "Pallets".to_string(),
            "licensePlate" => "XY-99".to_string(),
            _ => String::new(),
        });
        assert_eq!(typed.text("cargoDescription"), "Pallets");
        assert_eq!(typed.text("cargoWeight"), "");
        assert_eq!(typed.text("licensePlate"), "");
        assert_eq!(form_element_id(ResourceKind::Cargo), "cargoForm");
    }

    #[test]
    fn blank_numbers_are_sent_as_null() {
        let fields = FormFields::new()
            .with("licensePlate", "XY-99")
            .with("year", "2019")
            .with("capacity", "")
            .with("fuelType", "electric");
        let request = vehicle_request(&fields);
        assert_eq!(request.year, Some(2019));
        assert_eq!(request.capacity, None);
        assert_eq!(request.make, "");

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["capacity"], Value::Null);
        assert_eq!(body["license_plate"], "XY-99");
    }

    #[test]
    fn cargo_is_shipped_by_the_current_user() {
        let user = SessionUser { id: "u-42".into(), username: "ops".into(), role: Role::Dispatcher };
        let fields = FormFields::new().with("cargoWeight", "12.5").with("cargoPriority", "high");
        let request = cargo_request(&fields, &user);
        assert_eq!(request.shipper_id, "u-42");
        assert_eq!(request.consignee_id, "u-42");
        assert_eq!(request.weight, Some(12.5));
    }

    fn options() -> RouteFormOptions {
        RouteFormOptions::from_snapshots(
            &[json!({"id": "v1", "license_plate": "AA-1", "make": "MAN", "model": "TGX"})],
            &[
                json!({"id": "d1", "username": "driver1", "role": "Driver"}),
                json!({"id": "a1", "username": "boss", "role": "Admin"}),
            ],
            &[
                json!({"id": "c1", "description": "Pallets", "status": "pending"}),
                json!({"id": "c2", "description": "Steel", "status": "delivered"}),
            ],
        )
    }

    #[test]
    fn dropdowns_keep_drivers_and_pending_cargo_only() {
        let options = options();
        assert_eq!(options.vehicles[0].label, "AA-1 - MAN TGX");
        assert_eq!(options.drivers.len(), 1);
        assert_eq!(options.drivers[0].value, "d1");
        assert_eq!(options.cargo, vec![SelectOption { value: "c1".into(), label: "Pallets".into() }]);
    }

    #[test]
    fn stale_selection_is_rejected() {
        let options = options();
        let fresh = route_request(
            &FormFields::new().with("routeVehicle", "v1").with("routeDriver", "d1").with("routeCargo", "c1"),
        );
        assert!(options.check_selection(&fresh).is_ok());

        // c2 ya fue entregada entre que se abrió el formulario y el envío
        let stale = route_request(
            &FormFields::new().with("routeVehicle", "v1").with("routeDriver", "d1").with("routeCargo", "c2"),
        );
        let err = options.check_selection(&stale).unwrap_err();
        assert!(err.contains("cargo"));
    }
}
