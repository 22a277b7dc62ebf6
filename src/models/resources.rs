use serde::Serialize;

// ============================================================================
// RECURSOS REST - vehículos, carga, rutas, usuarios
// ============================================================================
// Los listados se manejan como serde_json::Value (lo que devuelve el servidor,
// sin validar). Solo los payloads de creación están tipados.
// ============================================================================

/// Colecciones expuestas por el backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Vehicles,
    Cargo,
    Routes,
    Users,
}

impl ResourceKind {
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Vehicles => "/api/vehicles",
            ResourceKind::Cargo => "/api/cargo",
            ResourceKind::Routes => "/api/routes",
            ResourceKind::Users => "/api/users",
        }
    }

    /// Nombre singular usado en las alertas ("Vehicle saved successfully!")
    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::Vehicles => "vehicle",
            ResourceKind::Cargo => "cargo",
            ResourceKind::Routes => "route",
            ResourceKind::Users => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateVehicleRequest {
    pub license_plate: String,
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub capacity: Option<f64>,
    pub fuel_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateCargoRequest {
    pub description: String,
    pub weight: Option<f64>,
    pub volume: Option<f64>,
    pub cargo_type: String,
    pub priority: String,
    pub shipper_id: String,
    pub consignee_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateRouteRequest {
    pub source_address: String,
    pub source_lat: Option<f64>,
    pub source_lng: Option<f64>,
    pub destination_address: String,
    pub destination_lat: Option<f64>,
    pub destination_lng: Option<f64>,
    pub vehicle_id: String,
    pub driver_id: String,
    pub cargo_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}
