use serde::{Deserialize, Serialize};

/// Tipo de mensaje reconocido en el canal /ws
pub const LOCATION_UPDATE: &str = "location_update";

/// Frame del WebSocket: {message_type, data}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedMessage {
    pub message_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Posición de un vehículo empujada por el backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub vehicle_id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub speed: f64,
}

/// Vehículo de demostración sembrado al abrir el mapa
#[derive(Debug, Clone, PartialEq)]
pub struct SampleVehicle {
    pub id: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub name: &'static str,
}

pub const SAMPLE_VEHICLES: [SampleVehicle; 3] = [
    SampleVehicle { id: "1", latitude: 51.505, longitude: -0.09, name: "Truck 001" },
    SampleVehicle { id: "2", latitude: 51.51, longitude: -0.1, name: "Truck 002" },
    SampleVehicle { id: "3", latitude: 51.49, longitude: -0.08, name: "Truck 003" },
];
