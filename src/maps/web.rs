use super::MarkerLayer;
use crate::utils::leaflet_ffi::{init_vehicle_map, refresh_vehicle_map, upsert_vehicle_marker};
use crate::utils::MAP_CONTAINER_ID;

/// Capa de marcadores para web usando Leaflet (index.html expone las funciones)
#[derive(Default)]
pub struct LeafletLayer;

impl LeafletLayer {
    pub fn new() -> Self {
        Self
    }
}

impl MarkerLayer for LeafletLayer {
    fn init(&mut self, center: (f64, f64), zoom: f64) {
        log::info!("🗺️ [MAP] Inicializando Leaflet en #{} ({}, {}) zoom {}",
                   MAP_CONTAINER_ID, center.0, center.1, zoom);
        init_vehicle_map(MAP_CONTAINER_ID, center.0, center.1, zoom);
    }

    fn upsert_marker(&mut self, vehicle_id: &str, latitude: f64, longitude: f64, popup_html: &str) {
        upsert_vehicle_marker(vehicle_id, latitude, longitude, popup_html);
    }

    fn refresh(&mut self) {
        refresh_vehicle_map();
    }
}
