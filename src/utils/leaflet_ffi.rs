// ============================================================================
// LEAFLET FFI - Foreign Function Interface para JavaScript
// ============================================================================
// Solo wrappers para funciones JS definidas en index.html - Sin estado, sin lógica
// ============================================================================

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// Crea el mapa Leaflet (tiles OpenStreetMap) en el contenedor
    #[wasm_bindgen(js_name = initVehicleMap)]
    pub fn init_vehicle_map(container_id: &str, lat: f64, lng: f64, zoom: f64);

    /// Crea el marcador si no existe; si existe lo mueve y reemplaza el popup
    #[wasm_bindgen(js_name = upsertVehicleMarker)]
    pub fn upsert_vehicle_marker(vehicle_id: &str, lat: f64, lng: f64, popup_html: &str);

    /// Recalcular el tamaño tras mostrar un contenedor que estaba oculto
    #[wasm_bindgen(js_name = refreshVehicleMap)]
    pub fn refresh_vehicle_map();
}
