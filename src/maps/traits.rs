/// Capa de marcadores de vehículos sobre un mapa
///
/// La implementación web delega en Leaflet; los tests usan una capa que graba llamadas.
pub trait MarkerLayer {
    /// Crear el mapa centrado en `center` (idempotente a nivel del registro, no de la capa)
    fn init(&mut self, center: (f64, f64), zoom: f64);

    /// Crear o mover el marcador `vehicle_id` y reemplazar su popup
    fn upsert_marker(&mut self, vehicle_id: &str, latitude: f64, longitude: f64, popup_html: &str);

    /// El contenedor vuelve a ser visible
    fn refresh(&mut self) {}
}
