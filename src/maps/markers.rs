// ============================================================================
// VEHICLE MARKERS - vehicle_id -> marcador vivo
// ============================================================================
// Las entradas se crean la primera vez que un evento (o un vehículo de muestra)
// menciona el vehicle_id, se actualizan en sitio y nunca se eliminan.
// ============================================================================

use std::collections::HashMap;

use super::MarkerLayer;
use crate::models::{LocationUpdate, SampleVehicle};
use crate::viewmodels::map_viewmodel::location_popup;

/// Última posición conocida de un vehículo
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleMarker {
    pub latitude: f64,
    pub longitude: f64,
    /// None para vehículos sembrados que aún no reportaron
    pub speed: Option<f64>,
    pub popup_html: String,
}

pub struct VehicleMarkers {
    layer: Box<dyn MarkerLayer>,
    markers: HashMap<String, VehicleMarker>,
    map_ready: bool,
}

impl VehicleMarkers {
    pub fn new(layer: Box<dyn MarkerLayer>) -> Self {
        Self {
            layer,
            markers: HashMap::new(),
            map_ready: false,
        }
    }

    pub fn is_map_ready(&self) -> bool {
        self.map_ready
    }

    /// Inicializar el mapa una sola vez y sembrar los vehículos de muestra.
    /// Devuelve false si el mapa ya existía.
    pub fn ensure_map(&mut self, center: (f64, f64), zoom: f64, seeds: &[SampleVehicle]) -> bool {
        if self.map_ready {
            return false;
        }
        self.layer.init(center, zoom);
        self.map_ready = true;
        for sample in seeds {
            self.seed(sample);
        }
        log::info!("📍 [MAP] Mapa listo con {} vehículos sembrados", seeds.len());
        true
    }

    /// Redibujar el mapa (si existe) tras volver a mostrarlo
    pub fn refresh(&mut self) {
        if self.map_ready {
            self.layer.refresh();
        }
    }

    /// Vehículo de demostración: posición + nombre como popup
    pub fn seed(&mut self, sample: &SampleVehicle) {
        let marker = VehicleMarker {
            latitude: sample.latitude,
            longitude: sample.longitude,
            speed: None,
            popup_html: sample.name.to_string(),
        };
        self.put(sample.id, marker);
    }

    /// Aplicar un location_update: sin suavizado, sin rate limit
    pub fn apply_location(&mut self, update: &LocationUpdate) {
        let marker = VehicleMarker {
            latitude: update.latitude,
            longitude: update.longitude,
            speed: Some(update.speed),
            popup_html: location_popup(&update.vehicle_id, update.speed),
        };
        self.put(&update.vehicle_id, marker);
    }

    fn put(&mut self, vehicle_id: &str, marker: VehicleMarker) {
        self.layer
            .upsert_marker(vehicle_id, marker.latitude, marker.longitude, &marker.popup_html);
        self.markers.insert(vehicle_id.to_string(), marker);
    }

    pub fn get(&self, vehicle_id: &str) -> Option<&VehicleMarker> {
        self.markers.get(vehicle_id)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::SAMPLE_VEHICLES;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Capa que graba las llamadas
    #[derive(Clone, Default)]
    pub(crate) struct RecordingLayer {
        pub inits: Rc<RefCell<u32>>,
        pub upserts: Rc<RefCell<Vec<(String, f64, f64, String)>>>,
        pub refreshes: Rc<RefCell<u32>>,
    }

    impl MarkerLayer for RecordingLayer {
        fn init(&mut self, _center: (f64, f64), _zoom: f64) {
            *self.inits.borrow_mut() += 1;
        }

        fn upsert_marker(&mut self, vehicle_id: &str, latitude: f64, longitude: f64, popup_html: &str) {
            self.upserts
                .borrow_mut()
                .push((vehicle_id.to_string(), latitude, longitude, popup_html.to_string()));
        }

        fn refresh(&mut self) {
            *self.refreshes.borrow_mut() += 1;
        }
    }

    fn update(id: &str, lat: f64, lng: f64, speed: f64) -> LocationUpdate {
        LocationUpdate { vehicle_id: id.to_string(), latitude: lat, longitude: lng, speed }
    }

    #[test]
    fn last_event_per_vehicle_wins() {
        let layer = RecordingLayer::default();
        let mut markers = VehicleMarkers::new(Box::new(layer.clone()));

        let events = [
            update("a", 1.0, 1.0, 10.0),
            update("b", 2.0, 2.0, 20.0),
            update("a", 1.5, 1.6, 35.5),
            update("a", 1.7, 1.8, 0.0),
            update("b", 2.5, 2.6, 42.0),
        ];
        for event in &events {
            markers.apply_location(event);
        }

        assert_eq!(markers.len(), 2);
        let a = markers.get("a").unwrap();
        assert_eq!((a.latitude, a.longitude, a.speed), (1.7, 1.8, Some(0.0)));
        assert_eq!(a.popup_html, "Vehicle a<br>Speed: 0 km/h");
        let b = markers.get("b").unwrap();
        assert_eq!((b.latitude, b.longitude, b.speed), (2.5, 2.6, Some(42.0)));

        // Cada evento se aplica de inmediato a la capa
        assert_eq!(layer.upserts.borrow().len(), events.len());
    }

    #[test]
    fn map_is_initialised_and_seeded_once() {
        let layer = RecordingLayer::default();
        let mut markers = VehicleMarkers::new(Box::new(layer.clone()));

        // Sin mapa no hay nada que redibujar
        markers.refresh();
        assert_eq!(*layer.refreshes.borrow(), 0);
        assert!(!markers.is_map_ready());

        assert!(markers.ensure_map((51.505, -0.09), 13.0, &SAMPLE_VEHICLES));
        assert!(!markers.ensure_map((51.505, -0.09), 13.0, &SAMPLE_VEHICLES));
        markers.refresh();

        assert!(markers.is_map_ready());
        assert_eq!(*layer.inits.borrow(), 1);
        assert_eq!(*layer.refreshes.borrow(), 1);
        assert_eq!(markers.len(), 3);
        assert_eq!(markers.get("2").unwrap().popup_html, "Truck 002");
    }

    #[test]
    fn live_update_replaces_seeded_marker() {
        let mut markers = VehicleMarkers::new(Box::new(RecordingLayer::default()));
        markers.ensure_map((0.0, 0.0), 13.0, &SAMPLE_VEHICLES);
        markers.apply_location(&update("1", 51.6, -0.2, 57.3));

        assert_eq!(markers.len(), 3);
        let truck = markers.get("1").unwrap();
        assert_eq!(truck.latitude, 51.6);
        assert_eq!(truck.popup_html, "Vehicle 1<br>Speed: 57.3 km/h");
    }
}
