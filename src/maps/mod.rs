// Módulo de mapas: registro de marcadores + capa Leaflet

pub mod traits;
pub mod markers;
pub mod web;

pub use traits::MarkerLayer;
pub use markers::{VehicleMarker, VehicleMarkers};
pub use web::LeafletLayer;
