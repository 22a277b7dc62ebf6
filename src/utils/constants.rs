/// Claves de localStorage (compartidas con la versión JS del dashboard)
pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const USER_KEY: &str = "user";

/// Endpoint de login
pub const LOGIN_PATH: &str = "/api/login";

/// Última posición conocida de una ruta
pub const TRACKING_LOCATION_PATH: &str = "/api/tracking/location";

/// Contenedor DOM del mapa Leaflet
pub const MAP_CONTAINER_ID: &str = "map";

/// Panel del host que envuelve el mapa (fuera de #app, sobrevive a los re-render)
pub const TRACKING_PANEL_ID: &str = "trackingPanel";

/// Raíz donde se renderiza la app
pub const APP_ROOT_ID: &str = "app";
