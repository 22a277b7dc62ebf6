use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Vacío = mismo origen que la página (las rutas /api/... son relativas)
    pub api_base_url: String,
    pub ws_path: String,
    pub reconnect_delay_ms: u32,
    pub enable_logging: bool,
    pub map_config: MapConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            ws_path: "/ws".to_string(),
            reconnect_delay_ms: 5000,
            enable_logging: true,
            map_config: MapConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub default_center_lat: f64,
    pub default_center_lng: f64,
    pub default_zoom: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center_lat: 51.505,
            default_center_lng: -0.09,
            default_zoom: 13.0,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: option_env!("API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            ws_path: option_env!("WS_PATH")
                .map(|path| path.to_string())
                .unwrap_or(defaults.ws_path),
            reconnect_delay_ms: option_env!("RECONNECT_DELAY_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.reconnect_delay_ms),
            enable_logging: option_env!("ENABLE_LOGGING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.enable_logging),
            map_config: MapConfig {
                default_center_lat: option_env!("MAP_CENTER_LAT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.map_config.default_center_lat),
                default_center_lng: option_env!("MAP_CENTER_LNG")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.map_config.default_center_lng),
                default_zoom: option_env!("MAP_ZOOM")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.map_config.default_zoom),
            },
        }
    }

    /// URL absoluta (o relativa al origen) de un endpoint de la API
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }

    /// Verifica si el modo de logging está habilitado
    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}
