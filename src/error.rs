// ============================================================================
// ERRORES - Taxonomía de errores del dashboard
// ============================================================================

use thiserror::Error;

/// Errores de la API REST
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// No hay token: la llamada ni siquiera llega a la red
    #[error("No authentication token")]
    NotAuthenticated,

    /// Login rechazado; contiene el texto del servidor tal cual
    #[error("{0}")]
    LoginRejected(String),

    /// El backend respondió 401 a un token que era válido. La sesión ya fue cerrada.
    #[error("Session expired")]
    SessionExpired,

    #[error("HTTP {status}: {reason}")]
    Http { status: u16, reason: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// El caller no debe mostrar nada: la sesión ya se cerró y la UI vuelve al login
    pub fn is_session_teardown(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }
}

/// Errores del canal de posiciones en vivo
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeedError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid frame: {0}")]
    Parse(String),
}

/// Errores de localStorage
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("localStorage no disponible")]
    Unavailable,

    #[error("Error serializando datos: {0}")]
    Serialize(String),

    #[error("Error escribiendo en localStorage: {0}")]
    Write(String),
}
