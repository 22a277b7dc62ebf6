// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP
// ============================================================================
// Adjunta el bearer token, traduce status a ApiError y cierra la sesión en 401.
// NO tiene lógica de negocio: devuelve el JSON del servidor tal cual.
// ============================================================================

use gloo_net::http::{Request, RequestBuilder};
use serde::Serialize;
use serde_json::Value;

use crate::config::CONFIG;
use crate::error::ApiError;
use crate::models::{
    CreateCargoRequest, CreateRouteRequest, CreateUserRequest, CreateVehicleRequest, LocationUpdate,
    ResourceKind,
};
use crate::services::SessionManager;
use crate::utils::TRACKING_LOCATION_PATH;

/// Status con el que el backend rechaza un token
pub const STATUS_UNAUTHORIZED: u16 = 401;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Cliente API autenticado
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    session: SessionManager,
}

impl ApiClient {
    pub fn new(session: SessionManager) -> Self {
        Self {
            base_url: CONFIG.api_base_url.clone(),
            session,
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Llamada autenticada genérica: path relativo (/api/...), cuerpo JSON opcional
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let token = self.session.token().ok_or(ApiError::NotAuthenticated)?;
        let url = format!("{}{}", self.base_url, path);

        let builder = match method {
            HttpMethod::Get => Request::get(&url),
            HttpMethod::Post => Request::post(&url),
        };
        let builder = with_auth_headers(builder, &token);

        let request = match body {
            Some(json) => builder.json(json),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Network(format!("Request build error: {}", e)))?;

        let response = request.send().await.map_err(|e| {
            log::error!("❌ [API] {:?} {} falló: {}", method, path, e);
            ApiError::Network(e.to_string())
        })?;

        self.check_status(response.status(), &response.status_text(), &token)?;

        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        parse_body(&text)
    }

    /// Traducir el status HTTP. Un 401 cierra la sesión antes de devolver el error,
    /// pero solo si `sent_token` sigue siendo el token de la sesión actual.
    pub fn check_status(&self, status: u16, status_text: &str, sent_token: &str) -> Result<(), ApiError> {
        if status == STATUS_UNAUTHORIZED {
            if self.session.token().as_deref() != Some(sent_token) {
                log::info!("🔒 [API] 401 de una sesión anterior, ignorado");
            } else if self.session.teardown() {
                log::warn!("🔒 [API] Token rechazado por el servidor, sesión cerrada");
            }
            return Err(ApiError::SessionExpired);
        }
        if !(200..300).contains(&status) {
            return Err(ApiError::Http {
                status,
                reason: status_text.to_string(),
            });
        }
        Ok(())
    }

    /// GET de una colección completa
    pub async fn list(&self, kind: ResourceKind) -> Result<Vec<Value>, ApiError> {
        let body = self.request(HttpMethod::Get, kind.path(), None).await?;
        let records = into_records(body);
        log::info!("📋 [API] {} registros de {}", records.len(), kind.path());
        Ok(records)
    }

    async fn create<T: Serialize>(&self, kind: ResourceKind, payload: &T) -> Result<Value, ApiError> {
        let body = serde_json::to_value(payload)
            .map_err(|e| ApiError::Parse(format!("Serialization error: {}", e)))?;
        log::info!("📝 [API] Creando {}", kind.singular());
        self.request(HttpMethod::Post, kind.path(), Some(&body)).await
    }

    pub async fn create_vehicle(&self, payload: &CreateVehicleRequest) -> Result<Value, ApiError> {
        self.create(ResourceKind::Vehicles, payload).await
    }

    pub async fn create_cargo(&self, payload: &CreateCargoRequest) -> Result<Value, ApiError> {
        self.create(ResourceKind::Cargo, payload).await
    }

    pub async fn create_route(&self, payload: &CreateRouteRequest) -> Result<Value, ApiError> {
        self.create(ResourceKind::Routes, payload).await
    }

    pub async fn create_user(&self, payload: &CreateUserRequest) -> Result<Value, ApiError> {
        self.create(ResourceKind::Users, payload).await
    }

    /// Última posición registrada de una ruta. 404 = la ruta aún no reportó nada.
    pub async fn latest_location(&self, route_id: &str) -> Result<Option<LocationUpdate>, ApiError> {
        let path = format!("{}/{}", TRACKING_LOCATION_PATH, route_id);
        match self.request(HttpMethod::Get, &path, None).await {
            Ok(body) => serde_json::from_value(body)
                .map(Some)
                .map_err(|e| ApiError::Parse(e.to_string())),
            Err(ApiError::Http { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn with_auth_headers(builder: RequestBuilder, token: &str) -> RequestBuilder {
    auth_headers(token)
        .iter()
        .fold(builder, |builder, (name, value)| builder.header(name, value))
}

/// Cabeceras de toda llamada autenticada
fn auth_headers(token: &str) -> [(&'static str, String); 2] {
    [
        ("Authorization", format!("Bearer {}", token)),
        ("Content-Type", "application/json".to_string()),
    ]
}

/// Cuerpo vacío = null (algunos POST no devuelven nada)
fn parse_body(text: &str) -> Result<Value, ApiError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Un listado que no es array se trata como vacío
pub fn into_records(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => {
            log::warn!("⚠️ [API] Se esperaba un array, llegó: {}", other);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, Session, SessionUser};
    use crate::state::AuthState;
    use crate::utils::MemoryStore;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    fn logged_in_client() -> (ApiClient, Rc<Cell<u32>>) {
        let auth = AuthState::new();
        let logouts = Rc::new(Cell::new(0));
        {
            let logouts = logouts.clone();
            auth.subscribe(move |logged_in| {
                if !logged_in {
                    logouts.set(logouts.get() + 1);
                }
            });
        }
        let session = SessionManager::new(auth, Rc::new(MemoryStore::new()));
        session.establish(Session {
            token: "abc".to_string(),
            user: SessionUser { id: "1".to_string(), username: "ops".to_string(), role: Role::Manager },
        });
        (ApiClient::new(session), logouts)
    }

    #[test]
    fn unauthorized_tears_down_session_once() {
        let (client, logouts) = logged_in_client();

        assert_eq!(client.check_status(401, "Unauthorized", "abc"), Err(ApiError::SessionExpired));
        // Segundo 401 de una petición que ya estaba en vuelo
        assert_eq!(client.check_status(401, "Unauthorized", "abc"), Err(ApiError::SessionExpired));

        assert_eq!(logouts.get(), 1);
        assert!(client.session().token().is_none());
    }

    #[test]
    fn late_unauthorized_from_previous_session_is_ignored() {
        let (client, logouts) = logged_in_client();
        client.session().logout();
        client.session().establish(Session {
            token: "def".to_string(),
            user: SessionUser { id: "2".to_string(), username: "bob".to_string(), role: Role::Driver },
        });

        // 401 de una petición enviada con el token anterior
        assert_eq!(client.check_status(401, "Unauthorized", "abc"), Err(ApiError::SessionExpired));

        assert_eq!(client.session().token().as_deref(), Some("def"));
        assert_eq!(client.session().current_user().map(|u| u.username), Some("bob".to_string()));
        assert_eq!(logouts.get(), 1);
    }

    #[test]
    fn request_without_session_never_reaches_the_network() {
        let session = SessionManager::new(AuthState::new(), Rc::new(MemoryStore::new()));
        let client = ApiClient::new(session);
        let result = futures::executor::block_on(client.request(HttpMethod::Get, "/api/vehicles", None));
        assert_eq!(result, Err(ApiError::NotAuthenticated));
    }

    #[test]
    fn requests_carry_bearer_token_and_json_content_type() {
        let headers = auth_headers("abc");
        assert_eq!(headers[0], ("Authorization", "Bearer abc".to_string()));
        assert_eq!(headers[1], ("Content-Type", "application/json".to_string()));
    }

    #[test]
    fn other_failures_keep_the_session() {
        let (client, logouts) = logged_in_client();
        assert_eq!(
            client.check_status(503, "Service Unavailable", "abc"),
            Err(ApiError::Http { status: 503, reason: "Service Unavailable".to_string() })
        );
        assert!(client.check_status(201, "Created", "abc").is_ok());
        assert_eq!(logouts.get(), 0);
        assert!(client.session().token().is_some());
    }

    #[test]
    fn empty_body_is_null_and_garbage_is_a_parse_error() {
        assert_eq!(parse_body(""), Ok(Value::Null));
        assert_eq!(parse_body(r#"{"id": "9"}"#), Ok(json!({"id": "9"})));
        assert!(matches!(parse_body("<html>"), Err(ApiError::Parse(_))));
    }

    #[test]
    fn non_array_listing_becomes_empty() {
        assert_eq!(into_records(json!([{"id": 1}, {"id": 2}])).len(), 2);
        assert!(into_records(json!({"error": "nope"})).is_empty());
        assert!(into_records(Value::Null).is_empty());
    }
}
