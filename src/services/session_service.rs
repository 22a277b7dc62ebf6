// ============================================================================
// SESSION SERVICE - login / restore / logout
// ============================================================================
// Fuente de verdad del token. Persistencia en localStorage (authToken + user).
// ============================================================================

use std::rc::Rc;

use gloo_net::http::Request;

use crate::config::CONFIG;
use crate::error::ApiError;
use crate::models::{LoginRequest, LoginResponse, Session, SessionUser};
use crate::state::AuthState;
use crate::utils::{load_json, save_json, KeyValueStore, AUTH_TOKEN_KEY, LOGIN_PATH, USER_KEY};

/// Gestor de sesión: memoria (AuthState) + almacenamiento durable
#[derive(Clone)]
pub struct SessionManager {
    auth: AuthState,
    store: Rc<dyn KeyValueStore>,
}

impl SessionManager {
    pub fn new(auth: AuthState, store: Rc<dyn KeyValueStore>) -> Self {
        Self { auth, store }
    }

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    pub fn token(&self) -> Option<String> {
        self.auth.get_token()
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.auth.get_user()
    }

    /// POST /api/login. En caso de rechazo el texto del servidor se devuelve tal cual.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        let url = CONFIG.api_url(LOGIN_PATH);
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        log::info!("🔐 [SESSION] Login para usuario: {}", username);

        let response = Request::post(&url)
            .json(&body)
            .map_err(|e| ApiError::Network(format!("Serialization error: {}", e)))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            let status = response.status();
            let status_text = response.status_text();
            let error_text = response.text().await.unwrap_or_default();
            log::warn!("⚠️ [SESSION] Login rechazado ({}): {}", status, error_text);
            return Err(ApiError::LoginRejected(rejection_message(error_text, &status_text)));
        }

        let login = response
            .json::<LoginResponse>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        Ok(self.establish(Session::from(login)))
    }

    /// Guardar una sesión recién emitida en memoria y en storage
    pub fn establish(&self, session: Session) -> Session {
        if let Err(e) = self.store.set(AUTH_TOKEN_KEY, &session.token) {
            log::error!("❌ [SESSION] Error guardando token: {}", e);
        }
        if let Err(e) = save_json(self.store.as_ref(), USER_KEY, &session.user) {
            log::error!("❌ [SESSION] Error guardando usuario: {}", e);
        }
        self.auth.set_session(session.clone());
        log::info!("✅ [SESSION] Sesión iniciada: {}", session.user.display_label());
        session
    }

    /// Leer la sesión guardada al arrancar. No se valida contra el servidor:
    /// un token revocado se descubre en la primera llamada a la API.
    pub fn restore(&self) -> Option<Session> {
        let token = self.store.get(AUTH_TOKEN_KEY).filter(|t| !t.is_empty())?;
        let user = load_json::<SessionUser>(self.store.as_ref(), USER_KEY)?;
        let session = Session { token, user };
        self.auth.set_session(session.clone());
        log::info!("💾 [SESSION] Sesión restaurada: {}", session.user.display_label());
        Some(session)
    }

    /// Logout explícito del usuario
    pub fn logout(&self) {
        if self.teardown() {
            log::info!("👋 [SESSION] Logout");
        }
    }

    /// Cerrar la sesión. Devuelve true solo la primera vez para una sesión viva;
    /// un segundo 401 en vuelo no vuelve a limpiar nada.
    pub fn teardown(&self) -> bool {
        if !self.auth.clear() {
            return false;
        }
        for key in [AUTH_TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.store.remove(key) {
                log::error!("❌ [SESSION] Error eliminando '{}': {}", key, e);
            }
        }
        true
    }
}

/// Texto a mostrar cuando el login falla: el cuerpo del servidor, o el status si viene vacío
fn rejection_message(body: String, status_text: &str) -> String {
    if body.trim().is_empty() {
        status_text.to_string()
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::utils::MemoryStore;

    fn issued_session() -> Session {
        Session {
            token: "eyJhbGciOi".to_string(),
            user: SessionUser {
                id: "5b7e".to_string(),
                username: "dispatch01".to_string(),
                role: Role::Dispatcher,
            },
        }
    }

    #[test]
    fn restore_after_reload_yields_same_user() {
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::new());
        let before = SessionManager::new(AuthState::new(), store.clone());
        let issued = before.establish(issued_session());

        // "Recarga": estado en memoria nuevo, mismo storage
        let after = SessionManager::new(AuthState::new(), store);
        let restored = after.restore().expect("session should be restored");
        assert_eq!(restored.user, issued.user);
        assert_eq!(restored.token, issued.token);
        assert!(after.auth().is_logged_in());
    }

    #[test]
    fn restore_requires_both_token_and_user() {
        let store = Rc::new(MemoryStore::new());
        store.set(AUTH_TOKEN_KEY, "abc").unwrap();
        let manager = SessionManager::new(AuthState::new(), store.clone());
        assert!(manager.restore().is_none());

        store.remove(AUTH_TOKEN_KEY).unwrap();
        save_json(store.as_ref(), USER_KEY, &issued_session().user).unwrap();
        assert!(manager.restore().is_none());
        assert!(!manager.auth().is_logged_in());
    }

    #[test]
    fn teardown_clears_memory_and_storage_exactly_once() {
        let store = Rc::new(MemoryStore::new());
        let manager = SessionManager::new(AuthState::new(), store.clone());
        manager.establish(issued_session());
        assert_eq!(store.len(), 2);

        assert!(manager.teardown());
        assert!(!manager.teardown());
        assert!(store.is_empty());
        assert!(manager.token().is_none());
        assert!(manager.restore().is_none());
    }

    #[test]
    fn empty_rejection_body_falls_back_to_status_text() {
        assert_eq!(rejection_message("Invalid credentials".into(), "Unauthorized"), "Invalid credentials");
        assert_eq!(rejection_message("  ".into(), "Unauthorized"), "Unauthorized");
    }
}
