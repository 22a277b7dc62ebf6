use serde::{Deserialize, Serialize};

// ============================================================================
// SESIÓN - token + identidad del usuario conectado
// ============================================================================

/// Rol del usuario tal como lo serializa el backend ("Admin", "Driver", ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Manager,
    Driver,
    Dispatcher,
    /// Rol desconocido: se conserva el texto para mostrarlo
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::Driver => "Driver",
            Role::Dispatcher => "Dispatcher",
            Role::Other(raw) => raw,
        }
    }

    /// Solo Admin ve la gestión de usuarios
    pub fn can_manage_users(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Admin" => Role::Admin,
            "Manager" => Role::Manager,
            "Driver" => Role::Driver,
            "Dispatcher" => Role::Dispatcher,
            _ => Role::Other(raw),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Usuario conectado. El backend envía más campos (email, timestamps); se ignoran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub role: Role,
}

impl SessionUser {
    /// Texto del header: "alice (Admin)"
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.username, self.role)
    }
}

/// Sesión autenticada
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Respuesta de POST /api/login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: SessionUser,
}

impl From<LoginResponse> for Session {
    fn from(response: LoginResponse) -> Self {
        Session {
            token: response.token,
            user: response.user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_ignores_extra_user_fields() {
        let raw = r#"{
            "token": "abc.def",
            "user": {
                "id": "7f1c",
                "username": "alice",
                "email": "alice@example.com",
                "password_hash": "x",
                "role": "Admin",
                "created_at": "2024-01-01T00:00:00Z"
            }
        }"#;
        let response: LoginResponse = serde_json::from_str(raw).unwrap();
        let session = Session::from(response);
        assert_eq!(session.token, "abc.def");
        assert_eq!(session.user.role, Role::Admin);
        assert_eq!(session.user.display_label(), "alice (Admin)");
    }

    #[test]
    fn unknown_roles_are_kept_verbatim() {
        let user: SessionUser =
            serde_json::from_str(r#"{"id":"1","username":"bob","role":"Auditor"}"#).unwrap();
        assert_eq!(user.role, Role::Other("Auditor".to_string()));
        assert!(!user.role.can_manage_users());
        assert_eq!(serde_json::to_value(&user.role).unwrap(), "Auditor");
    }
}
