// ============================================================================
// AUTH STATE - Token + usuario en memoria
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::{Session, SessionUser};

/// Estado de autenticación (copia en memoria de lo que hay en localStorage)
#[derive(Clone)]
pub struct AuthState {
    pub token: Rc<RefCell<Option<String>>>,
    pub user: Rc<RefCell<Option<SessionUser>>>,
    subscribers: Rc<RefCell<Vec<Rc<dyn Fn(bool)>>>>,
}

impl AuthState {
    pub fn new() -> Self {
        Self {
            token: Rc::new(RefCell::new(None)),
            user: Rc::new(RefCell::new(None)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn set_session(&self, session: Session) {
        *self.token.borrow_mut() = Some(session.token);
        *self.user.borrow_mut() = Some(session.user);
        self.notify(true);
    }

    /// Limpiar token y usuario. Devuelve false si ya estaba vacío (no notifica).
    pub fn clear(&self) -> bool {
        let had_token = self.token.borrow_mut().take().is_some();
        let had_user = self.user.borrow_mut().take().is_some();
        let changed = had_token || had_user;
        if changed {
            self.notify(false);
        }
        changed
    }

    pub fn get_token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    pub fn get_user(&self) -> Option<SessionUser> {
        self.user.borrow().clone()
    }

    pub fn get_session(&self) -> Option<Session> {
        let token = self.get_token()?;
        let user = self.get_user()?;
        Some(Session { token, user })
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.borrow().is_some() && self.user.borrow().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user
            .borrow()
            .as_ref()
            .map(|u| u.role.can_manage_users())
            .unwrap_or(false)
    }

    /// Callback con el nuevo estado (true = logged in)
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(bool) + 'static,
    {
        self.subscribers.borrow_mut().push(Rc::new(callback));
    }

    fn notify(&self, logged_in: bool) {
        // Copia para permitir que un callback se suscriba durante la notificación
        let subscribers: Vec<_> = self.subscribers.borrow().iter().cloned().collect();
        for callback in subscribers {
            callback(logged_in);
        }
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use std::cell::Cell;

    fn session(role: Role) -> Session {
        Session {
            token: "t0k3n".to_string(),
            user: SessionUser { id: "u1".to_string(), username: "alice".to_string(), role },
        }
    }

    #[test]
    fn clear_is_idempotent_and_notifies_once() {
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

        auth.set_session(session(Role::Driver));
        assert!(auth.is_logged_in());
        assert!(auth.clear());
        assert!(!auth.clear());
        assert_eq!(logouts.get(), 1);
        assert!(auth.get_session().is_none());
    }

    #[test]
    fn only_admin_manages_users() {
        let auth = AuthState::new();
        assert!(!auth.is_admin());
        auth.set_session(session(Role::Manager));
        assert!(!auth.is_admin());
        auth.set_session(session(Role::Admin));
        assert!(auth.is_admin());
    }
}
