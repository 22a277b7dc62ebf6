// ============================================================================
// APP STATE - Contexto de la aplicación
// ============================================================================
// Todo el estado mutable vive aquí y se pasa explícitamente a cada vista.
// Un solo hilo: Rc<RefCell<_>>, sin locks.
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use crate::maps::{LeafletLayer, MarkerLayer, VehicleMarkers};
use crate::models::ResourceKind;
use crate::services::{ApiClient, BrowserFeed, SessionManager};
use crate::state::AuthState;
use crate::utils::{KeyValueStore, LocalStore};
use crate::viewmodels::{DashboardStats, FormFields, RouteFormOptions};

/// Secciones de la barra lateral
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    Vehicles,
    Cargo,
    Routes,
    Tracking,
    Users,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Dashboard,
        Section::Vehicles,
        Section::Cargo,
        Section::Routes,
        Section::Tracking,
        Section::Users,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Vehicles => "Vehicles",
            Section::Cargo => "Cargo",
            Section::Routes => "Routes",
            Section::Tracking => "Live Tracking",
            Section::Users => "Users",
        }
    }

    /// Colección que lista la sección, si la tiene
    pub fn resource(&self) -> Option<ResourceKind> {
        match self {
            Section::Vehicles => Some(ResourceKind::Vehicles),
            Section::Cargo => Some(ResourceKind::Cargo),
            Section::Routes => Some(ResourceKind::Routes),
            Section::Users => Some(ResourceKind::Users),
            Section::Dashboard | Section::Tracking => None,
        }
    }
}

/// Estado global de la aplicación
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub session: SessionManager,
    pub api: ApiClient,

    // UI State
    pub active_section: Rc<RefCell<Section>>,
    pub open_form: Rc<RefCell<Option<ResourceKind>>>,
    pub form_error: Rc<RefCell<Option<String>>>,
    /// Lo tecleado en el modal abierto; se vuelve a pintar en cada re-render
    pub form_draft: Rc<RefCell<FormFields>>,
    pub login_error: Rc<RefCell<Option<String>>>,
    pub login_loading: Rc<RefCell<bool>>,

    // Datos del servidor (se reemplazan completos en cada carga)
    pub snapshots: Rc<RefCell<HashMap<ResourceKind, Vec<Value>>>>,
    pub dashboard: Rc<RefCell<Option<DashboardStats>>>,
    pub route_options: Rc<RefCell<RouteFormOptions>>,

    // Mapa en vivo
    pub markers: Rc<RefCell<VehicleMarkers>>,
    pub live_feed: Rc<RefCell<Option<BrowserFeed>>>,

    pub change_subscribers: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
}

impl AppState {
    /// Estado del navegador: localStorage + Leaflet
    pub fn new() -> Self {
        Self::with_backends(Rc::new(LocalStore), Box::new(LeafletLayer::new()))
    }

    pub fn with_backends(store: Rc<dyn KeyValueStore>, layer: Box<dyn MarkerLayer>) -> Self {
        let auth = AuthState::new();
        let session = SessionManager::new(auth.clone(), store);
        let api = ApiClient::new(session.clone());

        let state = Self {
            auth,
            session,
            api,
            active_section: Rc::new(RefCell::new(Section::Dashboard)),
            open_form: Rc::new(RefCell::new(None)),
            form_error: Rc::new(RefCell::new(None)),
            form_draft: Rc::new(RefCell::new(FormFields::default())),
            login_error: Rc::new(RefCell::new(None)),
            login_loading: Rc::new(RefCell::new(false)),
            snapshots: Rc::new(RefCell::new(HashMap::new())),
            dashboard: Rc::new(RefCell::new(None)),
            route_options: Rc::new(RefCell::new(RouteFormOptions::default())),
            markers: Rc::new(RefCell::new(VehicleMarkers::new(layer))),
            live_feed: Rc::new(RefCell::new(None)),
            change_subscribers: Rc::new(RefCell::new(Vec::new())),
        };

        // Logout (explícito o por 401): limpiar la UI autenticada y re-renderizar
        {
            let state_clone = state.clone();
            state.auth.subscribe(move |logged_in| {
                if !logged_in {
                    state_clone.reset_authenticated_ui();
                }
                state_clone.notify_changes();
            });
        }

        state
    }

    /// Suscribirse a cambios (re-render)
    pub fn subscribe_to_changes<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.change_subscribers.borrow_mut().push(Rc::new(callback));
    }

    pub fn notify_changes(&self) {
        let subscribers: Vec<_> = self.change_subscribers.borrow().iter().cloned().collect();
        for callback in subscribers {
            callback();
        }
    }

    /// Secciones visibles para el usuario actual (Users solo Admin)
    pub fn visible_sections(&self) -> Vec<Section> {
        let is_admin = self.auth.is_admin();
        Section::ALL
            .iter()
            .copied()
            .filter(|s| *s != Section::Users || is_admin)
            .collect()
    }

    /// Cambiar de sección. Devuelve false si la sección no es visible.
    pub fn set_section(&self, section: Section) -> bool {
        if !self.visible_sections().contains(&section) {
            log::warn!("⚠️ [STATE] Sección {:?} no permitida", section);
            return false;
        }
        *self.active_section.borrow_mut() = section;
        *self.open_form.borrow_mut() = None;
        *self.form_error.borrow_mut() = None;
        *self.form_draft.borrow_mut() = FormFields::default();
        true
    }

    pub fn active_section(&self) -> Section {
        *self.active_section.borrow()
    }

    pub fn set_snapshot(&self, kind: ResourceKind, records: Vec<Value>) {
        self.snapshots.borrow_mut().insert(kind, records);
    }

    /// Último listado recibido; None = todavía no cargado
    pub fn snapshot(&self, kind: ResourceKind) -> Option<Vec<Value>> {
        self.snapshots.borrow().get(&kind).cloned()
    }

    /// Lo que no debe sobrevivir a un logout
    fn reset_authenticated_ui(&self) {
        *self.active_section.borrow_mut() = Section::Dashboard;
        *self.open_form.borrow_mut() = None;
        *self.form_error.borrow_mut() = None;
        *self.form_draft.borrow_mut() = FormFields::default();
        self.snapshots.borrow_mut().clear();
        *self.dashboard.borrow_mut() = None;
        *self.route_options.borrow_mut() = RouteFormOptions::default();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::markers::tests::RecordingLayer;
    use crate::models::{Role, Session, SessionUser};
    use crate::utils::MemoryStore;
    use serde_json::json;
    use std::cell::Cell;

    fn test_state() -> AppState {
        AppState::with_backends(Rc::new(MemoryStore::new()), Box::new(RecordingLayer::default()))
    }

    fn login_as(state: &AppState, role: Role) {
        state.session.establish(Session {
            token: "tok".into(),
            user: SessionUser { id: "1".into(), username: "u".into(), role },
        });
    }

    #[test]
    fn users_section_is_admin_only() {
        let state = test_state();
        login_as(&state, Role::Driver);
        assert!(!state.visible_sections().contains(&Section::Users));
        assert!(!state.set_section(Section::Users));
        assert_eq!(state.active_section(), Section::Dashboard);

        login_as(&state, Role::Admin);
        assert!(state.set_section(Section::Users));
        assert_eq!(state.active_section(), Section::Users);
    }

    #[test]
    fn snapshots_are_replaced_not_merged() {
        let state = test_state();
        state.set_snapshot(ResourceKind::Cargo, vec![json!({"id": 1}), json!({"id": 2})]);
        state.set_snapshot(ResourceKind::Cargo, vec![json!({"id": 3})]);
        assert_eq!(state.snapshot(ResourceKind::Cargo), Some(vec![json!({"id": 3})]));
        assert_eq!(state.snapshot(ResourceKind::Routes), None);
    }

    #[test]
    fn session_rejection_resets_ui_and_rerenders_once() {
        let state = test_state();
        login_as(&state, Role::Admin);
        state.set_section(Section::Users);
        state.set_snapshot(ResourceKind::Users, vec![json!({"username": "x"})]);

        let renders = Rc::new(Cell::new(0));
        {
            let renders = renders.clone();
            state.subscribe_to_changes(move || renders.set(renders.get() + 1));
        }

        let _ = state.api.check_status(401, "Unauthorized", "tok");
        let _ = state.api.check_status(401, "Unauthorized", "tok");

        assert_eq!(renders.get(), 1);
        assert!(!state.auth.is_logged_in());
        assert_eq!(state.active_section(), Section::Dashboard);
        assert_eq!(state.snapshot(ResourceKind::Users), None);
    }
}
