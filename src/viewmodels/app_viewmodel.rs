// ============================================================================
// APP VIEWMODEL - Acciones de la UI sobre AppState
// ============================================================================
// Las vistas solo llaman a estas funciones (normalmente dentro de spawn_local).
// Cada acción deja el estado actualizado y pide un re-render.
// ============================================================================

use futures::future::join_all;

use crate::error::ApiError;
use crate::models::ResourceKind;
use crate::state::{AppState, Section};
use crate::viewmodels::dashboard_viewmodel::DashboardViewModel;
use crate::viewmodels::form_viewmodel::{
    cargo_request, failure_message, route_request, success_message, user_request,
    vehicle_request, FormFields, RouteFormOptions,
};
use crate::viewmodels::table_viewmodel::{field_text, normalize};

pub struct AppViewModel;

impl AppViewModel {
    /// Login desde el formulario. El mensaje del servidor se muestra tal cual.
    pub async fn login(state: AppState, username: String, password: String) {
        *state.login_loading.borrow_mut() = true;
        *state.login_error.borrow_mut() = None;
        state.notify_changes();

        let result = state.session.login(&username, &password).await;
        *state.login_loading.borrow_mut() = false;

        match result {
            Ok(_) => {
                // AuthState ya notificó el cambio; cargar la portada
                Self::activate(state, Section::Dashboard).await;
            }
            Err(ApiError::LoginRejected(message)) => {
                *state.login_error.borrow_mut() = Some(message);
                state.notify_changes();
            }
            Err(e) => {
                log::error!("❌ [LOGIN] {}", e);
                *state.login_error.borrow_mut() = Some("Login failed. Please try again.".to_string());
                state.notify_changes();
            }
        }
    }

    pub fn logout(state: &AppState) {
        state.session.logout();
    }

    /// Activar una sección y volver a pedir sus datos
    pub async fn activate(state: AppState, section: Section) {
        if !state.set_section(section) {
            return;
        }
        state.notify_changes();

        match section {
            Section::Dashboard => Self::load_dashboard(&state).await,
            Section::Tracking => {}
            other => {
                if let Some(kind) = other.resource() {
                    Self::load_list(&state, kind).await;
                }
            }
        }
    }

    /// Un GET; si falla se deja el listado anterior
    pub async fn load_list(state: &AppState, kind: ResourceKind) {
        match state.api.list(kind).await {
            Ok(records) => {
                log::info!("📋 [{}] {} registros", kind.singular().to_uppercase(), records.len());
                state.set_snapshot(kind, records);
                state.notify_changes();
            }
            Err(e) => log::error!("❌ [{}] Error cargando listado: {}", kind.singular().to_uppercase(), e),
        }
    }

    pub async fn load_dashboard(state: &AppState) {
        match DashboardViewModel::load(&state.api).await {
            Ok(stats) => {
                *state.dashboard.borrow_mut() = Some(stats);
                state.notify_changes();
            }
            Err(e) => log::error!("❌ [DASHBOARD] Error cargando contadores: {}", e),
        }
    }

    /// Abrir el formulario de alta. El de rutas necesita sus dropdowns.
    pub async fn open_form(state: AppState, kind: ResourceKind) {
        *state.open_form.borrow_mut() = Some(kind);
        *state.form_error.borrow_mut() = None;
        *state.form_draft.borrow_mut() = FormFields::default();
        state.notify_changes();

        if kind == ResourceKind::Routes {
            if let Err(e) = Self::load_route_options(&state).await {
                log::error!("❌ [ROUTES] Error cargando opciones: {}", e);
            }
        }
    }

    pub fn close_form(state: &AppState) {
        *state.open_form.borrow_mut() = None;
        *state.form_error.borrow_mut() = None;
        *state.form_draft.borrow_mut() = FormFields::default();
        state.notify_changes();
    }

    async fn load_route_options(state: &AppState) -> Result<RouteFormOptions, ApiError> {
        let options = RouteFormOptions::load(&state.api).await?;
        *state.route_options.borrow_mut() = options.clone();
        state.notify_changes();
        Ok(options)
    }

    /// Enviar un formulario de alta. Devuelve el texto de la alerta a mostrar,
    /// o None cuando la sesión se cerró por el camino (la vista de login ya lo dice).
    pub async fn submit(state: AppState, kind: ResourceKind, fields: FormFields) -> Option<String> {
        *state.form_draft.borrow_mut() = fields.clone();
        let result = match kind {
            ResourceKind::Vehicles => state.api.create_vehicle(&vehicle_request(&fields)).await,
            ResourceKind::Cargo => match state.session.current_user() {
                Some(user) => state.api.create_cargo(&cargo_request(&fields, &user)).await,
                None => Err(ApiError::NotAuthenticated),
            },
            ResourceKind::Routes => {
                let request = route_request(&fields);
                // Las opciones pueden haber cambiado desde que se abrió el formulario
                let options = match Self::load_route_options(&state).await {
                    Ok(options) => options,
                    Err(e) => return failure_alert(kind, &e),
                };
                if let Err(message) = options.check_selection(&request) {
                    log::warn!("⚠️ [ROUTES] {}", message);
                    *state.form_error.borrow_mut() = Some(message);
                    state.notify_changes();
                    return None;
                }
                state.api.create_route(&request).await
            }
            ResourceKind::Users => state.api.create_user(&user_request(&fields)).await,
        };

        match result {
            Ok(_) => {
                log::info!("✅ [{}] Alta correcta", kind.singular().to_uppercase());
                Self::close_form(&state);
                futures::join!(Self::load_list(&state, kind), Self::load_dashboard(&state));
                Some(success_message(kind))
            }
            Err(e) => failure_alert(kind, &e),
        }
    }

    /// Posiciones conocidas de las rutas en curso, pedidas al abrir el mapa
    pub async fn seed_live_positions(state: AppState) {
        let routes = match state.api.list(ResourceKind::Routes).await {
            Ok(routes) => routes,
            Err(e) => {
                log::error!("❌ [TRACKING] Error cargando rutas: {}", e);
                return;
            }
        };

        let route_ids: Vec<String> = routes
            .iter()
            .filter(|r| normalize(&field_text(r, "status")) == "inprogress")
            .map(|r| field_text(r, "id"))
            .filter(|id| !id.is_empty())
            .collect();

        let results = join_all(route_ids.iter().map(|id| state.api.latest_location(id))).await;

        let mut markers = state.markers.borrow_mut();
        for (route_id, result) in route_ids.iter().zip(results) {
            match result {
                Ok(Some(update)) => markers.apply_location(&update),
                Ok(None) => {}
                Err(e) => log::warn!("⚠️ [TRACKING] Ruta {}: {}", route_id, e),
            }
        }
        log::info!("📍 [TRACKING] {} marcadores en el mapa", markers.len());
    }
}

/// Alerta para un alta fallida. Con la sesión cerrada no hay alerta: se ve el login.
fn failure_alert(kind: ResourceKind, error: &ApiError) -> Option<String> {
    if error.is_session_teardown() {
        return None;
    }
    log::error!("❌ [{}] Alta fallida: {}", kind.singular().to_uppercase(), error);
    Some(failure_message(kind))
}
