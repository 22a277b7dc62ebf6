// ============================================================================
// APP - Aplicación principal
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{append_child, field_value, get_element_by_id, set_inner_html};
use crate::state::{AppState, Section};
use crate::utils::APP_ROOT_ID;
use crate::viewmodels::form_viewmodel::form_element_id;
use crate::viewmodels::{AppViewModel, FormFields};
use crate::views::{render_app, sync_tracking_panel};

/// Aplicación principal
pub struct App {
    state: AppState,
    root: Element,
}

impl App {
    /// Crear nueva aplicación
    pub fn new() -> Result<Self, JsValue> {
        let root = get_element_by_id(APP_ROOT_ID)
            .ok_or_else(|| JsValue::from_str("No #app element found"))?;

        let state = AppState::new();

        // Sesión guardada: se confía en ella hasta el primer 401
        let restored = state.session.restore().is_some();

        // Varios cambios seguidos = un solo re-render
        let render_pending = Rc::new(Cell::new(false));
        state.subscribe_to_changes(move || {
            if render_pending.replace(true) {
                return;
            }
            let render_pending = render_pending.clone();
            Timeout::new(0, move || {
                render_pending.set(false);
                crate::rerender_app();
            })
            .forget();
        });

        if restored {
            let state_clone = state.clone();
            spawn_local(async move {
                AppViewModel::activate(state_clone, Section::Dashboard).await;
            });
        }

        Ok(Self { state, root })
    }

    /// Re-render completo de #app
    pub fn render(&mut self) -> Result<(), JsValue> {
        self.keep_form_draft();
        set_inner_html(&self.root, "");
        let app_view = render_app(&self.state)?;
        append_child(&self.root, &app_view)?;
        sync_tracking_panel(&self.state)
    }

    /// Lo tecleado en el modal abierto sobrevive al re-render
    fn keep_form_draft(&self) {
        let Some(kind) = *self.state.open_form.borrow() else {
            return;
        };
        if get_element_by_id(&form_element_id(kind)).is_some() {
            *self.state.form_draft.borrow_mut() = FormFields::capture(kind, field_value);
        }
    }
}
