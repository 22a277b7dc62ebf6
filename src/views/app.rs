// ============================================================================
// APP VIEW - Raíz: login o aplicación autenticada
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::ElementBuilder;
use crate::state::{AppState, Section};
use crate::views::dashboard::render_dashboard;
use crate::views::forms::render_form;
use crate::views::layout::{render_header, render_sidebar};
use crate::views::login::render_login;
use crate::views::resource_list::render_resource_section;
use crate::views::tracking::render_tracking_section;

/// Renderizar la app completa según el estado actual
pub fn render_app(state: &AppState) -> Result<Element, JsValue> {
    if !state.auth.is_logged_in() {
        return render_login(state);
    }

    let section = state.active_section();
    let content = match section {
        Section::Dashboard => render_dashboard(state)?,
        Section::Tracking => render_tracking_section()?,
        other => match other.resource() {
            Some(kind) => render_resource_section(state, kind)?,
            None => ElementBuilder::new("div")?.build(),
        },
    };

    let main = ElementBuilder::new("main")?
        .class("col-md-10 p-4")
        .child(content)?
        .build();

    let row = ElementBuilder::new("div")?
        .class("row")
        .child(render_sidebar(state)?)?
        .child(main)?
        .build();

    let container = ElementBuilder::new("div")?
        .class("container-fluid")
        .child(row)?
        .build();

    let mut app = ElementBuilder::new("div")?
        .id("mainApp")?
        .child(render_header(state)?)?
        .child(container)?;

    if let Some(kind) = *state.open_form.borrow() {
        app = app.child(render_form(state, kind)?)?;
    }

    Ok(app.build())
}
