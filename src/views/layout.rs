// ============================================================================
// LAYOUT - Cabecera y navegación lateral
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{on_click, ElementBuilder};
use crate::state::AppState;
use crate::viewmodels::AppViewModel;

/// Barra superior: "<usuario> (<rol>)" + logout
pub fn render_header(state: &AppState) -> Result<Element, JsValue> {
    let label = state
        .session
        .current_user()
        .map(|u| u.display_label())
        .unwrap_or_default();

    let logout_btn = ElementBuilder::new("button")?
        .class("btn btn-outline-light btn-sm")
        .attr("type", "button")?
        .text("Logout")
        .build();
    {
        let state = state.clone();
        on_click(&logout_btn, move |_| {
            AppViewModel::logout(&state);
        })?;
    }

    let user_info = ElementBuilder::new("span")?
        .id("userInfo")?
        .class("navbar-text me-3")
        .text(&label)
        .build();

    let right = ElementBuilder::new("div")?
        .class("d-flex align-items-center")
        .child(user_info)?
        .child(logout_btn)?
        .build();

    let brand = ElementBuilder::new("span")?
        .class("navbar-brand")
        .text("LogisTrans")
        .build();

    let inner = ElementBuilder::new("div")?
        .class("container-fluid")
        .child(brand)?
        .child(right)?
        .build();

    Ok(ElementBuilder::new("nav")?
        .class("navbar navbar-dark bg-primary")
        .child(inner)?
        .build())
}

/// Navegación: solo las secciones visibles para el rol
pub fn render_sidebar(state: &AppState) -> Result<Element, JsValue> {
    let active = state.active_section();
    let list = ElementBuilder::new("div")?.class("list-group").build();

    for section in state.visible_sections() {
        let class = if section == active {
            "list-group-item list-group-item-action active"
        } else {
            "list-group-item list-group-item-action"
        };
        let item = ElementBuilder::new("a")?
            .class(class)
            .attr("href", "#")?
            .text(section.title())
            .build();
        {
            let state = state.clone();
            on_click(&item, move |e| {
                e.prevent_default();
                let state = state.clone();
                spawn_local(async move {
                    AppViewModel::activate(state, section).await;
                });
            })?;
        }
        list.append_child(&item)?;
    }

    Ok(ElementBuilder::new("nav")?
        .id("authNav")?
        .class("col-md-2 bg-light sidebar p-3")
        .child(list)?
        .build())
}
