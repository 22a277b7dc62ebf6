// ============================================================================
// LOGIN VIEW
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{field_value, on_submit, ElementBuilder};
use crate::state::AppState;
use crate::viewmodels::AppViewModel;

/// Renderizar vista de login
pub fn render_login(state: &AppState) -> Result<Element, JsValue> {
    log::info!("🎬 [LOGIN] render_login()");
    let loading = *state.login_loading.borrow();

    let title = ElementBuilder::new("h3")?
        .class("card-title text-center mb-4")
        .text("LogisTrans Login")
        .build();

    let form = ElementBuilder::new("form")?
        .id("loginFormElement")?
        .child(create_form_group("username", "Username", "text")?)?
        .child(create_form_group("password", "Password", "password")?)?
        .build();

    // Mensaje del servidor, sin reformatear
    if let Some(message) = state.login_error.borrow().as_ref() {
        let alert = ElementBuilder::new("div")?
            .class("alert alert-danger")
            .attr("role", "alert")?
            .text(message)
            .build();
        form.append_child(&alert)?;
    }

    let mut submit_btn = ElementBuilder::new("button")?
        .attr("type", "submit")?
        .class("btn btn-primary w-100")
        .text(if loading { "Logging in..." } else { "Login" });
    if loading {
        submit_btn = submit_btn.attr("disabled", "disabled")?;
    }
    form.append_child(&submit_btn.build())?;

    {
        let state = state.clone();
        on_submit(&form, move || {
            if *state.login_loading.borrow() {
                return;
            }
            let username = field_value("username");
            let password = field_value("password");
            let state = state.clone();
            spawn_local(async move {
                AppViewModel::login(state, username, password).await;
            });
        })?;
    }

    let body = ElementBuilder::new("div")?
        .class("card-body")
        .child(title)?
        .child(form)?
        .build();
    let card = ElementBuilder::new("div")?.class("card").child(body)?.build();
    let col = ElementBuilder::new("div")?.class("col-md-4").child(card)?.build();
    let row = ElementBuilder::new("div")?
        .class("row justify-content-center mt-5")
        .child(col)?
        .build();

    Ok(ElementBuilder::new("div")?
        .id("loginForm")?
        .class("container")
        .child(row)?
        .build())
}

fn create_form_group(id: &str, label_text: &str, input_type: &str) -> Result<Element, JsValue> {
    let label = ElementBuilder::new("label")?
        .class("form-label")
        .attr("for", id)?
        .text(label_text)
        .build();
    let input = ElementBuilder::new("input")?
        .class("form-control")
        .id(id)?
        .attr("type", input_type)?
        .attr("name", id)?
        .attr("required", "required")?
        .build();

    Ok(ElementBuilder::new("div")?
        .class("mb-3")
        .child(label)?
        .child(input)?
        .build())
}
