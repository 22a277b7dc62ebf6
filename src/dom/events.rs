// ============================================================================
// EVENT HANDLING - Sistema de eventos
// ============================================================================
// Listeners en elementos del DOM: cuando el elemento se destruye (re-render
// completo con set_inner_html("")), el navegador limpia los listeners, así
// que closure.forget() es seguro aquí. Nada global se registra con estos helpers.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, MouseEvent};

/// Click handler
pub fn on_click<F>(element: &Element, handler: F) -> Result<(), JsValue>
where
    F: FnMut(MouseEvent) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(MouseEvent)>);
    element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Submit handler. Cancela el envío nativo del formulario antes de llamar al handler.
pub fn on_submit<F>(form: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut() + 'static,
{
    let closure = Closure::wrap(Box::new(move |e: Event| {
        e.prevent_default();
        handler();
    }) as Box<dyn FnMut(Event)>);
    form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
