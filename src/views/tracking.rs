// ============================================================================
// TRACKING VIEW - Mapa en vivo
// ============================================================================
// El contenedor del mapa vive en index.html, fuera de #app: un re-render
// completo no destruye el mapa Leaflet. Aquí solo se muestra/oculta el panel
// y se arrancan mapa y feed la primera vez.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::config::CONFIG;
use crate::dom::{set_visible, ElementBuilder};
use crate::models::SAMPLE_VEHICLES;
use crate::services::{page_feed_url, BrowserFeed, TimeoutScheduler, WebSocketConnector};
use crate::state::{AppState, Section};
use crate::utils::TRACKING_PANEL_ID;
use crate::viewmodels::AppViewModel;

/// Cabecera de la sección; el mapa se muestra debajo desde el panel del host
pub fn render_tracking_section() -> Result<Element, JsValue> {
    let hint = ElementBuilder::new("p")?
        .class("text-muted")
        .text("Vehicle positions update live as drivers report them.")
        .build();

    Ok(ElementBuilder::new("section")?
        .id("tracking")?
        .class("content-section")
        .child(ElementBuilder::new("h2")?.text("Live Tracking").build())?
        .child(hint)?
        .build())
}

/// Llamar después de cada render
pub fn sync_tracking_panel(state: &AppState) -> Result<(), JsValue> {
    let visible = state.auth.is_logged_in() && state.active_section() == Section::Tracking;
    set_visible(TRACKING_PANEL_ID, visible)?;
    if !visible {
        return Ok(());
    }

    let created = {
        let map = &CONFIG.map_config;
        let mut markers = state.markers.borrow_mut();
        let created = markers.ensure_map(
            (map.default_center_lat, map.default_center_lng),
            map.default_zoom,
            &SAMPLE_VEHICLES,
        );
        markers.refresh();
        created
    };

    if created {
        let state_clone = state.clone();
        spawn_local(async move {
            AppViewModel::seed_live_positions(state_clone).await;
        });
    }

    start_live_feed(state);
    Ok(())
}

/// Un solo feed por página: se abre con el primer mapa y no se cierra en logout
fn start_live_feed(state: &AppState) {
    if state.live_feed.borrow().is_some() {
        return;
    }
    let Some(url) = page_feed_url() else {
        log::error!("❌ [FEED] No se pudo construir la URL del WebSocket");
        return;
    };

    let feed = BrowserFeed::new(
        url,
        CONFIG.reconnect_delay_ms,
        WebSocketConnector,
        TimeoutScheduler,
        state.markers.clone(),
    );
    feed.start();
    log::info!("📡 [FEED] Feed en vivo arrancado: {}", feed.url());
    *state.live_feed.borrow_mut() = Some(feed);
}
