// ============================================================================
// DASHBOARD VIEW - Cuatro contadores
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::ElementBuilder;
use crate::state::AppState;

pub fn render_dashboard(state: &AppState) -> Result<Element, JsValue> {
    // Sin datos todavía: ceros, como en la primera carga
    let stats = (*state.dashboard.borrow()).unwrap_or_default();

    let cards = [
        ("totalVehicles", "Total Vehicles", stats.total_vehicles),
        ("activeRoutes", "Active Routes", stats.active_routes),
        ("pendingCargo", "Pending Cargo", stats.pending_cargo),
        ("totalUsers", "Total Users", stats.total_users),
    ];

    let row = ElementBuilder::new("div")?.class("row").build();
    for (id, title, value) in cards {
        let value_el = ElementBuilder::new("h2")?
            .id(id)?
            .class("card-text")
            .text(&value.to_string())
            .build();
        let title_el = ElementBuilder::new("h5")?
            .class("card-title")
            .text(title)
            .build();
        let body = ElementBuilder::new("div")?
            .class("card-body")
            .child(title_el)?
            .child(value_el)?
            .build();
        let card = ElementBuilder::new("div")?
            .class("card text-center mb-3")
            .child(body)?
            .build();
        let col = ElementBuilder::new("div")?
            .class("col-md-3")
            .child(card)?
            .build();
        row.append_child(&col)?;
    }

    Ok(ElementBuilder::new("section")?
        .id("dashboard")?
        .class("content-section")
        .child(ElementBuilder::new("h2")?.text("Dashboard").build())?
        .child(row)?
        .build())
}
