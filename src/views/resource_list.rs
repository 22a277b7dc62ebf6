// ============================================================================
// RESOURCE LIST VIEW - Tabla o mensaje vacío
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{on_click, ElementBuilder};
use crate::models::ResourceKind;
use crate::state::AppState;
use crate::viewmodels::{list_view, AppViewModel, Cell, ListView, TableModel};

fn section_title(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Vehicles => "Vehicles",
        ResourceKind::Cargo => "Cargo",
        ResourceKind::Routes => "Routes",
        ResourceKind::Users => "Users",
    }
}

fn add_label(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Vehicles => "Add Vehicle",
        ResourceKind::Cargo => "Add Cargo",
        ResourceKind::Routes => "Create Route",
        ResourceKind::Users => "Add User",
    }
}

/// Sección de listado: cabecera con botón de alta + contenido
pub fn render_resource_section(state: &AppState, kind: ResourceKind) -> Result<Element, JsValue> {
    let add_btn = ElementBuilder::new("button")?
        .class("btn btn-primary")
        .attr("type", "button")?
        .text(add_label(kind))
        .build();
    {
        let state = state.clone();
        on_click(&add_btn, move |_| {
            let state = state.clone();
            spawn_local(async move {
                AppViewModel::open_form(state, kind).await;
            });
        })?;
    }

    let header = ElementBuilder::new("div")?
        .class("d-flex justify-content-between align-items-center mb-3")
        .child(ElementBuilder::new("h2")?.text(section_title(kind)).build())?
        .child(add_btn)?
        .build();

    let body = match state.snapshot(kind) {
        Some(records) => render_list(&list_view(kind, &records))?,
        None => ElementBuilder::new("p")?
            .class("text-muted")
            .text("Loading...")
            .build(),
    };

    let container = ElementBuilder::new("div")?
        .id(&format!("{}List", kind.singular()))?
        .child(body)?
        .build();

    Ok(ElementBuilder::new("section")?
        .class("content-section")
        .child(header)?
        .child(container)?
        .build())
}

/// Nunca una tabla vacía: sin filas se muestra el mensaje
pub fn render_list(view: &ListView) -> Result<Element, JsValue> {
    match view {
        ListView::Empty(message) => Ok(ElementBuilder::new("p")?
            .class("text-muted")
            .text(message)
            .build()),
        ListView::Table(table) => render_table(table),
    }
}

fn render_table(table: &TableModel) -> Result<Element, JsValue> {
    let headers = table
        .headers
        .iter()
        .map(|header| -> Result<Element, JsValue> { Ok(ElementBuilder::new("th")?.text(header).build()) })
        .collect::<Result<Vec<_>, _>>()?;
    let head_row = ElementBuilder::new("tr")?.children(headers)?.build();
    let thead = ElementBuilder::new("thead")?.child(head_row)?.build();

    let rows = table
        .rows
        .iter()
        .map(|row| -> Result<Element, JsValue> {
            let cells = row.iter().map(render_cell).collect::<Result<Vec<_>, _>>()?;
            Ok(ElementBuilder::new("tr")?.children(cells)?.build())
        })
        .collect::<Result<Vec<_>, _>>()?;
    let tbody = ElementBuilder::new("tbody")?.children(rows)?.build();

    let table_el = ElementBuilder::new("table")?
        .class("table table-striped")
        .child(thead)?
        .child(tbody)?
        .build();

    Ok(ElementBuilder::new("div")?
        .class("table-responsive")
        .child(table_el)?
        .build())
}

fn render_cell(cell: &Cell) -> Result<Element, JsValue> {
    let td = ElementBuilder::new("td")?;
    match cell {
        Cell::Text(text) => Ok(td.text(text).build()),
        Cell::Badge { text, color } => {
            let badge = ElementBuilder::new("span")?
                .class(&format!("badge bg-{}", color))
                .text(text)
                .build();
            Ok(td.child(badge)?.build())
        }
    }
}
