// ============================================================================
// FORMS VIEW - Modales de alta
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{alert, field_value, on_click, on_submit, ElementBuilder};
use crate::models::ResourceKind;
use crate::state::AppState;
use crate::viewmodels::form_viewmodel::form_element_id;
use crate::viewmodels::{AppViewModel, FormFields, SelectOption};

const FUEL_TYPES: [&str; 4] = ["Diesel", "Gasoline", "Electric", "Hybrid"];
const PRIORITIES: [&str; 4] = ["Low", "Medium", "High", "Urgent"];
const ROLES: [&str; 4] = ["Admin", "Manager", "Driver", "Dispatcher"];

enum Control {
    Input(&'static str),
    /// Opciones + texto de la opción vacía (None = sin opción vacía)
    Select(Vec<SelectOption>, Option<&'static str>),
}

struct FieldDef {
    id: &'static str,
    label: &'static str,
    control: Control,
}

fn input(id: &'static str, label: &'static str, input_type: &'static str) -> FieldDef {
    FieldDef { id, label, control: Control::Input(input_type) }
}

fn fixed_select(id: &'static str, label: &'static str, values: &[&str]) -> FieldDef {
    let options = values
        .iter()
        .map(|v| SelectOption { value: v.to_string(), label: v.to_string() })
        .collect();
    FieldDef { id, label, control: Control::Select(options, None) }
}

fn form_title(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Vehicles => "Add Vehicle",
        ResourceKind::Cargo => "Add Cargo",
        ResourceKind::Routes => "Create Route",
        ResourceKind::Users => "Add User",
    }
}

fn field_defs(state: &AppState, kind: ResourceKind) -> Vec<FieldDef> {
    match kind {
        ResourceKind::Vehicles => vec![
            input("licensePlate", "License Plate", "text"),
            input("make", "Make", "text"),
            input("model", "Model", "text"),
            input("year", "Year", "number"),
            input("capacity", "Capacity (kg)", "number"),
            fixed_select("fuelType", "Fuel Type", &FUEL_TYPES),
        ],
        ResourceKind::Cargo => vec![
            input("cargoDescription", "Description", "text"),
            input("cargoWeight", "Weight (kg)", "number"),
            input("cargoVolume", "Volume (m³)", "number"),
            input("cargoType", "Cargo Type", "text"),
            fixed_select("cargoPriority", "Priority", &PRIORITIES),
        ],
        ResourceKind::Routes => {
            let options = state.route_options.borrow().clone();
            vec![
                input("sourceAddress", "Source Address", "text"),
                input("sourceLat", "Source Latitude", "number"),
                input("sourceLng", "Source Longitude", "number"),
                input("destAddress", "Destination Address", "text"),
                input("destLat", "Destination Latitude", "number"),
                input("destLng", "Destination Longitude", "number"),
                FieldDef {
                    id: "routeVehicle",
                    label: "Vehicle",
                    control: Control::Select(options.vehicles.clone(), Some("Select Vehicle")),
                },
                FieldDef {
                    id: "routeDriver",
                    label: "Driver",
                    control: Control::Select(options.drivers.clone(), Some("Select Driver")),
                },
                FieldDef {
                    id: "routeCargo",
                    label: "Cargo",
                    control: Control::Select(options.cargo.clone(), Some("Select Cargo")),
                },
            ]
        }
        ResourceKind::Users => vec![
            input("userUsername", "Username", "text"),
            input("userEmail", "Email", "email"),
            input("userPassword", "Password", "password"),
            fixed_select("userRole", "Role", &ROLES),
        ],
    }
}

/// Modal con el formulario de alta de `kind`
pub fn render_form(state: &AppState, kind: ResourceKind) -> Result<Element, JsValue> {
    let draft = state.form_draft.borrow().clone();

    let form = ElementBuilder::new("form")?
        .id(&form_element_id(kind))?
        .build();

    if let Some(message) = state.form_error.borrow().as_ref() {
        let warning = ElementBuilder::new("div")?
            .class("alert alert-warning")
            .text(message)
            .build();
        form.append_child(&warning)?;
    }

    for def in field_defs(state, kind) {
        let field = render_field(&def, &draft.text(def.id))?;
        form.append_child(&field)?;
    }

    let cancel_btn = ElementBuilder::new("button")?
        .class("btn btn-secondary")
        .attr("type", "button")?
        .text("Cancel")
        .build();
    {
        let state = state.clone();
        on_click(&cancel_btn, move |_| AppViewModel::close_form(&state))?;
    }

    let save_btn = ElementBuilder::new("button")?
        .class("btn btn-primary ms-2")
        .attr("type", "submit")?
        .text("Save")
        .build();

    let footer = ElementBuilder::new("div")?
        .class("d-flex justify-content-end")
        .child(cancel_btn)?
        .child(save_btn)?
        .build();
    form.append_child(&footer)?;

    {
        let state = state.clone();
        on_submit(&form, move || {
            let fields = FormFields::capture(kind, field_value);
            let state = state.clone();
            spawn_local(async move {
                if let Some(message) = AppViewModel::submit(state, kind, fields).await {
                    alert(&message);
                }
            });
        })?;
    }

    let title = ElementBuilder::new("h5")?
        .class("modal-title")
        .text(form_title(kind))
        .build();
    let header = ElementBuilder::new("div")?.class("modal-header").child(title)?.build();
    let body = ElementBuilder::new("div")?.class("modal-body").child(form)?.build();
    let content = ElementBuilder::new("div")?
        .class("modal-content")
        .child(header)?
        .child(body)?
        .build();
    let dialog = ElementBuilder::new("div")?
        .class("modal-dialog")
        .child(content)?
        .build();

    Ok(ElementBuilder::new("div")?
        .class("modal d-block")
        .attr("tabindex", "-1")?
        .attr("style", "background: rgba(0, 0, 0, 0.5);")?
        .child(dialog)?
        .build())
}

fn render_field(def: &FieldDef, value: &str) -> Result<Element, JsValue> {
    let label = ElementBuilder::new("label")?
        .class("form-label")
        .attr("for", def.id)?
        .text(def.label)
        .build();

    let control = match &def.control {
        Control::Input(input_type) => {
            let mut builder = ElementBuilder::new("input")?
                .class("form-control")
                .id(def.id)?
                .attr("type", input_type)?;
            if *input_type == "number" {
                builder = builder.attr("step", "any")?;
            }
            builder.attr("value", value)?.build()
        }
        Control::Select(options, placeholder) => {
            let mut choices = Vec::with_capacity(options.len() + 1);
            if let Some(text) = placeholder {
                choices.push(render_option("", text, value.is_empty())?);
            }
            for option in options {
                choices.push(render_option(&option.value, &option.label, option.value == value)?);
            }
            ElementBuilder::new("select")?
                .class("form-select")
                .id(def.id)?
                .children(choices)?
                .build()
        }
    };

    Ok(ElementBuilder::new("div")?
        .class("mb-3")
        .child(label)?
        .child(control)?
        .build())
}

fn render_option(value: &str, label: &str, selected: bool) -> Result<Element, JsValue> {
    let mut option = ElementBuilder::new("option")?.attr("value", value)?.text(label);
    if selected {
        option = option.attr("selected", "selected")?;
    }
    Ok(option.build())
}
