// ============================================================================
// LOGISTRANS DASHBOARD - FRONTEND MVVM (RUST PURO)
// ============================================================================
// - Views: Funciones que renderizan DOM (sin lógica)
// - ViewModels: Preparación de datos + acciones de la UI
// - Services: Sesión, API REST, feed WebSocket
// - Maps: Registro de marcadores sobre Leaflet
// - State: State Management con Rc<RefCell>
// - Models: Estructuras compartidas con backend
// ============================================================================

pub mod config;
pub mod error;
pub mod models;
pub mod utils;
pub mod state;
pub mod services;
pub mod maps;
pub mod viewmodels;
pub mod dom;
pub mod views;
pub mod app;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_logger::Config;

use crate::app::App;
use crate::config::CONFIG;

// Instancia global de App (un solo hilo)
thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let level = if CONFIG.is_logging_enabled() {
        log::Level::Debug
    } else {
        log::Level::Warn
    };
    wasm_logger::init(Config::new(level));
    log::info!("🚀 LogisTrans Dashboard - Rust Puro + MVVM");

    let mut app = App::new()?;
    app.render()?;

    APP.with(|app_cell| {
        *app_cell.borrow_mut() = Some(app);
    });

    Ok(())
}

/// Re-render completo de la app
pub fn rerender_app() {
    APP.with(|app_cell| {
        match app_cell.try_borrow_mut() {
            Ok(mut app) => match app.as_mut() {
                Some(app) => {
                    if let Err(e) = app.render() {
                        log::error!("❌ [RERENDER] Error re-renderizando: {:?}", e);
                    }
                }
                None => log::warn!("⚠️ [RERENDER] App no está inicializada"),
            },
            Err(_) => log::warn!("⚠️ [RERENDER] Render en curso, se omite"),
        }
    });
}

/// Re-render llamable desde JavaScript
#[wasm_bindgen]
pub fn rerender_app_wasm() {
    rerender_app();
}
