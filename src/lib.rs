// ============================================================================
// TMS ADMIN - FRONTEND MVVM (RUST PURO + WASM)
// ============================================================================
// - Views: Funciones que renderizan DOM (sin lógica)
// - ViewModels: Controladores de página (listas, detalle, altas)
// - Services: Transporte HTTP, auth link, cliente GraphQL con caché
// - State: Sesión, ruta y notificaciones con Rc<RefCell>
// - Models: Registros de la API
// ============================================================================

pub mod config;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
pub mod viewmodels;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod views;

#[cfg(test)]
mod testing;

#[cfg(target_arch = "wasm32")]
pub use wasm::rerender_app;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;
    use wasm_logger::Config;

    use crate::app::App;

    // Instancia global de App
    thread_local! {
        static APP: RefCell<Option<App>> = RefCell::new(None);
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let level = if crate::config::CONFIG.enable_logging { log::Level::Debug } else { log::Level::Warn };
        wasm_logger::init(Config::new(level));
        log::info!("🚀 TMS Admin - Rust Puro + MVVM");

        let mut app = App::new()?;
        app.render()?;

        APP.with(|cell| {
            *cell.borrow_mut() = Some(app);
        });
        Ok(())
    }

    /// Re-render completo de la app
    pub fn rerender_app() {
        APP.with(|cell| match cell.try_borrow_mut() {
            Ok(mut slot) => match slot.as_mut() {
                Some(app) => {
                    if let Err(e) = app.render() {
                        log::error!("❌ [RERENDER] Error re-renderizando: {:?}", e);
                    }
                }
                None => log::warn!("⚠️ [RERENDER] App no está inicializada"),
            },
            // Un render ya en curso pintará el estado más reciente
            Err(_) => log::debug!("⏭️ [RERENDER] Render en curso, se omite"),
        });
    }

    /// Re-render llamable desde JavaScript
    #[wasm_bindgen]
    pub fn rerender_app_wasm() {
        rerender_app();
    }
}
