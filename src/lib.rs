//! # Area Check Form
//!
//! A small form for checking whether a point lies inside an area computed by a
//! remote endpoint. The user picks a point and a scale:
//! - **X** snaps to one of `-3..=5` (whole numbers)
//! - **Y** is any number in `[-3, 5]`
//! - **Scale** is one of `1, 1.5, 2, 2.5, 3`
//!
//! ## Features
//! - Debounced validation of typed coordinates with transient error messages
//! - The selection is mirrored into the page URL, so links reopen the same form
//! - Submissions render the session's check history, newest first
//! - Runs in the browser (WebAssembly) or as a native window for development

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod location;
pub mod notify;
pub mod query_sync;
pub mod schedule;
pub mod submission;
pub mod transport;
mod types;
mod ui;

// Re-export public types and functions
pub use config::AppConfig;
pub use error::{InputError, SubmitError, ValidationError};
pub use types::*;
pub use ui::{AreaCheckApp, FieldBuffer};

/// Runs the form in a native window.
///
/// The page URL comes from [`config::PAGE_URL_ENV`] (see [`AppConfig::from_env`]),
/// and requests go to a tokio runtime that lives as long as the window.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an `eframe::Error` if
/// initialization fails.
///
/// # Example
///
/// ```no_run
/// use area_check_form::run_app;
///
/// fn main() -> Result<(), eframe::Error> {
///     run_app()
/// }
/// ```
#[cfg(not(target_arch = "wasm32"))]
pub fn run_app() -> Result<(), eframe::Error> {
    let config = AppConfig::from_env();
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| eframe::Error::AppCreation(Box::new(e)))?;
    let handle = runtime.handle().clone();

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Area Check",
        options,
        Box::new(move |cc| {
            let location = location::MemoryLocation::parse(&config.page_url)?;
            let transport = transport::HttpTransport::new(handle).with_repaint(cc.egui_ctx.clone());
            let app = AreaCheckApp::new(&config, Box::new(location), Box::new(transport))?;
            Ok(Box::new(app))
        }),
    )
}

/// Starts the form on the canvas with id `canvas_id`.
///
/// The form reads and rewrites the URL of the hosting tab and submits to the
/// `/app` endpoint on the same origin.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub async fn start(canvas_id: String) -> Result<(), wasm_bindgen::JsValue> {
    use wasm_bindgen::JsCast;

    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let canvas = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(&canvas_id))
        .ok_or_else(|| wasm_bindgen::JsValue::from_str("canvas not found"))?
        .dyn_into::<web_sys::HtmlCanvasElement>()?;
    let location = location::BrowserLocation::current()
        .ok_or_else(|| wasm_bindgen::JsValue::from_str("no page URL"))?;

    let config = AppConfig::default();
    eframe::WebRunner::new()
        .start(
            canvas,
            eframe::WebOptions::default(),
            Box::new(move |cc| {
                let transport = transport::FetchTransport::new(cc.egui_ctx.clone());
                let app = AreaCheckApp::new(&config, Box::new(location), Box::new(transport))?;
                Ok(Box::new(app))
            }),
        )
        .await
}
