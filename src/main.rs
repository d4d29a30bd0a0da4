#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), eframe::Error> {
    // Set up logging for development
    env_logger::init();

    // Run the form in a native window
    area_check_form::run_app()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser build starts through the exported `start` function.
}
