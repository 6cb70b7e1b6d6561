pub mod app;
pub mod chart;
pub mod components;
pub mod config;
pub mod error;
pub mod pages;
pub mod reshape;
pub mod selection;
pub mod state;
pub mod stats;
pub mod storage;

use app::App;

/// Install logging and the panic hook, then mount the app.
pub fn run() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    tracing::info!("Starting boligpris {}", env!("CARGO_PKG_VERSION"));

    leptos::mount::mount_to_body(App);
}
