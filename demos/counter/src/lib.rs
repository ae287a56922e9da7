//! The counter widget in three flavors: a single-value state, a record state
//! changed through patches, and a raw version that edits the document in
//! place.

pub mod count;
pub mod object;
pub mod raw;
pub mod single;

pub use self::{
    count::{Count, CountError},
    object::{CounterPatch, CounterState},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
fn init_logging(config: &hdom::Config) {
    let console = if config.log_to_console {
        tracing_wasm::ConsoleConfig::ReportWithoutConsoleColor
    } else {
        tracing_wasm::ConsoleConfig::NoReporting
    };
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_report_logs_in_timings(false)
            .set_max_level(config.log_level)
            .set_console_config(console)
            .build(),
    );
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    let config = hdom::Config::default();
    init_logging(&config);

    hdom::launch(
        hdom::web::WebHost::new(),
        &config,
        CounterState::default(),
        object::view,
    )
    .map_err(|err| JsValue::from_str(&err.to_string()))?;
    tracing::info!(selector=%config.mount_selector, "counter started");
    Ok(())
}
