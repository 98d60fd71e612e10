//! CBIO Report Dashboard (Leptos + WASM)

mod app;
mod api;
mod bindings;
mod components;
mod logging;
mod pages;
mod print;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
    leptos::mount::mount_to_body(app::App);
}
