#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod bootstrap;
mod csrf;
mod dom;
mod favorite;
mod leaflet;
mod net;
mod notify;
mod page;
mod review;
mod summary;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

fn start() {
    if let Err(e) = page::boot() {
        web_sys::console::error_1(&format!("playmap: {e}").into());
    }
}

fn main() {
    console_error_panic_hook::set_once();
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };

    if document.ready_state() != "loading" {
        start();
        return;
    }
    let ready = Closure::once(start);
    if document
        .add_event_listener_with_callback("DOMContentLoaded", ready.as_ref().unchecked_ref())
        .is_ok()
    {
        ready.forget();
    }
}
