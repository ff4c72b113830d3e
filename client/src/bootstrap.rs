//! Bindings to the page's Bootstrap bundle (`window.bootstrap`).

use wasm_bindgen::prelude::*;
use web_sys::Element;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = bootstrap)]
    #[derive(Clone)]
    pub type Modal;

    /// Reuses the instance Bootstrap already attached to `element`.
    #[wasm_bindgen(static_method_of = Modal, catch, js_namespace = bootstrap, js_name = getOrCreateInstance)]
    pub fn get_or_create(element: &Element) -> Result<Modal, JsValue>;

    #[wasm_bindgen(method)]
    pub fn hide(this: &Modal);
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = bootstrap)]
    #[derive(Clone)]
    pub type Toast;

    #[wasm_bindgen(static_method_of = Toast, catch, js_namespace = bootstrap, js_name = getOrCreateInstance)]
    pub fn get_or_create(element: &Element) -> Result<Toast, JsValue>;

    #[wasm_bindgen(method)]
    pub fn show(this: &Toast);
}
