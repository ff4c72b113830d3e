use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, HtmlInputElement};

use playmap_shared::csrf::{CSRF_COOKIE, CSRF_FIELD, CsrfSource, cookie_value, pick_token};

use crate::dom::document;

/// Reads the anti-forgery token fresh for every request.
#[derive(Debug, Clone, Copy)]
pub struct PageCsrf {
    source: CsrfSource,
}

impl PageCsrf {
    pub fn new(source: CsrfSource) -> Self {
        Self { source }
    }

    pub fn token(&self) -> Option<String> {
        pick_token(self.source, cookie_token, field_token)
    }
}

fn cookie_token() -> Option<String> {
    let jar = document()?.dyn_into::<HtmlDocument>().ok()?.cookie().ok()?;
    cookie_value(&jar, CSRF_COOKIE)
}

fn field_token() -> Option<String> {
    document()?
        .query_selector(&format!("[name={CSRF_FIELD}]"))
        .ok()
        .flatten()?
        .dyn_into::<HtmlInputElement>()
        .ok()
        .map(|input| input.value())
}
