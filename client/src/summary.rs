use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use playmap_shared::summary::{SUMMARY_UNAVAILABLE, SummaryReply, summary_text};

use crate::net::get_json;

const CONTAINER_ID: &str = "summary-container";
const TEXT_SELECTOR: &str = "#summary-text";

/// Fill the review-summary panel, if the page has one.
pub fn load(document: &Document, timeout_ms: u32) {
    let Some(container) = document
        .get_element_by_id(CONTAINER_ID)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    let Ok(Some(text)) = container.query_selector(TEXT_SELECTOR) else {
        return;
    };
    let Some(url) = container.dataset().get("url").filter(|url| !url.is_empty()) else {
        text.set_text_content(Some(SUMMARY_UNAVAILABLE));
        return;
    };

    wasm_bindgen_futures::spawn_local(async move {
        let result = get_json::<SummaryReply>(&url, timeout_ms).await;
        if let Err(e) = &result {
            web_sys::console::warn_1(&format!("summary: {e}").into());
        }
        text.set_text_content(Some(&summary_text(result)));
    });
}
