use std::fmt::Write;

use crate::endpoints::Endpoints;
use crate::favorites::favorite_label;
use crate::item::DisplayItem;

pub const TOGGLE_ACTION: &str = "toggle-favorite";
pub const REVIEW_MODAL_SELECTOR: &str = "#reviewModal";

/// Escape text for interpolation into HTML element content or quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Popup body for one marker. Pure: call it when the popup opens so the
/// favorite label reflects the set at that moment.
pub fn render_popup(item: &DisplayItem, is_favorite: bool, endpoints: &Endpoints) -> String {
    let id = escape_html(&item.id);
    let name = escape_html(&item.name);
    let detail = escape_html(&endpoints.facility_detail(&item.id));
    let reviews = escape_html(&endpoints.review_list(&item.id));

    let mut html = String::with_capacity(768);
    html.push_str("<div>");
    let _ = write!(html, "<strong>{name}</strong><br>");
    let _ = write!(html, "住所: {}<br>", escape_html(&item.address));
    let _ = write!(html, "電話番号: {}<br>", escape_html(&item.formatted_phone));
    let _ = write!(
        html,
        r#"<a href="{detail}" class="btn btn-outline-primary btn-sm mt-2">詳細を見る</a>"#
    );
    let _ = write!(
        html,
        r#"<button class="btn btn-outline-success btn-sm mt-2" data-playground-id="{id}" data-action="{TOGGLE_ACTION}">{}</button>"#,
        favorite_label(is_favorite)
    );
    let _ = write!(
        html,
        r#"<button class="btn btn-outline-secondary btn-sm mt-2" data-bs-toggle="modal" data-bs-target="{REVIEW_MODAL_SELECTOR}" data-playground-id="{id}" data-playground-name="{name}">口コミを書く</button>"#
    );
    let _ = write!(
        html,
        r#"<a href="{reviews}" class="btn btn-outline-info btn-sm mt-2">口コミを見る</a>"#
    );
    html.push_str("</div>");
    html
}
