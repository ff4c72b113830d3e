use serde::{Deserialize, Serialize};

use crate::form::decode_component;

pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Where the anti-forgery token is read from. The other source is the fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsrfSource {
    #[default]
    Cookie,
    HiddenField,
}

/// Find `name` in a `document.cookie` string and URI-decode its value.
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
        .map(decode_component)
}

/// Resolve a token from both sources in the configured order.
pub fn pick_token(
    source: CsrfSource,
    cookie: impl FnOnce() -> Option<String>,
    field: impl FnOnce() -> Option<String>,
) -> Option<String> {
    let non_empty = |token: Option<String>| token.filter(|t| !t.is_empty());
    match source {
        CsrfSource::Cookie => non_empty(cookie()).or_else(|| non_empty(field())),
        CsrfSource::HiddenField => non_empty(field()).or_else(|| non_empty(cookie())),
    }
}
