use std::pin::pin;

use futures::future::{Either, select};
use gloo_net::http::{Request, RequestBuilder};
use gloo_timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;
use web_sys::AbortController;

use playmap_shared::TransportError;
use playmap_shared::csrf::CSRF_HEADER;
use playmap_shared::form::FORM_CONTENT_TYPE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Non-2xx responses are failures before the body is read.
    RequireOk,
    /// The body decides; a non-2xx JSON body still parses.
    AnyStatus,
}

/// POST a form-encoded body and decode the JSON answer.
pub async fn post_form<T: DeserializeOwned>(
    url: &str,
    body: String,
    csrf_token: Option<&str>,
    policy: StatusPolicy,
    timeout_ms: u32,
) -> Result<T, TransportError> {
    let builder = Request::post(url)
        .header("Content-Type", FORM_CONTENT_TYPE)
        .header("X-Requested-With", "XMLHttpRequest")
        .header(CSRF_HEADER, csrf_token.unwrap_or_default());
    fetch_json(builder, Some(body), policy, timeout_ms).await
}

pub async fn get_json<T: DeserializeOwned>(url: &str, timeout_ms: u32) -> Result<T, TransportError> {
    fetch_json(Request::get(url), None, StatusPolicy::RequireOk, timeout_ms).await
}

/// Run one request, aborting it once `timeout_ms` elapses.
async fn fetch_json<T: DeserializeOwned>(
    builder: RequestBuilder,
    body: Option<String>,
    policy: StatusPolicy,
    timeout_ms: u32,
) -> Result<T, TransportError> {
    let controller =
        AbortController::new().map_err(|e| TransportError::Network(format!("{e:?}")))?;
    let signal = controller.signal();
    let builder = builder.abort_signal(Some(&signal));
    let request = match body {
        Some(body) => builder.body(body),
        None => builder.build(),
    }
    .map_err(|e| TransportError::Network(e.to_string()))?;

    let exchange = pin!(async move {
        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        if policy == StatusPolicy::RequireOk && !response.ok() {
            return Err(TransportError::Status(response.status()));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    });
    let timer = pin!(TimeoutFuture::new(timeout_ms));

    match select(exchange, timer).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => {
            controller.abort();
            Err(TransportError::Timeout {
                after_ms: timeout_ms,
            })
        }
    }
}
