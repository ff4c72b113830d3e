use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Element, Event};

use playmap_shared::form::FormBody;
use playmap_shared::popup::TOGGLE_ACTION;
use playmap_shared::toggle::FavoriteTransport;
use playmap_shared::{
    Endpoints, FavoriteAction, FavoriteButton, FavoriteReply, FavoriteState, ToggleOutcome,
    TransportError,
};

use crate::csrf::PageCsrf;
use crate::dom::{DocumentButtons, DomButton};
use crate::net::{StatusPolicy, post_form};
use crate::notify::PageNotifier;

const ITEM_FIELD: &str = "playground_id";

pub type PageFavorites = FavoriteState<HttpFavorites, DocumentButtons, PageNotifier>;

pub struct HttpFavorites {
    endpoints: Rc<Endpoints>,
    csrf: PageCsrf,
    timeout_ms: u32,
}

impl HttpFavorites {
    pub fn new(endpoints: Rc<Endpoints>, csrf: PageCsrf, timeout_ms: u32) -> Self {
        Self {
            endpoints,
            csrf,
            timeout_ms,
        }
    }
}

impl FavoriteTransport for HttpFavorites {
    async fn send(
        &self,
        action: FavoriteAction,
        item_id: &str,
    ) -> Result<FavoriteReply, TransportError> {
        let body = FormBody::new().with(ITEM_FIELD, item_id).encode();
        let token = self.csrf.token();
        // The server answers rejections with a JSON status and a 4xx code.
        post_form(
            self.endpoints.favorite(action),
            body,
            token.as_deref(),
            StatusPolicy::AnyStatus,
            self.timeout_ms,
        )
        .await
    }
}

/// Body-level click delegation, so buttons inside popups opened later are
/// handled too.
pub fn handle_click(favorites: &Rc<PageFavorites>, reload_after_toggle: bool, event: &Event) {
    let Some(button) = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .and_then(|el| el.closest(&format!("[data-action=\"{TOGGLE_ACTION}\"]")).ok().flatten())
        .and_then(DomButton::from_element)
    else {
        return;
    };
    event.prevent_default();

    let Some(item_id) = button.item_id() else {
        web_sys::console::warn_1(&"favorite control without an item id".into());
        return;
    };

    let favorites = Rc::clone(favorites);
    wasm_bindgen_futures::spawn_local(async move {
        match favorites.toggle(&button, &item_id).await {
            Ok(ToggleOutcome::Applied(_)) if reload_after_toggle => {
                if let Some(window) = web_sys::window() {
                    let _ = window.location().reload();
                }
            }
            Ok(_) => {}
            Err(e) => {
                web_sys::console::warn_1(&format!("favorite {item_id}: {e}").into());
            }
        }
    });
}
