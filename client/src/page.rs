//! Page bootstrap: reads the server-rendered globals and wires every component.

use std::cell::RefCell;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;
use web_sys::{Document, Window};

use playmap_shared::{
    ClientConfig, DisplayItem, FavoriteSet, FavoriteState, FavoriteStore, ItemId, MapSurface,
    MarkerSync,
};

use crate::csrf::PageCsrf;
use crate::dom::{DocumentButtons, Listener};
use crate::favorite::{HttpFavorites, PageFavorites, handle_click};
use crate::leaflet::LeafletBackend;
use crate::notify::PageNotifier;
use crate::{review, summary};

const CONFIG_GLOBAL: &str = "PLAYMAP_CONFIG";
const ITEMS_GLOBAL: &str = "playgrounds";
const FAVORITES_GLOBAL: &str = "favorite_ids";
const AUTH_DATA_KEY: &str = "isAuthenticated";
const MAP_TAB_ID: &str = "map-tab";

type PageMaps = MarkerSync<LeafletBackend>;

/// Everything that must outlive `boot`.
struct Page {
    _listeners: Vec<Listener>,
    _favorites: Rc<PageFavorites>,
    _maps: Rc<PageMaps>,
}

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

/// Absent means authenticated; only an explicit "false" gates the toggle.
fn is_authenticated(flag: Option<&str>) -> bool {
    !matches!(flag.map(str::trim), Some(v) if v.eq_ignore_ascii_case("false"))
}

fn present_surfaces(exists: impl Fn(&str) -> bool) -> Vec<MapSurface> {
    MapSurface::ALL
        .into_iter()
        .filter(|surface| exists(surface.element_id()))
        .collect()
}

/// `Ok(None)` when the page never defined `name`.
fn read_global<T: DeserializeOwned>(window: &Window, name: &str) -> Result<Option<T>, String> {
    let value = js_sys::Reflect::get(window, &JsValue::from_str(name))
        .map_err(|e| format!("read {name}: {e:?}"))?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(value)
        .map(Some)
        .map_err(|e| format!("parse {name}: {e}"))
}

fn read_global_or_warn<T: DeserializeOwned>(window: &Window, name: &str) -> Option<T> {
    read_global(window, name).unwrap_or_else(|e| {
        web_sys::console::warn_1(&e.into());
        None
    })
}

fn render_surfaces(document: &Document, maps: &PageMaps, items: &[DisplayItem]) {
    for surface in present_surfaces(|id| document.get_element_by_id(id).is_some()) {
        match maps.render_map(surface, items) {
            Ok(placed) => web_sys::console::info_1(
                &format!("{}: {placed} markers", surface.element_id()).into(),
            ),
            Err(e) => web_sys::console::warn_1(&format!("map: {e}").into()),
        }
    }
}

pub fn boot() -> Result<(), String> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let body = document.body().ok_or("no body")?;

    let config: ClientConfig = read_global_or_warn(&window, CONFIG_GLOBAL).unwrap_or_default();
    let favorite_ids: Option<Vec<ItemId>> = read_global_or_warn(&window, FAVORITES_GLOBAL);
    let items: Rc<Vec<DisplayItem>> =
        Rc::new(read_global_or_warn(&window, ITEMS_GLOBAL).unwrap_or_default());
    let authenticated = is_authenticated(body.dataset().get(AUTH_DATA_KEY).as_deref());
    let reload_after_toggle = window
        .location()
        .pathname()
        .map(|path| config.reloads_after_toggle(&path))
        .unwrap_or(false);

    let seeded = favorite_ids.is_some();
    let store = FavoriteStore::new(FavoriteSet::from_ids(
        favorite_ids.unwrap_or_default().into_iter().map(String::from),
    ));
    let endpoints = Rc::new(config.endpoints.clone());
    let notifier = PageNotifier::from_document(&document);
    let csrf = PageCsrf::new(config.csrf_source);

    let favorites: Rc<PageFavorites> = Rc::new(
        FavoriteState::new(
            store.clone(),
            HttpFavorites::new(Rc::clone(&endpoints), csrf, config.request_timeout_ms()),
            DocumentButtons::new(document.clone()),
            notifier.clone(),
        )
        .with_authentication(authenticated),
    );
    if seeded {
        favorites.refresh();
    }

    let reconcile = Rc::clone(&favorites);
    let maps: Rc<PageMaps> = Rc::new(
        MarkerSync::new(LeafletBackend, store, Rc::clone(&endpoints), config.map.clone())
            .with_reconcile(move || {
                reconcile.refresh();
            }),
    );

    let mut listeners = Vec::new();

    let on_click = Rc::clone(&favorites);
    listeners.push(Listener::attach(&body, "click", move |event| {
        handle_click(&on_click, reload_after_toggle, &event);
    })?);

    match document.get_element_by_id(MAP_TAB_ID) {
        Some(tab) => {
            let on_shown = Rc::clone(&maps);
            let tab_document = document.clone();
            let tab_items = Rc::clone(&items);
            listeners.push(Listener::attach(&tab, "shown.bs.tab", move |_| {
                render_surfaces(&tab_document, &on_shown, &tab_items);
            })?);
        }
        None => render_surfaces(&document, &maps, &items),
    }

    match review::wire(&document, &config, endpoints, notifier) {
        Ok(review_listeners) => listeners.extend(review_listeners),
        Err(e) => web_sys::console::error_1(&format!("review modal: {e}").into()),
    }

    summary::load(&document, config.request_timeout_ms());

    PAGE.with(move |slot| {
        // Dropping the previous page removes its listeners.
        let _old = slot.borrow_mut().take();
        *slot.borrow_mut() = Some(Page {
            _listeners: listeners,
            _favorites: favorites,
            _maps: maps,
        });
    });
    Ok(())
}
