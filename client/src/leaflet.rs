//! Leaflet (`window.L`) bindings and the map backend built on them.

use serde::Serialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use playmap_shared::map::{MapBackend, PopupFn, Task};
use playmap_shared::{LatLng, MapConfig, MapError};

use crate::dom::document;

#[wasm_bindgen]
extern "C" {
    #[derive(Clone)]
    pub type Map;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    fn new_map(element_id: &str) -> Result<Map, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &Map, center: &JsValue, zoom: u8) -> Map;

    #[wasm_bindgen(method)]
    fn remove(this: &Map) -> Map;
}

#[wasm_bindgen]
extern "C" {
    type TileLayer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url: &str, options: &JsValue) -> TileLayer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &TileLayer, map: &Map) -> TileLayer;
}

#[wasm_bindgen]
extern "C" {
    type Marker;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn marker(at: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Marker, map: &Map) -> Marker;

    #[wasm_bindgen(method, js_name = bindPopup)]
    fn bind_popup(this: &Marker, content: &js_sys::Function) -> Marker;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TileOptions<'a> {
    max_zoom: u8,
    attribution: &'a str,
}

/// A live Leaflet map plus the popup callbacks its markers call into.
pub struct LeafletMap {
    map: Map,
    popups: Vec<Closure<dyn Fn(JsValue) -> String>>,
}

pub struct LeafletBackend;

fn lat_lng(at: [f64; 2]) -> Result<JsValue, MapError> {
    serde_wasm_bindgen::to_value(&at).map_err(|e| MapError::Backend(e.to_string()))
}

impl MapBackend for LeafletBackend {
    type Map = LeafletMap;

    fn create(&self, surface_id: &str, config: &MapConfig) -> Result<LeafletMap, MapError> {
        let present = document()
            .and_then(|doc| doc.get_element_by_id(surface_id))
            .is_some();
        if !present {
            return Err(MapError::SurfaceMissing(surface_id.to_owned()));
        }
        let window = web_sys::window().ok_or_else(|| MapError::Backend("no window".into()))?;
        if !js_sys::Reflect::has(&window, &JsValue::from_str("L")).unwrap_or(false) {
            return Err(MapError::Backend("Leaflet is not loaded".into()));
        }

        let map = new_map(surface_id).map_err(|e| MapError::Backend(format!("{e:?}")))?;
        map.set_view(&lat_lng(config.center())?, config.zoom());

        let options = TileOptions {
            max_zoom: playmap_shared::config::MAX_ZOOM,
            attribution: &config.attribution,
        };
        let options =
            serde_wasm_bindgen::to_value(&options).map_err(|e| MapError::Backend(e.to_string()))?;
        tile_layer(&config.tile_url, &options).add_to(&map);

        Ok(LeafletMap {
            map,
            popups: Vec::new(),
        })
    }

    fn add_marker(&self, map: &mut LeafletMap, at: LatLng, popup: PopupFn) {
        let Ok(position) = lat_lng([at.lat, at.lng]) else {
            return;
        };
        let content = Closure::<dyn Fn(JsValue) -> String>::new(move |_layer: JsValue| popup());
        marker(&position)
            .add_to(&map.map)
            .bind_popup(content.as_ref().unchecked_ref());
        map.popups.push(content);
    }

    fn destroy(&self, map: LeafletMap) {
        map.map.remove();
        drop(map.popups);
    }

    fn schedule(&self, delay_ms: u32, task: Task) {
        gloo_timers::callback::Timeout::new(delay_ms, task).forget();
    }
}
