//! Marker placement over an abstract map library.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::config::MapConfig;
use crate::endpoints::Endpoints;
use crate::error::MapError;
use crate::favorites::FavoriteStore;
use crate::item::{DisplayItem, LatLng};
use crate::popup::render_popup;

/// Popup content producer, evaluated each time the popup opens.
pub type PopupFn = Box<dyn Fn() -> String>;

/// Deferred work handed to the map backend's timer.
pub type Task = Box<dyn FnOnce()>;

pub trait MapBackend {
    type Map;

    /// Create a map on the element with `surface_id`, centred and zoomed per
    /// `config`, with its tile layer attached.
    fn create(&self, surface_id: &str, config: &MapConfig) -> Result<Self::Map, MapError>;

    fn add_marker(&self, map: &mut Self::Map, at: LatLng, popup: PopupFn);

    /// Tear the instance down and release everything bound to it.
    fn destroy(&self, map: Self::Map);

    fn schedule(&self, delay_ms: u32, task: Task);
}

/// The two logical map surfaces a page can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapSurface {
    /// Facility search map.
    Main,
    /// My-page map of the user's favorites.
    Favorites,
}

impl MapSurface {
    pub const ALL: [MapSurface; 2] = [MapSurface::Main, MapSurface::Favorites];

    pub const fn element_id(self) -> &'static str {
        match self {
            MapSurface::Main => "map-container",
            MapSurface::Favorites => "mypage-map-container",
        }
    }

    /// Whether buttons are re-rendered once the map has laid out.
    pub const fn reconciles(self) -> bool {
        matches!(self, MapSurface::Main)
    }
}

/// Owns at most one live map per surface.
pub struct MarkerSync<B: MapBackend> {
    backend: B,
    favorites: FavoriteStore,
    endpoints: Rc<Endpoints>,
    config: MapConfig,
    reconcile: Option<Rc<dyn Fn()>>,
    live: RefCell<HashMap<MapSurface, B::Map>>,
}

impl<B: MapBackend> MarkerSync<B> {
    pub fn new(
        backend: B,
        favorites: FavoriteStore,
        endpoints: Rc<Endpoints>,
        config: MapConfig,
    ) -> Self {
        Self {
            backend,
            favorites,
            endpoints,
            config,
            reconcile: None,
            live: RefCell::new(HashMap::new()),
        }
    }

    /// Button re-render to run after marker placement on reconciling surfaces.
    pub fn with_reconcile(mut self, reconcile: impl Fn() + 'static) -> Self {
        self.reconcile = Some(Rc::new(reconcile));
        self
    }

    /// (Re)build the map on `surface`. Any previous instance there is torn
    /// down first. Returns the number of markers placed.
    pub fn render_map(&self, surface: MapSurface, items: &[DisplayItem]) -> Result<usize, MapError> {
        self.teardown(surface);

        let mut map = self.backend.create(surface.element_id(), &self.config)?;
        let mut placed = 0;
        for item in items {
            let Some(at) = item.position() else {
                continue;
            };
            let popup = self.popup_for(item.clone());
            self.backend.add_marker(&mut map, at, popup);
            placed += 1;
        }
        self.live.borrow_mut().insert(surface, map);

        if surface.reconciles()
            && let Some(reconcile) = self.reconcile.clone()
        {
            self.backend
                .schedule(self.config.reconcile_delay_ms, Box::new(move || reconcile()));
        }
        Ok(placed)
    }

    pub fn teardown(&self, surface: MapSurface) -> bool {
        let previous = self.live.borrow_mut().remove(&surface);
        match previous {
            Some(map) => {
                self.backend.destroy(map);
                true
            }
            None => false,
        }
    }

    pub fn is_live(&self, surface: MapSurface) -> bool {
        self.live.borrow().contains_key(&surface)
    }

    pub fn live_count(&self) -> usize {
        self.live.borrow().len()
    }

    fn popup_for(&self, item: DisplayItem) -> PopupFn {
        let favorites = self.favorites.clone();
        let endpoints = Rc::clone(&self.endpoints);
        Box::new(move || render_popup(&item, favorites.contains(&item.id), &endpoints))
    }
}
