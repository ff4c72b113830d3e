pub mod config;
pub mod csrf;
pub mod endpoints;
pub mod error;
pub mod favorites;
pub mod form;
pub mod item;
pub mod map;
pub mod notice;
pub mod popup;
pub mod review;
pub mod summary;
pub mod toggle;

pub use config::{ClientConfig, MapConfig};
pub use endpoints::Endpoints;
pub use error::{ConfigError, MapError, ReviewError, ToggleError, TransportError};
pub use favorites::{FavoriteAction, FavoriteReply, FavoriteSet, FavoriteStore, favorite_label};
pub use item::{DisplayItem, ItemId, LatLng};
pub use map::{MapBackend, MapSurface, MarkerSync};
pub use notice::Notice;
pub use review::{ReviewPhase, ReviewSubmission, ReviewTarget};
pub use toggle::{ButtonSurface, FavoriteButton, FavoriteState, FavoriteTransport, Notifier, ToggleOutcome};
