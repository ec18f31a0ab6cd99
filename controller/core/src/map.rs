//! Map Presenter
//!
//! Builds the view handed to the mapping widget: a centre, a zoom level, a
//! user marker and the static list of recycling centers. The user position
//! comes from a [`GeolocationProvider`], queried once per app run on a
//! spawned task with a hard timeout. Any failure degrades to the fixed
//! fallback position and a status line explaining why.
//!
//! The presenter never draws anything. Surfaces receive a [`MapView`] and
//! render it however they can (the TUI prints coordinates and a list).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::oneshot;

/// Delay between map activation and the location request
pub const LOCATE_DELAY: Duration = Duration::from_millis(300);

/// Geolocation timeout
pub const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Default zoom level
pub const DEFAULT_ZOOM: u8 = 14;

/// Position used when the user cannot be located (Varanasi)
pub const FALLBACK_POSITION: GeoPosition = GeoPosition {
    latitude: 25.2677,
    longitude: 82.9913,
};

/// Tile URL template for the mapping widget
pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Tile attribution
pub const ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Status shown once the user was located
pub const STATUS_FOUND: &str = "Location found! Showing nearby centers";

/// Status shown when the request failed or timed out
pub const STATUS_FALLBACK: &str = "Using default location (Varanasi)";

/// Status shown when there is no geolocation at all
pub const STATUS_UNSUPPORTED: &str = "Geolocation not supported";

/// A latitude/longitude pair in degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    /// Degrees north
    pub latitude: f64,
    /// Degrees east
    pub longitude: f64,
}

impl GeoPosition {
    /// Create a position
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `lat, lon` with four decimals
    #[must_use]
    pub fn label(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Turn-by-turn directions link to this position
    #[must_use]
    pub fn directions_url(&self) -> String {
        format!(
            "https://www.google.com/maps/dir/?api=1&destination={},{}",
            self.latitude, self.longitude
        )
    }
}

/// Options for a one-shot position request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionOptions {
    /// Ask for the most accurate fix available
    pub high_accuracy: bool,
    /// Give up after this long
    pub timeout: Duration,
    /// Accept a cached fix at most this old (zero disables caching)
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: GEOLOCATION_TIMEOUT,
            maximum_age: Duration::ZERO,
        }
    }
}

/// Errors from a geolocation request
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GeolocationError {
    /// The platform has no geolocation
    #[error("geolocation is not supported")]
    Unsupported,

    /// The user refused
    #[error("permission to read the location was denied")]
    PermissionDenied,

    /// The provider could not produce a fix
    #[error("position unavailable: {0}")]
    Unavailable(String),

    /// No answer within the timeout
    #[error("no position within {0:?}")]
    Timeout(Duration),
}

/// Source of the user's position
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// Whether the platform offers geolocation at all
    fn is_supported(&self) -> bool {
        true
    }

    /// One-shot position request
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<GeoPosition, GeolocationError>;
}

/// Provider that always answers with the same position
#[derive(Clone, Copy, Debug)]
pub struct FixedGeolocation {
    position: GeoPosition,
}

impl FixedGeolocation {
    /// Always report `position`
    #[must_use]
    pub fn new(position: GeoPosition) -> Self {
        Self { position }
    }
}

#[async_trait]
impl GeolocationProvider for FixedGeolocation {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<GeoPosition, GeolocationError> {
        Ok(self.position)
    }
}

/// Provider for platforms without location access
#[derive(Clone, Debug)]
pub struct UnavailableGeolocation {
    error: GeolocationError,
}

impl UnavailableGeolocation {
    /// No geolocation on this platform
    #[must_use]
    pub fn unsupported() -> Self {
        Self {
            error: GeolocationError::Unsupported,
        }
    }

    /// Geolocation exists but every request fails with `error`
    #[must_use]
    pub fn failing(error: GeolocationError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl GeolocationProvider for UnavailableGeolocation {
    fn is_supported(&self) -> bool {
        self.error != GeolocationError::Unsupported
    }

    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<GeoPosition, GeolocationError> {
        Err(self.error.clone())
    }
}

/// How a center's position is given
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CenterPosition {
    /// Fixed coordinates
    Absolute(GeoPosition),
    /// Degrees relative to the user position
    Offset {
        /// Latitude delta
        latitude: f64,
        /// Longitude delta
        longitude: f64,
    },
}

impl CenterPosition {
    /// Resolve against the map centre
    #[must_use]
    pub fn resolve(&self, origin: GeoPosition) -> GeoPosition {
        match *self {
            Self::Absolute(position) => position,
            Self::Offset {
                latitude,
                longitude,
            } => GeoPosition::new(origin.latitude + latitude, origin.longitude + longitude),
        }
    }
}

/// A drop-off point
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RecyclingCenter {
    /// Display name
    pub name: &'static str,
    /// Neighbourhood or landmark
    pub location: &'static str,
    /// Where it is
    pub position: CenterPosition,
}

/// The centers shown on the map
pub const RECYCLING_CENTERS: &[RecyclingCenter] = &[
    RecyclingCenter {
        name: "EcoBin Station #42",
        location: "Green Valley Mall",
        position: CenterPosition::Absolute(GeoPosition::new(25.2677, 82.9913)),
    },
    RecyclingCenter {
        name: "EcoBin Station #15",
        location: "Lanka Market",
        position: CenterPosition::Absolute(GeoPosition::new(25.2685, 82.9920)),
    },
    RecyclingCenter {
        name: "EcoBin Station #28",
        location: "Bhelpur",
        position: CenterPosition::Absolute(GeoPosition::new(25.2620, 82.9965)),
    },
];

/// Marker style
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerIcon {
    /// "You are here"
    User,
    /// Recycling bin
    Bin,
}

/// A marker descriptor for the mapping widget
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    /// Where to put it
    pub position: GeoPosition,
    /// How it looks
    pub icon: MarkerIcon,
    /// Popup title
    pub title: String,
    /// Popup body line
    pub detail: Option<String>,
    /// Directions link, for center markers
    pub directions_url: Option<String>,
}

impl MapMarker {
    fn user(position: GeoPosition) -> Self {
        Self {
            position,
            icon: MarkerIcon::User,
            title: "📍 You are here".to_string(),
            detail: None,
            directions_url: None,
        }
    }

    fn center(center: &RecyclingCenter, origin: GeoPosition) -> Self {
        let position = center.position.resolve(origin);
        Self {
            position,
            icon: MarkerIcon::Bin,
            title: center.name.to_string(),
            detail: Some(center.location.to_string()),
            directions_url: Some(position.directions_url()),
        }
    }
}

/// Everything the mapping widget needs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    /// Map centre
    pub center: GeoPosition,
    /// Zoom level
    pub zoom: u8,
    /// Tile URL template
    pub tile_url: String,
    /// Tile attribution
    pub attribution: String,
    /// User marker (only when the user was located)
    pub user_marker: Option<MapMarker>,
    /// Center markers
    pub centers: Vec<MapMarker>,
}

/// Outcome of locating the user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapStatus {
    /// User located
    Found,
    /// Request failed or timed out
    Fallback,
    /// No geolocation on this platform
    Unsupported,
}

impl MapStatus {
    /// Status line text
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Self::Found => STATUS_FOUND,
            Self::Fallback => STATUS_FALLBACK,
            Self::Unsupported => STATUS_UNSUPPORTED,
        }
    }
}

/// The map after a location attempt settled
#[derive(Clone, Debug, PartialEq)]
pub struct MapUpdate {
    /// Which path was taken
    pub status: MapStatus,
    /// Reported position, for the "real-time location" line
    pub position_label: Option<String>,
    /// View to display
    pub view: MapView,
}

/// Answer from the spawned geolocation task
pub type LocateReceiver = oneshot::Receiver<Result<GeoPosition, GeolocationError>>;

/// Map presenter settings
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapConfig {
    /// Position used when locating fails
    pub fallback: GeoPosition,
    /// Zoom level
    pub zoom: u8,
    /// Request options
    pub options: PositionOptions,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            fallback: FALLBACK_POSITION,
            zoom: DEFAULT_ZOOM,
            options: PositionOptions::default(),
        }
    }
}

/// Owns the map instance and the location request
pub struct MapPresenter {
    provider: Arc<dyn GeolocationProvider>,
    config: MapConfig,
    view: Option<MapView>,
    locating: bool,
    centers_list_open: bool,
}

impl std::fmt::Debug for MapPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapPresenter")
            .field("config", &self.config)
            .field("has_map", &self.view.is_some())
            .field("locating", &self.locating)
            .field("centers_list_open", &self.centers_list_open)
            .finish_non_exhaustive()
    }
}

impl MapPresenter {
    /// Create a presenter with no map yet
    pub fn new(provider: Arc<dyn GeolocationProvider>, config: MapConfig) -> Self {
        Self {
            provider,
            config,
            view: None,
            locating: false,
            centers_list_open: false,
        }
    }

    /// Whether a map instance exists
    #[must_use]
    pub fn has_map(&self) -> bool {
        self.view.is_some()
    }

    /// Whether a location request is in flight
    #[must_use]
    pub fn is_locating(&self) -> bool {
        self.locating
    }

    /// The current view, if built
    #[must_use]
    pub fn view(&self) -> Option<&MapView> {
        self.view.as_ref()
    }

    /// Whether the map screen's hook should request a location
    #[must_use]
    pub fn needs_location(&self) -> bool {
        self.view.is_none() && !self.locating
    }

    /// Flip the nearby-centers list. Returns the new state.
    pub fn toggle_centers_list(&mut self) -> bool {
        self.centers_list_open = !self.centers_list_open;
        self.centers_list_open
    }

    /// Whether the nearby-centers list is expanded
    #[must_use]
    pub fn centers_list_open(&self) -> bool {
        self.centers_list_open
    }

    /// Start the one-shot location request.
    ///
    /// The provider runs on a spawned task bounded by the configured
    /// timeout. Without an async runtime the request fails at once.
    pub fn locate(&mut self) -> LocateReceiver {
        let (tx, rx) = oneshot::channel();
        self.locating = true;

        if !self.provider.is_supported() {
            let _ = tx.send(Err(GeolocationError::Unsupported));
            return rx;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime for geolocation request");
            let _ = tx.send(Err(GeolocationError::Unavailable(
                "no async runtime".to_string(),
            )));
            return rx;
        };

        let provider = Arc::clone(&self.provider);
        let options = self.config.options;
        handle.spawn(async move {
            let result =
                match tokio::time::timeout(options.timeout, provider.current_position(&options))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(GeolocationError::Timeout(options.timeout)),
                };
            // Receiver gone means the controller shut down
            let _ = tx.send(result);
        });
        rx
    }

    /// Build the map from the request outcome
    pub fn resolve(&mut self, outcome: Result<GeoPosition, GeolocationError>) -> MapUpdate {
        self.locating = false;
        let (status, center, user) = match outcome {
            Ok(position) => (MapStatus::Found, position, Some(position)),
            Err(GeolocationError::Unsupported) => {
                tracing::warn!("Geolocation not supported, using fallback position");
                (MapStatus::Unsupported, self.config.fallback, None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Geolocation failed, using fallback position");
                (MapStatus::Fallback, self.config.fallback, None)
            }
        };

        let view = MapView {
            center,
            zoom: self.config.zoom,
            tile_url: TILE_URL.to_string(),
            attribution: ATTRIBUTION.to_string(),
            user_marker: user.map(MapMarker::user),
            centers: RECYCLING_CENTERS
                .iter()
                .map(|c| MapMarker::center(c, center))
                .collect(),
        };
        self.view = Some(view.clone());

        MapUpdate {
            status,
            position_label: user.map(|p| p.label()),
            view,
        }
    }
}
