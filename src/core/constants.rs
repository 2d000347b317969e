//! Core constants: fallback view, service endpoints, icons and the fixed
//! user-facing texts. Keeping them in a single place makes them easy to tweak.

/// Default map center (longitude, latitude) used when geolocation fails.
pub const DEFAULT_CENTER_LON_LAT: (f64, f64) = (107.9019822944495, -7.215907720160664);

/// Zoom level of the default view.
pub const DEFAULT_ZOOM: f64 = 12.0;

/// Zoom level after the user's position has been found.
pub const LOCATED_ZOOM: f64 = 14.0;

/// Base URL of the reverse-geocoding service.
pub const DEFAULT_GEOCODING_ENDPOINT: &str = "https://nominatim.openstreetmap.org";

/// Public geocoding services reject anonymous clients.
pub const DEFAULT_USER_AGENT: &str = concat!("mapnote/", env!("CARGO_PKG_VERSION"));

/// Per-request geocoding timeout.
pub const DEFAULT_GEOCODING_TIMEOUT_MS: u64 = 10_000;

/// Icon for the marker placed at the user's own position.
pub const USER_ICON_URL: &str = "https://cdn-icons-png.flaticon.com/512/1946/1946429.png";

/// Icon for markers saved by the user.
pub const SAVED_ICON_URL: &str = "https://cdn-icons-png.flaticon.com/512/684/684908.png";

/// Icon scale handed to the marker renderer.
pub const MARKER_ICON_SCALE: f64 = 0.08;

/// Anchor inside the icon (fraction of width, fraction of height): bottom center.
pub const MARKER_ICON_ANCHOR: (f64, f64) = (0.5, 1.0);

/// Description of the marker at the user's position.
pub const USER_MARKER_LABEL: &str = "Maneh didieu";

/// Distance in metres within which `MarkerStore::find_at` reports a hit.
pub const MARKER_HIT_TOLERANCE_M: f64 = 25.0;

/// Prefix of the input prompt text when the clicked place was resolved.
pub const CLICKED_ON_PREFIX: &str = "You clicked on: ";

/// Region text when the marker lookup failed.
pub const REGION_LOOKUP_FAILED: &str = "Gagal mendapatkan nama daerah";

/// Region text when the service answered without a place name.
pub const REGION_NOT_FOUND: &str = "Nama daerah tidak ditemukan";

/// Nearest-location message when the position could not be obtained.
pub const GEOLOCATION_FAILED_MESSAGE: &str =
    "Gagal mendapatkan lokasi. Menampilkan lokasi default.";

/// Nearest-location message when no geolocation provider exists.
pub const GEOLOCATION_UNSUPPORTED_MESSAGE: &str =
    "Geolokasi tidak didukung oleh browser. Menampilkan lokasi default.";
