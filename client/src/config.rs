use safezone_shared::LatLng;

pub const MAP_ELEMENT_ID: &str = "map";
pub const DEFAULT_CENTER: LatLng = LatLng::new(21.25, 81.63);
pub const DEFAULT_ZOOM: u8 = 13;
/// Zoom used when following the user's position.
pub const TRACKING_ZOOM: u8 = 15;

pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";
pub const TILE_MAX_ZOOM: u8 = 19;

pub const ZONE_RADIUS_M: f64 = 700.0;
pub const ZONE_FILL_OPACITY: f64 = 0.25;
pub const ZONE_STROKE_WEIGHT: f64 = 1.0;
pub const USER_RADIUS_M: f64 = 30.0;
pub const USER_RADIUS_COLOR: &str = "#007bff";
pub const USER_RADIUS_FILL_OPACITY: f64 = 0.2;

pub const ZONES_ENDPOINT: &str = "/zones";
pub const CRIME_INFO_ENDPOINT: &str = "/crime-info";

pub const BAR_FILL_ELEMENT_ID: &str = "bar-fill";
/// Delay before widening the bar so the CSS transition is visible.
pub const BAR_FILL_DELAY_MS: u32 = 200;

pub const GEO_HIGH_ACCURACY: bool = true;
pub const GEO_MAXIMUM_AGE_MS: u32 = 2_000;
pub const GEO_TIMEOUT_MS: u32 = 10_000;
