pub mod bar;
pub mod geo;
pub mod safety;
pub mod zone;

pub use bar::{BAR_SEGMENTS, bar_fill_percent};
pub use geo::LatLng;
pub use safety::{SafetyLevel, safety_color};
pub use zone::*;
