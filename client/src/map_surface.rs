use safezone_shared::LatLng;
use serde::Serialize;

use crate::config::{
    USER_RADIUS_COLOR, USER_RADIUS_FILL_OPACITY, USER_RADIUS_M, ZONE_FILL_OPACITY, ZONE_RADIUS_M,
    ZONE_STROKE_WEIGHT,
};

/// Circle options in the shape Leaflet's `L.circle` expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleStyle {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    pub fill_opacity: f64,
    pub radius: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl CircleStyle {
    pub fn zone(color: &str) -> Self {
        Self {
            color: color.to_owned(),
            fill_color: Some(color.to_owned()),
            fill_opacity: ZONE_FILL_OPACITY,
            radius: ZONE_RADIUS_M,
            weight: Some(ZONE_STROKE_WEIGHT),
        }
    }

    pub fn user_radius() -> Self {
        Self {
            color: USER_RADIUS_COLOR.to_owned(),
            fill_color: None,
            fill_opacity: USER_RADIUS_FILL_OPACITY,
            radius: USER_RADIUS_M,
            weight: None,
        }
    }
}

/// The handful of map operations the viewer needs. The browser build drives
/// Leaflet; tests record the calls.
pub trait MapSurface {
    type Marker;
    type Circle;

    fn set_view(&mut self, center: LatLng, zoom: u8);

    /// Remove every zone circle added since the last clear.
    fn clear_zones(&mut self);
    fn add_zone_circle(&mut self, center: LatLng, style: &CircleStyle, on_click: Box<dyn Fn()>);

    fn add_marker(&mut self, at: LatLng) -> Self::Marker;
    fn move_marker(&mut self, marker: &Self::Marker, to: LatLng);
    fn add_circle(&mut self, at: LatLng, style: &CircleStyle) -> Self::Circle;
    fn move_circle(&mut self, circle: &Self::Circle, to: LatLng);

    /// Bind `html` as the marker's popup and open it.
    fn open_popup(&mut self, marker: &Self::Marker, html: &str);
}
