use geo::{Distance, Geodesic, Point};
use serde::{Deserialize, Serialize};

use crate::zone::Zone;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    fn point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

/// Distance on the WGS84 ellipsoid in kilometres.
pub fn geodesic_km(a: LatLng, b: LatLng) -> f64 {
    Geodesic::distance(a.point(), b.point()) / 1000.0
}

/// Closest zone to `point`, skipping zones without usable coordinates.
pub fn nearest_zone(zones: &[Zone], point: LatLng) -> Option<(&Zone, f64)> {
    zones
        .iter()
        .filter(|zone| zone.has_coordinates())
        .map(|zone| {
            let distance = geodesic_km(point, LatLng::new(zone.latitude, zone.longitude));
            (zone, distance)
        })
        .filter(|(_, distance)| distance.is_finite())
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
}

pub fn round_km(distance_km: f64) -> f64 {
    (distance_km * 1000.0).round() / 1000.0
}
