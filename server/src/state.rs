use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use safezone_shared::Zone;
use sqlx::SqlitePool;
use tokio::sync::RwLock;
use tracing::warn;

/// The zone list as last loaded from the database, serialized once so every
/// `/zones` request shares the same bytes.
#[derive(Debug, Clone)]
pub struct ZoneSnapshot {
    pub zones: Vec<Zone>,
    pub max_rate_per_100k: f64,
    pub zones_json: Arc<Bytes>,
    pub etag: String,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Default for ZoneSnapshot {
    fn default() -> Self {
        let zones_json = Bytes::from_static(b"[]");
        Self {
            zones: Vec::new(),
            max_rate_per_100k: 0.0,
            etag: zones_etag(&zones_json),
            zones_json: Arc::new(zones_json),
            loaded_at: None,
        }
    }
}

impl ZoneSnapshot {
    /// Drops zones without usable coordinates; they could never be drawn or
    /// matched as nearest. The bar scale still counts every row.
    pub fn build(zones: Vec<Zone>, loaded_at: DateTime<Utc>) -> Self {
        let max_rate_per_100k = zones
            .iter()
            .map(|zone| zone.crime_rate_per_100k)
            .filter(|rate| rate.is_finite())
            .fold(0.0, f64::max);

        let total = zones.len();
        let zones: Vec<Zone> = zones.into_iter().filter(Zone::has_coordinates).collect();
        if zones.len() < total {
            warn!(
                skipped = total - zones.len(),
                "skipping zones without usable coordinates"
            );
        }

        let zones_json = serde_json::to_vec(&zones)
            .map(Bytes::from)
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to serialize zones, serving empty list");
                Bytes::from_static(b"[]")
            });

        Self {
            zones,
            max_rate_per_100k,
            etag: zones_etag(&zones_json),
            zones_json: Arc::new(zones_json),
            loaded_at: Some(loaded_at),
        }
    }
}

fn zones_etag(body: &[u8]) -> String {
    format!("\"zones-{:08x}\"", crc32fast::hash(body))
}

#[derive(Clone)]
pub struct AppState {
    pub zones: Arc<RwLock<ZoneSnapshot>>,
    /// SQLite pool backing the zone list. None when serving a fixed snapshot.
    pub db: Option<SqlitePool>,
    pub observability: Arc<ObservabilityCounters>,
}

impl AppState {
    pub fn new(db: Option<SqlitePool>) -> Self {
        Self {
            zones: Arc::new(RwLock::new(ZoneSnapshot::default())),
            db,
            observability: Arc::new(ObservabilityCounters::default()),
        }
    }
}

#[derive(Debug, Default)]
pub struct ObservabilityCounters {
    zones_requests_total: AtomicU64,
    zones_not_modified_total: AtomicU64,
    crime_info_requests_total: AtomicU64,
    crime_info_misses_total: AtomicU64,
    zone_reload_failures_total: AtomicU64,
}

#[derive(Debug, Clone, Copy)]
pub struct ObservabilitySnapshot {
    pub zones_requests_total: u64,
    pub zones_not_modified_total: u64,
    pub crime_info_requests_total: u64,
    pub crime_info_misses_total: u64,
    pub zone_reload_failures_total: u64,
}

impl ObservabilityCounters {
    pub fn snapshot(&self) -> ObservabilitySnapshot {
        ObservabilitySnapshot {
            zones_requests_total: self.zones_requests_total.load(Ordering::Relaxed),
            zones_not_modified_total: self.zones_not_modified_total.load(Ordering::Relaxed),
            crime_info_requests_total: self.crime_info_requests_total.load(Ordering::Relaxed),
            crime_info_misses_total: self.crime_info_misses_total.load(Ordering::Relaxed),
            zone_reload_failures_total: self.zone_reload_failures_total.load(Ordering::Relaxed),
        }
    }

    pub fn record_zones_request(&self) {
        self.zones_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_zones_not_modified(&self) {
        self.zones_not_modified_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_crime_info_request(&self) {
        self.crime_info_requests_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_crime_info_miss(&self) {
        self.crime_info_misses_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_zone_reload_failure(&self) {
        self.zone_reload_failures_total
            .fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(locality: &str, lat: f64, rate: f64) -> Zone {
        Zone {
            locality: locality.to_string(),
            district: "Raipur".to_string(),
            latitude: lat,
            longitude: 81.63,
            safety_level: Some("Low".to_string()),
            crime_rate_per_100k: rate,
            total_crimes: 3,
        }
    }

    #[test]
    fn build_drops_unmapped_zones_but_keeps_their_rate_in_scale() {
        let snapshot = ZoneSnapshot::build(
            vec![
                zone("A", 21.25, 120.0),
                zone("B", f64::NAN, 900.0),
                zone("C", 21.27, 340.0),
            ],
            Utc::now(),
        );

        assert_eq!(snapshot.zones.len(), 2);
        assert!((snapshot.max_rate_per_100k - 900.0).abs() < 1e-9);
        let parsed: Vec<Zone> =
            serde_json::from_slice(&snapshot.zones_json).expect("snapshot JSON parses");
        assert_eq!(parsed, snapshot.zones);
        assert!(snapshot.loaded_at.is_some());
    }

    #[test]
    fn etag_follows_content() {
        let now = Utc::now();
        let a = ZoneSnapshot::build(vec![zone("A", 21.25, 120.0)], now);
        let same = ZoneSnapshot::build(vec![zone("A", 21.25, 120.0)], now);
        let other = ZoneSnapshot::build(vec![zone("A", 21.25, 121.0)], now);

        assert_eq!(a.etag, same.etag);
        assert_ne!(a.etag, other.etag);
        assert_ne!(a.etag, ZoneSnapshot::default().etag);
    }
}
