use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use safezone_shared::bar::{bar_color_for_rate, filled_segments, render_bar};
use safezone_shared::geo::{nearest_zone, round_km};
use safezone_shared::{LatLng, LocalityInfo};
use serde::Deserialize;

use crate::config::ZONES_CACHE_CONTROL;
use crate::routes::api::{
    error_response, if_none_match_matches, json_bytes_response, not_modified_response,
};
use crate::state::{AppState, ZoneSnapshot};

const MISSING_COORDINATES: &str = "lat and lon required";
const NO_DATA: &str = "No data available";

/// Serve the pre-serialized zone list.
pub async fn get_zones(State(state): State<AppState>, headers: HeaderMap) -> Response {
    state.observability.record_zones_request();
    let (etag, json): (String, Arc<Bytes>) = {
        let snapshot = state.zones.read().await;
        (snapshot.etag.clone(), Arc::clone(&snapshot.zones_json))
    };

    if if_none_match_matches(&headers, &etag) {
        state.observability.record_zones_not_modified();
        return not_modified_response(ZONES_CACHE_CONTROL, Some(etag.as_str()));
    }

    json_bytes_response((*json).clone(), ZONES_CACHE_CONTROL, Some(etag.as_str()))
}

/// Raw query parameters. Kept as strings so a malformed number gets the same
/// JSON error as a missing one.
#[derive(Debug, Deserialize)]
pub struct CrimeInfoQuery {
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub lon: Option<String>,
}

impl CrimeInfoQuery {
    fn point(&self) -> Option<LatLng> {
        let lat = parse_float(self.lat.as_deref())?;
        let lon = parse_float(self.lon.as_deref())?;
        Some(LatLng::new(lat, lon))
    }
}

fn parse_float(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

pub async fn get_crime_info(
    State(state): State<AppState>,
    query: Result<Query<CrimeInfoQuery>, QueryRejection>,
) -> Response {
    state.observability.record_crime_info_request();
    let Some(point) = query.ok().and_then(|Query(query)| query.point()) else {
        return error_response(StatusCode::BAD_REQUEST, MISSING_COORDINATES);
    };

    let info = {
        let snapshot = state.zones.read().await;
        locality_info(&snapshot, point)
    };

    match info {
        Some(info) => Json(info).into_response(),
        None => {
            state.observability.record_crime_info_miss();
            error_response(StatusCode::NOT_FOUND, NO_DATA)
        }
    }
}

/// Statistics of the zone nearest to `point`, with its safety bar scaled
/// against the highest rate in the snapshot.
pub(crate) fn locality_info(snapshot: &ZoneSnapshot, point: LatLng) -> Option<LocalityInfo> {
    let (zone, distance_km) = nearest_zone(&snapshot.zones, point)?;
    let rate = zone.crime_rate_per_100k;
    let filled = filled_segments(rate, snapshot.max_rate_per_100k);

    Some(LocalityInfo {
        locality: zone.locality.clone(),
        district: zone.district.clone(),
        crime_rate_per_100k: rate,
        total_crimes: zone.total_crimes,
        safety_level: zone.safety_level.clone(),
        bar: render_bar(filled),
        bar_color: bar_color_for_rate(rate).to_owned(),
        distance_km: round_km(distance_km),
    })
}
