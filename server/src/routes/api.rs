use std::fmt::Write as _;

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use safezone_shared::ErrorBody;

use crate::state::{AppState, ObservabilitySnapshot};

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let (zone_count, loaded_at, max_rate) = {
        let snapshot = state.zones.read().await;
        (
            snapshot.zones.len(),
            snapshot.loaded_at.map(|at| at.to_rfc3339()),
            snapshot.max_rate_per_100k,
        )
    };
    let observability = state.observability.snapshot();
    Json(serde_json::json!({
        "status": "ok",
        "zones": zone_count,
        "loaded_at": loaded_at,
        "max_rate_per_100k": max_rate,
        "database_available": state.db.is_some(),
        "observability": {
            "zones_requests_total": observability.zones_requests_total,
            "zones_not_modified_total": observability.zones_not_modified_total,
            "crime_info_requests_total": observability.crime_info_requests_total,
            "crime_info_misses_total": observability.crime_info_misses_total,
            "zone_reload_failures_total": observability.zone_reload_failures_total,
        }
    }))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let zone_count = state.zones.read().await.zones.len();
    let body = render_prometheus_metrics(zone_count, state.observability.snapshot());

    (
        [
            (header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body,
    )
}

fn render_prometheus_metrics(zone_count: usize, observability: ObservabilitySnapshot) -> String {
    let mut body = String::new();
    write_metric(
        &mut body,
        "safezone_zones",
        "gauge",
        "Zones in the current snapshot.",
        zone_count as u64,
    );
    write_metric(
        &mut body,
        "safezone_zones_requests_total",
        "counter",
        "Total /zones requests.",
        observability.zones_requests_total,
    );
    write_metric(
        &mut body,
        "safezone_zones_not_modified_total",
        "counter",
        "Total /zones requests answered with 304.",
        observability.zones_not_modified_total,
    );
    write_metric(
        &mut body,
        "safezone_crime_info_requests_total",
        "counter",
        "Total /crime-info requests.",
        observability.crime_info_requests_total,
    );
    write_metric(
        &mut body,
        "safezone_crime_info_misses_total",
        "counter",
        "Total /crime-info requests with no zone to match.",
        observability.crime_info_misses_total,
    );
    write_metric(
        &mut body,
        "safezone_zone_reload_failures_total",
        "counter",
        "Total failed zone reloads from the database.",
        observability.zone_reload_failures_total,
    );
    body
}

fn write_metric(body: &mut String, name: &str, kind: &str, help: &str, value: u64) {
    let _ = writeln!(body, "# HELP {name} {help}");
    let _ = writeln!(body, "# TYPE {name} {kind}");
    let _ = writeln!(body, "{name} {value}");
}

pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody::new(message))).into_response()
}

pub(crate) fn json_bytes_response(
    body: Bytes,
    cache_control: &'static str,
    etag: Option<&str>,
) -> Response {
    let mut response = Response::new(Body::from(body));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control),
    );
    if let Some(etag) = etag
        && let Ok(etag_header) = HeaderValue::from_str(etag)
    {
        headers.insert(header::ETAG, etag_header);
    }
    response
}

pub(crate) fn not_modified_response(cache_control: &'static str, etag: Option<&str>) -> Response {
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control),
    );
    if let Some(etag) = etag
        && let Ok(etag_header) = HeaderValue::from_str(etag)
    {
        headers.insert(header::ETAG, etag_header);
    }
    response
}

fn normalize_etag(candidate: &str) -> &str {
    candidate.strip_prefix("W/").unwrap_or(candidate).trim()
}

pub(crate) fn if_none_match_matches(headers: &HeaderMap, etag: &str) -> bool {
    let Some(value) = headers.get(header::IF_NONE_MATCH) else {
        return false;
    };
    let Ok(raw) = value.to_str() else {
        return false;
    };

    raw.split(',').any(|candidate| {
        let candidate = candidate.trim();
        candidate == "*" || normalize_etag(candidate) == normalize_etag(etag)
    })
}
