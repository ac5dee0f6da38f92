use safezone_shared::{CrimeInfoResponse, LatLng, Zone};

use crate::config::{CRIME_INFO_ENDPOINT, ZONES_ENDPOINT};

/// Fetch every known zone.
pub async fn fetch_zones() -> Result<Vec<Zone>, String> {
    let resp = gloo_net::http::Request::get(ZONES_ENDPOINT)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;

    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }

    resp.json::<Vec<Zone>>()
        .await
        .map_err(|e| format!("parse error: {e}"))
}

/// Look up the locality nearest to `at`.
///
/// Error statuses still carry an `{ "error": .. }` body, so the body is
/// decoded before the status is checked.
pub async fn fetch_crime_info(at: LatLng) -> Result<CrimeInfoResponse, String> {
    let lat = at.lat.to_string();
    let lon = at.lon.to_string();
    let resp = gloo_net::http::Request::get(CRIME_INFO_ENDPOINT)
        .query([("lat", lat.as_str()), ("lon", lon.as_str())])
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;

    let status = resp.status();
    match resp.json::<CrimeInfoResponse>().await {
        Ok(body) => Ok(body),
        Err(_) if !resp.ok() => Err(format!("HTTP {status}")),
        Err(e) => Err(format!("parse error: {e}")),
    }
}
