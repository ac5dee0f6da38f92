use chrono::Utc;
use tokio::time::{Instant, interval_at};
use tracing::{info, warn};

use crate::config::zone_refresh_interval;
use crate::crime_data;
use crate::state::{AppState, ZoneSnapshot};

/// Periodically rebuild the zone snapshot from the database. The first load
/// happens at startup, so the first tick waits a full period.
pub async fn run(state: AppState) {
    let period = zone_refresh_interval();
    let mut interval = interval_at(Instant::now() + period, period);

    loop {
        interval.tick().await;

        match reload(&state).await {
            Ok(count) => info!("reloaded {count} zones"),
            Err(e) => warn!("failed to reload zones, keeping previous snapshot: {e}"),
        }
    }
}

/// Replace the snapshot with the current table contents. Returns the number
/// of zones now being served. Without a database this is a no-op.
pub async fn reload(state: &AppState) -> Result<usize, sqlx_core::Error> {
    let Some(pool) = state.db.as_ref() else {
        return Ok(state.zones.read().await.zones.len());
    };

    let zones = match crime_data::fetch_zones(pool).await {
        Ok(zones) => zones,
        Err(e) => {
            state.observability.record_zone_reload_failure();
            return Err(e);
        }
    };

    let snapshot = ZoneSnapshot::build(zones, Utc::now());
    let count = snapshot.zones.len();
    *state.zones.write().await = snapshot;
    Ok(count)
}
