//! Reads zones from the `crime_data` table.
//!
//! Columns are cast in SQL so rows imported with TEXT-typed numbers still
//! load. Coordinates come back as text and are parsed here; anything that is
//! not a number becomes NaN and is dropped by the snapshot builder.

use safezone_shared::Zone;
use sqlx::SqlitePool;

const SELECT_ZONES: &str = "SELECT \
    CAST(COALESCE(locality, '') AS TEXT), \
    CAST(COALESCE(district, '') AS TEXT), \
    CAST(latitude AS TEXT), \
    CAST(longitude AS TEXT), \
    CAST(COALESCE(crime_rate_per_100k, 0) AS REAL), \
    CAST(COALESCE(total_crimes, 0) AS INTEGER), \
    CAST(safety_level AS TEXT) \
    FROM crime_data ORDER BY rowid";

type ZoneRow = (
    String,
    String,
    Option<String>,
    Option<String>,
    f64,
    i64,
    Option<String>,
);

pub async fn fetch_zones(pool: &SqlitePool) -> Result<Vec<Zone>, sqlx_core::Error> {
    let rows = sqlx::query_as::<_, ZoneRow>(SELECT_ZONES)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(zone_from_row).collect())
}

fn zone_from_row(row: ZoneRow) -> Zone {
    let (locality, district, latitude, longitude, crime_rate_per_100k, total_crimes, safety_level) =
        row;
    Zone {
        locality,
        district,
        latitude: parse_coordinate(latitude.as_deref()),
        longitude: parse_coordinate(longitude.as_deref()),
        safety_level: safety_level.filter(|level| !level.trim().is_empty()),
        crime_rate_per_100k,
        total_crimes,
    }
}

fn parse_coordinate(raw: Option<&str>) -> f64 {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
pub(crate) async fn insert_zone(pool: &SqlitePool, zone: &Zone) -> Result<(), sqlx_core::Error> {
    sqlx::query(
        "INSERT INTO crime_data \
         (locality, district, latitude, longitude, crime_rate_per_100k, total_crimes, safety_level) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(zone.locality.clone())
    .bind(zone.district.clone())
    .bind(zone.latitude)
    .bind(zone.longitude)
    .bind(zone.crime_rate_per_100k)
    .bind(zone.total_crimes)
    .bind(zone.safety_level.clone())
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    let pool = crate::db::connect("sqlite::memory:", 1)
        .await
        .expect("open in-memory sqlite");
    crate::db::migrate(&pool).await.expect("apply migrations");
    pool
}
