use std::time::Duration;

pub const DEFAULT_SERVER_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://crime_data.db";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 4;
pub const DEFAULT_ZONE_REFRESH_SECS: u64 = 300; // 5 minutes
pub const DEFAULT_STATIC_DIR: &str = "client/dist";

pub const ZONES_CACHE_CONTROL: &str = "public, max-age=60";

pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

pub fn database_url() -> String {
    std::env::var("DATABASE_URL")
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned())
}

pub fn db_max_connections() -> u32 {
    std::env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
}

pub fn zone_refresh_interval() -> Duration {
    std::env::var("ZONE_REFRESH_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(DEFAULT_ZONE_REFRESH_SECS))
}

pub fn static_dir() -> String {
    std::env::var("STATIC_DIR")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_owned())
}
