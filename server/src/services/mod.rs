pub mod zone_refresher;
