pub mod api;
pub mod zones;
