// Infrastructure layer - Configuration and upstream HTTP adapters
pub mod config;
pub mod nominatim;
pub mod open_meteo;
