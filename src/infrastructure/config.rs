use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub service: ServiceSettings,
    pub upstream: UpstreamSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceSettings {
    pub listen_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSettings {
    pub air_quality_url: String,
    pub geocoder_url: String,
    pub geocoder_user_agent: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocationsConfig {
    pub default: LocationEntry,
    #[serde(default)]
    pub locations: Vec<LocationEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocationEntry {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

pub fn load_service_config() -> anyhow::Result<ServiceConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/service"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_locations_config() -> anyhow::Result<LocationsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/locations"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locations_config_shape() {
        let raw = r#"
            [default]
            name = "Lahore"
            latitude = 31.5204
            longitude = 74.3587

            [[locations]]
            name = "DHA Phase 5"
            latitude = 31.465
            longitude = 74.405
        "#;

        let parsed: LocationsConfig = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(parsed.default.name, "Lahore");
        assert_eq!(parsed.locations.len(), 1);
        assert_eq!(parsed.locations[0].latitude, 31.465);
    }

    #[test]
    fn test_locations_list_is_optional() {
        let raw = r#"
            [default]
            name = "Lahore"
            latitude = 31.5204
            longitude = 74.3587
        "#;

        let parsed: LocationsConfig = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(parsed.locations.is_empty());
    }
}
