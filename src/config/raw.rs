use duration_str::deserialize_option_duration;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = include_str!("blendlife.default.toml");

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub api: Option<Api>,
}

impl Default for Config {
    fn default() -> Self {
        let cfg: Self = toml::from_str(DEFAULT_CONFIG_FILE).expect("Default configuration");
        cfg
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Api {
    pub base_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub request_timeout: Option<Duration>,
}

impl Default for Api {
    fn default() -> Self {
        Config::default().api.expect("API configuration")
    }
}
