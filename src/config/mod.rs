use anyhow::{anyhow, Result};
use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "blendlife.toml";

const ENV_NAME_API_URL: &str = "BLENDLIFE_API_URL";

#[derive(Debug, Clone)]
pub struct Config {
    pub api: Api,
}

#[derive(Debug, Clone)]
pub struct Api {
    /// Base URL of the REST API without a trailing slash,
    /// e.g. `https://example.com/api`.
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let explicit = file_path.is_some();
        let file_path: PathBuf = file_path.map_or_else(
            || {
                log::debug!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
                PathBuf::from(DEFAULT_CONFIG_FILE_NAME)
            },
            |p| p.as_ref().to_path_buf(),
        );

        let raw_config: raw::Config = match fs::read_to_string(&file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound if !explicit => {
                    log::debug!(
                        "{DEFAULT_CONFIG_FILE_NAME} not found => load default configuration."
                    );
                    Ok(raw::Config::default())
                }
                _ => Err(anyhow!(
                    "Unable to read configuration file {}: {err}",
                    file_path.display()
                )),
            }?,
        };
        let mut cfg = Self::try_from(raw_config)?;
        if let Ok(api_url) = env::var(ENV_NAME_API_URL) {
            cfg.api.base_url = normalize_base_url(&api_url)?;
        }
        Ok(cfg)
    }
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;

    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config { api } = from;
        let raw::Api {
            base_url,
            request_timeout,
        } = api.unwrap_or_default();
        let default = raw::Api::default();
        let base_url = base_url
            .or(default.base_url)
            .ok_or_else(|| anyhow!("Missing API base URL"))?;
        let request_timeout = request_timeout
            .or(default.request_timeout)
            .ok_or_else(|| anyhow!("Missing API request timeout"))?;
        Ok(Self {
            api: Api {
                base_url: normalize_base_url(&base_url)?,
                request_timeout,
            },
        })
    }
}

fn normalize_base_url(url: &str) -> Result<String> {
    let url = url.trim().trim_end_matches('/');
    if url.is_empty() {
        return Err(anyhow!("The API base URL must not be empty"));
    }
    Ok(url.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Result<Config> {
        let raw: raw::Config = toml::from_str(toml)?;
        Config::try_from(raw)
    }

    #[test]
    fn load_default_config() {
        let cfg = Config::try_from(raw::Config::default()).unwrap();
        assert_eq!(cfg.api.base_url, "http://localhost:3000/api");
        assert_eq!(cfg.api.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn fill_missing_values_with_defaults() {
        let cfg = parse(
            r#"
            [api]
            base-url = "https://blendlife.example/api/"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.api.base_url, "https://blendlife.example/api");
        assert_eq!(cfg.api.request_timeout, Duration::from_secs(10));

        let cfg = parse(
            r#"
            [api]
            request-timeout = "2h"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.api.base_url, "http://localhost:3000/api");
        assert_eq!(cfg.api.request_timeout, Duration::from_secs(2 * 60 * 60));

        assert!(parse("").is_ok());
    }

    #[test]
    fn reject_blank_base_url() {
        assert!(parse("[api]\nbase-url = \" / \"").is_err());
    }

    #[test]
    fn fail_if_explicit_file_is_missing() {
        assert!(Config::try_load_from_file_or_default(Some("does/not/exist.toml")).is_err());
    }
}
