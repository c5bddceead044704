use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_GEO_BASE_URL: &str = "http://ip-api.com";
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://my.meteoblue.com";

/// Optional settings read from `config.toml`.
///
/// Example TOML:
/// api_key = "..."
/// port = 8080
/// timeout_secs = 10
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub port: Option<u16>,
    pub timeout_secs: Option<u64>,
    pub geo_base_url: Option<String>,
    pub weather_base_url: Option<String>,
}

impl FileConfig {
    /// Load the config file.
    ///
    /// An explicit `path` must exist. Without one the platform config
    /// directory is tried, and a missing file there yields an empty config.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let Ok(default) = Self::default_path() else {
                    return Ok(Self::default());
                };
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Path to the default config file.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-relay")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Values given on the command line or through the environment.
///
/// Anything set here wins over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    /// Kept as text so an empty `PORT` falls back to the default.
    pub port: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Process-wide settings, resolved once at start-up and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: String,
    pub port: u16,
    /// Total timeout per upstream request. `None` waits indefinitely.
    pub upstream_timeout: Option<Duration>,
    pub geo_base_url: String,
    pub weather_base_url: String,
}

impl Config {
    pub fn resolve(overrides: ConfigOverrides, file: FileConfig) -> Result<Self> {
        let api_key = non_empty(overrides.api_key)
            .or_else(|| non_empty(file.api_key))
            .ok_or_else(|| {
                anyhow!(
                    "Environment variable METEOBLUE_API_KEY is not set.\n\
                     Hint: export METEOBLUE_API_KEY, pass --api-key or set `api_key` in the config file."
                )
            })?;

        let port = match non_empty(overrides.port) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid port '{raw}'"))?,
            None => file.port.unwrap_or(DEFAULT_PORT),
        };

        let upstream_timeout = overrides
            .timeout_secs
            .or(file.timeout_secs)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            api_key,
            port,
            upstream_timeout,
            geo_base_url: non_empty(file.geo_base_url)
                .unwrap_or_else(|| DEFAULT_GEO_BASE_URL.to_string()),
            weather_base_url: non_empty(file.weather_base_url)
                .unwrap_or_else(|| DEFAULT_WEATHER_BASE_URL.to_string()),
        })
    }

    /// Config pointing at the public upstreams with the given key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            port: DEFAULT_PORT,
            upstream_timeout: None,
            geo_base_url: DEFAULT_GEO_BASE_URL.to_string(),
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn key_only(key: &str) -> ConfigOverrides {
        ConfigOverrides { api_key: Some(key.into()), ..Default::default() }
    }

    #[test]
    fn resolve_errors_without_api_key() {
        let err = Config::resolve(ConfigOverrides::default(), FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("METEOBLUE_API_KEY is not set"));
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let overrides = ConfigOverrides { api_key: Some(String::new()), ..Default::default() };
        assert!(Config::resolve(overrides, FileConfig::default()).is_err());
    }

    #[test]
    fn defaults_apply_when_only_key_is_given() {
        let cfg = Config::resolve(key_only("KEY"), FileConfig::default()).unwrap();

        assert_eq!(cfg, Config::with_api_key("KEY"));
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.upstream_timeout, None);
    }

    #[test]
    fn empty_port_falls_back_to_default() {
        let overrides = ConfigOverrides { port: Some(String::new()), ..key_only("KEY") };
        let cfg = Config::resolve(overrides, FileConfig::default()).unwrap();
        assert_eq!(cfg.port, DEFAULT_PORT);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let overrides = ConfigOverrides { port: Some("eighty".into()), ..key_only("KEY") };
        let err = Config::resolve(overrides, FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Invalid port 'eighty'"));
    }

    #[test]
    fn overrides_win_over_file() {
        let file = FileConfig {
            api_key: Some("FILE_KEY".into()),
            port: Some(9000),
            timeout_secs: Some(30),
            ..Default::default()
        };
        let overrides = ConfigOverrides {
            api_key: Some("CLI_KEY".into()),
            port: Some("9100".into()),
            timeout_secs: Some(5),
        };

        let cfg = Config::resolve(overrides, file).unwrap();
        assert_eq!(cfg.api_key, "CLI_KEY");
        assert_eq!(cfg.port, 9100);
        assert_eq!(cfg.upstream_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn file_fills_in_missing_values() {
        let file = FileConfig {
            api_key: Some("FILE_KEY".into()),
            port: Some(9000),
            timeout_secs: Some(0),
            geo_base_url: Some("http://localhost:1234".into()),
            weather_base_url: None,
        };

        let cfg = Config::resolve(ConfigOverrides::default(), file).unwrap();
        assert_eq!(cfg.api_key, "FILE_KEY");
        assert_eq!(cfg.port, 9000);
        // zero means "no timeout"
        assert_eq!(cfg.upstream_timeout, None);
        assert_eq!(cfg.geo_base_url, "http://localhost:1234");
        assert_eq!(cfg.weather_base_url, DEFAULT_WEATHER_BASE_URL);
    }

    #[test]
    fn load_reads_explicit_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_key = \"FROM_FILE\"\nport = 9090\ntimeout_secs = 3").unwrap();

        let cfg = FileConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("FROM_FILE"));
        assert_eq!(cfg.port, Some(9090));
        assert_eq!(cfg.timeout_secs, Some(3));
    }

    #[test]
    fn load_errors_on_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        let err = FileConfig::load(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn load_rejects_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "apikey = \"typo\"").unwrap();

        let err = FileConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
