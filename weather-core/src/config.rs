use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::model::UnitSystem;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// base_url = "https://wttr.in"
/// user_agent = "curl/7.64.1"
/// default_units = "imperial"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Weather endpoint; the city is appended as a path segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Where rendered condition icons are served from.
    #[serde(default = "default_base_url")]
    pub icon_base_url: String,

    /// wttr.in answers with HTML unless the client looks like curl.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_icon_timeout")]
    pub icon_timeout_secs: u64,

    #[serde(default)]
    pub default_units: UnitSystem,
}

const CONFIG_FILE: &str = "config.toml";

fn default_base_url() -> String {
    "https://wttr.in".to_string()
}

fn default_user_agent() -> String {
    "curl/7.64.1".to_string()
}

const fn default_timeout() -> u64 {
    10
}

const fn default_icon_timeout() -> u64 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            icon_base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
            icon_timeout_secs: default_icon_timeout(),
            default_units: UnitSystem::default(),
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn icon_timeout(&self) -> Duration {
        Duration::from_secs(self.icon_timeout_secs)
    }

    /// Reads the config file from the platform config directory.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// A missing file is a first run and yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents)
                .with_context(|| format!("Invalid weather config at {}", path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("Cannot read weather config at {}", path.display())),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents).context("Invalid configuration TOML")?;
        if cfg.timeout_secs == 0 || cfg.icon_timeout_secs == 0 {
            return Err(anyhow!("Timeouts must be at least one second"));
        }
        Ok(cfg)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create config directory {}", dir.display()))?;
        }

        let body = toml::to_string_pretty(self).context("Cannot encode weather config")?;
        fs::write(path, body)
            .with_context(|| format!("Cannot write weather config to {}", path.display()))
    }

    /// `<platform config dir>/weather/config.toml`.
    pub fn config_file_path() -> Result<PathBuf> {
        ProjectDirs::from("in", "wttr", "weather")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .ok_or_else(|| anyhow!("No config directory available on this platform"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = Config::from_toml_str("").expect("empty config is valid");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.base_url, "https://wttr.in");
        assert_eq!(cfg.user_agent, "curl/7.64.1");
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.icon_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.default_units, UnitSystem::Metric);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let cfg = Config::from_toml_str(
            r#"
            default_units = "imperial"
            timeout_secs = 3
            "#,
        )
        .expect("config must parse");

        assert_eq!(cfg.default_units, UnitSystem::Imperial);
        assert_eq!(cfg.timeout_secs, 3);
        assert_eq!(cfg.icon_timeout_secs, 5);
        assert_eq!(cfg.icon_base_url, "https://wttr.in");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = Config::from_toml_str("icon_timeout_secs = 0").unwrap_err();
        assert!(err.to_string().contains("Timeouts must be at least one second"));
    }

    #[test]
    fn unknown_units_are_rejected() {
        assert!(Config::from_toml_str(r#"default_units = "kelvin""#).is_err());
    }

    #[test]
    fn serialized_config_parses_back() {
        let cfg = Config {
            default_units: UnitSystem::Imperial,
            user_agent: "weather-test".into(),
            ..Config::default()
        };
        let toml = toml::to_string_pretty(&cfg).expect("serialize");
        assert!(toml.contains(r#"default_units = "imperial""#));
        assert_eq!(Config::from_toml_str(&toml).expect("parse"), cfg);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("weather-config-missing").join("nope.toml");
        assert_eq!(Config::load_from(&path).expect("defaults"), Config::default());
    }

    #[test]
    fn saved_file_loads_back() {
        let dir = std::env::temp_dir().join(format!("weather-config-test-{}", std::process::id()));
        let path = dir.join("nested").join(CONFIG_FILE);
        let cfg = Config { default_units: UnitSystem::Imperial, timeout_secs: 4, ..Config::default() };

        cfg.save_to(&path).expect("save");
        assert_eq!(Config::load_from(&path).expect("load"), cfg);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn broken_file_names_its_path() {
        let dir = std::env::temp_dir().join(format!("weather-config-bad-{}", std::process::id()));
        let path = dir.join(CONFIG_FILE);
        fs::create_dir_all(&dir).expect("mkdir");
        fs::write(&path, "timeout_secs = \"soon\"").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains(&path.display().to_string()), "{err:#}");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn config_path_is_named_after_this_app() {
        if let Ok(path) = Config::config_file_path() {
            assert!(path.ends_with(CONFIG_FILE));
            assert!(!path.to_string_lossy().contains("weather-task"));
        }
    }
}
