use crate::error::ConfigError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable consulted when `[provider] api_key` is absent.
const API_KEY_ENV: &str = "REPORTFORGE_API_KEY";

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub export: ExportConfig,

    /// Extra action-name aliases merged over the built-in table
    /// (alternate spelling → canonical tool name). The set of recognized
    /// natural-language-derived spellings is expected to grow, so this is
    /// config, not code.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

// ── Gateway ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    8787
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// ── Provider ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Falls back to the `REPORTFORGE_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_model() -> String {
    "gpt-4o-mini".into()
}

fn default_temperature() -> f64 {
    0.2
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
        }
    }
}

impl ProviderConfig {
    /// Configured key, or the environment fallback.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
    }
}

// ── Export policy ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    /// When true, a requested export format with an unmet precondition fails
    /// the step instead of being silently skipped.
    #[serde(default)]
    pub strict: bool,
}

// ── Loading ───────────────────────────────────────────────────────

impl Config {
    /// Default config file location (`<config dir>/reportforge/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "reportforge").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// Load the config file if one exists; otherwise fall back to defaults so
    /// the engine is fully usable without any setup.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if path.exists() {
            let config = Self::load_from(&path)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "provider.base_url must not be empty".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(ConfigError::Validation(format!(
                "provider.temperature {} is out of range 0.0..=2.0",
                self.provider.temperature
            )));
        }
        for (from, to) in &self.aliases {
            if from.trim().is_empty() || to.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "aliases must map non-empty names".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_are_usable_offline() {
        let config = Config::default();
        assert_eq!(config.gateway.port, 8787);
        assert!(config.validate().is_ok());
        assert!(config.aliases.is_empty());
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[provider]
model = "local-model"

[aliases]
summarise = "analyze_data"

[export]
strict = true
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.provider.model, "local-model");
        assert_eq!(config.provider.base_url, default_base_url());
        assert_eq!(config.aliases["summarise"], "analyze_data");
        assert!(config.export.strict);
    }

    #[test]
    fn validate_rejects_out_of_range_temperature() {
        let mut config = Config::default();
        config.provider.temperature = 7.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_alias() {
        let mut config = Config::default();
        config.aliases.insert(" ".into(), "load_table".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config =
            Config::load_or_default(Some(Path::new("/definitely/not/here.toml"))).unwrap();
        assert_eq!(config.provider.model, default_model());
    }
}
