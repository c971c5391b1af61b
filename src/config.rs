use std::path::Path;

use error_stack::{Report, ResultExt};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::indicator::bollinger::BollingerParams;
use crate::style::{BandStyle, is_hex_color};

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "text".into()
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub bollinger: BollingerParams,
    #[serde(default)]
    pub style: BandStyle,
}

#[derive(Debug, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Accepted values: `"text"` | `"json"`
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

/// Load and validate an `AppConfig` from a TOML file at `path`.
pub fn load(path: &Path) -> Result<AppConfig, Report<ConfigError>> {
    let content = std::fs::read_to_string(path)
        .change_context(ConfigError::ReadFile)
        .attach_with(|| format!("path: {}", path.display()))?;

    let config: AppConfig = toml::from_str(&content).change_context(ConfigError::Parse {
        reason: "invalid TOML syntax or schema mismatch".into(),
    })?;

    validate(&config)?;

    Ok(config)
}

const VALID_LOG_FORMATS: &[&str] = &["text", "json"];

pub fn validate(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    validate_general(config)?;
    validate_bollinger(config)?;
    validate_style(config)?;
    Ok(())
}

fn validate_general(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    if !VALID_LOG_FORMATS.contains(&config.general.log_format.as_str()) {
        return Err(Report::new(ConfigError::Validation {
            field: format!(
                "general.log_format \"{}\" is not valid",
                config.general.log_format
            ),
        }));
    }
    Ok(())
}

fn validate_bollinger(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    config
        .bollinger
        .validate()
        .change_context(ConfigError::Validation {
            field: "bollinger".into(),
        })
}

fn validate_style(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    let style = &config.style;

    let colors = [
        ("basis_color", Some(&style.basis_color)),
        ("upper_color", Some(&style.upper_color)),
        ("lower_color", Some(&style.lower_color)),
        ("background_color", style.background_color.as_ref()),
    ];
    for (name, color) in colors {
        if let Some(color) = color.filter(|c| !is_hex_color(c)) {
            return Err(Report::new(ConfigError::Validation {
                field: format!("style.{name} \"{color}\" is not a #rrggbb color"),
            }));
        }
    }

    if style.line_width == 0 {
        return Err(Report::new(ConfigError::Validation {
            field: "style.line_width must be > 0".into(),
        }));
    }

    if !(0.0..=1.0).contains(&style.background_opacity) {
        return Err(Report::new(ConfigError::Validation {
            field: format!(
                "style.background_opacity {} is outside 0..=1",
                style.background_opacity
            ),
        }));
    }
    Ok(())
}
