//! App preferences.

use serde::{Deserialize, Serialize};

use zaiko_core::{DomainError, DomainResult};

use crate::text::is_valid_str;

pub const DEFAULT_APP_NAME: &str = "Zaiko";

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl core::str::FromStr for Theme {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(DomainError::validation(format!("unknown theme {other:?}"))),
        }
    }
}

/// User preferences. Both `appName` and `app_name` spellings deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_app_name", alias = "app_name")]
    pub app_name: String,
    /// Stock at or below this shows a warning.
    #[serde(default = "default_warn_threshold", alias = "warn_threshold")]
    pub warn_threshold: i64,
    /// Stock at or below this shows a critical warning.
    #[serde(default = "default_critical_threshold", alias = "critical_threshold")]
    pub critical_threshold: i64,
}

fn default_app_name() -> String {
    DEFAULT_APP_NAME.to_string()
}

fn default_warn_threshold() -> i64 {
    20
}

fn default_critical_threshold() -> i64 {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            app_name: default_app_name(),
            warn_threshold: default_warn_threshold(),
            critical_threshold: default_critical_threshold(),
        }
    }
}

impl Settings {
    /// App name to show; a blank name falls back to the default.
    pub fn display_name(&self) -> &str {
        if is_valid_str(&self.app_name) {
            self.app_name.trim()
        } else {
            DEFAULT_APP_NAME
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.warn_threshold < 0 || self.critical_threshold < 0 {
            return Err(DomainError::validation("stock thresholds cannot be negative"));
        }
        if self.critical_threshold > self.warn_threshold {
            return Err(DomainError::validation(format!(
                "critical threshold {} is above warning threshold {}",
                self.critical_threshold, self.warn_threshold
            )));
        }
        Ok(())
    }
}
