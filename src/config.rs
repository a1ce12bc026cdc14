//! Selection tracker configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use uuid::Uuid;

pub const FEEDBACK_ENABLED_VAR: &str = "SELECTION_FEEDBACK_ENABLED";
pub const FEEDBACK_SOURCE_VAR: &str = "SELECTION_FEEDBACK_SOURCE";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a boolean, got {value:?}")]
    InvalidBool { var: &'static str, value: String },
    #[error("{var} must be a UUID, got {value:?}")]
    InvalidSource { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionConfig {
    /// Whether selection changes dispatch feedback actions.
    pub feedback_enabled: bool,
    /// Fixed feedback source id; a random one is generated when absent.
    pub feedback_source: Option<Uuid>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self { feedback_enabled: true, feedback_source: None }
    }
}

impl SelectionConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `SELECTION_FEEDBACK_ENABLED`: `true` (default) or `false`
    /// - `SELECTION_FEEDBACK_SOURCE`: UUID used as the feedback source
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var_os(key).map(|v| v.to_string_lossy().into_owned()))
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a value is present but unparseable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let feedback_enabled = match lookup(FEEDBACK_ENABLED_VAR) {
            Some(raw) => parse_bool(FEEDBACK_ENABLED_VAR, &raw)?,
            None => true,
        };
        let feedback_source = match lookup(FEEDBACK_SOURCE_VAR) {
            Some(raw) => Some(
                Uuid::parse_str(raw.trim())
                    .map_err(|_| ConfigError::InvalidSource { var: FEEDBACK_SOURCE_VAR, value: raw })?,
            ),
            None => None,
        };
        Ok(Self { feedback_enabled, feedback_source })
    }

    /// The configured feedback source, or a fresh random one.
    #[must_use]
    pub fn source(&self) -> Uuid {
        self.feedback_source.unwrap_or_else(Uuid::new_v4)
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { var, value: raw.to_string() }),
    }
}
