//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. `.keymint.toml` in the working directory
//! 4. `~/.config/keymint/config.toml` (global defaults)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::{
    DEFAULT_PLAN, DEFAULT_SEGMENT_LENGTH, DEFAULT_SEGMENTS, DEFAULT_USER_ID, DEFAULT_VALID_DAYS,
};
use crate::env::{Env, Parsed};
use crate::key::{KeyError, KeyShape};
use crate::output::OutputFormat;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub key: KeyConfig,
    pub license: LicenseConfig,
    pub output: OutputConfig,
}

/// Shape of generated keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    pub segments: usize,
    pub segment_length: usize,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            segments: DEFAULT_SEGMENTS,
            segment_length: DEFAULT_SEGMENT_LENGTH,
        }
    }
}

/// Column values for the generated `licenses` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseConfig {
    pub user_id: String,
    pub plan: String,
    pub is_active: bool,
    /// Days until the default expiry.
    pub valid_days: u32,
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            user_id: DEFAULT_USER_ID.to_string(),
            plan: DEFAULT_PLAN.to_string(),
            is_active: true,
            valid_days: DEFAULT_VALID_DAYS,
        }
    }
}

/// Output rendering settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Emit `$n` placeholders instead of inline literals.
    pub parameterized: bool,
}

/// One config file as written: only the fields it sets are `Some`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    pub key: KeyLayer,
    pub license: LicenseLayer,
    pub output: OutputLayer,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeyLayer {
    pub segments: Option<usize>,
    pub segment_length: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LicenseLayer {
    pub user_id: Option<String>,
    pub plan: Option<String>,
    pub is_active: Option<bool>,
    pub valid_days: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputLayer {
    pub format: Option<OutputFormat>,
    pub parameterized: Option<bool>,
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, the working-directory config, then applies
    /// environment variable overrides.
    pub fn load(work_dir: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 4: global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        // Layer 3: working-directory config
        if let Some(dir) = work_dir {
            let local_path = dir.join(crate::constants::CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        // Layer 2: environment variables
        config.apply_env_vars(env);

        Ok(config)
    }

    /// Load one config layer from a specific file.
    pub fn load_file(path: &Path) -> Result<ConfigLayer, ConfigError> {
        debug!(path = %path.display(), "loading config file");
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(crate::constants::CONFIG_DIR).join("config.toml"))
    }

    /// The configured key shape with optional per-call overrides, validated.
    pub fn key_shape(
        &self,
        segments: Option<usize>,
        segment_length: Option<usize>,
    ) -> Result<KeyShape, KeyError> {
        KeyShape::new(
            segments.unwrap_or(self.key.segments),
            segment_length.unwrap_or(self.key.segment_length),
        )
    }

    /// Apply a file layer. Every field the layer sets wins, including
    /// values equal to the built-in defaults.
    pub fn merge(&mut self, layer: ConfigLayer) {
        let ConfigLayer {
            key,
            license,
            output,
        } = layer;

        if let Some(v) = key.segments {
            self.key.segments = v;
        }
        if let Some(v) = key.segment_length {
            self.key.segment_length = v;
        }

        if let Some(v) = license.user_id {
            self.license.user_id = v;
        }
        if let Some(v) = license.plan {
            self.license.plan = v;
        }
        if let Some(v) = license.is_active {
            self.license.is_active = v;
        }
        if let Some(v) = license.valid_days {
            self.license.valid_days = v;
        }

        if let Some(v) = output.format {
            self.output.format = v;
        }
        if let Some(v) = output.parameterized {
            self.output.parameterized = v;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        use crate::constants::{
            ENV_PLAN, ENV_SEGMENT_LENGTH, ENV_SEGMENTS, ENV_USER_ID, ENV_VALID_DAYS,
        };

        if let Some(value) = parsed_or_warn(env, ENV_SEGMENTS) {
            self.key.segments = value;
        }
        if let Some(value) = parsed_or_warn(env, ENV_SEGMENT_LENGTH) {
            self.key.segment_length = value;
        }
        if let Some(value) = parsed_or_warn(env, ENV_VALID_DAYS) {
            self.license.valid_days = value;
        }
        if let Ok(val) = env.var(ENV_USER_ID) {
            self.license.user_id = val;
        }
        if let Ok(val) = env.var(ENV_PLAN) {
            self.license.plan = val;
        }
    }
}

fn parsed_or_warn<T: std::str::FromStr>(env: &Env, name: &str) -> Option<T> {
    match env.parsed(name) {
        Parsed::Value(value) => Some(value),
        Parsed::Invalid(raw) => {
            warn!("ignoring invalid {name} value: {raw}");
            None
        }
        Parsed::Missing => None,
    }
}
