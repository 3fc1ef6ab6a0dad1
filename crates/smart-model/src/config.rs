//! SmartModel behaviour switches
//!
//! Every switch defaults to off. Configuration can come from code, the
//! environment (`SMART_MODEL_*`), or a YAML/JSON document.

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Prefix shared by all environment variables read by `from_env`
pub const ENV_PREFIX: &str = "SMART_MODEL_";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: '{value}', expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Validation failed for {field}: {reason}")]
    ValidationFailed { field: String, reason: String },

    #[error("Configuration parsing error: {message}")]
    ParseError { message: String },
}

/// Password hasher selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HasherConfig {
    /// `bcrypt` or `argon2`
    pub algorithm: String,
    /// bcrypt work factor
    pub cost: u32,
    /// Argon2 memory in KiB
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            algorithm: "bcrypt".to_string(),
            cost: 10,
            memory_cost: 65536,
            time_cost: 3,
            parallelism: 4,
        }
    }
}

impl HasherConfig {
    pub fn bcrypt(cost: u32) -> Self {
        Self {
            algorithm: "bcrypt".to_string(),
            cost,
            ..Self::default()
        }
    }

    pub fn argon2(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            algorithm: "argon2".to_string(),
            memory_cost,
            time_cost,
            parallelism,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.algorithm.as_str() {
            "bcrypt" => {
                if !(4..=31).contains(&self.cost) {
                    return Err(ConfigError::ValidationFailed {
                        field: "hasher.cost".to_string(),
                        reason: format!("bcrypt cost must be between 4 and 31, got {}", self.cost),
                    });
                }
            }
            "argon2" => {
                if self.time_cost == 0 || self.parallelism == 0 {
                    return Err(ConfigError::ValidationFailed {
                        field: "hasher".to_string(),
                        reason: "argon2 time_cost and parallelism must be positive".to_string(),
                    });
                }
            }
            other => {
                return Err(ConfigError::InvalidValue {
                    field: "hasher.algorithm".to_string(),
                    value: other.to_string(),
                    expected: "bcrypt or argon2".to_string(),
                })
            }
        }
        Ok(())
    }
}

/// Per-model-type configuration, overridable per entity
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartModelConfig {
    /// Hard-fail mode: validation failures and vetoes become errors
    pub throw_on_validation: bool,
    /// Fill an attribute-less entity from the input source before validating
    pub auto_hydrate_entity_from_input: bool,
    /// Fill from the input source even when attributes are present
    pub force_entity_hydration_from_input: bool,
    /// Drop attributes matched by purge filters before persisting
    pub auto_purge_redundant_attributes: bool,
    /// Hash changed password attributes before persisting
    pub auto_hash_password_attributes: bool,
    /// Standalone mode, never flash input on failure
    pub external_validator: bool,
    pub hasher: HasherConfig,
}

impl SmartModelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_throw_on_validation(mut self, enabled: bool) -> Self {
        self.throw_on_validation = enabled;
        self
    }

    pub fn with_auto_hydration(mut self, enabled: bool) -> Self {
        self.auto_hydrate_entity_from_input = enabled;
        self
    }

    pub fn with_forced_hydration(mut self, enabled: bool) -> Self {
        self.force_entity_hydration_from_input = enabled;
        self
    }

    pub fn with_auto_purge(mut self, enabled: bool) -> Self {
        self.auto_purge_redundant_attributes = enabled;
        self
    }

    pub fn with_auto_hash(mut self, enabled: bool) -> Self {
        self.auto_hash_password_attributes = enabled;
        self
    }

    pub fn with_external_validator(mut self, enabled: bool) -> Self {
        self.external_validator = enabled;
        self
    }

    pub fn with_hasher(mut self, hasher: HasherConfig) -> Self {
        self.hasher = hasher;
        self
    }

    /// Load from `SMART_MODEL_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load through an arbitrary key lookup; `from_env` uses the process
    /// environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        let flags: [(&str, &mut bool); 6] = [
            ("THROW_ON_VALIDATION", &mut config.throw_on_validation),
            ("AUTO_HYDRATE_ENTITY_FROM_INPUT", &mut config.auto_hydrate_entity_from_input),
            ("FORCE_ENTITY_HYDRATION_FROM_INPUT", &mut config.force_entity_hydration_from_input),
            ("AUTO_PURGE_REDUNDANT_ATTRIBUTES", &mut config.auto_purge_redundant_attributes),
            ("AUTO_HASH_PASSWORD_ATTRIBUTES", &mut config.auto_hash_password_attributes),
            ("EXTERNAL_VALIDATOR", &mut config.external_validator),
        ];
        for (name, slot) in flags {
            if let Some(raw) = var(name) {
                *slot = parse_flag(name, &raw)?;
            }
        }

        if let Some(algorithm) = var("HASHER") {
            config.hasher.algorithm = algorithm.trim().to_lowercase();
        }
        if let Some(raw) = var("HASHER_COST") {
            config.hasher.cost = parse_number("HASHER_COST", &raw)?;
        }
        if let Some(raw) = var("HASHER_MEMORY_COST") {
            config.hasher.memory_cost = parse_number("HASHER_MEMORY_COST", &raw)?;
        }
        if let Some(raw) = var("HASHER_TIME_COST") {
            config.hasher.time_cost = parse_number("HASHER_TIME_COST", &raw)?;
        }
        if let Some(raw) = var("HASHER_PARALLELISM") {
            config.hasher.parallelism = parse_number("HASHER_PARALLELISM", &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.hasher.validate()
    }
}

fn parse_flag(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: format!("{}{}", ENV_PREFIX, name),
            value: raw.to_string(),
            expected: "a boolean (true/false, 1/0, yes/no, on/off)".to_string(),
        }),
    }
}

fn parse_number(name: &str, raw: &str) -> Result<u32, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field: format!("{}{}", ENV_PREFIX, name),
        value: raw.to_string(),
        expected: "a non-negative integer".to_string(),
    })
}
