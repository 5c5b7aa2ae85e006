//! Typed getters over [`Config`]
//!
//! Required getters fail with [`ConfigError::MissingKey`] when the key is
//! absent; every getter fails with [`ConfigError::TypeMismatch`] naming the
//! key when the stored tag is not the requested one. Optional getters return
//! `Ok(None)` for an absent key.

use crate::config::Config;
use crate::value::Value;
use crate::{ConfigError, ConfigResult};

impl Config {
    fn require(&self, key: &str) -> ConfigResult<&Value> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
    }

    pub fn get_string(&self, key: &str) -> ConfigResult<&str> {
        as_string(key, self.require(key)?)
    }

    pub fn get_bool(&self, key: &str) -> ConfigResult<bool> {
        as_bool(key, self.require(key)?)
    }

    pub fn get_number(&self, key: &str) -> ConfigResult<f64> {
        as_number(key, self.require(key)?)
    }

    /// Get a version, which may be stored as a number (`1.0`) or a string
    /// (`1.0.0`). Numbers are formatted to one decimal place.
    pub fn get_version(&self, key: &str) -> ConfigResult<String> {
        as_version(key, self.require(key)?)
    }

    pub fn get_optional_string(&self, key: &str) -> ConfigResult<Option<&str>> {
        self.get(key).map(|value| as_string(key, value)).transpose()
    }

    pub fn get_optional_bool(&self, key: &str) -> ConfigResult<Option<bool>> {
        self.get(key).map(|value| as_bool(key, value)).transpose()
    }

    pub fn get_optional_number(&self, key: &str) -> ConfigResult<Option<f64>> {
        self.get(key).map(|value| as_number(key, value)).transpose()
    }

    pub fn get_optional_version(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get(key).map(|value| as_version(key, value)).transpose()
    }
}

fn as_string<'a>(key: &str, value: &'a Value) -> ConfigResult<&'a str> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(ConfigError::type_mismatch(key, "string", other)),
    }
}

fn as_bool(key: &str, value: &Value) -> ConfigResult<bool> {
    match value {
        Value::Boolean(b) => Ok(*b),
        other => Err(ConfigError::type_mismatch(key, "boolean", other)),
    }
}

fn as_number(key: &str, value: &Value) -> ConfigResult<f64> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(ConfigError::type_mismatch(key, "number", other)),
    }
}

fn as_version(key: &str, value: &Value) -> ConfigResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(format!("{:.1}", n)),
        other => Err(ConfigError::type_mismatch(key, "string or number", other)),
    }
}
