//! Typed configuration values

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Plain decimal numbers such as `11` or `1.25`; signs and exponents stay strings
static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("number pattern is valid"));

/// A single configuration value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
}

impl Value {
    /// Infer a typed value from decoded, trimmed entry text.
    ///
    /// Priority: `true`/`false` (any case), blank or `null` (any case),
    /// plain decimal number, and finally a string with one layer of
    /// surrounding double quotes removed.
    pub fn infer(text: &str) -> Self {
        let lower = text.to_lowercase();
        match lower.as_str() {
            "true" => return Self::Boolean(true),
            "false" => return Self::Boolean(false),
            "null" => return Self::Null,
            _ => {}
        }

        if text.trim().is_empty() {
            return Self::Null;
        }

        if NUMBER_PATTERN.is_match(text) {
            if let Ok(number) = text.parse::<f64>() {
                return Self::Number(number);
            }
        }

        Self::String(strip_quotes(text).to_string())
    }

    /// Name of the active tag, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

fn strip_quotes(text: &str) -> &str {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

/// Writable form: `null`, `true`/`false`, shortest round-trip decimal, or a
/// double-quoted string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}
