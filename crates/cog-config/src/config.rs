//! Ordered configuration document and its text format
//!
//! A document is a sequence of `key=value` entries separated by `;`. A bare
//! `key` is an explicit null, and leading lines of an entry that start with
//! `#` are comments:
//!
//! ```text
//! # Project Details;
//! project.name=demo;
//! project.version=1.0;
//! pkg?.zlib>=1.2;
//! ```

use crate::encoding::{decode, encode};
use crate::value::Value;
use crate::{ConfigError, ConfigResult};
use std::fmt;
use std::str::FromStr;

/// Ordered mapping from unique keys to owned values.
///
/// Iteration follows insertion order; overwriting a key keeps its original
/// position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    entries: Vec<(String, Value)>,
}

impl Config {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration text into typed entries
    pub fn parse(text: &str) -> ConfigResult<Self> {
        let mut config = Self::new();

        for raw_entry in text.split(';') {
            let entry = skip_leading_comments(raw_entry).trim();
            if entry.is_empty() {
                continue;
            }

            let parts: Vec<&str> = entry.split('=').collect();
            match parts.as_slice() {
                [key] => {
                    config.set(decode(key.trim()), Value::Null);
                }
                [key, value] => {
                    let value = Value::infer(&decode(value.trim()));
                    config.set(decode(key.trim()), value);
                }
                _ => {
                    return Err(ConfigError::Format {
                        entry: entry.to_string(),
                    })
                }
            }
        }

        Ok(config)
    }

    /// Serialize to text that [`Config::parse`] reads back
    pub fn stringify(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(&encode(key));
            out.push('=');
            out.push_str(&encode(&value.to_string()));
            out.push(';');
        }
        out
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Get the value stored under `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.position(key).map(|idx| &self.entries[idx].1)
    }

    /// Set `key` to `value`, returning the previous value if any
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Remove `key`, returning its value if it was present
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.position(key).map(|idx| self.entries.remove(idx).1)
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

/// The entry text from its first line that is not a `#` comment
fn skip_leading_comments(entry: &str) -> &str {
    let mut rest = entry;
    loop {
        let trimmed = rest.trim_start();
        if !trimmed.starts_with('#') {
            return rest;
        }
        match trimmed.find('\n') {
            Some(end) => rest = &trimmed[end + 1..],
            None => return "",
        }
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stringify())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Config {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = Self::new();
        for (key, value) in iter {
            config.set(key, value);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_typed_entries() {
        let config = Config::parse("a=1;b=true;c=hello;d;e=null;").unwrap();
        assert_eq!(config.len(), 5);
        assert_eq!(config.get("a"), Some(&Value::Number(1.0)));
        assert_eq!(config.get("b"), Some(&Value::Boolean(true)));
        assert_eq!(config.get("c"), Some(&Value::from("hello")));
        assert_eq!(config.get("d"), Some(&Value::Null));
        assert_eq!(config.get("e"), Some(&Value::Null));
    }

    #[test]
    fn test_parse_trims_keys_and_values() {
        let config = Config::parse("  project.name =  demo  ;\n").unwrap();
        assert_eq!(config.get("project.name"), Some(&Value::from("demo")));
    }

    #[test]
    fn test_parse_skips_comments() {
        let text = "# Project Details;\nproject.name=demo;\n#cpp.version=11;\n";
        let config = Config::parse(text).unwrap();
        assert_eq!(config.keys().collect::<Vec<_>>(), vec!["project.name"]);
    }

    #[test]
    fn test_parse_skips_comment_line_without_terminator() {
        let text = "# heading\nproject.name=demo;";
        let config = Config::parse(text).unwrap();
        assert_eq!(config.get("project.name"), Some(&Value::from("demo")));
    }

    #[test]
    fn test_comment_marker_inside_value_is_kept() {
        let mut config = Config::new();
        config.set("note", "line one\n# not a comment");
        config.set("crlf", "a\r\nb");

        let parsed = Config::parse(&config.stringify()).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.get("note"), Some(&Value::from("line one\n# not a comment")));
    }

    #[test]
    fn test_parse_rejects_extra_equals() {
        let err = Config::parse("a=b=c;").unwrap_err();
        assert!(matches!(err, ConfigError::Format { ref entry } if entry == "a=b=c"));
    }

    #[test]
    fn test_parse_decodes_escapes() {
        let config = Config::parse("k%3Dey=va%3Blue%25;").unwrap();
        assert_eq!(config.get("k=ey"), Some(&Value::from("va;lue%")));
    }

    #[test]
    fn test_relation_suffix_lands_in_key() {
        let config = Config::parse("pkg?.zlib>=1.2;").unwrap();
        assert_eq!(config.get("pkg?.zlib>"), Some(&Value::Number(1.2)));
    }

    #[test]
    fn test_last_set_wins_and_keeps_position() {
        let config = Config::parse("a=1;b=2;a=3;").unwrap();
        assert_eq!(config.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(config.get("a"), Some(&Value::Number(3.0)));
    }

    #[test]
    fn test_stringify() {
        let mut config = Config::new();
        config.set("name", "a;b");
        config.set("strict", true);
        config.set("version", 11.0);
        config.set("empty", Value::Null);
        assert_eq!(
            config.stringify(),
            "name=\"a%3Bb\";strict=true;version=11;empty=null;"
        );
    }

    #[test]
    fn test_null_by_omission_normalizes() {
        let config = Config::parse("flag;").unwrap();
        assert_eq!(config.stringify(), "flag=null;");
    }

    #[test]
    fn test_remove() {
        let mut config = Config::parse("a=1;b=2;").unwrap();
        assert_eq!(config.remove("a"), Some(Value::Number(1.0)));
        assert_eq!(config.remove("a"), None);
        assert!(!config.contains_key("a"));
        assert_eq!(config.len(), 1);
    }

    #[test]
    fn test_from_str_and_display() {
        let config: Config = "x=\"y\";".parse().unwrap();
        assert_eq!(config.to_string(), "x=\"y\";");
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Config::parse("a=1;").unwrap();
        let mut copy = original.clone();
        copy.set("a", 2.0);
        assert_eq!(original.get("a"), Some(&Value::Number(1.0)));
    }
}
