//! Store configuration: where the collection lives and the two policy knobs.

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_OWNER_ID: u64 = 1;

/// Settings for a `TodoStore`.
///
/// Deserializable so a host can embed it in its own config file; missing
/// fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub base_url: String,
    /// Number of items requested by a list fetch.
    pub page_size: usize,
    /// Owner id attached to every item this client creates.
    pub owner_id: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            owner_id: DEFAULT_OWNER_ID,
        }
    }
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `TODO_API_URL`, `TODO_PAGE_SIZE` and `TODO_OWNER_ID`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup("TODO_API_URL") {
            config.base_url = url;
        }
        if let Some(value) = lookup("TODO_PAGE_SIZE") {
            config.page_size = parse_number("TODO_PAGE_SIZE", value)?;
        }
        if let Some(value) = lookup("TODO_OWNER_ID") {
            config.owner_id = parse_number("TODO_OWNER_ID", value)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(())
    }
}

fn parse_number<N: std::str::FromStr>(var: &'static str, value: String) -> Result<N, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { var, value })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_match_public_collection() {
        let config = StoreConfig::default();
        assert_eq!(config.base_url, "https://jsonplaceholder.typicode.com");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.owner_id, 1);
    }

    #[test]
    fn env_overrides_each_field() {
        let config = StoreConfig::from_lookup(lookup(&[
            ("TODO_API_URL", "http://127.0.0.1:3000"),
            ("TODO_PAGE_SIZE", "25"),
            ("TODO_OWNER_ID", " 7 "),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.owner_id, 7);
    }

    #[test]
    fn bad_number_names_the_variable() {
        let err = StoreConfig::from_lookup(lookup(&[("TODO_PAGE_SIZE", "ten")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { var: "TODO_PAGE_SIZE", .. }));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = StoreConfig::from_lookup(lookup(&[("TODO_PAGE_SIZE", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroPageSize));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: StoreConfig = serde_json::from_str(r#"{"owner_id": 3}"#).unwrap();
        assert_eq!(config.owner_id, 3);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
