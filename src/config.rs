//! Configuration for the derived views.
//!
//! All sections have defaults, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! [index]
//! cache_capacity = 4096
//! follow_sub_properties = true
//! builtin_properties = ["http://www.w3.org/2000/01/rdf-schema#label"]
//!
//! [prefix]
//! seed_well_known = true
//!
//! [prefix.library]
//! "http://schema.org/" = "schema"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ontology::vocab::rdfs;
use crate::prefix::is_valid_prefix;

/// Default upper bound on cached class expressions.
pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub index: IndexConfig,
    pub prefix: PrefixConfig,
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|source| ConfigError::Parse { source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.index.validate()?;
        self.prefix.validate()
    }
}

/// Settings for the class-property index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Maximum number of class expressions kept in the LRU cache.
    pub cache_capacity: usize,
    /// IRIs of the properties every class carries through the top class.
    pub builtin_properties: Vec<String>,
    /// Treat sub-properties of an applicable property as applicable too.
    pub follow_sub_properties: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            builtin_properties: vec![rdfs::LABEL.to_owned(), rdfs::COMMENT.to_owned()],
            follow_sub_properties: true,
        }
    }
}

impl IndexConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_capacity == 0 {
            return Err(ConfigError::Invalid {
                message: "index.cache_capacity must be > 0".into(),
            });
        }
        Ok(())
    }
}

/// Settings for automatic prefix maintenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefixConfig {
    /// Start from the well-known library (rdf, rdfs, owl, xsd, ...).
    pub seed_well_known: bool,
    /// Extra preferred bindings: namespace → prefix.
    pub library: BTreeMap<String, String>,
}

impl Default for PrefixConfig {
    fn default() -> Self {
        Self {
            seed_well_known: true,
            library: BTreeMap::new(),
        }
    }
}

impl PrefixConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.library.iter().find(|(_, prefix)| !is_valid_prefix(prefix)) {
            Some((namespace, prefix)) => Err(ConfigError::Invalid {
                message: format!("prefix.library: {prefix:?} for {namespace} is not a legal prefix name"),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.index.cache_capacity, DEFAULT_CACHE_CAPACITY);
        assert!(config.prefix.seed_well_known);
    }

    #[test]
    fn parses_all_sections() {
        let config = Config::from_toml_str(
            r#"
            [index]
            cache_capacity = 16
            follow_sub_properties = false
            builtin_properties = ["http://www.w3.org/2000/01/rdf-schema#label"]

            [prefix]
            seed_well_known = false

            [prefix.library]
            "http://schema.org/" = "schema"
            "#,
        )
        .unwrap();
        assert_eq!(config.index.cache_capacity, 16);
        assert!(!config.index.follow_sub_properties);
        assert_eq!(config.index.builtin_properties.len(), 1);
        assert!(!config.prefix.seed_well_known);
        assert_eq!(
            config.prefix.library.get("http://schema.org/").map(String::as_str),
            Some("schema")
        );
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = Config::from_toml_str("[index]\ncache_capacity = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn illegal_library_prefix_is_rejected() {
        let err = Config::from_toml_str(
            r#"
            [prefix.library]
            "http://ex.com/ns#" = "ex.ns"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::from_toml_str("[index\ncache_capacity = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
