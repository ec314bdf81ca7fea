//! Preferred prefixes for well-known namespaces.

use std::collections::HashMap;

use crate::config::PrefixConfig;
use crate::ontology::vocab::{owl, rdf, rdfs, xsd};

use super::derive::derive_prefix;
use super::mapping::is_valid_prefix;

const WELL_KNOWN: &[(&str, &str)] = &[
    (rdf::NS, "rdf"),
    (rdfs::NS, "rdfs"),
    (owl::NS, "owl"),
    (xsd::NS, "xsd"),
    ("http://www.w3.org/2004/02/skos/core#", "skos"),
    ("http://purl.org/dc/elements/1.1/", "dc"),
    ("http://purl.org/dc/terms/", "dcterms"),
    ("http://xmlns.com/foaf/0.1/", "foaf"),
    ("http://www.w3.org/ns/prov#", "prov"),
    ("http://www.w3.org/ns/shacl#", "sh"),
];

/// Namespace → preferred prefix, consulted before any derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixLibrary {
    bindings: HashMap<String, String>,
}

impl PrefixLibrary {
    /// A library with no bindings.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard RDF/OWL/Dublin Core/... bindings.
    pub fn well_known() -> Self {
        let mut library = Self::empty();
        library.extend(WELL_KNOWN.iter().map(|(ns, p)| (ns.to_string(), p.to_string())));
        library
    }

    pub fn from_config(config: &PrefixConfig) -> Self {
        let mut library = if config.seed_well_known {
            Self::well_known()
        } else {
            Self::empty()
        };
        library.extend(config.library.clone());
        library
    }

    /// Add or replace the preferred prefix of `namespace`.
    pub fn insert(&mut self, namespace: impl Into<String>, prefix: impl Into<String>) {
        self.bindings.insert(namespace.into(), prefix.into());
    }

    pub fn extend(&mut self, bindings: impl IntoIterator<Item = (String, String)>) {
        self.bindings.extend(bindings);
    }

    pub fn get(&self, namespace: &str) -> Option<&str> {
        self.bindings.get(namespace).map(String::as_str)
    }

    /// The preferred prefix of `namespace`, else a derived one.
    ///
    /// A library entry that is not a legal prefix name is ignored, so the
    /// result is always usable with [`PrefixMapping::set_prefix`](super::PrefixMapping::set_prefix).
    pub fn candidate(&self, namespace: &str) -> String {
        match self.get(namespace) {
            Some(preferred) if is_valid_prefix(preferred) => preferred.to_owned(),
            Some(preferred) => {
                tracing::warn!(%namespace, prefix = %preferred, "ignoring illegal library prefix");
                derive_prefix(namespace)
            }
            None => derive_prefix(namespace),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_contains_core_vocabularies() {
        let lib = PrefixLibrary::well_known();
        assert_eq!(lib.get(xsd::NS), Some("xsd"));
        assert_eq!(lib.get(owl::NS), Some("owl"));
        assert!(lib.get("http://ex.com#").is_none());
        assert_eq!(lib.candidate(xsd::NS), "xsd");
        assert_eq!(lib.candidate("http://ex.com/people#"), "people");
    }

    #[test]
    fn illegal_library_prefix_falls_back_to_derivation() {
        let mut lib = PrefixLibrary::empty();
        lib.insert("http://ex.com/ns#", "ex.ns");
        assert_eq!(lib.candidate("http://ex.com/ns#"), "ns");
    }

    #[test]
    fn config_extends_or_replaces() {
        let mut config = PrefixConfig::default();
        config
            .library
            .insert("http://schema.org/".into(), "schema".into());
        let lib = PrefixLibrary::from_config(&config);
        assert_eq!(lib.get("http://schema.org/"), Some("schema"));
        assert_eq!(lib.get(rdf::NS), Some("rdf"));

        config.seed_well_known = false;
        let bare = PrefixLibrary::from_config(&config);
        assert_eq!(bare.len(), 1);
    }
}
