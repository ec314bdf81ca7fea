//! Live namespace ↔ prefix mapping of a graph.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use crate::error::{PrefixError, PrefixResult};
use crate::term::split_namespace;

#[derive(Debug, Default)]
struct Bindings {
    by_prefix: BTreeMap<String, String>,
    by_namespace: HashMap<String, String>,
}

/// Bijective prefix mapping, shared between a graph, its auto-prefix
/// listener and any external code that wants to rename bindings.
#[derive(Debug, Default)]
pub struct PrefixMapping {
    inner: RwLock<Bindings>,
}

/// Whether `prefix` is usable as a Turtle/SPARQL prefix name.
///
/// The empty prefix is allowed; otherwise it must start with an ASCII letter
/// and continue with letters, digits, `-` or `_`.
pub fn is_valid_prefix(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    match chars.next() {
        None => true,
        Some(first) => {
            first.is_ascii_alphabetic()
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        }
    }
}

impl PrefixMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to `namespace`.
    ///
    /// Rebinding a namespace to a new prefix drops its old prefix. Binding a
    /// prefix that already names another namespace is a conflict.
    pub fn set_prefix(&self, prefix: &str, namespace: &str) -> PrefixResult<()> {
        if !is_valid_prefix(prefix) {
            return Err(PrefixError::InvalidPrefix {
                prefix: prefix.to_owned(),
            });
        }
        let mut b = self.inner.write().expect("prefix mapping lock poisoned");
        match b.by_prefix.get(prefix) {
            Some(existing) if existing == namespace => return Ok(()),
            Some(existing) => {
                return Err(PrefixError::Conflict {
                    prefix: prefix.to_owned(),
                    namespace: existing.clone(),
                });
            }
            None => {}
        }
        if let Some(old_prefix) = b.by_namespace.remove(namespace) {
            b.by_prefix.remove(&old_prefix);
        }
        b.by_prefix.insert(prefix.to_owned(), namespace.to_owned());
        b.by_namespace.insert(namespace.to_owned(), prefix.to_owned());
        Ok(())
    }

    /// Remove the binding of `prefix`, returning its namespace.
    pub fn remove_prefix(&self, prefix: &str) -> Option<String> {
        let mut b = self.inner.write().expect("prefix mapping lock poisoned");
        let namespace = b.by_prefix.remove(prefix)?;
        b.by_namespace.remove(&namespace);
        Some(namespace)
    }

    /// Remove `prefix` only if it is still bound to `namespace`.
    pub(crate) fn remove_if_bound(&self, prefix: &str, namespace: &str) -> bool {
        let mut b = self.inner.write().expect("prefix mapping lock poisoned");
        if b.by_prefix.get(prefix).map(String::as_str) != Some(namespace) {
            return false;
        }
        b.by_prefix.remove(prefix);
        b.by_namespace.remove(namespace);
        true
    }

    pub fn prefix_for(&self, namespace: &str) -> Option<String> {
        let b = self.inner.read().expect("prefix mapping lock poisoned");
        b.by_namespace.get(namespace).cloned()
    }

    pub fn namespace_for(&self, prefix: &str) -> Option<String> {
        let b = self.inner.read().expect("prefix mapping lock poisoned");
        b.by_prefix.get(prefix).cloned()
    }

    /// Compact `iri` to `prefix:local` if its namespace is bound.
    pub fn shorten(&self, iri: &str) -> Option<String> {
        let (namespace, local) = split_namespace(iri)?;
        let prefix = self.prefix_for(namespace)?;
        Some(format!("{prefix}:{local}"))
    }

    /// Expand `prefix:local` to a full IRI if the prefix is bound.
    pub fn expand(&self, qname: &str) -> Option<String> {
        let (prefix, local) = qname.split_once(':')?;
        let namespace = self.namespace_for(prefix)?;
        Some(format!("{namespace}{local}"))
    }

    /// All bindings, prefix → namespace, sorted by prefix.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        let b = self.inner.read().expect("prefix mapping lock poisoned");
        b.by_prefix.clone()
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .expect("prefix mapping lock poisoned")
            .by_prefix
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
