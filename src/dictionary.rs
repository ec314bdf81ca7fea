//! Term dictionary: bidirectional term ↔ id interning.
//!
//! The [`TermDictionary`] provides O(1) lookups in both directions using two
//! `DashMap`s. A union graph and all of its component stores share one
//! dictionary, so the same IRI always maps to the same [`NodeId`].

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::error::GraphResult;
use crate::term::{AtomicNodeAllocator, NodeId, Term};

static NEXT_DICTIONARY_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a dictionary, used to reject foreign stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DictionaryId(u64);

impl DictionaryId {
    fn next() -> Self {
        DictionaryId(NEXT_DICTIONARY_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Bidirectional term dictionary mapping ids to terms and terms to ids.
pub struct TermDictionary {
    id: DictionaryId,
    /// Forward map: NodeId → Term (source of truth).
    id_to_term: DashMap<NodeId, Term>,
    /// Reverse map: Term → NodeId.
    term_to_id: DashMap<Term, NodeId>,
    allocator: AtomicNodeAllocator,
}

impl TermDictionary {
    /// Create a new empty dictionary.
    pub fn new() -> Self {
        Self {
            id: DictionaryId::next(),
            id_to_term: DashMap::new(),
            term_to_id: DashMap::new(),
            allocator: AtomicNodeAllocator::new(),
        }
    }

    pub fn id(&self) -> DictionaryId {
        self.id
    }

    /// Intern a term, returning its existing id or allocating a new one.
    ///
    /// Terms are stored in [`Term::canonical`] form.
    pub fn intern(&self, term: Term) -> GraphResult<NodeId> {
        let term = term.canonical();
        if let Some(id) = self.term_to_id.get(&term) {
            return Ok(*id.value());
        }
        // Double-check under the shard lock
        let entry = self.term_to_id.entry(term);
        match entry {
            dashmap::mapref::entry::Entry::Occupied(e) => Ok(*e.get()),
            dashmap::mapref::entry::Entry::Vacant(e) => {
                let id = self.allocator.next_id()?;
                self.id_to_term.insert(id, e.key().clone());
                e.insert(id);
                Ok(id)
            }
        }
    }

    /// Intern an IRI.
    pub fn iri(&self, iri: &str) -> GraphResult<NodeId> {
        self.intern(Term::iri(iri))
    }

    /// Look up the id of a term without interning it.
    pub fn lookup(&self, term: &Term) -> Option<NodeId> {
        let canonical = term.clone().canonical();
        self.term_to_id.get(&canonical).map(|r| *r.value())
    }

    /// Look up the id of an IRI without interning it.
    pub fn lookup_iri(&self, iri: &str) -> Option<NodeId> {
        self.lookup(&Term::iri(iri))
    }

    /// Resolve an id back to its term.
    pub fn resolve(&self, id: NodeId) -> Option<Term> {
        self.id_to_term.get(&id).map(|r| r.value().clone())
    }

    /// Whether the id was issued by this dictionary.
    pub fn contains(&self, id: NodeId) -> bool {
        self.id_to_term.contains_key(&id)
    }

    /// Whether the id names an IRI (a named, non-anonymous node).
    pub fn is_iri(&self, id: NodeId) -> bool {
        self.id_to_term
            .get(&id)
            .is_some_and(|t| t.value().is_iri())
    }

    /// Whether the id names a blank node.
    pub fn is_blank(&self, id: NodeId) -> bool {
        self.id_to_term
            .get(&id)
            .is_some_and(|t| t.value().is_blank())
    }

    /// The prefix-maintenance namespace of the node, if any.
    pub fn namespace_of(&self, id: NodeId) -> Option<String> {
        self.id_to_term
            .get(&id)
            .and_then(|t| t.value().namespace().map(str::to_owned))
    }

    /// Render a node for diagnostics, falling back to `node:{id}`.
    pub fn display(&self, id: NodeId) -> String {
        self.resolve(id)
            .map(|t| t.to_string())
            .unwrap_or_else(|| id.to_string())
    }

    /// Number of interned terms.
    pub fn len(&self) -> usize {
        self.id_to_term.len()
    }

    /// Whether the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.id_to_term.is_empty()
    }
}

impl Default for TermDictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TermDictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermDictionary")
            .field("id", &self.id.0)
            .field("terms", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_is_idempotent() {
        let dict = TermDictionary::new();
        let a = dict.iri("http://ex.com#A").unwrap();
        let again = dict.iri("http://ex.com#A").unwrap();
        let b = dict.iri("http://ex.com#B").unwrap();
        assert_eq!(a, again);
        assert_ne!(a, b);
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn resolve_round_trips_terms() {
        let dict = TermDictionary::new();
        let lit = Term::typed_literal("5", "http://www.w3.org/2001/XMLSchema#int");
        let id = dict.intern(lit.clone()).unwrap();
        assert_eq!(dict.resolve(id), Some(lit));
        assert_eq!(
            dict.namespace_of(id).as_deref(),
            Some("http://www.w3.org/2001/XMLSchema#")
        );
    }

    #[test]
    fn string_typed_literal_interns_as_plain() {
        let dict = TermDictionary::new();
        let raw = Term::Literal {
            lexical: "x".into(),
            datatype: Some("http://www.w3.org/2001/XMLSchema#string".into()),
            language: None,
        };
        let id = dict.intern(raw.clone()).unwrap();
        assert_eq!(dict.intern(Term::literal("x")).unwrap(), id);
        assert_eq!(dict.lookup(&raw), Some(id));
        assert_eq!(dict.namespace_of(id), None);
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn lookup_does_not_intern() {
        let dict = TermDictionary::new();
        assert!(dict.lookup_iri("http://ex.com#Missing").is_none());
        assert!(dict.is_empty());
    }

    #[test]
    fn blank_and_iri_classification() {
        let dict = TermDictionary::new();
        let b = dict.intern(Term::blank("r1")).unwrap();
        let i = dict.iri("http://ex.com#C").unwrap();
        assert!(dict.is_blank(b));
        assert!(!dict.is_iri(b));
        assert!(dict.is_iri(i));
    }

    #[test]
    fn dictionaries_have_distinct_ids() {
        assert_ne!(TermDictionary::new().id(), TermDictionary::new().id());
    }

    #[test]
    fn unknown_ids_are_not_contained() {
        let dict = TermDictionary::new();
        dict.iri("http://ex.com#A").unwrap();
        assert!(!dict.contains(NodeId::new(99).unwrap()));
        assert_eq!(dict.display(NodeId::new(99).unwrap()), "node:99");
    }
}
