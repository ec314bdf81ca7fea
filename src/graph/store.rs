//! Indexed in-memory triple set.
//!
//! A [`TripleStore`] is both the private base of a [`Graph`](super::Graph) and
//! the unit that gets attached to it as a component. Triples are kept in a
//! set plus three secondary indexes (by subject, predicate, object) so that
//! pattern lookups with any bound position avoid a full scan.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::dictionary::TermDictionary;
use crate::error::GraphResult;
use crate::term::{NodeId, Term};

use super::{Triple, TriplePattern};

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a triple store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreId(u64);

impl StoreId {
    fn next() -> Self {
        StoreId(NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for StoreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "store:{}", self.0)
    }
}

type PositionIndex = HashMap<NodeId, HashSet<Triple>>;

/// An indexed set of triples over a shared term dictionary.
pub struct TripleStore {
    id: StoreId,
    name: Option<String>,
    dictionary: Arc<TermDictionary>,
    triples: HashSet<Triple>,
    by_subject: PositionIndex,
    by_predicate: PositionIndex,
    by_object: PositionIndex,
}

impl TripleStore {
    /// Create an empty store interning into `dictionary`.
    pub fn new(dictionary: Arc<TermDictionary>) -> Self {
        Self {
            id: StoreId::next(),
            name: None,
            dictionary,
            triples: HashSet::new(),
            by_subject: HashMap::new(),
            by_predicate: HashMap::new(),
            by_object: HashMap::new(),
        }
    }

    /// Create an empty, named store (e.g. the IRI of an imported module).
    pub fn named(dictionary: Arc<TermDictionary>, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(dictionary)
        }
    }

    pub fn id(&self) -> StoreId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn dictionary(&self) -> &Arc<TermDictionary> {
        &self.dictionary
    }

    /// Insert a triple. Returns `true` if the store did not contain it yet.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if !self.triples.insert(triple) {
            return false;
        }
        self.by_subject
            .entry(triple.subject)
            .or_default()
            .insert(triple);
        self.by_predicate
            .entry(triple.predicate)
            .or_default()
            .insert(triple);
        self.by_object
            .entry(triple.object)
            .or_default()
            .insert(triple);
        true
    }

    /// Intern three terms and insert the resulting triple.
    pub fn insert_terms(&mut self, subject: Term, predicate: Term, object: Term) -> GraphResult<Triple> {
        let triple = Triple::new(
            self.dictionary.intern(subject)?,
            self.dictionary.intern(predicate)?,
            self.dictionary.intern(object)?,
        );
        self.insert(triple);
        Ok(triple)
    }

    /// Remove a triple. Returns `true` if it was present.
    pub fn remove(&mut self, triple: &Triple) -> bool {
        if !self.triples.remove(triple) {
            return false;
        }
        Self::unindex(&mut self.by_subject, triple.subject, triple);
        Self::unindex(&mut self.by_predicate, triple.predicate, triple);
        Self::unindex(&mut self.by_object, triple.object, triple);
        true
    }

    fn unindex(index: &mut PositionIndex, key: NodeId, triple: &Triple) {
        if let Some(set) = index.get_mut(&key) {
            set.remove(triple);
            if set.is_empty() {
                index.remove(&key);
            }
        }
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// All triples matching the pattern. Wildcards match anything.
    pub fn find(&self, pattern: &TriplePattern) -> Vec<Triple> {
        let candidates: Box<dyn Iterator<Item = &Triple> + '_> = if let Some(s) = pattern.subject {
            Box::new(self.by_subject.get(&s).into_iter().flatten())
        } else if let Some(o) = pattern.object {
            Box::new(self.by_object.get(&o).into_iter().flatten())
        } else if let Some(p) = pattern.predicate {
            Box::new(self.by_predicate.get(&p).into_iter().flatten())
        } else {
            Box::new(self.triples.iter())
        };
        candidates.filter(|t| pattern.matches(t)).copied().collect()
    }

    /// Whether any triple has `node` as its subject.
    pub fn describes(&self, node: NodeId) -> bool {
        self.by_subject.contains_key(&node)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Number of triples.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

impl std::fmt::Debug for TripleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripleStore")
            .field("id", &self.id.0)
            .field("name", &self.name)
            .field("triples", &self.len())
            .finish()
    }
}
