//! Union graph: a private base store plus attached component stores.
//!
//! The [`Graph`] is the only mutable shared resource of the crate. All derived
//! views (class-property index, prefix registry) hang off it as listeners and
//! are kept consistent purely by the change events it fires:
//!
//! - `add` / `delete` mutate the private base store and fire per-triple events
//!   when the base actually changed
//! - `attach_component` / `detach_component` merge or unmerge a whole
//!   [`TripleStore`] and fire one bulk event
//!
//! Queries (`find`, `contains`, `objects`, ...) see the union of the base and
//! every component. The graph is not thread-safe by contract: mutations take
//! `&mut self`, so sharing one across threads means wrapping it in a lock.

pub mod io;
pub mod listener;
pub mod store;

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::dictionary::TermDictionary;
use crate::error::{GraphError, GraphResult};
use crate::prefix::PrefixMapping;
use crate::term::{NodeId, Term};

use self::listener::{GraphListener, ListenerKind, ListenerRegistry};
use self::store::{StoreId, TripleStore};

/// A triple (subject, predicate, object) of interned nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: NodeId,
    pub predicate: NodeId,
    pub object: NodeId,
}

impl Triple {
    pub fn new(subject: NodeId, predicate: NodeId, object: NodeId) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// The distinct nodes of the triple. A node used in two positions is
    /// reported once.
    pub fn distinct_nodes(&self) -> Vec<NodeId> {
        let mut nodes = vec![self.subject];
        if !nodes.contains(&self.predicate) {
            nodes.push(self.predicate);
        }
        if !nodes.contains(&self.object) {
            nodes.push(self.object);
        }
        nodes
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.subject, self.predicate, self.object)
    }
}

/// A triple pattern; `None` positions are wildcards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: Option<NodeId>,
    pub predicate: Option<NodeId>,
    pub object: Option<NodeId>,
}

impl TriplePattern {
    pub fn new(subject: Option<NodeId>, predicate: Option<NodeId>, object: Option<NodeId>) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// The all-wildcard pattern.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, subject: NodeId) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn with_predicate(mut self, predicate: NodeId) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn with_object(mut self, object: NodeId) -> Self {
        self.object = Some(object);
        self
    }

    pub fn matches(&self, triple: &Triple) -> bool {
        self.subject.is_none_or(|s| s == triple.subject)
            && self.predicate.is_none_or(|p| p == triple.predicate)
            && self.object.is_none_or(|o| o == triple.object)
    }
}

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a graph; derived views bind to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId(u64);

impl GraphId {
    fn next() -> Self {
        GraphId(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// A union graph over a shared term dictionary.
pub struct Graph {
    id: GraphId,
    dictionary: Arc<TermDictionary>,
    base: TripleStore,
    components: Vec<Arc<TripleStore>>,
    listeners: ListenerRegistry,
    prefixes: Arc<PrefixMapping>,
}

impl Graph {
    /// Create an empty graph with a fresh dictionary.
    pub fn new() -> Self {
        Self::with_dictionary(Arc::new(TermDictionary::new()))
    }

    /// Create an empty graph over an existing dictionary, so that stores
    /// built beforehand can be attached as components.
    pub fn with_dictionary(dictionary: Arc<TermDictionary>) -> Self {
        Self {
            id: GraphId::next(),
            base: TripleStore::new(dictionary.clone()),
            dictionary,
            components: Vec::new(),
            listeners: ListenerRegistry::new(),
            prefixes: Arc::new(PrefixMapping::new()),
        }
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn dictionary(&self) -> &Arc<TermDictionary> {
        &self.dictionary
    }

    /// The live prefix mapping of this graph.
    pub fn prefixes(&self) -> &Arc<PrefixMapping> {
        &self.prefixes
    }

    /// Intern an IRI in this graph's dictionary.
    pub fn iri(&self, iri: &str) -> GraphResult<NodeId> {
        self.dictionary.iri(iri)
    }

    /// The private base store.
    pub fn base(&self) -> &TripleStore {
        &self.base
    }

    /// Attached components, in attachment order.
    pub fn components(&self) -> &[Arc<TripleStore>] {
        &self.components
    }

    pub fn component(&self, id: StoreId) -> Option<&Arc<TripleStore>> {
        self.components.iter().find(|c| c.id() == id)
    }

    fn check_node(&self, node: NodeId) -> GraphResult<()> {
        if self.dictionary.contains(node) {
            Ok(())
        } else {
            Err(GraphError::UnknownNode {
                node_id: node.get(),
            })
        }
    }

    fn check_triple(&self, triple: &Triple) -> GraphResult<()> {
        self.check_node(triple.subject)?;
        self.check_node(triple.predicate)?;
        self.check_node(triple.object)
    }

    /// Add a triple to the base store.
    ///
    /// Returns `Ok(false)` without notifying listeners if the base already
    /// held the triple.
    pub fn add(&mut self, triple: Triple) -> GraphResult<bool> {
        self.check_triple(&triple)?;
        if !self.base.insert(triple) {
            return Ok(false);
        }
        self.listeners.dispatch_added(&triple)?;
        Ok(true)
    }

    /// Intern three terms and add the resulting triple.
    pub fn add_terms(&mut self, subject: Term, predicate: Term, object: Term) -> GraphResult<Triple> {
        let triple = Triple::new(
            self.dictionary.intern(subject)?,
            self.dictionary.intern(predicate)?,
            self.dictionary.intern(object)?,
        );
        self.add(triple)?;
        Ok(triple)
    }

    /// Delete a triple from the base store.
    ///
    /// Triples that are only visible through a component cannot be deleted
    /// here; detach the component instead.
    pub fn delete(&mut self, triple: &Triple) -> GraphResult<bool> {
        if !self.base.remove(triple) {
            return Ok(false);
        }
        self.listeners.dispatch_deleted(triple)?;
        Ok(true)
    }

    /// Attach a component store to the union.
    pub fn attach_component(&mut self, component: Arc<TripleStore>) -> GraphResult<()> {
        if component.dictionary().id() != self.dictionary.id() {
            return Err(GraphError::ForeignDictionary {
                store_id: component.id().get(),
            });
        }
        if self.component(component.id()).is_some() {
            return Err(GraphError::ComponentAlreadyAttached {
                store_id: component.id().get(),
            });
        }
        tracing::debug!(
            graph = self.id.0,
            store = %component.id(),
            triples = component.len(),
            "attaching component"
        );
        self.components.push(component.clone());
        self.listeners.dispatch_attached(&component)
    }

    /// Detach a component store, returning it.
    pub fn detach_component(&mut self, id: StoreId) -> GraphResult<Arc<TripleStore>> {
        let pos = self
            .components
            .iter()
            .position(|c| c.id() == id)
            .ok_or(GraphError::ComponentNotFound { store_id: id.get() })?;
        let component = self.components.remove(pos);
        tracing::debug!(
            graph = self.id.0,
            store = %id,
            triples = component.len(),
            "detaching component"
        );
        self.listeners.dispatch_detached(&component)?;
        Ok(component)
    }

    /// Whether the union contains the triple.
    pub fn contains(&self, triple: &Triple) -> bool {
        self.base.contains(triple) || self.components.iter().any(|c| c.contains(triple))
    }

    /// All distinct triples of the union matching the pattern.
    pub fn find(&self, pattern: &TriplePattern) -> Vec<Triple> {
        let mut found = self.base.find(pattern);
        if self.components.is_empty() {
            return found;
        }
        let mut seen: HashSet<Triple> = found.iter().copied().collect();
        for component in &self.components {
            for triple in component.find(pattern) {
                if seen.insert(triple) {
                    found.push(triple);
                }
            }
        }
        found
    }

    /// Distinct objects of `(subject, predicate, ?)`.
    pub fn objects(&self, subject: NodeId, predicate: NodeId) -> Vec<NodeId> {
        dedup(
            self.find(&TriplePattern::any().with_subject(subject).with_predicate(predicate))
                .into_iter()
                .map(|t| t.object),
        )
    }

    /// Distinct subjects of `(?, predicate, object)`.
    pub fn subjects(&self, predicate: NodeId, object: NodeId) -> Vec<NodeId> {
        dedup(
            self.find(&TriplePattern::any().with_predicate(predicate).with_object(object))
                .into_iter()
                .map(|t| t.subject),
        )
    }

    /// Any one object of `(subject, predicate, ?)`.
    pub fn object(&self, subject: NodeId, predicate: NodeId) -> Option<NodeId> {
        self.objects(subject, predicate).into_iter().next()
    }

    /// Whether `(subject, predicate, object)` is in the union.
    pub fn has(&self, subject: NodeId, predicate: NodeId, object: NodeId) -> bool {
        self.contains(&Triple::new(subject, predicate, object))
    }

    /// Number of distinct triples in the union.
    pub fn len(&self) -> usize {
        if self.components.is_empty() {
            self.base.len()
        } else {
            self.find(&TriplePattern::any()).len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.components.iter().all(|c| c.is_empty())
    }

    /// Register a listener, replacing any existing listener of the same kind.
    pub fn register_listener(&mut self, listener: Arc<dyn GraphListener>) -> Option<Arc<dyn GraphListener>> {
        self.listeners.register(listener)
    }

    /// Remove the listener of the given kind.
    pub fn unregister_listener(&mut self, kind: ListenerKind) -> Option<Arc<dyn GraphListener>> {
        self.listeners.unregister(kind)
    }

    /// The registered listener of the given kind, downcast to `T`.
    pub fn listener<T: GraphListener>(&self, kind: ListenerKind) -> Option<Arc<T>> {
        self.listeners.get_as::<T>(kind)
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }
}

fn dedup(nodes: impl Iterator<Item = NodeId>) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    nodes.filter(|n| seen.insert(*n)).collect()
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("id", &self.id.0)
            .field("base", &self.base.len())
            .field("components", &self.components.len())
            .field("listeners", &self.listeners)
            .finish()
    }
}
