//! Cached class-property index.
//!
//! [`ClassPropertyIndex`] wraps a [`PropertyDerivation`] behind an LRU cache
//! keyed by class expression. It registers itself on the graph as a listener
//! and drops the whole cache on every change event; the next query recomputes
//! lazily. A generation counter guarantees that a value computed while a
//! mutation happened is never stored.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use lru::LruCache;

use crate::config::IndexConfig;
use crate::error::{ConfigError, GraphResult, IndexError, IndexResult, OntoResult};
use crate::graph::listener::{GraphListener, ListenerKind};
use crate::graph::store::TripleStore;
use crate::graph::{Graph, GraphId, Triple};
use crate::term::NodeId;

use super::class_expr;
use super::derive::{OwlDerivation, PropertyDerivation};
use super::vocab::Vocabulary;

/// Listener kind of the class-property index.
pub const CLASS_PROPERTY_INDEX: ListenerKind = ListenerKind::new("ontoindex.class-properties");

/// A shared, immutable set of property (or class) nodes.
pub type NodeSet = Arc<HashSet<NodeId>>;

struct CacheState {
    entries: LruCache<NodeId, NodeSet>,
    /// property → classes, built over all class expressions on demand.
    inverse: Option<Arc<HashMap<NodeId, HashSet<NodeId>>>>,
}

/// Cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
}

/// Listener-backed cache of the class → properties view of one graph.
pub struct ClassPropertyIndex {
    graph_id: GraphId,
    vocab: Vocabulary,
    derivation: Box<dyn PropertyDerivation>,
    state: Mutex<CacheState>,
    generation: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ClassPropertyIndex {
    /// Create an index for `graph` without registering it.
    pub fn new(
        graph: &Graph,
        capacity: NonZeroUsize,
        derivation: Box<dyn PropertyDerivation>,
    ) -> GraphResult<Self> {
        Ok(Self {
            graph_id: graph.id(),
            vocab: Vocabulary::resolve(graph.dictionary())?,
            derivation,
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                inverse: None,
            }),
            generation: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    /// Create an index and register it on `graph`, replacing any index that
    /// was registered before.
    pub fn attach(
        graph: &mut Graph,
        capacity: NonZeroUsize,
        derivation: Box<dyn PropertyDerivation>,
    ) -> GraphResult<Arc<Self>> {
        let index = Arc::new(Self::new(graph, capacity, derivation)?);
        graph.register_listener(index.clone());
        Ok(index)
    }

    fn check(&self, graph: &Graph, node: NodeId) -> IndexResult<()> {
        if graph.id() != self.graph_id {
            return Err(IndexError::ForeignGraph {
                expected: self.graph_id.get(),
                actual: graph.id().get(),
            });
        }
        if !graph.dictionary().contains(node) {
            return Err(IndexError::UnknownNode {
                node_id: node.get(),
            });
        }
        Ok(())
    }

    /// Properties applicable to the class expression `class`.
    pub fn class_properties(&self, graph: &Graph, class: NodeId) -> IndexResult<NodeSet> {
        self.check(graph, class)?;
        let generation = {
            let mut state = self.state.lock().expect("index lock poisoned");
            if let Some(hit) = state.entries.get(&class) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(hit.clone());
            }
            self.generation.load(Ordering::Acquire)
        };
        self.misses.fetch_add(1, Ordering::Relaxed);

        let computed: NodeSet = Arc::new(self.derivation.class_properties(graph, class));

        let mut state = self.state.lock().expect("index lock poisoned");
        if self.generation.load(Ordering::Acquire) == generation {
            state.entries.put(class, computed.clone());
        }
        Ok(computed)
    }

    /// Class expressions to which `property` is applicable.
    pub fn properties_classes(&self, graph: &Graph, property: NodeId) -> IndexResult<NodeSet> {
        self.check(graph, property)?;
        let inverse = self.inverse(graph)?;
        Ok(Arc::new(inverse.get(&property).cloned().unwrap_or_default()))
    }

    fn inverse(&self, graph: &Graph) -> IndexResult<Arc<HashMap<NodeId, HashSet<NodeId>>>> {
        let generation = {
            let state = self.state.lock().expect("index lock poisoned");
            if let Some(inverse) = &state.inverse {
                return Ok(inverse.clone());
            }
            self.generation.load(Ordering::Acquire)
        };

        let mut inverse: HashMap<NodeId, HashSet<NodeId>> = HashMap::new();
        for class in class_expr::class_expressions(graph, &self.vocab) {
            for property in self.class_properties(graph, class)?.iter() {
                inverse.entry(*property).or_default().insert(class);
            }
        }
        let inverse = Arc::new(inverse);

        let mut state = self.state.lock().expect("index lock poisoned");
        if self.generation.load(Ordering::Acquire) == generation {
            state.inverse = Some(inverse.clone());
        }
        Ok(inverse)
    }

    /// The builtin properties of the wrapped derivation.
    pub fn builtin_properties(&self) -> &[NodeId] {
        self.derivation.builtin_properties()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn graph_id(&self) -> GraphId {
        self.graph_id
    }

    /// Drop every cached entry.
    pub fn invalidate(&self) {
        let mut state = self.state.lock().expect("index lock poisoned");
        let dropped = state.entries.len();
        state.entries.clear();
        state.inverse = None;
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        if dropped > 0 {
            tracing::debug!(dropped, generation, "class-property cache invalidated");
        }
    }

    /// Number of invalidations so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> IndexStats {
        let state = self.state.lock().expect("index lock poisoned");
        IndexStats {
            size: state.entries.len(),
            capacity: state.entries.cap().get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.generation(),
        }
    }
}

impl GraphListener for ClassPropertyIndex {
    fn kind(&self) -> ListenerKind {
        CLASS_PROPERTY_INDEX
    }

    fn triple_added(&self, _triple: &Triple) -> GraphResult<()> {
        self.invalidate();
        Ok(())
    }

    fn triple_deleted(&self, _triple: &Triple) -> GraphResult<()> {
        self.invalidate();
        Ok(())
    }

    fn component_attached(&self, _component: &TripleStore) -> GraphResult<()> {
        self.invalidate();
        Ok(())
    }

    fn component_detached(&self, _component: &TripleStore) -> GraphResult<()> {
        self.invalidate();
        Ok(())
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl std::fmt::Debug for ClassPropertyIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassPropertyIndex")
            .field("graph", &self.graph_id.get())
            .field("stats", &self.stats())
            .finish()
    }
}

/// The index registered on `graph`, creating and registering one built by
/// `factory` if none exists yet.
pub fn get_or_create_cached_index<F>(
    graph: &mut Graph,
    config: &IndexConfig,
    factory: F,
) -> OntoResult<Arc<ClassPropertyIndex>>
where
    F: FnOnce(&Graph) -> GraphResult<Box<dyn PropertyDerivation>>,
{
    if let Some(existing) = graph.listener::<ClassPropertyIndex>(CLASS_PROPERTY_INDEX) {
        return Ok(existing);
    }
    config.validate()?;
    let capacity = NonZeroUsize::new(config.cache_capacity).ok_or_else(|| ConfigError::Invalid {
        message: "index.cache_capacity must be > 0".into(),
    })?;
    let derivation = factory(graph)?;
    Ok(ClassPropertyIndex::attach(graph, capacity, derivation)?)
}

/// [`get_or_create_cached_index`] with the OWL-structural derivation.
pub fn owl_class_index(graph: &mut Graph, config: &IndexConfig) -> OntoResult<Arc<ClassPropertyIndex>> {
    get_or_create_cached_index(graph, config, |g| {
        Ok(Box::new(OwlDerivation::new(g, config)?) as Box<dyn PropertyDerivation>)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::io::load_turtle;
    use crate::term::Term;

    const PREFIXES: &str = r#"
        @prefix ex: <http://ex.com#> .
        @prefix owl: <http://www.w3.org/2002/07/owl#> .
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
    "#;

    fn setup(body: &str) -> (Graph, Arc<ClassPropertyIndex>) {
        let mut g = Graph::new();
        load_turtle(&mut g, &format!("{PREFIXES}{body}")).unwrap();
        let index = owl_class_index(&mut g, &IndexConfig::default()).unwrap();
        (g, index)
    }

    fn ex(g: &Graph, local: &str) -> NodeId {
        g.iri(&format!("http://ex.com#{local}")).unwrap()
    }

    #[test]
    fn second_query_hits_cache() {
        let (g, index) = setup("ex:p rdfs:domain ex:C .");
        let c = ex(&g, "C");
        let first = index.class_properties(&g, c).unwrap();
        let second = index.class_properties(&g, c).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        let stats = index.stats();
        assert_eq!((stats.hits, stats.misses, stats.size), (1, 1, 1));
    }

    #[test]
    fn mutation_invalidates_whole_cache() {
        let (mut g, index) = setup("ex:p rdfs:domain ex:C .");
        let c = ex(&g, "C");
        let d = ex(&g, "D");
        index.class_properties(&g, c).unwrap();
        index.class_properties(&g, d).unwrap();
        assert_eq!(index.stats().size, 2);

        let q = g
            .add_terms(
                Term::iri("http://ex.com#q"),
                Term::iri("http://www.w3.org/2000/01/rdf-schema#domain"),
                Term::iri("http://ex.com#C"),
            )
            .unwrap();
        assert_eq!(index.stats().size, 0);
        assert!(index.class_properties(&g, c).unwrap().contains(&q.subject));

        g.delete(&q).unwrap();
        assert!(!index.class_properties(&g, c).unwrap().contains(&q.subject));
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let (mut g, index) = setup("");
        let again = owl_class_index(&mut g, &IndexConfig::default()).unwrap();
        assert!(Arc::ptr_eq(&index, &again));
        assert_eq!(g.listeners().len(), 1);
    }

    #[test]
    fn attach_replaces_previous_index() {
        let (mut g, first) = setup("");
        let derivation = OwlDerivation::new(&g, &IndexConfig::default()).unwrap();
        let second =
            ClassPropertyIndex::attach(&mut g, NonZeroUsize::new(8).unwrap(), Box::new(derivation)).unwrap();
        assert_eq!(g.listeners().len(), 1);

        let thing = g.iri("http://www.w3.org/2002/07/owl#Thing").unwrap();
        first.class_properties(&g, thing).unwrap();
        g.add_terms(
            Term::iri("http://ex.com#a"),
            Term::iri("http://ex.com#b"),
            Term::iri("http://ex.com#c"),
        )
        .unwrap();
        assert_eq!(first.generation(), 0);
        assert_eq!(second.generation(), 1);
    }

    #[test]
    fn lru_evicts_beyond_capacity() {
        let mut g = Graph::new();
        let config = IndexConfig {
            cache_capacity: 2,
            ..IndexConfig::default()
        };
        let index = owl_class_index(&mut g, &config).unwrap();
        for local in ["A", "B", "C"] {
            let class = ex(&g, local);
            index.class_properties(&g, class).unwrap();
        }
        let stats = index.stats();
        assert_eq!((stats.size, stats.capacity), (2, 2));
    }

    #[test]
    fn properties_classes_inverts_the_index() {
        let (g, index) = setup(
            "ex:C1 rdfs:subClassOf ex:C2 .
             ex:p rdfs:domain ex:C2 .
             ex:Other a owl:Class .",
        );
        let classes = index.properties_classes(&g, ex(&g, "p")).unwrap();
        assert!(classes.contains(&ex(&g, "C1")));
        assert!(classes.contains(&ex(&g, "C2")));
        assert!(!classes.contains(&ex(&g, "Other")));

        let label = g.iri("http://www.w3.org/2000/01/rdf-schema#label").unwrap();
        let labelled = index.properties_classes(&g, label).unwrap();
        assert!(labelled.contains(&ex(&g, "Other")));
    }

    #[test]
    fn rejects_foreign_graph_and_unknown_nodes() {
        let (g, index) = setup("");
        let other = Graph::new();
        let thing = other.iri("http://www.w3.org/2002/07/owl#Thing").unwrap();
        assert!(matches!(
            index.class_properties(&other, thing),
            Err(IndexError::ForeignGraph { .. })
        ));
        assert!(matches!(
            index.class_properties(&g, NodeId::new(1_000_000).unwrap()),
            Err(IndexError::UnknownNode { .. })
        ));
    }

    #[test]
    fn zero_capacity_config_is_rejected() {
        let mut g = Graph::new();
        let config = IndexConfig {
            cache_capacity: 0,
            ..IndexConfig::default()
        };
        assert!(owl_class_index(&mut g, &config).is_err());
    }
}
