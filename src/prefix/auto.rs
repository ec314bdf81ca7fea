//! Reference-counted automatic prefix maintenance.
//!
//! [`AutoPrefix`] listens to a graph and keeps its live [`PrefixMapping`]
//! covering exactly the namespaces in use. Every distinct node of a triple
//! whose term has a namespace holds one reference on that namespace. The
//! first reference binds a prefix, the last one released removes it again.
//!
//! Occurrences are counted per store: a triple held by both the base store
//! and an attached component holds its references twice, once for each
//! store event that reported it. Detaching the component releases only its
//! share.
//!
//! External code may rename a binding in the live mapping at any time. The
//! listener remembers the prefix it created, and when the count drops to
//! zero it only removes that binding if it is still in place.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::dictionary::TermDictionary;
use crate::error::GraphResult;
use crate::graph::listener::{GraphListener, ListenerKind};
use crate::graph::store::TripleStore;
use crate::graph::{Graph, Triple};
use crate::term::NodeId;

use super::library::PrefixLibrary;
use super::mapping::PrefixMapping;

/// Listener kind of the auto-prefix registry.
pub const AUTO_PREFIX: ListenerKind = ListenerKind::new("ontoindex.auto-prefix");

#[derive(Debug)]
struct Entry {
    prefix: String,
    count: usize,
    /// False when the namespace was already bound before the first reference,
    /// in which case the binding belongs to someone else.
    owned: bool,
}

#[derive(Debug, Default)]
struct RegistryState {
    library: PrefixLibrary,
    entries: HashMap<String, Entry>,
}

/// Graph listener maintaining namespace → prefix bindings by reference count.
pub struct AutoPrefix {
    dictionary: Arc<TermDictionary>,
    mapping: Arc<PrefixMapping>,
    state: Mutex<RegistryState>,
}

impl AutoPrefix {
    /// A registry over `graph`'s dictionary and live prefix mapping.
    ///
    /// Counts start at zero; use [`attach_auto_prefix`] to seed them from the
    /// graph's current content and register the listener.
    pub fn new(graph: &Graph, library: PrefixLibrary) -> Self {
        Self {
            dictionary: graph.dictionary().clone(),
            mapping: graph.prefixes().clone(),
            state: Mutex::new(RegistryState {
                library,
                entries: HashMap::new(),
            }),
        }
    }

    /// The prefix currently bound to `namespace` in the live mapping.
    pub fn prefix_for(&self, namespace: &str) -> Option<String> {
        self.mapping.prefix_for(namespace)
    }

    /// Number of node occurrences currently referencing `namespace`.
    pub fn reference_count(&self, namespace: &str) -> usize {
        let state = self.state.lock().expect("prefix registry lock poisoned");
        state.entries.get(namespace).map_or(0, |e| e.count)
    }

    /// Namespaces with a positive reference count.
    pub fn namespaces(&self) -> Vec<String> {
        let state = self.state.lock().expect("prefix registry lock poisoned");
        let mut namespaces: Vec<_> = state.entries.keys().cloned().collect();
        namespaces.sort();
        namespaces
    }

    /// Add preferred bindings. Only namespaces bound after this call use them.
    pub fn extend_library(&self, bindings: impl IntoIterator<Item = (String, String)>) {
        let mut state = self.state.lock().expect("prefix registry lock poisoned");
        state.library.extend(bindings);
    }

    pub fn mapping(&self) -> &Arc<PrefixMapping> {
        &self.mapping
    }

    fn namespaces_of(&self, triple: &Triple) -> Vec<String> {
        triple
            .distinct_nodes()
            .into_iter()
            .filter_map(|node: NodeId| self.dictionary.namespace_of(node))
            .collect()
    }

    /// Library prefix, else derived, made unique against the live mapping
    /// and against the prefixes this registry has handed out.
    fn choose_prefix(&self, state: &RegistryState, namespace: &str) -> String {
        let base = state.library.candidate(namespace);
        let taken = |candidate: &str| {
            self.mapping
                .namespace_for(candidate)
                .is_some_and(|bound| bound != namespace)
                || state
                    .entries
                    .iter()
                    .any(|(ns, e)| e.prefix == candidate && ns != namespace)
        };
        if !taken(&base) {
            return base;
        }
        let mut suffix = 1u64;
        loop {
            let candidate = format!("{base}{suffix}");
            if !taken(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    fn acquire(&self, state: &mut RegistryState, namespace: String) {
        if let Some(entry) = state.entries.get_mut(&namespace) {
            entry.count += 1;
            return;
        }
        let entry = match self.mapping.prefix_for(&namespace) {
            Some(existing) => Entry {
                prefix: existing,
                count: 1,
                owned: false,
            },
            None => {
                let prefix = self.choose_prefix(state, &namespace);
                // Still counted when unbound, so releases stay balanced.
                let owned = match self.mapping.set_prefix(&prefix, &namespace) {
                    Ok(()) => {
                        tracing::debug!(%prefix, %namespace, "bound prefix");
                        true
                    }
                    Err(error) => {
                        tracing::warn!(%prefix, %namespace, %error, "could not bind prefix");
                        false
                    }
                };
                Entry {
                    prefix,
                    count: 1,
                    owned,
                }
            }
        };
        state.entries.insert(namespace, entry);
    }

    fn release(&self, state: &mut RegistryState, namespace: &str) {
        let Some(entry) = state.entries.get_mut(namespace) else {
            tracing::trace!(%namespace, "release of an uncounted namespace");
            return;
        };
        entry.count -= 1;
        if entry.count > 0 {
            return;
        }
        let Some(entry) = state.entries.remove(namespace) else {
            return;
        };
        if entry.owned {
            let removed = self.mapping.remove_if_bound(&entry.prefix, namespace);
            tracing::debug!(prefix = %entry.prefix, %namespace, removed, "released prefix");
        }
    }

    fn add_all<'a>(&self, triples: impl IntoIterator<Item = &'a Triple>) {
        let mut state = self.state.lock().expect("prefix registry lock poisoned");
        for triple in triples {
            for namespace in self.namespaces_of(triple) {
                self.acquire(&mut state, namespace);
            }
        }
    }

    fn delete_all<'a>(&self, triples: impl IntoIterator<Item = &'a Triple>) {
        let mut state = self.state.lock().expect("prefix registry lock poisoned");
        for triple in triples {
            for namespace in self.namespaces_of(triple) {
                self.release(&mut state, &namespace);
            }
        }
    }

    /// Drop every binding this registry created and reset all counts.
    fn clear(&self) {
        let mut state = self.state.lock().expect("prefix registry lock poisoned");
        for (namespace, entry) in state.entries.drain() {
            if entry.owned {
                self.mapping.remove_if_bound(&entry.prefix, &namespace);
            }
        }
    }
}

impl GraphListener for AutoPrefix {
    fn kind(&self) -> ListenerKind {
        AUTO_PREFIX
    }

    fn triple_added(&self, triple: &Triple) -> GraphResult<()> {
        self.add_all(std::iter::once(triple));
        Ok(())
    }

    fn triple_deleted(&self, triple: &Triple) -> GraphResult<()> {
        self.delete_all(std::iter::once(triple));
        Ok(())
    }

    fn component_attached(&self, component: &TripleStore) -> GraphResult<()> {
        self.add_all(component.iter());
        Ok(())
    }

    fn component_detached(&self, component: &TripleStore) -> GraphResult<()> {
        self.delete_all(component.iter());
        Ok(())
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl std::fmt::Debug for AutoPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoPrefix")
            .field("namespaces", &self.namespaces().len())
            .field("mapping", &self.mapping.len())
            .finish()
    }
}

/// Register an [`AutoPrefix`] on `graph`, seeded from its current content.
///
/// Calling this again replaces the previous registry: its bindings are
/// released first, then the new one recounts the graph from scratch, so the
/// graph never carries two registries.
pub fn attach_auto_prefix(graph: &mut Graph, library: PrefixLibrary) -> Arc<AutoPrefix> {
    if let Some(previous) = graph.listener::<AutoPrefix>(AUTO_PREFIX) {
        previous.clear();
    }
    let registry = Arc::new(AutoPrefix::new(graph, library));
    registry.add_all(graph.base().iter());
    for component in graph.components() {
        registry.add_all(component.iter());
    }
    graph.register_listener(registry.clone());
    registry
}
