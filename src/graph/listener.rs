//! Change notification: listeners attached to a graph.
//!
//! Every mutation of a [`Graph`](super::Graph) is reported synchronously to
//! the listeners registered on it, in registration order, before the mutating
//! call returns. Listeners are kind-tagged: registering a listener whose kind
//! is already present first drops the old instance, so repeated setup calls
//! never leave two copies of the same derived view doing duplicate work.

use std::any::Any;
use std::sync::Arc;

use crate::error::GraphResult;

use super::Triple;
use super::store::TripleStore;

/// Tag identifying a family of listeners. At most one listener per kind is
/// registered on a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerKind(&'static str);

impl ListenerKind {
    pub const fn new(name: &'static str) -> Self {
        ListenerKind(name)
    }

    pub fn name(self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ListenerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Receiver of graph change events.
///
/// Only the per-triple callbacks are required. The bulk component callbacks
/// default to replaying every triple of the component through them.
pub trait GraphListener: Send + Sync + 'static {
    /// The kind tag used for idempotent registration.
    fn kind(&self) -> ListenerKind;

    /// A triple was added to the graph's base store.
    fn triple_added(&self, triple: &Triple) -> GraphResult<()>;

    /// A triple was removed from the graph's base store.
    fn triple_deleted(&self, triple: &Triple) -> GraphResult<()>;

    /// A component store was attached to the union.
    fn component_attached(&self, component: &TripleStore) -> GraphResult<()> {
        for triple in component.iter() {
            self.triple_added(triple)?;
        }
        Ok(())
    }

    /// A component store was detached from the union.
    fn component_detached(&self, component: &TripleStore) -> GraphResult<()> {
        for triple in component.iter() {
            self.triple_deleted(triple)?;
        }
        Ok(())
    }

    /// Upcast for typed retrieval through [`ListenerRegistry::get_as`].
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Ordered collection of kind-tagged listener handles.
#[derive(Default)]
pub struct ListenerRegistry {
    handles: Vec<Arc<dyn GraphListener>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener, replacing any listener of the same kind.
    ///
    /// The new listener goes to the end of the dispatch order. Returns the
    /// replaced instance, if there was one.
    pub fn register(&mut self, listener: Arc<dyn GraphListener>) -> Option<Arc<dyn GraphListener>> {
        let replaced = self.unregister(listener.kind());
        tracing::debug!(
            kind = %listener.kind(),
            replaced = replaced.is_some(),
            "registering graph listener"
        );
        self.handles.push(listener);
        replaced
    }

    /// Remove the listener of the given kind.
    pub fn unregister(&mut self, kind: ListenerKind) -> Option<Arc<dyn GraphListener>> {
        let pos = self.handles.iter().position(|h| h.kind() == kind)?;
        Some(self.handles.remove(pos))
    }

    /// The listener of the given kind, if registered.
    pub fn get(&self, kind: ListenerKind) -> Option<Arc<dyn GraphListener>> {
        self.handles.iter().find(|h| h.kind() == kind).cloned()
    }

    /// The listener of the given kind, downcast to its concrete type.
    pub fn get_as<T: GraphListener>(&self, kind: ListenerKind) -> Option<Arc<T>> {
        self.get(kind)?.as_any().downcast::<T>().ok()
    }

    pub fn contains(&self, kind: ListenerKind) -> bool {
        self.handles.iter().any(|h| h.kind() == kind)
    }

    /// Registered kinds in dispatch order.
    pub fn kinds(&self) -> Vec<ListenerKind> {
        self.handles.iter().map(|h| h.kind()).collect()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub(crate) fn dispatch_added(&self, triple: &Triple) -> GraphResult<()> {
        for handle in &self.handles {
            tracing::trace!(kind = %handle.kind(), %triple, "dispatch triple_added");
            handle.triple_added(triple)?;
        }
        Ok(())
    }

    pub(crate) fn dispatch_deleted(&self, triple: &Triple) -> GraphResult<()> {
        for handle in &self.handles {
            tracing::trace!(kind = %handle.kind(), %triple, "dispatch triple_deleted");
            handle.triple_deleted(triple)?;
        }
        Ok(())
    }

    pub(crate) fn dispatch_attached(&self, component: &TripleStore) -> GraphResult<()> {
        for handle in &self.handles {
            tracing::trace!(kind = %handle.kind(), store = %component.id(), "dispatch component_attached");
            handle.component_attached(component)?;
        }
        Ok(())
    }

    pub(crate) fn dispatch_detached(&self, component: &TripleStore) -> GraphResult<()> {
        for handle in &self.handles {
            tracing::trace!(kind = %handle.kind(), store = %component.id(), "dispatch component_detached");
            handle.component_detached(component)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.kinds()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::dictionary::TermDictionary;
    use crate::term::NodeId;

    const RECORDER: ListenerKind = ListenerKind::new("test.recorder");

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<(&'static str, Triple)>>,
    }

    impl GraphListener for Recorder {
        fn kind(&self) -> ListenerKind {
            RECORDER
        }

        fn triple_added(&self, triple: &Triple) -> GraphResult<()> {
            self.events.lock().unwrap().push(("add", *triple));
            Ok(())
        }

        fn triple_deleted(&self, triple: &Triple) -> GraphResult<()> {
            self.events.lock().unwrap().push(("del", *triple));
            Ok(())
        }

        fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    fn sym(id: u64) -> NodeId {
        NodeId::new(id).unwrap()
    }

    #[test]
    fn register_replaces_same_kind() {
        let mut reg = ListenerRegistry::new();
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());

        assert!(reg.register(first.clone()).is_none());
        assert!(reg.register(second.clone()).is_some());
        assert_eq!(reg.len(), 1);

        reg.dispatch_added(&Triple::new(sym(1), sym(2), sym(3))).unwrap();
        assert!(first.events.lock().unwrap().is_empty());
        assert_eq!(second.events.lock().unwrap().len(), 1);
    }

    #[test]
    fn get_as_downcasts() {
        let mut reg = ListenerRegistry::new();
        reg.register(Arc::new(Recorder::default()));
        assert!(reg.get_as::<Recorder>(RECORDER).is_some());
        assert!(reg.get(ListenerKind::new("other")).is_none());
    }

    #[test]
    fn default_bulk_callbacks_replay_triples() {
        let dict = Arc::new(TermDictionary::new());
        let mut component = TripleStore::new(dict.clone());
        let (a, p, b, c) = (
            dict.iri("http://ex.com#a").unwrap(),
            dict.iri("http://ex.com#p").unwrap(),
            dict.iri("http://ex.com#b").unwrap(),
            dict.iri("http://ex.com#c").unwrap(),
        );
        component.insert(Triple::new(a, p, b));
        component.insert(Triple::new(a, p, c));

        let rec = Arc::new(Recorder::default());
        let mut reg = ListenerRegistry::new();
        reg.register(rec.clone());

        reg.dispatch_attached(&component).unwrap();
        reg.dispatch_detached(&component).unwrap();

        let events = rec.events.lock().unwrap();
        assert_eq!(events.iter().filter(|(k, _)| *k == "add").count(), 2);
        assert_eq!(events.iter().filter(|(k, _)| *k == "del").count(), 2);
    }

    #[test]
    fn unregister_removes_handle() {
        let mut reg = ListenerRegistry::new();
        reg.register(Arc::new(Recorder::default()));
        assert!(reg.unregister(RECORDER).is_some());
        assert!(reg.is_empty());
        assert!(reg.unregister(RECORDER).is_none());
    }
}
