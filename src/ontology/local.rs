//! Restriction of the class-property index to one module.
//!
//! When a model is assembled from several imported modules (the components
//! of a union graph), tooling often only wants the entities the model itself
//! declares. [`LocalFilter`] filters the output of a wrapped index; it adds no
//! derivation logic of its own.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::IndexResult;
use crate::graph::{Graph, TriplePattern};
use crate::term::NodeId;

use super::index::ClassPropertyIndex;

/// Decorator keeping only properties and classes local to the graph's base.
#[derive(Debug, Clone)]
pub struct LocalFilter {
    inner: Arc<ClassPropertyIndex>,
}

impl LocalFilter {
    pub fn new(inner: Arc<ClassPropertyIndex>) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &Arc<ClassPropertyIndex> {
        &self.inner
    }

    /// A property is local if it is builtin or typed in the base store.
    pub fn is_local_property(&self, graph: &Graph, property: NodeId) -> bool {
        self.inner.builtin_properties().contains(&property)
            || !graph
                .base()
                .find(
                    &TriplePattern::any()
                        .with_subject(property)
                        .with_predicate(self.inner.vocabulary().rdf_type),
                )
                .is_empty()
    }

    /// A class is local if it is the top class or described in the base store.
    pub fn is_local_class(&self, graph: &Graph, class: NodeId) -> bool {
        class == self.inner.vocabulary().thing || graph.base().describes(class)
    }

    /// Local properties applicable to `class`.
    pub fn class_properties(&self, graph: &Graph, class: NodeId) -> IndexResult<HashSet<NodeId>> {
        Ok(self
            .inner
            .class_properties(graph, class)?
            .iter()
            .copied()
            .filter(|p| self.is_local_property(graph, *p))
            .collect())
    }

    /// Local class expressions to which `property` is applicable.
    pub fn properties_classes(&self, graph: &Graph, property: NodeId) -> IndexResult<HashSet<NodeId>> {
        Ok(self
            .inner
            .properties_classes(graph, property)?
            .iter()
            .copied()
            .filter(|c| self.is_local_class(graph, *c))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexConfig;
    use crate::graph::io::{load_turtle, load_turtle_into};
    use crate::graph::store::TripleStore;
    use crate::ontology::index::owl_class_index;

    const PREFIXES: &str = r#"
        @prefix ex: <http://ex.com#> .
        @prefix lib: <http://lib.com#> .
        @prefix owl: <http://www.w3.org/2002/07/owl#> .
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
    "#;

    fn modular_graph() -> (Graph, LocalFilter) {
        let mut g = Graph::new();
        let mut imported = TripleStore::named(g.dictionary().clone(), "http://lib.com");
        load_turtle_into(
            &mut imported,
            &format!(
                "{PREFIXES}
                lib:Agent a owl:Class .
                lib:name a owl:DatatypeProperty ; rdfs:domain lib:Agent ."
            ),
        )
        .unwrap();
        g.attach_component(Arc::new(imported)).unwrap();
        load_turtle(
            &mut g,
            &format!(
                "{PREFIXES}
                ex:Person a owl:Class ; rdfs:subClassOf lib:Agent .
                ex:age a owl:DatatypeProperty ; rdfs:domain ex:Person ."
            ),
        )
        .unwrap();
        let index = owl_class_index(&mut g, &IndexConfig::default()).unwrap();
        (g, LocalFilter::new(index))
    }

    fn iri(g: &Graph, iri: &str) -> NodeId {
        g.iri(iri).unwrap()
    }

    #[test]
    fn keeps_local_and_builtin_properties() {
        let (g, local) = modular_graph();
        let person = iri(&g, "http://ex.com#Person");
        let all = local.inner().class_properties(&g, person).unwrap();
        assert!(all.contains(&iri(&g, "http://lib.com#name")));

        let filtered = local.class_properties(&g, person).unwrap();
        assert!(filtered.contains(&iri(&g, "http://ex.com#age")));
        assert!(!filtered.contains(&iri(&g, "http://lib.com#name")));
        for builtin in local.inner().builtin_properties() {
            assert!(filtered.contains(builtin));
        }
    }

    #[test]
    fn keeps_local_classes() {
        let (g, local) = modular_graph();
        let name = iri(&g, "http://lib.com#name");
        let all = local.inner().properties_classes(&g, name).unwrap();
        assert!(all.contains(&iri(&g, "http://lib.com#Agent")));

        let filtered = local.properties_classes(&g, name).unwrap();
        assert!(filtered.contains(&iri(&g, "http://ex.com#Person")));
        assert!(!filtered.contains(&iri(&g, "http://lib.com#Agent")));
    }
}
