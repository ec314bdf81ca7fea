//! Structural view of class expressions and properties.
//!
//! A class expression node is classified once into a closed [`ClassExpr`]
//! variant and handled by pattern matching. RDF collections (`rdf:first` /
//! `rdf:rest` chains) are read with a visited guard, so a malformed cyclic
//! list yields its distinct members instead of looping.

use std::collections::HashSet;

use crate::graph::{Graph, TriplePattern};
use crate::term::NodeId;

use super::vocab::Vocabulary;

/// A classified class expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassExpr {
    /// The top class (`owl:Thing`).
    Top,
    /// A named (IRI) class.
    Named(NodeId),
    /// An anonymous node with no recognised class constructor.
    Anonymous(NodeId),
    /// `owl:intersectionOf` over the listed class expressions.
    Intersection { node: NodeId, members: Vec<NodeId> },
    /// `owl:unionOf` over the listed class expressions.
    Union { node: NodeId, members: Vec<NodeId> },
    /// A restriction on a single property, optionally qualified by a class
    /// or data range. `property` is `None` when the restriction has lost its
    /// `owl:onProperty` statement.
    Restriction {
        node: NodeId,
        property: Option<NodeId>,
        qualifier: Option<NodeId>,
    },
    /// An n-ary restriction on an ordered list of properties.
    PropertySetRestriction { node: NodeId, properties: Vec<NodeId> },
}

impl ClassExpr {
    /// Classify `node` against the current graph content.
    pub fn classify(graph: &Graph, vocab: &Vocabulary, node: NodeId) -> Self {
        if node == vocab.thing {
            return ClassExpr::Top;
        }
        if let Some(head) = graph.object(node, vocab.intersection_of) {
            return ClassExpr::Intersection {
                node,
                members: read_list(graph, vocab, head),
            };
        }
        if let Some(head) = graph.object(node, vocab.union_of) {
            return ClassExpr::Union {
                node,
                members: read_list(graph, vocab, head),
            };
        }
        if let Some(head) = graph.object(node, vocab.on_properties) {
            return ClassExpr::PropertySetRestriction {
                node,
                properties: read_list(graph, vocab, head),
            };
        }
        let property = graph.object(node, vocab.on_property);
        let qualifier = [
            vocab.on_class,
            vocab.on_data_range,
            vocab.some_values_from,
            vocab.all_values_from,
        ]
        .into_iter()
        .find_map(|p| graph.object(node, p));
        if property.is_some()
            || qualifier.is_some()
            || graph.has(node, vocab.rdf_type, vocab.restriction)
        {
            return ClassExpr::Restriction {
                node,
                property,
                qualifier,
            };
        }
        if graph.dictionary().is_iri(node) {
            ClassExpr::Named(node)
        } else {
            ClassExpr::Anonymous(node)
        }
    }

    /// The graph node this expression was classified from.
    pub fn node(&self, vocab: &Vocabulary) -> NodeId {
        match self {
            ClassExpr::Top => vocab.thing,
            ClassExpr::Named(node) | ClassExpr::Anonymous(node) => *node,
            ClassExpr::Intersection { node, .. }
            | ClassExpr::Union { node, .. }
            | ClassExpr::Restriction { node, .. }
            | ClassExpr::PropertySetRestriction { node, .. } => *node,
        }
    }

    pub fn is_restriction(&self) -> bool {
        matches!(
            self,
            ClassExpr::Restriction { .. } | ClassExpr::PropertySetRestriction { .. }
        )
    }

    pub fn is_intersection(&self) -> bool {
        matches!(self, ClassExpr::Intersection { .. })
    }

    /// Named classes and the top class are non-anonymous.
    pub fn is_named(&self) -> bool {
        matches!(self, ClassExpr::Top | ClassExpr::Named(_))
    }
}

/// Read an RDF collection starting at `head`.
///
/// Stops at `rdf:nil`, at a cell without `rdf:rest`, or at a cell already
/// visited. Cells without `rdf:first` contribute nothing.
pub fn read_list(graph: &Graph, vocab: &Vocabulary, head: NodeId) -> Vec<NodeId> {
    let mut members = Vec::new();
    let mut visited = HashSet::new();
    let mut cell = head;
    while cell != vocab.nil && visited.insert(cell) {
        if let Some(first) = graph.object(cell, vocab.first) {
            members.push(first);
        }
        match graph.object(cell, vocab.rest) {
            Some(next) => cell = next,
            None => break,
        }
    }
    members
}

/// Heads of every RDF collection that lists `member`.
///
/// Walks `rdf:rest` links backwards from each cell holding `member` until a
/// cell with no predecessor is reached.
pub fn list_heads_containing(graph: &Graph, vocab: &Vocabulary, member: NodeId) -> Vec<NodeId> {
    let mut heads = Vec::new();
    for cell in graph.subjects(vocab.first, member) {
        let mut visited = HashSet::new();
        let mut frontier = vec![cell];
        while let Some(current) = frontier.pop() {
            if !visited.insert(current) {
                continue;
            }
            let predecessors = graph.subjects(vocab.rest, current);
            if predecessors.is_empty() {
                if !heads.contains(&current) {
                    heads.push(current);
                }
            } else {
                frontier.extend(predecessors);
            }
        }
    }
    heads
}

/// The declared nature of a property node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Object,
    Data,
    Annotation,
}

impl PropertyKind {
    /// The declared kind of `property`, if it is typed as one.
    pub fn of(graph: &Graph, vocab: &Vocabulary, property: NodeId) -> Option<Self> {
        let types = graph.objects(property, vocab.rdf_type);
        if types.contains(&vocab.object_property) {
            Some(PropertyKind::Object)
        } else if types.contains(&vocab.datatype_property) {
            Some(PropertyKind::Data)
        } else if types.contains(&vocab.annotation_property) {
            Some(PropertyKind::Annotation)
        } else {
            None
        }
    }
}

/// Declared `rdfs:domain` class expressions of a property.
pub fn domains(graph: &Graph, vocab: &Vocabulary, property: NodeId) -> Vec<NodeId> {
    graph.objects(property, vocab.domain)
}

/// Declared `rdfs:range` class or datatype expressions of a property.
pub fn ranges(graph: &Graph, vocab: &Vocabulary, property: NodeId) -> Vec<NodeId> {
    graph.objects(property, vocab.range)
}

/// Direct `rdfs:subPropertyOf` parents of a property.
pub fn super_properties(graph: &Graph, vocab: &Vocabulary, property: NodeId) -> Vec<NodeId> {
    graph.objects(property, vocab.sub_property_of)
}

/// The property chain declared for `property`, if any.
pub fn property_chain(graph: &Graph, vocab: &Vocabulary, property: NodeId) -> Option<Vec<NodeId>> {
    graph
        .object(property, vocab.property_chain_axiom)
        .map(|head| read_list(graph, vocab, head))
}

/// Every `(property, chain)` declaration in the graph.
pub fn property_chains(graph: &Graph, vocab: &Vocabulary) -> Vec<(NodeId, Vec<NodeId>)> {
    graph
        .find(&TriplePattern::any().with_predicate(vocab.property_chain_axiom))
        .into_iter()
        .map(|t| (t.subject, read_list(graph, vocab, t.object)))
        .collect()
}

/// Every node the graph uses as a class expression.
///
/// Covers typed classes and restrictions, both ends of `rdfs:subClassOf` and
/// `owl:equivalentClass`, property domains, union and intersection members
/// and the top class.
pub fn class_expressions(graph: &Graph, vocab: &Vocabulary) -> HashSet<NodeId> {
    let mut classes = HashSet::from([vocab.thing]);
    for class_type in [vocab.owl_class, vocab.rdfs_class, vocab.restriction] {
        classes.extend(graph.subjects(vocab.rdf_type, class_type));
    }
    for relation in [vocab.sub_class_of, vocab.equivalent_class] {
        for t in graph.find(&TriplePattern::any().with_predicate(relation)) {
            classes.insert(t.subject);
            classes.insert(t.object);
        }
    }
    for t in graph.find(&TriplePattern::any().with_predicate(vocab.domain)) {
        classes.insert(t.object);
    }
    for constructor in [vocab.union_of, vocab.intersection_of] {
        for t in graph.find(&TriplePattern::any().with_predicate(constructor)) {
            classes.insert(t.subject);
            classes.extend(read_list(graph, vocab, t.object));
        }
    }
    for relation in [vocab.on_property, vocab.on_properties] {
        classes.extend(
            graph
                .find(&TriplePattern::any().with_predicate(relation))
                .into_iter()
                .map(|t| t.subject),
        );
    }
    classes
}
