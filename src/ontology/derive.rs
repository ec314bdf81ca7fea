//! Class → applicable-properties derivation.
//!
//! For a class expression `C` the applicable properties are:
//!
//! 1. the *direct* ones: properties whose `rdfs:domain` is `C`, the property
//!    of a restriction, the properties of an n-ary restriction
//! 2. properties promoted from the direct set: a property whose
//!    `owl:propertyChainAxiom` starts with a direct property (object
//!    properties only, chains on datatype or annotation properties are
//!    ignored), and (optionally)
//!    sub-properties of a direct property
//! 3. everything applicable to a *related* expression: superclasses, the top
//!    class for named classes, equivalent intersections, restriction members
//!    of an intersection, and every union that lists `C`
//!
//! The walk keeps a visited set per call, so subclass or equivalence cycles
//! terminate. The top class always yields the builtin properties and ends the
//! walk on that branch.

use std::collections::HashSet;

use crate::config::IndexConfig;
use crate::error::GraphResult;
use crate::graph::Graph;
use crate::term::NodeId;

use super::class_expr::{self, ClassExpr, PropertyKind};
use super::vocab::Vocabulary;

/// Computes the properties applicable to a class expression.
///
/// Implementations must be pure with respect to the graph: same graph
/// content, same answer.
pub trait PropertyDerivation: Send + Sync {
    fn class_properties(&self, graph: &Graph, class: NodeId) -> HashSet<NodeId>;

    /// The builtin properties every class carries through the top class.
    fn builtin_properties(&self) -> &[NodeId];
}

/// OWL-structural derivation over a graph's vocabulary.
#[derive(Debug, Clone)]
pub struct OwlDerivation {
    vocab: Vocabulary,
    builtins: Vec<NodeId>,
    follow_sub_properties: bool,
}

impl OwlDerivation {
    /// Build a derivation for `graph`, interning the vocabulary and the
    /// configured builtin properties.
    pub fn new(graph: &Graph, config: &IndexConfig) -> GraphResult<Self> {
        let dictionary = graph.dictionary();
        let vocab = Vocabulary::resolve(dictionary)?;
        let builtins = config
            .builtin_properties
            .iter()
            .map(|iri| dictionary.iri(iri))
            .collect::<GraphResult<Vec<_>>>()?;
        Ok(Self {
            vocab,
            builtins,
            follow_sub_properties: config.follow_sub_properties,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    fn direct(&self, graph: &Graph, class: NodeId, expr: &ClassExpr) -> HashSet<NodeId> {
        let mut direct: HashSet<NodeId> = graph.subjects(self.vocab.domain, class).into_iter().collect();
        match expr {
            ClassExpr::Restriction {
                property: Some(p), ..
            } => {
                direct.insert(*p);
            }
            ClassExpr::Restriction { property: None, .. } => {
                tracing::warn!(
                    restriction = %graph.dictionary().display(class),
                    "restriction has no owl:onProperty, skipping its property"
                );
            }
            ClassExpr::PropertySetRestriction { properties, .. } => {
                direct.extend(properties.iter().copied());
            }
            _ => {}
        }
        direct
    }

    fn promoted(&self, graph: &Graph, direct: &HashSet<NodeId>) -> HashSet<NodeId> {
        let mut promoted = HashSet::new();
        if direct.is_empty() {
            return promoted;
        }
        for (property, chain) in class_expr::property_chains(graph, &self.vocab) {
            if !chain.first().is_some_and(|head| direct.contains(head)) {
                continue;
            }
            match PropertyKind::of(graph, &self.vocab, property) {
                Some(PropertyKind::Data | PropertyKind::Annotation) => {
                    tracing::debug!(
                        property = %graph.dictionary().display(property),
                        "ignoring property chain on a non-object property"
                    );
                }
                _ => {
                    promoted.insert(property);
                }
            }
        }
        if self.follow_sub_properties {
            let mut frontier: Vec<NodeId> = direct.iter().copied().collect();
            while let Some(parent) = frontier.pop() {
                for child in graph.subjects(self.vocab.sub_property_of, parent) {
                    if !direct.contains(&child) && promoted.insert(child) {
                        frontier.push(child);
                    }
                }
            }
        }
        promoted
    }

    fn related(&self, graph: &Graph, class: NodeId, expr: &ClassExpr) -> Vec<NodeId> {
        let v = &self.vocab;
        let mut related = graph.objects(class, v.sub_class_of);
        if matches!(expr, ClassExpr::Named(_)) {
            related.push(v.thing);
        }

        let mut equivalents = graph.objects(class, v.equivalent_class);
        equivalents.extend(graph.subjects(v.equivalent_class, class));
        related.extend(
            equivalents
                .into_iter()
                .filter(|e| ClassExpr::classify(graph, v, *e).is_intersection()),
        );

        if let ClassExpr::Intersection { members, .. } = expr {
            related.extend(
                members
                    .iter()
                    .copied()
                    .filter(|m| ClassExpr::classify(graph, v, *m).is_restriction()),
            );
        }

        for head in class_expr::list_heads_containing(graph, v, class) {
            related.extend(graph.subjects(v.union_of, head));
        }

        related.retain(|r| *r != class);
        related
    }
}

impl PropertyDerivation for OwlDerivation {
    fn class_properties(&self, graph: &Graph, class: NodeId) -> HashSet<NodeId> {
        let mut result = HashSet::new();
        let mut visited = HashSet::new();
        let mut pending = vec![class];

        while let Some(current) = pending.pop() {
            if !visited.insert(current) {
                continue;
            }
            let expr = ClassExpr::classify(graph, &self.vocab, current);
            if expr == ClassExpr::Top {
                result.extend(self.builtins.iter().copied());
                continue;
            }
            let direct = self.direct(graph, current, &expr);
            result.extend(self.promoted(graph, &direct));
            result.extend(direct);
            pending.extend(
                self.related(graph, current, &expr)
                    .into_iter()
                    .filter(|r| !visited.contains(r)),
            );
        }
        result
    }

    fn builtin_properties(&self) -> &[NodeId] {
        &self.builtins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::io::load_turtle;

    const PREFIXES: &str = r#"
        @prefix ex: <http://ex.com#> .
        @prefix owl: <http://www.w3.org/2002/07/owl#> .
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
    "#;

    fn setup(body: &str) -> (Graph, OwlDerivation) {
        let mut g = Graph::new();
        load_turtle(&mut g, &format!("{PREFIXES}{body}")).unwrap();
        let d = OwlDerivation::new(&g, &IndexConfig::default()).unwrap();
        (g, d)
    }

    fn ex(g: &Graph, local: &str) -> NodeId {
        g.iri(&format!("http://ex.com#{local}")).unwrap()
    }

    fn with_builtins(d: &OwlDerivation, props: &[NodeId]) -> HashSet<NodeId> {
        props
            .iter()
            .chain(d.builtin_properties())
            .copied()
            .collect()
    }

    #[test]
    fn top_class_yields_builtins() {
        let (g, d) = setup("");
        let thing = d.vocabulary().thing;
        assert_eq!(d.class_properties(&g, thing), with_builtins(&d, &[]));
    }

    #[test]
    fn inherits_through_subclass_chain() {
        let (g, d) = setup(
            "ex:C1 rdfs:subClassOf ex:C2 .
             ex:C2 rdfs:subClassOf owl:Thing .
             ex:p rdfs:domain ex:C2 .",
        );
        let c1 = ex(&g, "C1");
        let p = ex(&g, "p");
        assert_eq!(d.class_properties(&g, c1), with_builtins(&d, &[p]));
    }

    #[test]
    fn subclass_cycles_terminate() {
        let (g, d) = setup(
            "ex:A rdfs:subClassOf ex:B .
             ex:B rdfs:subClassOf ex:C .
             ex:C rdfs:subClassOf ex:A .
             ex:C owl:equivalentClass ex:A .
             ex:pa rdfs:domain ex:A .
             ex:pc rdfs:domain ex:C .",
        );
        let props = d.class_properties(&g, ex(&g, "B"));
        assert_eq!(props, with_builtins(&d, &[ex(&g, "pa"), ex(&g, "pc")]));
    }

    #[test]
    fn union_members_inherit_union_properties() {
        let (g, d) = setup(
            "ex:U owl:unionOf (ex:A ex:B) .
             ex:q rdfs:domain ex:U .",
        );
        let q = ex(&g, "q");
        assert!(d.class_properties(&g, ex(&g, "A")).contains(&q));
        assert!(d.class_properties(&g, ex(&g, "B")).contains(&q));
    }

    #[test]
    fn equivalent_intersection_contributes_restrictions() {
        let (g, d) = setup(
            "ex:Parent owl:equivalentClass [
                 owl:intersectionOf ( ex:Person [ owl:onProperty ex:hasChild ; owl:someValuesFrom ex:Person ] )
             ] .
             ex:name rdfs:domain ex:Person .",
        );
        let props = d.class_properties(&g, ex(&g, "Parent"));
        assert!(props.contains(&ex(&g, "hasChild")));
        // Person is a plain member of the intersection, not a restriction.
        assert!(!props.contains(&ex(&g, "name")));
    }

    #[test]
    fn property_set_restriction_contributes_all_properties() {
        let (g, d) = setup("ex:K owl:onProperties (ex:p1 ex:p2) .");
        let props = d.class_properties(&g, ex(&g, "K"));
        assert!(props.contains(&ex(&g, "p1")));
        assert!(props.contains(&ex(&g, "p2")));
    }

    #[test]
    fn chain_heads_promote_the_chain_property() {
        let (g, d) = setup(
            "ex:hasParent rdfs:domain ex:Person .
             ex:hasGrandparent a owl:ObjectProperty ;
                 owl:propertyChainAxiom (ex:hasParent ex:hasParent) .
             ex:hasUncle owl:propertyChainAxiom (ex:hasSibling ex:hasParent) .",
        );
        let props = d.class_properties(&g, ex(&g, "Person"));
        assert!(props.contains(&ex(&g, "hasGrandparent")));
        assert!(!props.contains(&ex(&g, "hasUncle")));
    }

    #[test]
    fn chains_on_datatype_properties_are_not_promoted() {
        let (g, d) = setup(
            "ex:hasParent rdfs:domain ex:Person .
             ex:parentName a owl:DatatypeProperty ;
                 owl:propertyChainAxiom (ex:hasParent ex:name) .",
        );
        let props = d.class_properties(&g, ex(&g, "Person"));
        assert!(props.contains(&ex(&g, "hasParent")));
        assert!(!props.contains(&ex(&g, "parentName")));
    }

    #[test]
    fn sub_properties_follow_their_parent_domain() {
        let body = "ex:knows rdfs:domain ex:Person .
                    ex:friendOf rdfs:subPropertyOf ex:knows .
                    ex:bestFriendOf rdfs:subPropertyOf ex:friendOf .";
        let (g, d) = setup(body);
        let props = d.class_properties(&g, ex(&g, "Person"));
        assert!(props.contains(&ex(&g, "friendOf")));
        assert!(props.contains(&ex(&g, "bestFriendOf")));

        let config = IndexConfig {
            follow_sub_properties: false,
            ..IndexConfig::default()
        };
        let strict = OwlDerivation::new(&g, &config).unwrap();
        assert!(!strict.class_properties(&g, ex(&g, "Person")).contains(&ex(&g, "friendOf")));
    }

    #[test]
    fn malformed_restriction_is_skipped() {
        let (g, d) = setup(
            "ex:R a owl:Restriction ; owl:someValuesFrom ex:A .
             ex:C rdfs:subClassOf ex:R .
             ex:p rdfs:domain ex:C .",
        );
        let props = d.class_properties(&g, ex(&g, "C"));
        assert_eq!(props, with_builtins(&d, &[ex(&g, "p")]));
    }

    #[test]
    fn anonymous_superclass_does_not_add_top_twice() {
        let (g, d) = setup(
            "ex:C rdfs:subClassOf [ owl:onProperty ex:r ; owl:allValuesFrom ex:D ] .",
        );
        let props = d.class_properties(&g, ex(&g, "C"));
        assert_eq!(props, with_builtins(&d, &[ex(&g, "r")]));
    }
}
