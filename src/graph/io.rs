//! Turtle input via oxigraph's parser.
//!
//! Only in-memory text is handled here; reading files is the caller's job.

use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::Term as OxTerm;

use crate::error::{GraphError, GraphResult};
use crate::term::Term;

use super::Graph;
use super::store::TripleStore;

fn convert(term: OxTerm) -> Option<Term> {
    match term {
        OxTerm::NamedNode(node) => Some(Term::Iri(node.into_string())),
        OxTerm::BlankNode(node) => Some(Term::Blank(node.into_string())),
        OxTerm::Literal(lit) => Some(
            Term::Literal {
                lexical: lit.value().to_owned(),
                datatype: Some(lit.datatype().as_str().to_owned()),
                language: lit.language().map(str::to_owned),
            }
            .canonical(),
        ),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

fn parse_turtle(
    text: &str,
    mut sink: impl FnMut(Term, Term, Term) -> GraphResult<()>,
) -> GraphResult<usize> {
    let parser = RdfParser::from_format(RdfFormat::Turtle).without_named_graphs();
    let mut count = 0;
    for quad in parser.for_reader(text.as_bytes()) {
        let quad = quad.map_err(|e| GraphError::Parse {
            message: e.to_string(),
        })?;
        let subject = convert(OxTerm::from(quad.subject));
        let object = convert(quad.object);
        let (Some(subject), Some(object)) = (subject, object) else {
            tracing::debug!("skipping triple term outside the supported node model");
            continue;
        };
        sink(subject, Term::Iri(quad.predicate.into_string()), object)?;
        count += 1;
    }
    Ok(count)
}

/// Parse Turtle into the graph's base store, firing listener events.
///
/// Returns the number of statements read.
pub fn load_turtle(graph: &mut Graph, text: &str) -> GraphResult<usize> {
    parse_turtle(text, |s, p, o| graph.add_terms(s, p, o).map(|_| ()))
}

/// Parse Turtle into a detached store, typically a future component.
pub fn load_turtle_into(store: &mut TripleStore, text: &str) -> GraphResult<usize> {
    parse_turtle(text, |s, p, o| store.insert_terms(s, p, o).map(|_| ()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::graph::TriplePattern;

    const DOC: &str = r#"
        @prefix ex: <http://ex.com#> .
        @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
        ex:a ex:p ex:b ;
             ex:n "5"^^xsd:int ;
             ex:l "hi"@en ;
             ex:s "plain" .
        ex:a ex:q [ ex:p ex:c ] .
    "#;

    #[test]
    fn loads_into_graph() {
        let mut g = Graph::new();
        let n = load_turtle(&mut g, DOC).unwrap();
        assert_eq!(n, 6);
        assert_eq!(g.len(), 6);

        let a = g.dictionary().lookup_iri("http://ex.com#a").unwrap();
        assert_eq!(g.find(&TriplePattern::any().with_subject(a)).len(), 5);
    }

    #[test]
    fn literal_kinds_are_preserved() {
        let mut g = Graph::new();
        load_turtle(&mut g, DOC).unwrap();
        let dict = g.dictionary();
        assert!(dict
            .lookup(&Term::typed_literal("5", "http://www.w3.org/2001/XMLSchema#int"))
            .is_some());
        assert!(dict.lookup(&Term::lang_literal("hi", "en")).is_some());
        assert!(dict.lookup(&Term::literal("plain")).is_some());
    }

    #[test]
    fn loads_into_store() {
        let g = Graph::new();
        let mut store = TripleStore::new(Arc::clone(g.dictionary()));
        assert_eq!(load_turtle_into(&mut store, DOC).unwrap(), 6);
        assert_eq!(store.len(), 6);
    }

    #[test]
    fn parse_errors_are_reported() {
        let mut g = Graph::new();
        let err = load_turtle(&mut g, "ex:a ex:b").unwrap_err();
        assert!(matches!(err, GraphError::Parse { .. }));
    }
}
