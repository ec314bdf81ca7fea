// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # ontoindex
//!
//! Incrementally maintained ontology indexes over an in-memory RDF union graph.
//!
//! ## Architecture
//!
//! - **Terms** (`term`, `dictionary`): RDF terms interned to compact `NodeId`s
//! - **Graph** (`graph`): a private base store plus attached component stores,
//!   with synchronous change notification to kind-tagged listeners
//! - **Ontology** (`ontology`): OWL class-expression model, derivation of the
//!   properties applicable to a class, and an LRU-cached index kept coherent
//!   by graph events
//! - **Prefixes** (`prefix`): a reference-counted registry binding a prefix to
//!   every namespace in use
//!
//! ## Library usage
//!
//! ```no_run
//! use ontoindex::config::IndexConfig;
//! use ontoindex::graph::{Graph, io::load_turtle};
//! use ontoindex::ontology::owl_class_index;
//! use ontoindex::prefix::{PrefixLibrary, attach_auto_prefix};
//!
//! let mut graph = Graph::new();
//! let prefixes = attach_auto_prefix(&mut graph, PrefixLibrary::well_known());
//! let index = owl_class_index(&mut graph, &IndexConfig::default()).unwrap();
//!
//! load_turtle(&mut graph, r#"
//!     @prefix ex: <http://ex.com#> .
//!     @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
//!     ex:Dog rdfs:subClassOf ex:Animal .
//!     ex:legs rdfs:domain ex:Animal .
//! "#).unwrap();
//!
//! let dog = graph.iri("http://ex.com#Dog").unwrap();
//! let legs = graph.iri("http://ex.com#legs").unwrap();
//! assert!(index.class_properties(&graph, dog).unwrap().contains(&legs));
//! assert!(prefixes.prefix_for("http://ex.com#").is_some());
//! ```

pub mod config;
pub mod dictionary;
pub mod error;
pub mod graph;
pub mod ontology;
pub mod prefix;
pub mod term;

pub use config::{Config, IndexConfig, PrefixConfig};
pub use dictionary::TermDictionary;
pub use error::{OntoError, OntoResult};
pub use graph::{Graph, Triple, TriplePattern};
pub use term::{NodeId, Term};
