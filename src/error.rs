//! Rich diagnostic error types for ontoindex.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text. Structural inconsistencies inside a
//! graph are never reported through these types: derivation skips them and
//! logs instead. What remains are precondition failures (foreign nodes,
//! foreign graphs, bad configuration) and errors raised by listeners.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for ontoindex.
#[derive(Debug, Error, Diagnostic)]
pub enum OntoError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Prefix(#[from] PrefixError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("node allocator exhausted: cannot allocate more than u64::MAX nodes")]
    #[diagnostic(
        code(ontoindex::graph::exhausted),
        help("The node ID space is exhausted. Check for interning loops.")
    )]
    AllocatorExhausted,

    #[error("unknown node: {node_id}")]
    #[diagnostic(
        code(ontoindex::graph::unknown_node),
        help(
            "The node id was not issued by this graph's term dictionary. \
             Intern the term through `graph.dictionary()` first."
        )
    )]
    UnknownNode { node_id: u64 },

    #[error("component store {store_id} uses a different term dictionary")]
    #[diagnostic(
        code(ontoindex::graph::foreign_dictionary),
        help(
            "Component stores must be created with `TripleStore::new(graph.dictionary().clone())` \
             so node ids are shared with the union graph."
        )
    )]
    ForeignDictionary { store_id: u64 },

    #[error("component store {store_id} is already attached")]
    #[diagnostic(
        code(ontoindex::graph::already_attached),
        help("Detach the component first if you want to re-attach it.")
    )]
    ComponentAlreadyAttached { store_id: u64 },

    #[error("component store {store_id} is not attached")]
    #[diagnostic(
        code(ontoindex::graph::component_not_found),
        help("Only stores previously passed to `attach_component` can be detached.")
    )]
    ComponentNotFound { store_id: u64 },

    #[error("RDF parse error: {message}")]
    #[diagnostic(
        code(ontoindex::graph::parse),
        help("The Turtle input could not be parsed. Check prefixes and statement terminators.")
    )]
    Parse { message: String },

    #[error("listener {kind} failed: {message}")]
    #[diagnostic(
        code(ontoindex::graph::listener),
        help(
            "A change listener rejected the mutation. The triple itself has \
             already been applied; listeners registered after the failing one \
             were not notified."
        )
    )]
    Listener { kind: &'static str, message: String },
}

/// Result type for graph operations.
pub type GraphResult<T> = std::result::Result<T, GraphError>;

// ---------------------------------------------------------------------------
// Index errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum IndexError {
    #[error("index is bound to graph {expected}, queried with graph {actual}")]
    #[diagnostic(
        code(ontoindex::index::foreign_graph),
        help(
            "A class-property index only answers for the graph it was registered on. \
             Use `get_or_create_cached_index` on the graph you are querying."
        )
    )]
    ForeignGraph { expected: u64, actual: u64 },

    #[error("node {node_id} is unknown to the queried graph")]
    #[diagnostic(
        code(ontoindex::index::unknown_node),
        help("Pass a node id interned in the queried graph's dictionary.")
    )]
    UnknownNode { node_id: u64 },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),
}

/// Result type for index queries.
pub type IndexResult<T> = std::result::Result<T, IndexError>;

// ---------------------------------------------------------------------------
// Prefix errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PrefixError {
    #[error("invalid prefix name: {prefix:?}")]
    #[diagnostic(
        code(ontoindex::prefix::invalid_name),
        help(
            "Prefixes must start with a letter and contain only letters, digits, \
             '-' or '_'. The empty prefix is allowed."
        )
    )]
    InvalidPrefix { prefix: String },

    #[error("prefix {prefix:?} is already bound to {namespace}")]
    #[diagnostic(
        code(ontoindex::prefix::conflict),
        help("Remove the existing binding with `remove_prefix` before rebinding it.")
    )]
    Conflict { prefix: String, namespace: String },
}

/// Result type for prefix mapping operations.
pub type PrefixResult<T> = std::result::Result<T, PrefixError>;

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(ontoindex::config::invalid),
        help("Check the configuration fields. {message}")
    )]
    Invalid { message: String },

    #[error("configuration parse error: {source}")]
    #[diagnostic(
        code(ontoindex::config::parse),
        help("The configuration is not valid TOML or has fields of the wrong type.")
    )]
    Parse {
        #[source]
        source: toml::de::Error,
    },
}

/// Convenience alias for functions returning ontoindex results.
pub type OntoResult<T> = std::result::Result<T, OntoError>;
