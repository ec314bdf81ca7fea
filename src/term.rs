//! Core node types: RDF terms and their interned identifiers.
//!
//! Every IRI, blank node and literal that appears in a graph is interned once
//! in a [`TermDictionary`](crate::dictionary::TermDictionary) and referred to by
//! a [`NodeId`] afterwards. Triples, caches and visited sets all work on ids,
//! never on strings.

use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};
use crate::ontology::vocab::{rdf, xsd};

/// Datatypes implied by plain and language-tagged literals.
fn is_implicit_datatype(datatype: &str) -> bool {
    datatype == xsd::STRING || datatype == rdf::LANG_STRING
}

/// Unique, niche-optimized identifier for an interned node.
///
/// Uses `NonZeroU64` so that `Option<NodeId>` is the same size as `NodeId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct NodeId(NonZeroU64);

impl NodeId {
    /// Create a `NodeId` from a raw `u64`.
    ///
    /// Returns `None` if `raw` is zero.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(NodeId)
    }

    /// Get the underlying `u64` value.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node:{}", self.0)
    }
}

/// A graph node: IRI, blank node or literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    /// An absolute IRI.
    Iri(String),
    /// A blank (anonymous) node, identified by its local label.
    Blank(String),
    /// A literal with an optional datatype IRI and/or language tag.
    Literal {
        lexical: String,
        datatype: Option<String>,
        language: Option<String>,
    },
}

impl Term {
    /// Shorthand for an IRI term.
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    /// Shorthand for a blank node term.
    pub fn blank(label: impl Into<String>) -> Self {
        Term::Blank(label.into())
    }

    /// A plain literal without datatype or language.
    pub fn literal(lexical: impl Into<String>) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }

    /// A literal carrying a datatype IRI.
    ///
    /// `xsd:string` is implied for plain literals and is dropped, so
    /// `"x"^^xsd:string` and `"x"` are the same term.
    pub fn typed_literal(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
        .canonical()
    }

    /// A language-tagged literal.
    pub fn lang_literal(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }

    /// Normal form used for interning: literals drop the implicit
    /// `xsd:string` / `rdf:langString` datatype.
    pub fn canonical(self) -> Self {
        match self {
            Term::Literal {
                lexical,
                datatype: Some(dt),
                language,
            } if is_implicit_datatype(&dt) => Term::Literal {
                lexical,
                datatype: None,
                language,
            },
            other => other,
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }

    /// The IRI string, if this term is an IRI.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// The namespace this term contributes to prefix maintenance.
    ///
    /// IRIs yield their own namespace, typed literals the namespace of their
    /// datatype. Blank nodes, plain/string literals and language-tagged
    /// literals yield nothing.
    pub fn namespace(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => split_namespace(iri).map(|(ns, _)| ns),
            Term::Literal {
                datatype: Some(dt),
                language: None,
                ..
            } if !is_implicit_datatype(dt) => split_namespace(dt).map(|(ns, _)| ns),
            _ => None,
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::Blank(label) => write!(f, "_:{label}"),
            Term::Literal {
                lexical,
                datatype,
                language,
            } => {
                write!(f, "{lexical:?}")?;
                if let Some(lang) = language {
                    write!(f, "@{lang}")?;
                } else if let Some(dt) = datatype {
                    write!(f, "^^<{dt}>")?;
                }
                Ok(())
            }
        }
    }
}

/// Split an IRI into `(namespace, local_name)`.
///
/// The namespace ends with the last `#`, `/` or `:` of the IRI. An IRI that
/// ends with a separator is entirely namespace. Returns `None` when the IRI
/// has no separator at all.
pub fn split_namespace(iri: &str) -> Option<(&str, &str)> {
    let cut = iri.rfind(['#', '/', ':'])?;
    Some(iri.split_at(cut + 1))
}

/// Thread-safe node ID allocator.
///
/// Produces monotonically increasing IDs starting from 1.
#[derive(Debug)]
pub struct AtomicNodeAllocator {
    next: AtomicU64,
}

impl AtomicNodeAllocator {
    /// Create a new allocator that starts from ID 1.
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Allocate the next node ID.
    ///
    /// Returns an error if the ID space is exhausted.
    pub fn next_id(&self) -> GraphResult<NodeId> {
        let raw = self.next.fetch_add(1, Ordering::Relaxed);
        NodeId::new(raw).ok_or(GraphError::AllocatorExhausted)
    }

    /// Return the next ID that *would* be allocated, without consuming it.
    pub fn peek_next(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for AtomicNodeAllocator {
    fn default() -> Self {
        Self::new()
    }
}
