//! Class → applicable-properties view over a graph.
//!
//! - [`vocab`]: the RDF/RDFS/OWL terms the derivation reads
//! - [`class_expr`]: classification of class-expression nodes, RDF lists
//! - [`derive`]: the pure derivation walk
//! - [`index`]: the listener-backed LRU cache around it
//! - [`local`]: filtering down to one module of a union graph

pub mod class_expr;
pub mod derive;
pub mod index;
pub mod local;
pub mod vocab;

pub use class_expr::{ClassExpr, PropertyKind};
pub use derive::{OwlDerivation, PropertyDerivation};
pub use index::{
    CLASS_PROPERTY_INDEX, ClassPropertyIndex, IndexStats, NodeSet, get_or_create_cached_index,
    owl_class_index,
};
pub use local::LocalFilter;
pub use vocab::Vocabulary;
