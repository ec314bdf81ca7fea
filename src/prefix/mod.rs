//! Namespace prefixes of a graph.
//!
//! - [`mapping`]: the live, bijective prefix ↔ namespace table each graph owns
//! - [`library`]: preferred prefixes for well-known namespaces
//! - [`derive`]: prefix candidates for namespaces the library does not know
//! - [`auto`]: the listener keeping the live table in step with graph content

pub mod auto;
pub mod derive;
pub mod library;
pub mod mapping;

pub use auto::{AUTO_PREFIX, AutoPrefix, attach_auto_prefix};
pub use derive::derive_prefix;
pub use library::PrefixLibrary;
pub use mapping::{PrefixMapping, is_valid_prefix};
