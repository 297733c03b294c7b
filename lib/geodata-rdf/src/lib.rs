mod canton;
mod error;
mod gpkg;
pub mod mapping;
mod record;
mod serialize;
pub mod vocab;

pub use canton::*;
pub use error::*;
pub use gpkg::*;
pub use record::*;
pub use serialize::*;
pub use vocab::{Vocabulary, DEFAULT_BASE_IRI};

// Re-export the oxrdf types that appear in the public API.
pub use oxrdf::{Literal, NamedNode, NamedNodeRef, Term, Triple};
