//! Orgdir Activity Taxonomy
//!
//! Storage-free building blocks of the activity taxonomy.
//!
//! # Overview
//!
//! - **codec**: free-text names → ASCII path segments
//! - **ActivityPath**: dot-delimited lineage, at most [`MAX_DEPTH`] segments when stored
//! - **ActivityNode**: a stored category
//! - **tree**: flat node sets → nested [`ActivityTree`]s
//!
//! # Example
//!
//! ```rust
//! use orgdir_taxonomy::{codec, ActivityPath};
//!
//! let root = ActivityPath::root(codec::encode("Перевозки").unwrap()).unwrap();
//! let child = root.child(codec::encode("Грузовые").unwrap()).unwrap();
//! assert_eq!(child.to_string(), "perevozki.gruzovye");
//! assert!(root.is_ancestor_of(&child));
//! ```

#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod node;
pub mod path;
pub mod tree;

// Re-exports
pub use error::TaxonomyError;
pub use node::{ActivityId, ActivityNode};
pub use path::{ActivityPath, MAX_DEPTH, SEPARATOR};
pub use tree::{assemble, assemble_forest, ActivityTree};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for taxonomy operations
    pub use crate::{
        assemble, assemble_forest, codec, ActivityId, ActivityNode, ActivityPath, ActivityTree,
        TaxonomyError, MAX_DEPTH,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
