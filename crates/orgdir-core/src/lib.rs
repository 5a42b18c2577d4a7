//! Orgdir Core - organization directory service
//!
//! The directory keeps organizations, buildings, phones and a taxonomy of
//! activities. The taxonomy is the interesting part:
//! - [`PathBuilder`] turns a name and optional parent into a depth-bounded path
//! - [`DescendantResolver`] expands an activity to its whole subtree
//! - [`ActivityOrgLinkage`] answers "who practices X or anything under X"
//! - [`Directory`] ties them to a [`Store`](orgdir_store::Store) with atomic batches
//!
//! # Example
//!
//! ```rust
//! use orgdir_core::{Directory, DirectoryConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), orgdir_core::DirectoryError> {
//! let directory = Directory::in_memory(DirectoryConfig::new());
//!
//! let transport = directory.create_activity("Перевозки", None).await?;
//! let freight = directory.create_activity("Грузовые", Some(transport.id)).await?;
//! assert_eq!(freight.path.to_string(), "perevozki.gruzovye");
//!
//! let tree = directory.activity_tree(transport.id).await?;
//! assert_eq!(tree.len(), 2);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod builder;
pub mod cache;
pub mod config;
pub mod directory;
pub mod entities;
pub mod error;
pub mod geo;
pub mod linkage;
pub mod resolver;

// Re-exports for convenience
pub use builder::PathBuilder;
pub use cache::{CacheStats, TreeCache};
pub use config::{DirectoryConfig, LogConfig, TreeCacheConfig, API_KEY_ENV};
pub use directory::Directory;
pub use entities::{validate_phone_number, OrganizationDetails};
pub use error::{DirectoryError, Entity, ErrorKind};
pub use geo::{BoundingBox, GeoPoint};
pub use linkage::ActivityOrgLinkage;
pub use resolver::DescendantResolver;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the directory
    pub use crate::{BoundingBox, Directory, DirectoryConfig, DirectoryError, ErrorKind};
    pub use orgdir_store::{
        BuildingId, NewBuilding, NewOrganization, NewPhone, OrganizationId, PhoneId,
    };
    pub use orgdir_taxonomy::{ActivityId, ActivityNode, ActivityPath, ActivityTree};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
